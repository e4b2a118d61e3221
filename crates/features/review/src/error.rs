use std::borrow::Cow;

/// A specialized [`ReviewError`] enum of this crate.
#[cmt_derive::cmt_error]
pub enum ReviewError {
    /// Request payload failed validation.
    #[error("Review validation error{}: {message}", format_context(context))]
    Validation { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// The addressed assignment, submission, or user does not exist.
    #[error("Not found{}: {message}", format_context(context))]
    NotFound { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// The caller does not own the assignment.
    #[error("Forbidden{}: {message}", format_context(context))]
    Forbidden { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// Illegal decision for the submission's current status.
    #[error("Conflict{}: {message}", format_context(context))]
    Conflict { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// Query failures.
    #[error("Review database error{}: {message}", format_context(context))]
    Database { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// Internal fallback for unexpected issues or logic errors.
    #[error("Internal review error{}: {message}", format_context(context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

#[cfg(feature = "server")]
impl From<ReviewError> for cmt_kernel::server::ApiError {
    fn from(err: ReviewError) -> Self {
        match err {
            ReviewError::Validation { message, context } => Self::Validation { message, context },
            ReviewError::NotFound { message, context } => Self::NotFound { message, context },
            ReviewError::Forbidden { message, context } => Self::Forbidden { message, context },
            ReviewError::Conflict { message, context } => Self::Conflict { message, context },
            other => Self::Internal { message: other.to_string().into(), context: None },
        }
    }
}
