use std::borrow::Cow;

/// A specialized [`SubmissionError`] enum of this crate.
#[cmt_derive::cmt_error]
pub enum SubmissionError {
    /// Request payload failed validation.
    #[error("Submission validation error{}: {message}", format_context(context))]
    Validation { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// The addressed submission or conference does not exist.
    #[error("Not found{}: {message}", format_context(context))]
    NotFound { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// The caller is neither the submitter nor a chair.
    #[error("Forbidden{}: {message}", format_context(context))]
    Forbidden { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// Illegal status transition or a number collision that survived a retry.
    #[error("Conflict{}: {message}", format_context(context))]
    Conflict { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// Upload store failures.
    #[cfg(feature = "server")]
    #[error("Storage error{}: {source}", format_context(context))]
    Storage { source: cmt_storage::StorageError, context: Option<Cow<'static, str>> },

    /// Query failures.
    #[error("Submission database error{}: {message}", format_context(context))]
    Database { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// Internal fallback for unexpected issues or logic errors.
    #[error("Internal submission error{}: {message}", format_context(context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

#[cfg(feature = "server")]
impl From<SubmissionError> for cmt_kernel::server::ApiError {
    fn from(err: SubmissionError) -> Self {
        match err {
            SubmissionError::Validation { message, context } => {
                Self::Validation { message, context }
            },
            SubmissionError::NotFound { message, context } => Self::NotFound { message, context },
            SubmissionError::Forbidden { message, context } => Self::Forbidden { message, context },
            SubmissionError::Conflict { message, context } => Self::Conflict { message, context },
            other => Self::Internal { message: other.to_string().into(), context: None },
        }
    }
}
