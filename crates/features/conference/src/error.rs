use std::borrow::Cow;

/// A specialized [`ConferenceError`] enum of this crate.
#[cmt_derive::cmt_error]
pub enum ConferenceError {
    /// Request payload failed validation.
    #[error("Conference validation error{}: {message}", format_context(context))]
    Validation { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// The addressed conference or track does not exist.
    #[error("Not found{}: {message}", format_context(context))]
    NotFound { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// Slug collision that survived a recompute.
    #[error("Slug conflict{}: {message}", format_context(context))]
    SlugConflict { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// Query failures.
    #[error("Conference database error{}: {message}", format_context(context))]
    Database { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// Internal fallback for unexpected issues or logic errors.
    #[error("Internal conference error{}: {message}", format_context(context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

#[cfg(feature = "server")]
impl From<ConferenceError> for cmt_kernel::server::ApiError {
    fn from(err: ConferenceError) -> Self {
        match err {
            ConferenceError::Validation { message, context } => {
                Self::Validation { message, context }
            },
            ConferenceError::NotFound { message, context } => Self::NotFound { message, context },
            ConferenceError::SlugConflict { message, context } => {
                Self::Conflict { message, context }
            },
            other => Self::Internal { message: other.to_string().into(), context: None },
        }
    }
}
