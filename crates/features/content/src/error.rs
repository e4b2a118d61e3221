use std::borrow::Cow;

/// A specialized [`ContentError`] enum of this crate.
#[cmt_derive::cmt_error]
pub enum ContentError {
    /// Request payload failed validation.
    #[error("Content validation error{}: {message}", format_context(context))]
    Validation { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// The addressed content row does not exist.
    #[error("Not found{}: {message}", format_context(context))]
    NotFound { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// A page key collision that survived the upsert.
    #[error("Conflict{}: {message}", format_context(context))]
    Conflict { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// Query failures.
    #[error("Content database error{}: {message}", format_context(context))]
    Database { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// Internal fallback for unexpected issues or logic errors.
    #[error("Internal content error{}: {message}", format_context(context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

#[cfg(feature = "server")]
impl From<ContentError> for cmt_kernel::server::ApiError {
    fn from(err: ContentError) -> Self {
        match err {
            ContentError::Validation { message, context } => Self::Validation { message, context },
            ContentError::NotFound { message, context } => Self::NotFound { message, context },
            ContentError::Conflict { message, context } => Self::Conflict { message, context },
            other => Self::Internal { message: other.to_string().into(), context: None },
        }
    }
}
