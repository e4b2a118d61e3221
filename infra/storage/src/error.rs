use std::borrow::Cow;

/// A specialized [`StorageError`] enum of this crate.
#[cmt_derive::cmt_error]
pub enum StorageError {
    #[error("File not found{}: {message}", format_context(context))]
    FileNotFound { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Path traversal security violation{}: {message}", format_context(context))]
    PathTraversalAttempt { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("File exceeds the configured size limit{}: {message}", format_context(context))]
    FileTooLarge { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Hardware I/O failure{}: {source}", format_context(context))]
    Io { source: std::io::Error, context: Option<Cow<'static, str>> },
}
