use std::borrow::Cow;

/// A specialized [`IdentityError`] enum of this crate.
#[cmt_derive::cmt_error]
pub enum IdentityError {
    /// Configuration errors for identity/authentication.
    #[error("Identity config error{}: {message}", format_context(context))]
    Config { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// Request payload failed validation.
    #[error("Identity validation error{}: {message}", format_context(context))]
    Validation { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// Registration against an email that already has an account.
    #[error("Email already registered{}: {message}", format_context(context))]
    EmailTaken { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// Wrong email/password or an unverifiable token.
    #[error("Invalid credentials{}: {message}", format_context(context))]
    InvalidCredentials { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// The addressed account does not exist.
    #[error("Account not found{}: {message}", format_context(context))]
    NotFound { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// Query failures.
    #[error("Identity database error{}: {message}", format_context(context))]
    Database { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// Internal fallback for unexpected issues or logic errors.
    #[error("Internal identity error{}: {message}", format_context(context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

#[cfg(feature = "server")]
impl From<IdentityError> for cmt_kernel::server::ApiError {
    fn from(err: IdentityError) -> Self {
        use cmt_kernel::server::ApiError;
        match err {
            IdentityError::Validation { message, context } => {
                Self::Validation { message, context }
            },
            IdentityError::EmailTaken { message, context } => Self::Conflict { message, context },
            IdentityError::InvalidCredentials { message, context } => {
                Self::Unauthorized { message, context }
            },
            IdentityError::NotFound { message, context } => Self::NotFound { message, context },
            other => ApiError::Internal { message: other.to_string().into(), context: None },
        }
    }
}
