use crate::security::resource::ResourceGuardError;
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use std::borrow::Cow;
use tracing::error;

/// Error surface shared by every HTTP handler.
///
/// Slice services return their own error enums; handlers convert them into
/// this type so the wire format stays consistent across features.
#[cmt_derive::cmt_error]
pub enum ApiError {
    /// Request payload failed validation.
    #[error("Validation failed{}: {message}", format_context(context))]
    Validation { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// Missing or invalid credentials.
    #[error("Unauthorized{}: {message}", format_context(context))]
    Unauthorized { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// Authenticated, but not allowed to perform the operation.
    #[error("Forbidden{}: {message}", format_context(context))]
    Forbidden { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// The addressed resource does not exist.
    #[error("Not found{}: {message}", format_context(context))]
    NotFound { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// The request conflicts with existing state (duplicate slug, repeat decision...).
    #[error("Conflict{}: {message}", format_context(context))]
    Conflict { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// Database failures surface as opaque 500s.
    #[error("Database error{}: {source}", format_context(context))]
    Database { source: cmt_database::DatabaseError, context: Option<Cow<'static, str>> },

    /// Anything else that should never reach the client in detail.
    #[error("Internal error{}: {message}", format_context(context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

impl ApiError {
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Validation { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            Self::Forbidden { .. } => StatusCode::FORBIDDEN,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::Conflict { .. } => StatusCode::CONFLICT,
            Self::Database { .. } | Self::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    const fn code(&self) -> &'static str {
        match self {
            Self::Validation { .. } => "validation",
            Self::Unauthorized { .. } => "unauthorized",
            Self::Forbidden { .. } => "forbidden",
            Self::NotFound { .. } => "not_found",
            Self::Conflict { .. } => "conflict",
            Self::Database { .. } | Self::Internal { .. } => "internal",
        }
    }

    /// Shorthand for a 404 with the resource id in the message.
    #[must_use]
    pub fn not_found(resource: impl Into<Cow<'static, str>>) -> Self {
        Self::NotFound { message: resource.into(), context: None }
    }

    /// Shorthand for a 422 with a caller-facing reason.
    #[must_use]
    pub fn validation(message: impl Into<Cow<'static, str>>) -> Self {
        Self::Validation { message: message.into(), context: None }
    }

    /// Shorthand for a 403.
    #[must_use]
    pub fn forbidden(message: impl Into<Cow<'static, str>>) -> Self {
        Self::Forbidden { message: message.into(), context: None }
    }

    /// Shorthand for a 409.
    #[must_use]
    pub fn conflict(message: impl Into<Cow<'static, str>>) -> Self {
        Self::Conflict { message: message.into(), context: None }
    }
}

// IDs that name the wrong table look like missing resources to the caller.
impl From<ResourceGuardError> for ApiError {
    fn from(err: ResourceGuardError) -> Self {
        Self::NotFound { message: err.to_string().into(), context: None }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            error!(error = %self, "request failed");
            Cow::Borrowed("Internal server error")
        } else {
            Cow::Owned(self.to_string())
        };

        let body = json!({ "error": { "code": self.code(), "message": message } });
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(ApiError::validation("x").status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(ApiError::not_found("x").status(), StatusCode::NOT_FOUND);
        assert_eq!(ApiError::forbidden("x").status(), StatusCode::FORBIDDEN);
        assert_eq!(ApiError::conflict("x").status(), StatusCode::CONFLICT);
        assert_eq!(
            ApiError::Internal { message: "x".into(), context: None }.status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_guard_errors_read_as_missing_resources() {
        let guard_err = crate::security::resource::ResourceGuard::verify("user:1", "conference")
            .expect_err("table mismatch");
        let api_err: ApiError = guard_err.into();
        assert_eq!(api_err.status(), StatusCode::NOT_FOUND);
    }
}
