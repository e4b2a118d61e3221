use crate::Identity;
use crate::service;
use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use cmt_domain::model::Role;
use cmt_kernel::server::{ApiError, ApiState};

/// Authenticated account extracted from the `Authorization: Bearer` header.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: String,
    pub email: String,
    pub full_name: String,
    pub role: Role,
}

impl CurrentUser {
    #[must_use]
    pub const fn is_chair(&self) -> bool {
        matches!(self.role, Role::Chair)
    }
}

fn bearer_token(parts: &Parts) -> Result<&str, ApiError> {
    parts
        .headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| ApiError::Unauthorized {
            message: "Missing bearer token".into(),
            context: None,
        })
}

impl FromRequestParts<ApiState> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &ApiState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)?;

        let identity = state.try_get_slice::<Identity>().map_err(|e| ApiError::Internal {
            message: e.to_string().into(),
            context: None,
        })?;

        if let Some(user) = identity.sessions.get(token) {
            return Ok(user);
        }

        let claims = identity.tokens.verify(token)?;
        let record = service::find_by_id(&state.database, &claims.sub)
            .await?
            .ok_or_else(|| ApiError::Unauthorized {
                message: "Account no longer exists".into(),
                context: None,
            })?;

        let user = Self {
            id: record.id.to_string(),
            email: record.email,
            full_name: record.full_name,
            role: record.role.parse().unwrap_or_default(),
        };
        identity.sessions.insert(token.to_owned(), user.clone());

        Ok(user)
    }
}

/// Like [`CurrentUser`], but rejects anyone who is not a chair.
#[derive(Debug, Clone)]
pub struct RequireChair(pub CurrentUser);

impl FromRequestParts<ApiState> for RequireChair {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &ApiState,
    ) -> Result<Self, Self::Rejection> {
        let user = CurrentUser::from_request_parts(parts, state).await?;
        if !user.is_chair() {
            return Err(ApiError::Forbidden {
                message: "Chair role required".into(),
                context: None,
            });
        }
        Ok(Self(user))
    }
}
