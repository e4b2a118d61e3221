use crate::extract::{CurrentUser, RequireChair};
use crate::model::UserRecord;
use crate::service::{self, NewUser};
use crate::slice;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::{Json, response::IntoResponse};
use cmt_derive::{api_handler, api_model};
use cmt_domain::constants::IDENTITY_TAG;
use cmt_domain::model::Role;
use cmt_kernel::server::{ApiError, ApiState};
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

#[api_model]
/// New account payload
pub struct RegisterRequest {
    /// Email address, unique per account
    pub email: String,
    /// Password, at least 8 characters
    pub password: String,
    /// Display name
    pub full_name: String,
    /// Optional institution or company
    #[serde(default)]
    pub affiliation: Option<String>,
}

#[api_model]
/// Login payload
pub struct LoginRequest {
    /// Email address
    pub email: String,
    /// Password
    pub password: String,
}

#[api_model]
/// Access token plus the account it belongs to
pub struct TokenResponse {
    /// Bearer token for subsequent requests
    pub token: String,
    /// The authenticated account
    pub user: UserResponse,
}

#[api_model]
/// Public view of an account
pub struct UserResponse {
    /// Record id ("user:...")
    pub id: String,
    /// Email address
    pub email: String,
    /// Display name
    pub full_name: String,
    /// Optional institution or company
    pub affiliation: Option<String>,
    /// Either "chair" or "author"
    pub role: String,
    /// Creation timestamp
    pub created_at: String,
}

#[api_model]
/// Role change payload
pub struct ChangeRoleRequest {
    /// Either "chair" or "author"
    pub role: String,
}

impl From<UserRecord> for UserResponse {
    fn from(record: UserRecord) -> Self {
        Self {
            id: record.id.to_string(),
            email: record.email,
            full_name: record.full_name,
            affiliation: record.affiliation,
            role: record.role,
            created_at: record.created_at.to_string(),
        }
    }
}

#[api_handler(
    post,
    path = "/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = CREATED, description = "Account created", body = UserResponse),
        (status = CONFLICT, description = "Email already registered"),
        (status = UNPROCESSABLE_ENTITY, description = "Invalid payload"),
    ),
    tag = IDENTITY_TAG,
)]
async fn register_handler(
    State(state): State<ApiState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let identity = slice(&state)?;
    let created = service::register(
        &state.database,
        &identity.salt,
        NewUser {
            email: payload.email,
            password: payload.password,
            full_name: payload.full_name,
            affiliation: payload.affiliation,
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(UserResponse::from(created))))
}

#[api_handler(
    post,
    path = "/auth/login",
    request_body = LoginRequest,
    responses(
        (status = OK, description = "Authenticated", body = TokenResponse),
        (status = UNAUTHORIZED, description = "Unknown email or wrong password"),
    ),
    tag = IDENTITY_TAG,
)]
async fn login_handler(
    State(state): State<ApiState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    let identity = slice(&state)?;
    let user =
        service::login(&state.database, &identity.salt, &payload.email, &payload.password).await?;

    let role = user.role.parse().unwrap_or_default();
    let token = identity.tokens.issue(&user.id.to_string(), &user.email, role)?;

    Ok(Json(TokenResponse { token, user: UserResponse::from(user) }))
}

#[api_handler(
    get,
    path = "/auth/me",
    responses(
        (status = OK, description = "The authenticated account", body = UserResponse),
        (status = UNAUTHORIZED, description = "Missing or invalid token"),
    ),
    tag = IDENTITY_TAG,
)]
async fn me_handler(
    State(state): State<ApiState>,
    user: CurrentUser,
) -> Result<Json<UserResponse>, ApiError> {
    let record = service::find_by_id(&state.database, &user.id).await?.ok_or_else(|| {
        ApiError::Unauthorized { message: "Account no longer exists".into(), context: None }
    })?;

    Ok(Json(UserResponse::from(record)))
}

#[api_handler(
    get,
    path = "/users",
    responses(
        (status = OK, description = "All accounts, chairs only", body = [UserResponse]),
        (status = FORBIDDEN, description = "Chair role required"),
    ),
    tag = IDENTITY_TAG,
)]
async fn list_users_handler(
    State(state): State<ApiState>,
    RequireChair(_): RequireChair,
) -> Result<Json<Vec<UserResponse>>, ApiError> {
    let users = service::list_users(&state.database).await?;
    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

#[api_handler(
    put,
    path = "/users/{id}/role",
    request_body = ChangeRoleRequest,
    params(("id" = String, Path, description = "Account record id")),
    responses(
        (status = OK, description = "Role updated", body = UserResponse),
        (status = FORBIDDEN, description = "Chair role required"),
        (status = NOT_FOUND, description = "No such account"),
    ),
    tag = IDENTITY_TAG,
)]
async fn change_role_handler(
    State(state): State<ApiState>,
    RequireChair(chair): RequireChair,
    Path(id): Path<String>,
    Json(payload): Json<ChangeRoleRequest>,
) -> Result<Json<UserResponse>, ApiError> {
    let role: Role = payload.role.parse().map_err(|_| {
        ApiError::Validation { message: "Role must be 'chair' or 'author'".into(), context: None }
    })?;

    let identity = slice(&state)?;
    let updated = service::change_role(&state.database, &id, role).await?;

    // A chair demoting themselves should not keep a stale cached role around.
    if updated.id.to_string() == chair.id {
        identity.sessions.invalidate_all();
    }

    Ok(Json(UserResponse::from(updated)))
}

pub fn router() -> OpenApiRouter<ApiState> {
    OpenApiRouter::new()
        .routes(routes!(register_handler))
        .routes(routes!(login_handler))
        .routes(routes!(me_handler))
        .routes(routes!(list_users_handler))
        .routes(routes!(change_role_handler))
}
