use crate::model::{ConferenceRecord, TrackRecord};
use crate::service::{self, ConferenceInput, TrackInput};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::{Json, response::IntoResponse};
use cmt_derive::{api_handler, api_model};
use cmt_domain::constants::CONFERENCE_TAG;
use cmt_identity::RequireChair;
use cmt_kernel::server::{ApiError, ApiState};
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

const fn default_true() -> bool {
    true
}

#[api_model]
/// Conference payload for create and update
pub struct ConferenceRequest {
    /// Full conference name
    pub name: String,
    /// Shorter display name
    #[serde(default)]
    pub short_name: Option<String>,
    /// Acronym the URL slug derives from
    #[serde(default)]
    pub acronym: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub logo_url: Option<String>,
    /// ISO 8601 date
    #[serde(default)]
    pub start_date: Option<String>,
    /// ISO 8601 date
    #[serde(default)]
    pub end_date: Option<String>,
    /// ISO 8601 date
    #[serde(default)]
    pub submission_deadline: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

#[api_model]
/// Public view of a conference
pub struct ConferenceResponse {
    /// Record id ("conference:...")
    pub id: String,
    pub name: String,
    pub short_name: Option<String>,
    pub acronym: Option<String>,
    pub description: Option<String>,
    pub logo_url: Option<String>,
    /// URL slug, absent when the acronym normalizes to nothing
    pub slug: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub submission_deadline: Option<String>,
    pub is_active: bool,
    /// Account that created the conference
    pub created_by: String,
    pub created_at: String,
}

#[api_model]
/// Track payload for create and update
pub struct TrackRequest {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

#[api_model]
/// Public view of a track
pub struct TrackResponse {
    /// Record id ("track:...")
    pub id: String,
    /// Owning conference record id
    pub conference: String,
    pub name: String,
    pub description: Option<String>,
    pub is_active: bool,
    pub created_at: String,
}

impl From<ConferenceRecord> for ConferenceResponse {
    fn from(record: ConferenceRecord) -> Self {
        Self {
            id: record.id.to_string(),
            name: record.name,
            short_name: record.short_name,
            acronym: record.acronym,
            description: record.description,
            logo_url: record.logo_url,
            slug: record.slug,
            start_date: record.start_date,
            end_date: record.end_date,
            submission_deadline: record.submission_deadline,
            is_active: record.is_active,
            created_by: record.created_by.to_string(),
            created_at: record.created_at.to_string(),
        }
    }
}

impl From<TrackRecord> for TrackResponse {
    fn from(record: TrackRecord) -> Self {
        Self {
            id: record.id.to_string(),
            conference: record.conference.to_string(),
            name: record.name,
            description: record.description,
            is_active: record.is_active,
            created_at: record.created_at.to_string(),
        }
    }
}

impl From<ConferenceRequest> for ConferenceInput {
    fn from(payload: ConferenceRequest) -> Self {
        Self {
            name: payload.name,
            short_name: payload.short_name,
            acronym: payload.acronym,
            description: payload.description,
            logo_url: payload.logo_url,
            start_date: payload.start_date,
            end_date: payload.end_date,
            submission_deadline: payload.submission_deadline,
            is_active: payload.is_active,
        }
    }
}

impl From<TrackRequest> for TrackInput {
    fn from(payload: TrackRequest) -> Self {
        Self {
            name: payload.name,
            description: payload.description,
            is_active: payload.is_active,
        }
    }
}

#[api_handler(
    get,
    path = "/conferences",
    responses((status = OK, description = "All conferences", body = [ConferenceResponse])),
    tag = CONFERENCE_TAG,
)]
async fn list_conferences_handler(
    State(state): State<ApiState>,
) -> Result<Json<Vec<ConferenceResponse>>, ApiError> {
    let conferences = service::list_conferences(&state.database).await?;
    Ok(Json(conferences.into_iter().map(ConferenceResponse::from).collect()))
}

#[api_handler(
    get,
    path = "/conferences/{id}",
    params(("id" = String, Path, description = "Conference record id")),
    responses(
        (status = OK, description = "The conference", body = ConferenceResponse),
        (status = NOT_FOUND, description = "No such conference"),
    ),
    tag = CONFERENCE_TAG,
)]
async fn get_conference_handler(
    State(state): State<ApiState>,
    Path(id): Path<String>,
) -> Result<Json<ConferenceResponse>, ApiError> {
    let conference = service::get_conference(&state.database, &id)
        .await?
        .ok_or_else(|| ApiError::not_found(id))?;
    Ok(Json(ConferenceResponse::from(conference)))
}

#[api_handler(
    get,
    path = "/conferences/by-slug/{slug}",
    params(("slug" = String, Path, description = "Conference URL slug")),
    responses(
        (status = OK, description = "The conference", body = ConferenceResponse),
        (status = NOT_FOUND, description = "No conference carries this slug"),
    ),
    tag = CONFERENCE_TAG,
)]
async fn get_conference_by_slug_handler(
    State(state): State<ApiState>,
    Path(slug): Path<String>,
) -> Result<Json<ConferenceResponse>, ApiError> {
    let conference = service::get_conference_by_slug(&state.database, &slug)
        .await?
        .ok_or_else(|| ApiError::not_found(slug))?;
    Ok(Json(ConferenceResponse::from(conference)))
}

#[api_handler(
    post,
    path = "/conferences",
    request_body = ConferenceRequest,
    responses(
        (status = CREATED, description = "Conference created", body = ConferenceResponse),
        (status = FORBIDDEN, description = "Chair role required"),
        (status = UNPROCESSABLE_ENTITY, description = "Invalid payload"),
    ),
    tag = CONFERENCE_TAG,
)]
async fn create_conference_handler(
    State(state): State<ApiState>,
    RequireChair(chair): RequireChair,
    Json(payload): Json<ConferenceRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let created =
        service::create_conference(&state.database, &chair.id, payload.into()).await?;
    Ok((StatusCode::CREATED, Json(ConferenceResponse::from(created))))
}

#[api_handler(
    put,
    path = "/conferences/{id}",
    request_body = ConferenceRequest,
    params(("id" = String, Path, description = "Conference record id")),
    responses(
        (status = OK, description = "Conference updated", body = ConferenceResponse),
        (status = FORBIDDEN, description = "Chair role required"),
        (status = NOT_FOUND, description = "No such conference"),
    ),
    tag = CONFERENCE_TAG,
)]
async fn update_conference_handler(
    State(state): State<ApiState>,
    RequireChair(_): RequireChair,
    Path(id): Path<String>,
    Json(payload): Json<ConferenceRequest>,
) -> Result<Json<ConferenceResponse>, ApiError> {
    let updated = service::update_conference(&state.database, &id, payload.into()).await?;
    Ok(Json(ConferenceResponse::from(updated)))
}

#[api_handler(
    delete,
    path = "/conferences/{id}",
    params(("id" = String, Path, description = "Conference record id")),
    responses(
        (status = NO_CONTENT, description = "Conference and its tracks deleted"),
        (status = FORBIDDEN, description = "Chair role required"),
        (status = NOT_FOUND, description = "No such conference"),
    ),
    tag = CONFERENCE_TAG,
)]
async fn delete_conference_handler(
    State(state): State<ApiState>,
    RequireChair(_): RequireChair,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    service::delete_conference(&state.database, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[api_handler(
    get,
    path = "/conferences/{id}/tracks",
    params(("id" = String, Path, description = "Conference record id")),
    responses((status = OK, description = "Tracks of the conference", body = [TrackResponse])),
    tag = CONFERENCE_TAG,
)]
async fn list_tracks_handler(
    State(state): State<ApiState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<TrackResponse>>, ApiError> {
    let tracks = service::list_tracks(&state.database, &id).await?;
    Ok(Json(tracks.into_iter().map(TrackResponse::from).collect()))
}

#[api_handler(
    post,
    path = "/conferences/{id}/tracks",
    request_body = TrackRequest,
    params(("id" = String, Path, description = "Conference record id")),
    responses(
        (status = CREATED, description = "Track created", body = TrackResponse),
        (status = FORBIDDEN, description = "Chair role required"),
        (status = NOT_FOUND, description = "No such conference"),
    ),
    tag = CONFERENCE_TAG,
)]
async fn create_track_handler(
    State(state): State<ApiState>,
    RequireChair(_): RequireChair,
    Path(id): Path<String>,
    Json(payload): Json<TrackRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let created = service::create_track(&state.database, &id, payload.into()).await?;
    Ok((StatusCode::CREATED, Json(TrackResponse::from(created))))
}

#[api_handler(
    put,
    path = "/tracks/{id}",
    request_body = TrackRequest,
    params(("id" = String, Path, description = "Track record id")),
    responses(
        (status = OK, description = "Track updated", body = TrackResponse),
        (status = FORBIDDEN, description = "Chair role required"),
        (status = NOT_FOUND, description = "No such track"),
    ),
    tag = CONFERENCE_TAG,
)]
async fn update_track_handler(
    State(state): State<ApiState>,
    RequireChair(_): RequireChair,
    Path(id): Path<String>,
    Json(payload): Json<TrackRequest>,
) -> Result<Json<TrackResponse>, ApiError> {
    let updated = service::update_track(&state.database, &id, payload.into()).await?;
    Ok(Json(TrackResponse::from(updated)))
}

#[api_handler(
    delete,
    path = "/tracks/{id}",
    params(("id" = String, Path, description = "Track record id")),
    responses(
        (status = NO_CONTENT, description = "Track deleted"),
        (status = FORBIDDEN, description = "Chair role required"),
        (status = NOT_FOUND, description = "No such track"),
    ),
    tag = CONFERENCE_TAG,
)]
async fn delete_track_handler(
    State(state): State<ApiState>,
    RequireChair(_): RequireChair,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    service::delete_track(&state.database, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub fn router() -> OpenApiRouter<ApiState> {
    OpenApiRouter::new()
        .routes(routes!(list_conferences_handler))
        .routes(routes!(create_conference_handler))
        .routes(routes!(get_conference_by_slug_handler))
        .routes(routes!(get_conference_handler))
        .routes(routes!(update_conference_handler))
        .routes(routes!(delete_conference_handler))
        .routes(routes!(list_tracks_handler))
        .routes(routes!(create_track_handler))
        .routes(routes!(update_track_handler))
        .routes(routes!(delete_track_handler))
}
