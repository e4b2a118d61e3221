use crate::model::{SubmissionAuthorRecord, SubmissionRecord};
use crate::service::{self, AuthorInput, SubmissionInput, Viewer};
use crate::slice;
use axum::extract::{Path, State};
use axum::http::{StatusCode, header};
use axum::{Json, response::IntoResponse};
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use cmt_derive::{api_handler, api_model};
use cmt_domain::constants::SUBMISSION_TAG;
use cmt_identity::{CurrentUser, RequireChair};
use cmt_kernel::server::{ApiError, ApiState};
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

#[api_model]
/// One co-author in a submission payload
pub struct AuthorRequest {
    pub full_name: String,
    pub email: String,
    #[serde(default)]
    pub affiliation: Option<String>,
    #[serde(default)]
    pub is_corresponding: bool,
}

#[api_model]
/// Draft submission payload
pub struct SubmissionRequest {
    /// Conference record id
    pub conference: String,
    /// Optional track record id
    #[serde(default)]
    pub track: Option<String>,
    pub title: String,
    #[serde(rename = "abstract")]
    pub abstract_text: String,
    pub authors: Vec<AuthorRequest>,
}

#[api_model]
/// Manuscript upload payload
pub struct UploadRequest {
    /// Original filename of the PDF
    pub file_name: String,
    /// Base64-encoded file contents
    pub data_base64: String,
}

#[api_model]
/// Public view of a submission
pub struct SubmissionResponse {
    /// Record id ("submission:...")
    pub id: String,
    pub conference: String,
    pub track: Option<String>,
    pub title: String,
    #[serde(rename = "abstract")]
    pub abstract_text: String,
    /// Stored filename inside the upload store, absent for drafts
    pub pdf_path: Option<String>,
    pub original_file_name: Option<String>,
    /// Submission number ("001P"), assigned on upload
    pub number: Option<String>,
    pub status: String,
    pub submitted_by: String,
    pub submitted_at: Option<String>,
    pub created_at: String,
}

#[api_model]
/// One co-author of a stored submission
pub struct AuthorResponse {
    pub id: String,
    pub full_name: String,
    pub email: String,
    pub affiliation: Option<String>,
    pub is_corresponding: bool,
}

#[api_model]
/// Submission together with its author list
pub struct SubmissionDetailResponse {
    pub submission: SubmissionResponse,
    pub authors: Vec<AuthorResponse>,
}

impl From<SubmissionRecord> for SubmissionResponse {
    fn from(record: SubmissionRecord) -> Self {
        Self {
            id: record.id.to_string(),
            conference: record.conference.to_string(),
            track: record.track.map(|t| t.to_string()),
            title: record.title,
            abstract_text: record.abstract_text,
            pdf_path: record.pdf_path,
            original_file_name: record.original_file_name,
            number: record.number,
            status: record.status,
            submitted_by: record.submitted_by.to_string(),
            submitted_at: record.submitted_at.map(|t| t.to_string()),
            created_at: record.created_at.to_string(),
        }
    }
}

impl From<SubmissionAuthorRecord> for AuthorResponse {
    fn from(record: SubmissionAuthorRecord) -> Self {
        Self {
            id: record.id.to_string(),
            full_name: record.full_name,
            email: record.email,
            affiliation: record.affiliation,
            is_corresponding: record.is_corresponding,
        }
    }
}

impl From<service::SubmissionDetail> for SubmissionDetailResponse {
    fn from(detail: service::SubmissionDetail) -> Self {
        Self {
            submission: SubmissionResponse::from(detail.submission),
            authors: detail.authors.into_iter().map(AuthorResponse::from).collect(),
        }
    }
}

fn viewer(user: &CurrentUser) -> Viewer<'_> {
    Viewer { id: &user.id, is_chair: user.is_chair() }
}

#[api_handler(
    post,
    path = "/submissions",
    request_body = SubmissionRequest,
    responses(
        (status = CREATED, description = "Draft created", body = SubmissionDetailResponse),
        (status = NOT_FOUND, description = "No such conference or track"),
        (status = UNPROCESSABLE_ENTITY, description = "Invalid payload"),
    ),
    tag = SUBMISSION_TAG,
)]
async fn create_submission_handler(
    State(state): State<ApiState>,
    user: CurrentUser,
    Json(payload): Json<SubmissionRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let input = SubmissionInput {
        conference: payload.conference,
        track: payload.track,
        title: payload.title,
        abstract_text: payload.abstract_text,
        authors: payload
            .authors
            .into_iter()
            .map(|a| AuthorInput {
                full_name: a.full_name,
                email: a.email,
                affiliation: a.affiliation,
                is_corresponding: a.is_corresponding,
            })
            .collect(),
    };

    let created = service::create_submission(&state.database, &user.id, input).await?;
    Ok((StatusCode::CREATED, Json(SubmissionDetailResponse::from(created))))
}

#[api_handler(
    get,
    path = "/submissions/mine",
    responses((status = OK, description = "Submissions of the caller", body = [SubmissionResponse])),
    tag = SUBMISSION_TAG,
)]
async fn list_mine_handler(
    State(state): State<ApiState>,
    user: CurrentUser,
) -> Result<Json<Vec<SubmissionResponse>>, ApiError> {
    let submissions = service::list_mine(&state.database, &user.id).await?;
    Ok(Json(submissions.into_iter().map(SubmissionResponse::from).collect()))
}

#[api_handler(
    get,
    path = "/conferences/{id}/submissions",
    params(("id" = String, Path, description = "Conference record id")),
    responses(
        (status = OK, description = "Submissions of the conference, chairs only", body = [SubmissionResponse]),
        (status = FORBIDDEN, description = "Chair role required"),
    ),
    tag = SUBMISSION_TAG,
)]
async fn list_by_conference_handler(
    State(state): State<ApiState>,
    RequireChair(_): RequireChair,
    Path(id): Path<String>,
) -> Result<Json<Vec<SubmissionResponse>>, ApiError> {
    let submissions = service::list_by_conference(&state.database, &id).await?;
    Ok(Json(submissions.into_iter().map(SubmissionResponse::from).collect()))
}

#[api_handler(
    get,
    path = "/submissions/{id}",
    params(("id" = String, Path, description = "Submission record id")),
    responses(
        (status = OK, description = "The submission with its authors", body = SubmissionDetailResponse),
        (status = FORBIDDEN, description = "Not the submitter and not a chair"),
        (status = NOT_FOUND, description = "No such submission"),
    ),
    tag = SUBMISSION_TAG,
)]
async fn get_submission_handler(
    State(state): State<ApiState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> Result<Json<SubmissionDetailResponse>, ApiError> {
    let detail = service::get_submission(&state.database, &id, viewer(&user)).await?;
    Ok(Json(SubmissionDetailResponse::from(detail)))
}

#[api_handler(
    post,
    path = "/submissions/{id}/pdf",
    request_body = UploadRequest,
    params(("id" = String, Path, description = "Submission record id")),
    responses(
        (status = OK, description = "Manuscript stored, submission numbered", body = SubmissionResponse),
        (status = CONFLICT, description = "Already submitted"),
        (status = UNPROCESSABLE_ENTITY, description = "Invalid payload"),
    ),
    tag = SUBMISSION_TAG,
)]
async fn upload_pdf_handler(
    State(state): State<ApiState>,
    user: CurrentUser,
    Path(id): Path<String>,
    Json(payload): Json<UploadRequest>,
) -> Result<Json<SubmissionResponse>, ApiError> {
    let data = BASE64
        .decode(payload.data_base64.as_bytes())
        .map_err(|_| ApiError::validation("Manuscript payload is not valid base64"))?;

    let submissions = slice(&state)?;
    let updated = service::upload_pdf(
        &state.database,
        &submissions.storage,
        &state.events,
        &id,
        viewer(&user),
        &payload.file_name,
        &data,
    )
    .await?;

    Ok(Json(SubmissionResponse::from(updated)))
}

#[api_handler(
    get,
    path = "/submissions/{id}/pdf",
    params(("id" = String, Path, description = "Submission record id")),
    responses(
        (status = OK, description = "The stored manuscript", content_type = "application/pdf"),
        (status = FORBIDDEN, description = "Not the submitter and not a chair"),
        (status = NOT_FOUND, description = "No manuscript uploaded"),
    ),
    tag = SUBMISSION_TAG,
)]
async fn download_pdf_handler(
    State(state): State<ApiState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let submissions = slice(&state)?;
    let (name, data) =
        service::download_pdf(&state.database, &submissions.storage, &id, viewer(&user)).await?;

    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf".to_owned()),
            (header::CONTENT_DISPOSITION, format!("attachment; filename=\"{name}\"")),
        ],
        data,
    ))
}

#[api_handler(
    delete,
    path = "/submissions/{id}",
    params(("id" = String, Path, description = "Submission record id")),
    responses(
        (status = NO_CONTENT, description = "Submission, authors, and manuscript deleted"),
        (status = FORBIDDEN, description = "Not the submitter and not a chair"),
        (status = NOT_FOUND, description = "No such submission"),
    ),
    tag = SUBMISSION_TAG,
)]
async fn delete_submission_handler(
    State(state): State<ApiState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let submissions = slice(&state)?;
    service::delete_submission(&state.database, &submissions.storage, &id, viewer(&user)).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub fn router() -> OpenApiRouter<ApiState> {
    OpenApiRouter::new()
        .routes(routes!(create_submission_handler))
        .routes(routes!(list_mine_handler))
        .routes(routes!(list_by_conference_handler))
        .routes(routes!(get_submission_handler))
        .routes(routes!(upload_pdf_handler))
        .routes(routes!(download_pdf_handler))
        .routes(routes!(delete_submission_handler))
}
