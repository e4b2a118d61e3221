use crate::model::{DecisionRecord, ReviewAssignmentRecord, ReviewRecord};
use crate::service::{self, ReviewInput, Viewer};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::{Json, response::IntoResponse};
use cmt_derive::{api_handler, api_model};
use cmt_domain::constants::REVIEW_TAG;
use cmt_domain::model::Verdict;
use cmt_identity::{CurrentUser, RequireChair};
use cmt_kernel::server::{ApiError, ApiState};
use cmt_submission::model::SubmissionRecord;
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

#[api_model]
/// Reviewer assignment payload
pub struct AssignReviewerRequest {
    /// User record id of the reviewer, must be a chair account
    pub reviewer_id: String,
}

#[api_model]
/// Review payload of the assigned reviewer
pub struct ReviewRequest {
    /// Overall score, 1 to 10
    pub score_overall: i64,
    /// Reviewer confidence, 1 to 5
    pub confidence: i64,
    #[serde(default)]
    pub strengths: Option<String>,
    #[serde(default)]
    pub weaknesses: Option<String>,
    #[serde(default)]
    pub comments_to_author: Option<String>,
    #[serde(default)]
    pub comments_to_chair: Option<String>,
}

#[api_model]
/// Decision payload
pub struct DecisionRequest {
    /// "Accepted" or "Rejected"
    pub verdict: String,
    #[serde(default)]
    pub note: Option<String>,
}

#[api_model]
/// Public view of a reviewer assignment
pub struct AssignmentResponse {
    /// Record id ("review_assignment:...")
    pub id: String,
    pub submission: String,
    pub reviewer: String,
    pub assigned_at: String,
}

#[api_model]
/// Submission summary shown to reviewers
pub struct ReviewedSubmissionResponse {
    pub id: String,
    pub conference: String,
    pub title: String,
    /// Submission number ("001P"), absent for drafts
    pub number: Option<String>,
    pub status: String,
}

#[api_model]
/// Assignment together with the submission it targets
pub struct AssignmentDetailResponse {
    pub assignment: AssignmentResponse,
    pub submission: ReviewedSubmissionResponse,
}

#[api_model]
/// Public view of a written review
pub struct ReviewResponse {
    /// Record id ("review:...")
    pub id: String,
    pub assignment: String,
    pub score_overall: i64,
    pub confidence: i64,
    pub strengths: Option<String>,
    pub weaknesses: Option<String>,
    pub comments_to_author: Option<String>,
    pub comments_to_chair: Option<String>,
    pub submitted_at: String,
}

#[api_model]
/// Public view of a recorded decision
pub struct DecisionResponse {
    /// Record id ("decision:...")
    pub id: String,
    pub submission: String,
    pub verdict: String,
    pub note: Option<String>,
    pub decided_by: String,
    pub decided_at: String,
}

#[api_model]
/// One assignment with its review, if written
pub struct AssignmentReviewResponse {
    pub assignment: AssignmentResponse,
    pub review: Option<ReviewResponse>,
}

#[api_model]
/// Everything a chair sees before deciding
pub struct DecisionContextResponse {
    pub submission: ReviewedSubmissionResponse,
    pub assignments: Vec<AssignmentReviewResponse>,
    pub decision: Option<DecisionResponse>,
}

impl From<ReviewAssignmentRecord> for AssignmentResponse {
    fn from(record: ReviewAssignmentRecord) -> Self {
        Self {
            id: record.id.to_string(),
            submission: record.submission.to_string(),
            reviewer: record.reviewer.to_string(),
            assigned_at: record.assigned_at.to_string(),
        }
    }
}

impl From<SubmissionRecord> for ReviewedSubmissionResponse {
    fn from(record: SubmissionRecord) -> Self {
        Self {
            id: record.id.to_string(),
            conference: record.conference.to_string(),
            title: record.title,
            number: record.number,
            status: record.status,
        }
    }
}

impl From<ReviewRecord> for ReviewResponse {
    fn from(record: ReviewRecord) -> Self {
        Self {
            id: record.id.to_string(),
            assignment: record.assignment.to_string(),
            score_overall: record.score_overall,
            confidence: record.confidence,
            strengths: record.strengths,
            weaknesses: record.weaknesses,
            comments_to_author: record.comments_to_author,
            comments_to_chair: record.comments_to_chair,
            submitted_at: record.submitted_at.to_string(),
        }
    }
}

impl From<DecisionRecord> for DecisionResponse {
    fn from(record: DecisionRecord) -> Self {
        Self {
            id: record.id.to_string(),
            submission: record.submission.to_string(),
            verdict: record.verdict,
            note: record.note,
            decided_by: record.decided_by.to_string(),
            decided_at: record.decided_at.to_string(),
        }
    }
}

impl From<service::AssignmentDetail> for AssignmentDetailResponse {
    fn from(detail: service::AssignmentDetail) -> Self {
        Self {
            assignment: AssignmentResponse::from(detail.assignment),
            submission: ReviewedSubmissionResponse::from(detail.submission),
        }
    }
}

impl From<service::DecisionContext> for DecisionContextResponse {
    fn from(context: service::DecisionContext) -> Self {
        Self {
            submission: ReviewedSubmissionResponse::from(context.submission),
            assignments: context
                .assignments
                .into_iter()
                .map(|pair| AssignmentReviewResponse {
                    assignment: AssignmentResponse::from(pair.assignment),
                    review: pair.review.map(ReviewResponse::from),
                })
                .collect(),
            decision: context.decision.map(DecisionResponse::from),
        }
    }
}

fn viewer(user: &CurrentUser) -> Viewer<'_> {
    Viewer { id: &user.id, is_chair: user.is_chair() }
}

#[api_handler(
    post,
    path = "/submissions/{id}/reviewers",
    request_body = AssignReviewerRequest,
    params(("id" = String, Path, description = "Submission record id")),
    responses(
        (status = CREATED, description = "Reviewer assigned, chairs only", body = AssignmentResponse),
        (status = CONFLICT, description = "Submission is still a draft"),
        (status = FORBIDDEN, description = "Chair role required"),
        (status = NOT_FOUND, description = "No such submission or reviewer"),
    ),
    tag = REVIEW_TAG,
)]
async fn assign_reviewer_handler(
    State(state): State<ApiState>,
    RequireChair(_): RequireChair,
    Path(id): Path<String>,
    Json(payload): Json<AssignReviewerRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let assignment =
        service::assign_reviewer(&state.database, &state.events, &id, &payload.reviewer_id)
            .await?;
    Ok((StatusCode::CREATED, Json(AssignmentResponse::from(assignment))))
}

#[api_handler(
    get,
    path = "/conferences/{id}/review-assignments",
    params(("id" = String, Path, description = "Conference record id")),
    responses(
        (status = OK, description = "All assignments of the conference, chairs only", body = [AssignmentResponse]),
        (status = FORBIDDEN, description = "Chair role required"),
    ),
    tag = REVIEW_TAG,
)]
async fn list_by_conference_handler(
    State(state): State<ApiState>,
    RequireChair(_): RequireChair,
    Path(id): Path<String>,
) -> Result<Json<Vec<AssignmentResponse>>, ApiError> {
    let assignments = service::list_by_conference(&state.database, &id).await?;
    Ok(Json(assignments.into_iter().map(AssignmentResponse::from).collect()))
}

#[api_handler(
    get,
    path = "/review-assignments/mine",
    responses((status = OK, description = "Assignments of the caller", body = [AssignmentDetailResponse])),
    tag = REVIEW_TAG,
)]
async fn list_mine_handler(
    State(state): State<ApiState>,
    user: CurrentUser,
) -> Result<Json<Vec<AssignmentDetailResponse>>, ApiError> {
    let details = service::list_mine(&state.database, &user.id).await?;
    Ok(Json(details.into_iter().map(AssignmentDetailResponse::from).collect()))
}

#[api_handler(
    put,
    path = "/review-assignments/{id}/review",
    request_body = ReviewRequest,
    params(("id" = String, Path, description = "Assignment record id")),
    responses(
        (status = OK, description = "Review stored", body = ReviewResponse),
        (status = FORBIDDEN, description = "Not the assigned reviewer"),
        (status = NOT_FOUND, description = "No such assignment"),
        (status = UNPROCESSABLE_ENTITY, description = "Scores out of range"),
    ),
    tag = REVIEW_TAG,
)]
async fn upsert_review_handler(
    State(state): State<ApiState>,
    user: CurrentUser,
    Path(id): Path<String>,
    Json(payload): Json<ReviewRequest>,
) -> Result<Json<ReviewResponse>, ApiError> {
    let input = ReviewInput {
        score_overall: payload.score_overall,
        confidence: payload.confidence,
        strengths: payload.strengths,
        weaknesses: payload.weaknesses,
        comments_to_author: payload.comments_to_author,
        comments_to_chair: payload.comments_to_chair,
    };
    let review = service::upsert_review(&state.database, &id, viewer(&user), input).await?;
    Ok(Json(ReviewResponse::from(review)))
}

#[api_handler(
    get,
    path = "/review-assignments/{id}/review",
    params(("id" = String, Path, description = "Assignment record id")),
    responses(
        (status = OK, description = "The written review", body = ReviewResponse),
        (status = FORBIDDEN, description = "Not the assigned reviewer and not a chair"),
        (status = NOT_FOUND, description = "No review written yet"),
    ),
    tag = REVIEW_TAG,
)]
async fn get_review_handler(
    State(state): State<ApiState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> Result<Json<ReviewResponse>, ApiError> {
    let review = service::get_review(&state.database, &id, viewer(&user)).await?;
    Ok(Json(ReviewResponse::from(review)))
}

#[api_handler(
    get,
    path = "/submissions/{id}/decision-context",
    params(("id" = String, Path, description = "Submission record id")),
    responses(
        (status = OK, description = "Submission, reviews, and decision, chairs only", body = DecisionContextResponse),
        (status = FORBIDDEN, description = "Chair role required"),
        (status = NOT_FOUND, description = "No such submission"),
    ),
    tag = REVIEW_TAG,
)]
async fn decision_context_handler(
    State(state): State<ApiState>,
    RequireChair(_): RequireChair,
    Path(id): Path<String>,
) -> Result<Json<DecisionContextResponse>, ApiError> {
    let context = service::decision_context(&state.database, &id).await?;
    Ok(Json(DecisionContextResponse::from(context)))
}

#[api_handler(
    put,
    path = "/submissions/{id}/decision",
    request_body = DecisionRequest,
    params(("id" = String, Path, description = "Submission record id")),
    responses(
        (status = OK, description = "Decision recorded, chairs only", body = DecisionResponse),
        (status = CONFLICT, description = "Submission has not entered review"),
        (status = FORBIDDEN, description = "Chair role required"),
        (status = NOT_FOUND, description = "No such submission"),
        (status = UNPROCESSABLE_ENTITY, description = "Unknown verdict"),
    ),
    tag = REVIEW_TAG,
)]
async fn record_decision_handler(
    State(state): State<ApiState>,
    RequireChair(chair): RequireChair,
    Path(id): Path<String>,
    Json(payload): Json<DecisionRequest>,
) -> Result<Json<DecisionResponse>, ApiError> {
    let verdict =
        payload.verdict.parse::<Verdict>().map_err(|e| ApiError::validation(e.to_string()))?;

    let decision = service::record_decision(
        &state.database,
        &state.events,
        &id,
        &chair.id,
        verdict,
        payload.note,
    )
    .await?;
    Ok(Json(DecisionResponse::from(decision)))
}

pub fn router() -> OpenApiRouter<ApiState> {
    OpenApiRouter::new()
        .routes(routes!(assign_reviewer_handler))
        .routes(routes!(list_by_conference_handler))
        .routes(routes!(list_mine_handler))
        .routes(routes!(upsert_review_handler))
        .routes(routes!(get_review_handler))
        .routes(routes!(decision_context_handler))
        .routes(routes!(record_decision_handler))
}
