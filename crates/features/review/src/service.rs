use crate::error::ReviewError;
use crate::model::{DecisionRecord, ReviewAssignmentRecord, ReviewRecord};
use cmt_database::Database;
use cmt_domain::constants::{CONFERENCE, REVIEW_ASSIGNMENT, SUBMISSION, USER};
use cmt_domain::events::{DecisionRecorded, ReviewerAssigned};
use cmt_domain::model::{SubmissionStatus, Verdict};
use cmt_event_bus::EventBus;
use cmt_kernel::safe_nanoid;
use cmt_kernel::security::resource::ResourceGuard;
use cmt_submission::model::SubmissionRecord;
use tracing::{info, warn};

/// Review payload written by the assigned reviewer.
#[derive(Debug, Clone)]
pub struct ReviewInput {
    pub score_overall: i64,
    pub confidence: i64,
    pub strengths: Option<String>,
    pub weaknesses: Option<String>,
    pub comments_to_author: Option<String>,
    pub comments_to_chair: Option<String>,
}

/// Who is asking, resolved by the identity extractor at the route layer.
#[derive(Debug, Clone, Copy)]
pub struct Viewer<'a> {
    pub id: &'a str,
    pub is_chair: bool,
}

/// An assignment together with the submission it targets.
#[derive(Debug, Clone)]
pub struct AssignmentDetail {
    pub assignment: ReviewAssignmentRecord,
    pub submission: SubmissionRecord,
}

/// Everything a chair needs to decide on a submission.
#[derive(Debug, Clone)]
pub struct DecisionContext {
    pub submission: SubmissionRecord,
    pub assignments: Vec<AssignmentReview>,
    pub decision: Option<DecisionRecord>,
}

/// One assignment with the review written against it, if any.
#[derive(Debug, Clone)]
pub struct AssignmentReview {
    pub assignment: ReviewAssignmentRecord,
    pub review: Option<ReviewRecord>,
}

/// Assigns a reviewer to a submission.
///
/// Only chair accounts review. Assigning the same reviewer twice is a no-op
/// that returns the existing assignment. The first assignment moves a
/// Submitted submission into UnderReview and publishes [`ReviewerAssigned`];
/// a duplicate publishes nothing.
///
/// # Errors
/// Fails when the submission or reviewer does not exist, the reviewer is not
/// a chair, the submission is still a draft, or a query errors.
pub async fn assign_reviewer(
    db: &Database,
    events: &EventBus,
    submission_id: &str,
    reviewer_id: &str,
) -> Result<ReviewAssignmentRecord, ReviewError> {
    let submission = fetch_submission(db, submission_id).await?;
    let status = parse_status(&submission.status)?;
    if status == SubmissionStatus::Draft {
        return Err(ReviewError::Conflict {
            message: "Cannot assign reviewers to a draft".into(),
            context: None,
        });
    }

    let reviewer_id = ResourceGuard::verify(reviewer_id, USER).map_err(not_found)?;
    let role = fetch_user_role(db, &reviewer_id).await?;
    if role != "Chair" {
        return Err(ReviewError::Validation {
            message: "Only chair accounts can be assigned as reviewers".into(),
            context: None,
        });
    }

    let own_id = submission.id.to_string();
    let id = format!("{REVIEW_ASSIGNMENT}:{}", safe_nanoid!());
    let created = db
        .query(
            "CREATE type::record($id) CONTENT {
                submission: type::record($submission),
                reviewer: type::record($reviewer),
                assigned_at: time::now(),
            }",
        )
        .bind(("id", id))
        .bind(("submission", own_id.clone()))
        .bind(("reviewer", reviewer_id.clone()))
        .await
        .map_err(db_error)?
        .check()
        .map_err(surrealdb::Error::from)
        .map_err(db_error);

    let assignment = match created {
        Ok(mut response) => {
            let assignment = response
                .take::<Option<ReviewAssignmentRecord>>(0)
                .map_err(db_error)?
                .ok_or_else(|| ReviewError::Internal {
                    message: "CREATE returned no assignment row".into(),
                    context: None,
                })?;

            if status.can_transition(SubmissionStatus::UnderReview) {
                set_status(db, &own_id, SubmissionStatus::UnderReview).await?;
            }

            info!(submission = %own_id, reviewer = %reviewer_id, "reviewer assigned");
            let event = ReviewerAssigned {
                assignment_id: assignment.id.to_string(),
                submission_id: own_id,
                reviewer_id,
            };
            if let Err(err) = events.publish(event) {
                warn!(error = %err, "failed to publish assignment event");
            }

            assignment
        },
        Err(err) if is_index_conflict(&err) => {
            fetch_pair(db, &own_id, &reviewer_id).await?.ok_or(err)?
        },
        Err(err) => return Err(err),
    };

    Ok(assignment)
}

/// Lists all assignments across the submissions of a conference, oldest
/// first.
///
/// # Errors
/// Fails when the id belongs to a different table or the query errors.
pub async fn list_by_conference(
    db: &Database,
    conference_id: &str,
) -> Result<Vec<ReviewAssignmentRecord>, ReviewError> {
    let conference_id = ResourceGuard::verify(conference_id, CONFERENCE).map_err(not_found)?;

    let mut response = db
        .query(
            "SELECT * FROM review_assignment
                WHERE submission.conference = type::record($conference)
                ORDER BY assigned_at",
        )
        .bind(("conference", conference_id))
        .await
        .map_err(db_error)?;
    response.take::<Vec<ReviewAssignmentRecord>>(0).map_err(db_error)
}

/// Lists the assignments of one reviewer with the submissions they target,
/// oldest first.
///
/// # Errors
/// Fails when the query errors.
pub async fn list_mine(
    db: &Database,
    reviewer_id: &str,
) -> Result<Vec<AssignmentDetail>, ReviewError> {
    let reviewer_id = ResourceGuard::verify(reviewer_id, USER).map_err(not_found)?;

    let mut response = db
        .query(
            "SELECT * FROM review_assignment
                WHERE reviewer = type::record($reviewer)
                ORDER BY assigned_at",
        )
        .bind(("reviewer", reviewer_id))
        .await
        .map_err(db_error)?;
    let assignments = response.take::<Vec<ReviewAssignmentRecord>>(0).map_err(db_error)?;

    let mut details = Vec::with_capacity(assignments.len());
    for assignment in assignments {
        let submission = fetch_submission(db, &assignment.submission.to_string()).await?;
        details.push(AssignmentDetail { assignment, submission });
    }
    Ok(details)
}

/// Writes or rewrites the review of an assignment.
///
/// Only the assigned reviewer may write; a rewrite replaces the previous
/// text and scores and refreshes the submission timestamp.
///
/// # Errors
/// Fails when the assignment does not exist, the viewer is not its reviewer,
/// the scores are out of range, or a query errors.
pub async fn upsert_review(
    db: &Database,
    assignment_id: &str,
    viewer: Viewer<'_>,
    input: ReviewInput,
) -> Result<ReviewRecord, ReviewError> {
    let assignment = fetch_assignment(db, assignment_id).await?;
    if assignment.reviewer.to_string() != viewer.id {
        return Err(ReviewError::Forbidden {
            message: "Only the assigned reviewer may write this review".into(),
            context: None,
        });
    }
    validate_review(&input)?;

    let own_id = assignment.id.to_string();
    let existing = fetch_review(db, &own_id).await?;

    let mut response = match existing {
        Some(review) => db
            .query(
                "UPDATE type::record($id) SET
                    score_overall = $score_overall,
                    confidence = $confidence,
                    strengths = $strengths,
                    weaknesses = $weaknesses,
                    comments_to_author = $comments_to_author,
                    comments_to_chair = $comments_to_chair,
                    submitted_at = time::now()",
            )
            .bind(("id", review.id.to_string()))
            .bind(("score_overall", input.score_overall))
            .bind(("confidence", input.confidence))
            .bind(("strengths", input.strengths))
            .bind(("weaknesses", input.weaknesses))
            .bind(("comments_to_author", input.comments_to_author))
            .bind(("comments_to_chair", input.comments_to_chair))
            .await
            .map_err(db_error)?
            .check()
            .map_err(surrealdb::Error::from)
            .map_err(db_error)?,
        None => db
            .query(
                "CREATE type::record($id) CONTENT {
                    assignment: type::record($assignment),
                    score_overall: $score_overall,
                    confidence: $confidence,
                    strengths: $strengths,
                    weaknesses: $weaknesses,
                    comments_to_author: $comments_to_author,
                    comments_to_chair: $comments_to_chair,
                    submitted_at: time::now(),
                }",
            )
            .bind(("id", format!("{}:{}", cmt_domain::constants::REVIEW, safe_nanoid!())))
            .bind(("assignment", own_id))
            .bind(("score_overall", input.score_overall))
            .bind(("confidence", input.confidence))
            .bind(("strengths", input.strengths))
            .bind(("weaknesses", input.weaknesses))
            .bind(("comments_to_author", input.comments_to_author))
            .bind(("comments_to_chair", input.comments_to_chair))
            .await
            .map_err(db_error)?
            .check()
            .map_err(surrealdb::Error::from)
            .map_err(db_error)?,
    };

    response.take::<Option<ReviewRecord>>(0).map_err(db_error)?.ok_or_else(|| {
        ReviewError::Internal { message: "Review write returned no row".into(), context: None }
    })
}

/// Reads the review of an assignment. The assigned reviewer reads their
/// own work, chairs read everything.
///
/// # Errors
/// Fails when the assignment does not exist, no review has been written,
/// the viewer is neither the reviewer nor a chair, or a query errors.
pub async fn get_review(
    db: &Database,
    assignment_id: &str,
    viewer: Viewer<'_>,
) -> Result<ReviewRecord, ReviewError> {
    let assignment = fetch_assignment(db, assignment_id).await?;
    if !viewer.is_chair && assignment.reviewer.to_string() != viewer.id {
        return Err(ReviewError::Forbidden {
            message: "Only the assigned reviewer or a chair may read this review".into(),
            context: None,
        });
    }

    fetch_review(db, &assignment.id.to_string()).await?.ok_or(ReviewError::NotFound {
        message: "No review written yet".into(),
        context: None,
    })
}

/// Collects the submission, every assignment with its review, and the
/// decision so far.
///
/// # Errors
/// Fails when the submission does not exist or a query errors.
pub async fn decision_context(
    db: &Database,
    submission_id: &str,
) -> Result<DecisionContext, ReviewError> {
    let submission = fetch_submission(db, submission_id).await?;
    let own_id = submission.id.to_string();

    let mut response = db
        .query(
            "SELECT * FROM review_assignment
                WHERE submission = type::record($submission)
                ORDER BY assigned_at",
        )
        .bind(("submission", own_id.clone()))
        .await
        .map_err(db_error)?;
    let assignments = response.take::<Vec<ReviewAssignmentRecord>>(0).map_err(db_error)?;

    let mut paired = Vec::with_capacity(assignments.len());
    for assignment in assignments {
        let review = fetch_review(db, &assignment.id.to_string()).await?;
        paired.push(AssignmentReview { assignment, review });
    }

    let decision = fetch_decision(db, &own_id).await?;

    Ok(DecisionContext { submission, assignments: paired, decision })
}

/// Records or revises the verdict on a submission and moves its status.
///
/// A verdict is legal while the submission is under review; a recorded
/// verdict can be revised, which implicitly pulls the submission back
/// through UnderReview. Publishes [`DecisionRecorded`] on success.
///
/// # Errors
/// Fails when the submission does not exist, it has not entered review yet,
/// or a query errors.
pub async fn record_decision(
    db: &Database,
    events: &EventBus,
    submission_id: &str,
    chair_id: &str,
    verdict: Verdict,
    note: Option<String>,
) -> Result<DecisionRecord, ReviewError> {
    let submission = fetch_submission(db, submission_id).await?;
    let current = parse_status(&submission.status)?;
    let target = verdict.into_status();

    let legal = current.can_transition(target)
        || (current.is_decided() && SubmissionStatus::UnderReview.can_transition(target));
    if !legal {
        return Err(ReviewError::Conflict {
            message: format!("Cannot decide {verdict} from status {current}").into(),
            context: None,
        });
    }

    let chair_id = ResourceGuard::verify(chair_id, USER).map_err(not_found)?;
    let own_id = submission.id.to_string();

    let existing = fetch_decision(db, &own_id).await?;
    let mut response = match existing {
        Some(decision) => db
            .query(
                "UPDATE type::record($id) SET
                    verdict = $verdict,
                    note = $note,
                    decided_by = type::record($chair),
                    decided_at = time::now()",
            )
            .bind(("id", decision.id.to_string()))
            .bind(("verdict", verdict.as_str()))
            .bind(("note", note))
            .bind(("chair", chair_id.clone()))
            .await
            .map_err(db_error)?
            .check()
            .map_err(surrealdb::Error::from)
            .map_err(db_error)?,
        None => db
            .query(
                "CREATE type::record($id) CONTENT {
                    submission: type::record($submission),
                    verdict: $verdict,
                    note: $note,
                    decided_by: type::record($chair),
                    decided_at: time::now(),
                }",
            )
            .bind(("id", format!("{}:{}", cmt_domain::constants::DECISION, safe_nanoid!())))
            .bind(("submission", own_id.clone()))
            .bind(("verdict", verdict.as_str()))
            .bind(("note", note))
            .bind(("chair", chair_id.clone()))
            .await
            .map_err(db_error)?
            .check()
            .map_err(surrealdb::Error::from)
            .map_err(db_error)?,
    };

    let decision = response.take::<Option<DecisionRecord>>(0).map_err(db_error)?.ok_or_else(
        || ReviewError::Internal {
            message: "Decision write returned no row".into(),
            context: None,
        },
    )?;

    set_status(db, &own_id, target).await?;

    info!(submission = %own_id, verdict = %verdict, "decision recorded");
    let event = DecisionRecorded { submission_id: own_id, verdict, decided_by: chair_id };
    if let Err(err) = events.publish(event) {
        warn!(error = %err, "failed to publish decision event");
    }

    Ok(decision)
}

async fn fetch_submission(db: &Database, id: &str) -> Result<SubmissionRecord, ReviewError> {
    let id = ResourceGuard::verify(id, SUBMISSION).map_err(not_found)?;

    let mut response = db
        .query("SELECT * FROM type::record($id)")
        .bind(("id", id.clone()))
        .await
        .map_err(db_error)?;
    response
        .take::<Option<SubmissionRecord>>(0)
        .map_err(db_error)?
        .ok_or(ReviewError::NotFound { message: id.into(), context: None })
}

async fn fetch_assignment(
    db: &Database,
    id: &str,
) -> Result<ReviewAssignmentRecord, ReviewError> {
    let id = ResourceGuard::verify(id, REVIEW_ASSIGNMENT).map_err(not_found)?;

    let mut response = db
        .query("SELECT * FROM type::record($id)")
        .bind(("id", id.clone()))
        .await
        .map_err(db_error)?;
    response
        .take::<Option<ReviewAssignmentRecord>>(0)
        .map_err(db_error)?
        .ok_or(ReviewError::NotFound { message: id.into(), context: None })
}

async fn fetch_pair(
    db: &Database,
    submission_id: &str,
    reviewer_id: &str,
) -> Result<Option<ReviewAssignmentRecord>, ReviewError> {
    let mut response = db
        .query(
            "SELECT * FROM review_assignment
                WHERE submission = type::record($submission)
                AND reviewer = type::record($reviewer)
                LIMIT 1",
        )
        .bind(("submission", submission_id.to_owned()))
        .bind(("reviewer", reviewer_id.to_owned()))
        .await
        .map_err(db_error)?;
    response.take::<Option<ReviewAssignmentRecord>>(0).map_err(db_error)
}

async fn fetch_review(
    db: &Database,
    assignment_id: &str,
) -> Result<Option<ReviewRecord>, ReviewError> {
    let mut response = db
        .query("SELECT * FROM review WHERE assignment = type::record($assignment) LIMIT 1")
        .bind(("assignment", assignment_id.to_owned()))
        .await
        .map_err(db_error)?;
    response.take::<Option<ReviewRecord>>(0).map_err(db_error)
}

async fn fetch_decision(
    db: &Database,
    submission_id: &str,
) -> Result<Option<DecisionRecord>, ReviewError> {
    let mut response = db
        .query("SELECT * FROM decision WHERE submission = type::record($submission) LIMIT 1")
        .bind(("submission", submission_id.to_owned()))
        .await
        .map_err(db_error)?;
    response.take::<Option<DecisionRecord>>(0).map_err(db_error)
}

async fn fetch_user_role(db: &Database, user_id: &str) -> Result<String, ReviewError> {
    let mut response = db
        .query("SELECT VALUE role FROM type::record($id)")
        .bind(("id", user_id.to_owned()))
        .await
        .map_err(db_error)?;
    response
        .take::<Option<String>>(0)
        .map_err(db_error)?
        .ok_or(ReviewError::NotFound { message: user_id.to_owned().into(), context: None })
}

async fn set_status(
    db: &Database,
    submission_id: &str,
    status: SubmissionStatus,
) -> Result<(), ReviewError> {
    db.query("UPDATE type::record($id) SET status = $status")
        .bind(("id", submission_id.to_owned()))
        .bind(("status", status.as_str()))
        .await
        .map_err(db_error)?
        .check()
        .map_err(surrealdb::Error::from)
        .map_err(db_error)?;
    Ok(())
}

fn validate_review(input: &ReviewInput) -> Result<(), ReviewError> {
    if !(1..=10).contains(&input.score_overall) {
        return Err(ReviewError::Validation {
            message: "Overall score must be between 1 and 10".into(),
            context: None,
        });
    }
    if !(1..=5).contains(&input.confidence) {
        return Err(ReviewError::Validation {
            message: "Confidence must be between 1 and 5".into(),
            context: None,
        });
    }
    Ok(())
}

fn parse_status(raw: &str) -> Result<SubmissionStatus, ReviewError> {
    raw.parse().map_err(|_| ReviewError::Internal {
        message: format!("Unknown stored status: {raw}").into(),
        context: None,
    })
}

fn not_found(err: impl std::fmt::Display) -> ReviewError {
    ReviewError::NotFound { message: err.to_string().into(), context: None }
}

fn db_error(err: impl std::fmt::Display) -> ReviewError {
    ReviewError::Database { message: err.to_string().into(), context: None }
}

fn is_index_conflict(err: &ReviewError) -> bool {
    matches!(err, ReviewError::Database { message, .. } if message.contains("index"))
}
