use crate::error::SubmissionError;
use crate::model::{SubmissionAuthorRecord, SubmissionRecord};
use crate::numbering::next_number;
use cmt_database::Database;
use cmt_domain::constants::{CONFERENCE, SUBMISSION, SUBMISSION_AUTHOR, TRACK, USER};
use cmt_domain::events::SubmissionReceived;
use cmt_domain::model::SubmissionStatus;
use cmt_event_bus::EventBus;
use cmt_kernel::safe_nanoid;
use cmt_kernel::security::resource::ResourceGuard;
use cmt_storage::Storage;
use std::path::Path;
use surrealdb::types::RecordId;
use tracing::{info, warn};

/// Draft submission payload.
#[derive(Debug, Clone)]
pub struct SubmissionInput {
    pub conference: String,
    pub track: Option<String>,
    pub title: String,
    pub abstract_text: String,
    pub authors: Vec<AuthorInput>,
}

/// One co-author of a submission.
#[derive(Debug, Clone)]
pub struct AuthorInput {
    pub full_name: String,
    pub email: String,
    pub affiliation: Option<String>,
    pub is_corresponding: bool,
}

/// Who is asking, resolved by the identity extractor at the route layer.
#[derive(Debug, Clone, Copy)]
pub struct Viewer<'a> {
    pub id: &'a str,
    pub is_chair: bool,
}

/// A submission together with its author list.
#[derive(Debug, Clone)]
pub struct SubmissionDetail {
    pub submission: SubmissionRecord,
    pub authors: Vec<SubmissionAuthorRecord>,
}

/// Creates a draft submission with its author rows.
///
/// The manuscript PDF and the submission number arrive later through
/// [`upload_pdf`].
///
/// # Errors
/// Fails on invalid payloads, a missing conference or track, or query errors.
pub async fn create_submission(
    db: &Database,
    submitter_id: &str,
    input: SubmissionInput,
) -> Result<SubmissionDetail, SubmissionError> {
    validate_submission(&input)?;
    let submitter = ResourceGuard::verify(submitter_id, USER).map_err(validation)?;

    let conference_id = ResourceGuard::verify(&input.conference, CONFERENCE).map_err(not_found)?;
    let exists = record_exists(db, &conference_id).await?;
    if !exists {
        return Err(SubmissionError::NotFound {
            message: conference_id.into(),
            context: None,
        });
    }

    let track_id = match &input.track {
        None => None,
        Some(track) => {
            let track_id = ResourceGuard::verify(track, TRACK).map_err(not_found)?;
            verify_track_belongs(db, &track_id, &conference_id).await?;
            Some(track_id)
        },
    };

    let id = format!("{SUBMISSION}:{}", safe_nanoid!());
    let mut response = db
        .query(
            "CREATE type::record($id) CONTENT {
                conference: type::record($conference),
                track: if $track != NONE { type::record($track) } else { NONE },
                title: $title,
                abstract_text: $abstract_text,
                pdf_path: NONE,
                original_file_name: NONE,
                number: NONE,
                status: $status,
                submitted_by: type::record($submitter),
                submitted_at: NONE,
                created_at: time::now(),
            }",
        )
        .bind(("id", id))
        .bind(("conference", conference_id))
        .bind(("track", track_id))
        .bind(("title", input.title.trim().to_owned()))
        .bind(("abstract_text", input.abstract_text.trim().to_owned()))
        .bind(("status", SubmissionStatus::Draft.as_str()))
        .bind(("submitter", submitter))
        .await
        .map_err(db_error)?
        .check()
        .map_err(surrealdb::Error::from)
        .map_err(db_error)?;

    let submission =
        response.take::<Option<SubmissionRecord>>(0).map_err(db_error)?.ok_or_else(|| {
            SubmissionError::Internal {
                message: "CREATE returned no submission row".into(),
                context: None,
            }
        })?;

    let mut authors = Vec::with_capacity(input.authors.len());
    for author in input.authors {
        authors.push(insert_author(db, &submission.id.to_string(), author).await?);
    }

    Ok(SubmissionDetail { submission, authors })
}

async fn insert_author(
    db: &Database,
    submission_id: &str,
    author: AuthorInput,
) -> Result<SubmissionAuthorRecord, SubmissionError> {
    let id = format!("{SUBMISSION_AUTHOR}:{}", safe_nanoid!());
    let mut response = db
        .query(
            "CREATE type::record($id) CONTENT {
                submission: type::record($submission),
                full_name: $full_name,
                email: $email,
                affiliation: $affiliation,
                is_corresponding: $is_corresponding,
            }",
        )
        .bind(("id", id))
        .bind(("submission", submission_id.to_owned()))
        .bind(("full_name", author.full_name.trim().to_owned()))
        .bind(("email", author.email.trim().to_lowercase()))
        .bind(("affiliation", author.affiliation))
        .bind(("is_corresponding", author.is_corresponding))
        .await
        .map_err(db_error)?
        .check()
        .map_err(surrealdb::Error::from)
        .map_err(db_error)?;

    response.take::<Option<SubmissionAuthorRecord>>(0).map_err(db_error)?.ok_or_else(|| {
        SubmissionError::Internal { message: "CREATE returned no author row".into(), context: None }
    })
}

/// Lists the submissions of a conference, oldest first.
///
/// # Errors
/// Fails when the id belongs to a different table or the query errors.
pub async fn list_by_conference(
    db: &Database,
    conference_id: &str,
) -> Result<Vec<SubmissionRecord>, SubmissionError> {
    let conference_id = ResourceGuard::verify(conference_id, CONFERENCE).map_err(not_found)?;

    let mut response = db
        .query("SELECT * FROM submission WHERE conference = type::record($conference) ORDER BY created_at")
        .bind(("conference", conference_id))
        .await
        .map_err(db_error)?;
    response.take::<Vec<SubmissionRecord>>(0).map_err(db_error)
}

/// Lists the submissions created by one account, oldest first.
///
/// # Errors
/// Fails when the query errors.
pub async fn list_mine(
    db: &Database,
    submitter_id: &str,
) -> Result<Vec<SubmissionRecord>, SubmissionError> {
    let submitter = ResourceGuard::verify(submitter_id, USER).map_err(not_found)?;

    let mut response = db
        .query("SELECT * FROM submission WHERE submitted_by = type::record($submitter) ORDER BY created_at")
        .bind(("submitter", submitter))
        .await
        .map_err(db_error)?;
    response.take::<Vec<SubmissionRecord>>(0).map_err(db_error)
}

/// Fetches a submission with its authors, enforcing the ownership rule:
/// the submitter sees their own work, chairs see everything.
///
/// # Errors
/// Fails when the submission does not exist, the viewer is neither owner
/// nor chair, or a query errors.
pub async fn get_submission(
    db: &Database,
    id: &str,
    viewer: Viewer<'_>,
) -> Result<SubmissionDetail, SubmissionError> {
    let submission = fetch_owned(db, id, viewer).await?;
    let authors = list_authors(db, &submission.id.to_string()).await?;
    Ok(SubmissionDetail { submission, authors })
}

/// Lists the author rows of a submission in insertion order.
///
/// # Errors
/// Fails when the query errors.
pub async fn list_authors(
    db: &Database,
    submission_id: &str,
) -> Result<Vec<SubmissionAuthorRecord>, SubmissionError> {
    let submission_id = ResourceGuard::verify(submission_id, SUBMISSION).map_err(not_found)?;

    let mut response = db
        .query("SELECT * FROM submission_author WHERE submission = type::record($submission)")
        .bind(("submission", submission_id))
        .await
        .map_err(db_error)?;
    response.take::<Vec<SubmissionAuthorRecord>>(0).map_err(db_error)
}

/// Attaches the manuscript PDF to a draft, assigning the submission number
/// and moving the status to Submitted.
///
/// The stored filename is `{original_stem}_{number}{extension}` inside the
/// per-conference namespace of the upload store. On a numbering race the
/// number is recomputed and the update retried once.
///
/// Publishes [`SubmissionReceived`] on success.
///
/// # Errors
/// Fails when the submission is not a draft, the viewer is neither owner
/// nor chair, the file cannot be stored, or a query errors.
pub async fn upload_pdf(
    db: &Database,
    storage: &Storage,
    events: &EventBus,
    id: &str,
    viewer: Viewer<'_>,
    file_name: &str,
    data: &[u8],
) -> Result<SubmissionRecord, SubmissionError> {
    let submission = fetch_owned(db, id, viewer).await?;

    let status = parse_status(&submission.status)?;
    if !status.can_transition(SubmissionStatus::Submitted) {
        return Err(SubmissionError::Conflict {
            message: format!("Cannot submit from status {status}").into(),
            context: None,
        });
    }

    let (stem, extension) = split_file_name(file_name)?;
    if data.is_empty() {
        return Err(SubmissionError::Validation {
            message: "Manuscript payload is empty".into(),
            context: None,
        });
    }

    let conference_id = submission.conference.to_string();
    let namespace = storage.namespace(record_key(&submission.conference))?;
    let own_id = submission.id.to_string();

    let number = assign_number(db, &conference_id).await?;
    let stored = format!("{stem}_{number}{extension}");
    namespace.write(&stored, data).await?;

    let record = match mark_submitted(db, &own_id, &number, &stored, file_name).await {
        Ok(record) => record,
        Err(err) if is_index_conflict(&err) => {
            warn!(submission = %own_id, number = %number, "submission number raced, recomputing");
            namespace.delete(&stored).await?;

            let number = assign_number(db, &conference_id).await?;
            let stored = format!("{stem}_{number}{extension}");
            namespace.write(&stored, data).await?;

            mark_submitted(db, &own_id, &number, &stored, file_name).await.map_err(|retry| {
                if is_index_conflict(&retry) {
                    SubmissionError::Conflict { message: number.into(), context: None }
                } else {
                    retry
                }
            })?
        },
        Err(err) => {
            namespace.delete(&stored).await?;
            return Err(err);
        },
    };

    info!(submission = %own_id, number = ?record.number, "manuscript received");

    let event = SubmissionReceived {
        submission_id: own_id,
        conference_id,
        number: record.number.clone().unwrap_or_default(),
        title: record.title.clone(),
        submitted_by: record.submitted_by.to_string(),
    };
    if let Err(err) = events.publish(event) {
        warn!(error = %err, "failed to publish submission event");
    }

    Ok(record)
}

async fn assign_number(db: &Database, conference_id: &str) -> Result<String, SubmissionError> {
    let mut response = db
        .query("SELECT VALUE number FROM submission WHERE conference = type::record($conference) AND number != NONE")
        .bind(("conference", conference_id.to_owned()))
        .await
        .map_err(db_error)?;
    let existing = response.take::<Vec<String>>(0).map_err(db_error)?;

    Ok(next_number(existing))
}

async fn mark_submitted(
    db: &Database,
    id: &str,
    number: &str,
    stored: &str,
    original: &str,
) -> Result<SubmissionRecord, SubmissionError> {
    let mut response = db
        .query(
            "UPDATE type::record($id) SET
                number = $number,
                pdf_path = $pdf_path,
                original_file_name = $original,
                status = $status,
                submitted_at = time::now()",
        )
        .bind(("id", id.to_owned()))
        .bind(("number", number.to_owned()))
        .bind(("pdf_path", stored.to_owned()))
        .bind(("original", original.to_owned()))
        .bind(("status", SubmissionStatus::Submitted.as_str()))
        .await
        .map_err(db_error)?
        .check()
        .map_err(surrealdb::Error::from)
        .map_err(db_error)?;

    response
        .take::<Option<SubmissionRecord>>(0)
        .map_err(db_error)?
        .ok_or_else(|| SubmissionError::NotFound { message: id.to_owned().into(), context: None })
}

/// Reads the stored manuscript back, enforcing the ownership rule.
///
/// Returns the original upload filename and the bytes.
///
/// # Errors
/// Fails when the submission has no manuscript yet, the viewer is neither
/// owner nor chair, or the file cannot be read.
pub async fn download_pdf(
    db: &Database,
    storage: &Storage,
    id: &str,
    viewer: Viewer<'_>,
) -> Result<(String, Vec<u8>), SubmissionError> {
    let submission = fetch_owned(db, id, viewer).await?;

    let Some(pdf_path) = submission.pdf_path else {
        return Err(SubmissionError::NotFound {
            message: "No manuscript uploaded".into(),
            context: None,
        });
    };

    let namespace = storage.namespace(record_key(&submission.conference))?;
    let data = namespace.read(&pdf_path).await?;
    let name = submission.original_file_name.unwrap_or(pdf_path);

    Ok((name, data))
}

/// Deletes a submission with its authors and stored manuscript.
///
/// # Errors
/// Fails when the submission does not exist, the viewer is neither owner
/// nor chair, or a query errors. A manuscript already missing from disk is
/// not an error.
pub async fn delete_submission(
    db: &Database,
    storage: &Storage,
    id: &str,
    viewer: Viewer<'_>,
) -> Result<(), SubmissionError> {
    let submission = fetch_owned(db, id, viewer).await?;
    let own_id = submission.id.to_string();

    db.query(
        "DELETE submission_author WHERE submission = type::record($id); DELETE type::record($id)",
    )
    .bind(("id", own_id.clone()))
    .await
    .map_err(db_error)?
    .check()
    .map_err(surrealdb::Error::from)
    .map_err(db_error)?;

    if let Some(pdf_path) = &submission.pdf_path {
        let namespace = storage.namespace(record_key(&submission.conference))?;
        match namespace.delete(pdf_path).await {
            Ok(()) | Err(cmt_storage::StorageError::FileNotFound { .. }) => {},
            Err(err) => return Err(err.into()),
        }
    }

    info!(submission = %own_id, "submission deleted");
    Ok(())
}

async fn fetch_owned(
    db: &Database,
    id: &str,
    viewer: Viewer<'_>,
) -> Result<SubmissionRecord, SubmissionError> {
    let id = ResourceGuard::verify(id, SUBMISSION).map_err(not_found)?;

    let mut response = db
        .query("SELECT * FROM type::record($id)")
        .bind(("id", id.clone()))
        .await
        .map_err(db_error)?;
    let submission = response
        .take::<Option<SubmissionRecord>>(0)
        .map_err(db_error)?
        .ok_or(SubmissionError::NotFound { message: id.into(), context: None })?;

    if !viewer.is_chair && submission.submitted_by.to_string() != viewer.id {
        return Err(SubmissionError::Forbidden {
            message: "Only the submitter or a chair may access this submission".into(),
            context: None,
        });
    }

    Ok(submission)
}

async fn record_exists(db: &Database, id: &str) -> Result<bool, SubmissionError> {
    let mut response = db
        .query("SELECT VALUE id FROM type::record($id)")
        .bind(("id", id.to_owned()))
        .await
        .map_err(db_error)?;
    let found = response.take::<Option<RecordId>>(0).map_err(db_error)?;
    Ok(found.is_some())
}

async fn verify_track_belongs(
    db: &Database,
    track_id: &str,
    conference_id: &str,
) -> Result<(), SubmissionError> {
    let mut response = db
        .query("SELECT VALUE id FROM type::record($track) WHERE conference = type::record($conference)")
        .bind(("track", track_id.to_owned()))
        .bind(("conference", conference_id.to_owned()))
        .await
        .map_err(db_error)?;
    let found = response.take::<Option<RecordId>>(0).map_err(db_error)?;

    if found.is_none() {
        return Err(SubmissionError::Validation {
            message: "Track does not belong to the conference".into(),
            context: None,
        });
    }
    Ok(())
}

fn validate_submission(input: &SubmissionInput) -> Result<(), SubmissionError> {
    if input.title.trim().is_empty() {
        return Err(SubmissionError::Validation {
            message: "Title is required".into(),
            context: None,
        });
    }
    if input.abstract_text.trim().is_empty() {
        return Err(SubmissionError::Validation {
            message: "Abstract is required".into(),
            context: None,
        });
    }
    if input.authors.is_empty() {
        return Err(SubmissionError::Validation {
            message: "At least one author is required".into(),
            context: None,
        });
    }
    for author in &input.authors {
        if author.full_name.trim().is_empty() || !author.email.contains('@') {
            return Err(SubmissionError::Validation {
                message: "Every author needs a name and a valid email".into(),
                context: None,
            });
        }
    }
    Ok(())
}

// "conference:abc" -> "abc", used as the storage namespace.
fn record_key(id: &RecordId) -> String {
    let raw = id.to_string();
    raw.split_once(':').map_or(raw.clone(), |(_, key)| key.to_owned())
}

fn split_file_name(file_name: &str) -> Result<(String, String), SubmissionError> {
    // Strip any client-supplied directory components.
    let base = Path::new(file_name)
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or_default();

    let path = Path::new(base);
    let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or_default();
    if stem.is_empty() {
        return Err(SubmissionError::Validation {
            message: "A file name is required".into(),
            context: None,
        });
    }

    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map_or_else(String::new, |e| format!(".{e}"));

    Ok((stem.to_owned(), extension))
}

fn parse_status(raw: &str) -> Result<SubmissionStatus, SubmissionError> {
    raw.parse().map_err(|_| SubmissionError::Internal {
        message: format!("Unknown stored status: {raw}").into(),
        context: None,
    })
}

fn validation(err: impl std::fmt::Display) -> SubmissionError {
    SubmissionError::Validation { message: err.to_string().into(), context: None }
}

fn not_found(err: impl std::fmt::Display) -> SubmissionError {
    SubmissionError::NotFound { message: err.to_string().into(), context: None }
}

fn db_error(err: impl std::fmt::Display) -> SubmissionError {
    SubmissionError::Database { message: err.to_string().into(), context: None }
}

fn is_index_conflict(err: &SubmissionError) -> bool {
    matches!(err, SubmissionError::Database { message, .. } if message.contains("index"))
}
