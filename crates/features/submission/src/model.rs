use surrealdb::types::{Datetime, RecordId, SurrealValue};

/// Submission row as stored in the `submission` table.
///
/// `number`, `pdf_path`, `original_file_name`, and `submitted_at` stay unset
/// while the submission is a draft; all four are written together when the
/// manuscript is uploaded.
#[derive(Debug, Clone, SurrealValue)]
pub struct SubmissionRecord {
    pub id: RecordId,
    pub conference: RecordId,
    pub track: Option<RecordId>,
    pub title: String,
    pub abstract_text: String,
    pub pdf_path: Option<String>,
    pub original_file_name: Option<String>,
    pub number: Option<String>,
    pub status: String,
    pub submitted_by: RecordId,
    pub submitted_at: Option<Datetime>,
    pub created_at: Datetime,
}

/// Co-author row as stored in the `submission_author` table.
#[derive(Debug, Clone, SurrealValue)]
pub struct SubmissionAuthorRecord {
    pub id: RecordId,
    pub submission: RecordId,
    pub full_name: String,
    pub email: String,
    pub affiliation: Option<String>,
    pub is_corresponding: bool,
}
