use surrealdb::types::{Datetime, RecordId, SurrealValue};

/// Conference row as stored in the `conference` table.
///
/// `slug` stays `None` when the acronym normalizes to nothing; such rows are
/// unreachable by slug routes.
#[derive(Debug, Clone, SurrealValue)]
pub struct ConferenceRecord {
    pub id: RecordId,
    pub name: String,
    pub short_name: Option<String>,
    pub acronym: Option<String>,
    pub description: Option<String>,
    pub logo_url: Option<String>,
    pub slug: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub submission_deadline: Option<String>,
    pub is_active: bool,
    pub created_by: RecordId,
    pub created_at: Datetime,
}

/// Track row as stored in the `track` table.
#[derive(Debug, Clone, SurrealValue)]
pub struct TrackRecord {
    pub id: RecordId,
    pub conference: RecordId,
    pub name: String,
    pub description: Option<String>,
    pub is_active: bool,
    pub created_at: Datetime,
}
