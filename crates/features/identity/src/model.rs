use surrealdb::types::{Datetime, RecordId, SurrealValue};

/// Account row as stored in the `user` table.
#[derive(Debug, Clone, SurrealValue)]
pub struct UserRecord {
    pub id: RecordId,
    pub email: String,
    pub password_digest: String,
    pub full_name: String,
    pub affiliation: Option<String>,
    pub role: String,
    pub created_at: Datetime,
}
