use surrealdb::types::{Datetime, RecordId, SurrealValue};

/// Assignment row as stored in the `review_assignment` table.
///
/// One row per (submission, reviewer) pair; the pair is unique so assigning
/// the same reviewer twice is a no-op.
#[derive(Debug, Clone, SurrealValue)]
pub struct ReviewAssignmentRecord {
    pub id: RecordId,
    pub submission: RecordId,
    pub reviewer: RecordId,
    pub assigned_at: Datetime,
}

/// Review row as stored in the `review` table, at most one per assignment.
#[derive(Debug, Clone, SurrealValue)]
pub struct ReviewRecord {
    pub id: RecordId,
    pub assignment: RecordId,
    pub score_overall: i64,
    pub confidence: i64,
    pub strengths: Option<String>,
    pub weaknesses: Option<String>,
    pub comments_to_author: Option<String>,
    pub comments_to_chair: Option<String>,
    pub submitted_at: Datetime,
}

/// Decision row as stored in the `decision` table, at most one per submission.
#[derive(Debug, Clone, SurrealValue)]
pub struct DecisionRecord {
    pub id: RecordId,
    pub submission: RecordId,
    pub verdict: String,
    pub note: Option<String>,
    pub decided_by: RecordId,
    pub decided_at: Datetime,
}
