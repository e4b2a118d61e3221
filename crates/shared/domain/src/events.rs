//! Domain events published on the in-process bus.
//!
//! The server subscribes to these and logs notification intents; actual
//! delivery (email and so on) is an external collaborator.

use crate::model::Verdict;

/// A submission received its number and PDF and entered the Submitted state.
#[derive(Debug, Clone)]
pub struct SubmissionReceived {
    pub submission_id: String,
    pub conference_id: String,
    pub number: String,
    pub title: String,
    pub submitted_by: String,
}

/// A reviewer was assigned to a submission.
#[derive(Debug, Clone)]
pub struct ReviewerAssigned {
    pub assignment_id: String,
    pub submission_id: String,
    pub reviewer_id: String,
}

/// A chair recorded (or re-recorded) a decision on a submission.
#[derive(Debug, Clone)]
pub struct DecisionRecorded {
    pub submission_id: String,
    pub verdict: Verdict,
    pub decided_by: String,
}
