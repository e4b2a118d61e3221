//! Logs notification intents for domain events. Actual delivery (email,
//! webhooks) is delegated to external collaborators.

use cmt::domain::events::{DecisionRecorded, ReviewerAssigned, SubmissionReceived};
use cmt_event_bus::{EventBus, EventReceiverExt};
use tracing::{info, warn};

pub(crate) fn spawn(events: &EventBus) {
    match events.subscribe::<SubmissionReceived>() {
        Ok(mut rx) => {
            tokio::spawn(async move {
                while let Some(event) = rx.next().await {
                    info!(
                        submission = %event.submission_id,
                        conference = %event.conference_id,
                        number = %event.number,
                        title = %event.title,
                        "notify: submission received, confirmation owed to {}",
                        event.submitted_by
                    );
                }
            });
        },
        Err(e) => warn!("Failed to subscribe to submission events: {e}"),
    }

    match events.subscribe::<ReviewerAssigned>() {
        Ok(mut rx) => {
            tokio::spawn(async move {
                while let Some(event) = rx.next().await {
                    info!(
                        assignment = %event.assignment_id,
                        submission = %event.submission_id,
                        "notify: review requested from {}",
                        event.reviewer_id
                    );
                }
            });
        },
        Err(e) => warn!("Failed to subscribe to assignment events: {e}"),
    }

    match events.subscribe::<DecisionRecorded>() {
        Ok(mut rx) => {
            tokio::spawn(async move {
                while let Some(event) = rx.next().await {
                    info!(
                        submission = %event.submission_id,
                        verdict = %event.verdict,
                        "notify: decision by {} ready for the submitter",
                        event.decided_by
                    );
                }
            });
        },
        Err(e) => warn!("Failed to subscribe to decision events: {e}"),
    }
}
