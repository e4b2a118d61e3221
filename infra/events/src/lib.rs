//! In-process event bus for decoupling feature slices.
//!
//! Feature slices publish plain structs (`SubmissionReceived`,
//! `DecisionRecorded`, ...) and background tasks subscribe by type. Delivery
//! is broadcast with a bounded buffer; slow subscribers skip to the tail
//! rather than blocking publishers.

mod bus;
mod error;
mod receiver;

pub use bus::{Event, EventBus};
pub use error::{EventBusError, EventBusErrorExt};
pub use receiver::EventReceiverExt;
