//! Conference feature slice: conference and track CRUD plus the slug resolver.

mod error;
pub mod slug;

#[cfg(feature = "server")]
pub mod model;
#[cfg(feature = "server")]
mod routes;
#[cfg(feature = "server")]
pub mod service;

pub use crate::error::{ConferenceError, ConferenceErrorExt};
#[cfg(feature = "server")]
pub use crate::routes::router;

#[cfg(feature = "server")]
use cmt_domain::registry::InitializedSlice;

/// Conference feature state
#[cfg(feature = "server")]
#[cmt_derive::cmt_slice]
pub struct Conference {}

/// Initialize the conference feature.
///
/// # Errors
/// Infallible today; kept fallible for parity with the other slices.
#[cfg(feature = "server")]
pub fn init() -> Result<InitializedSlice, ConferenceError> {
    tracing::info!("Conference server slice initialized");

    Ok(InitializedSlice::new(Conference::new(ConferenceInner {})))
}
