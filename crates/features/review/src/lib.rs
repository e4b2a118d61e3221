//! Review feature slice: reviewer assignments, scoring, and decisions.

mod error;

#[cfg(feature = "server")]
pub mod model;
#[cfg(feature = "server")]
mod routes;
#[cfg(feature = "server")]
pub mod service;

pub use crate::error::{ReviewError, ReviewErrorExt};
#[cfg(feature = "server")]
pub use crate::routes::router;

#[cfg(feature = "server")]
use cmt_domain::registry::InitializedSlice;

/// Review feature state
#[cfg(feature = "server")]
#[cmt_derive::cmt_slice]
pub struct Review {}

/// Initialize the review feature.
///
/// # Errors
/// Infallible today; kept fallible for parity with the other slices.
#[cfg(feature = "server")]
pub fn init() -> Result<InitializedSlice, ReviewError> {
    tracing::info!("Review server slice initialized");

    Ok(InitializedSlice::new(Review::new(ReviewInner {})))
}
