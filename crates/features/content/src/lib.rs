//! Content feature slice: hero banner, about pages, navigation, page blocks,
//! and committee listings.

mod error;

#[cfg(feature = "server")]
pub mod model;
#[cfg(feature = "server")]
mod routes;
#[cfg(feature = "server")]
pub mod service;

pub use crate::error::{ContentError, ContentErrorExt};
#[cfg(feature = "server")]
pub use crate::routes::router;

#[cfg(feature = "server")]
use cmt_domain::registry::InitializedSlice;

/// Content feature state
#[cfg(feature = "server")]
#[cmt_derive::cmt_slice]
pub struct Content {}

/// Initialize the content feature.
///
/// # Errors
/// Infallible today; kept fallible for parity with the other slices.
#[cfg(feature = "server")]
pub fn init() -> Result<InitializedSlice, ContentError> {
    tracing::info!("Content server slice initialized");

    Ok(InitializedSlice::new(Content::new(ContentInner {})))
}
