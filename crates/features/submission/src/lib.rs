//! Submission feature slice: drafts, numbering, and manuscript uploads.

mod error;
pub mod numbering;

#[cfg(feature = "server")]
pub mod model;
#[cfg(feature = "server")]
mod routes;
#[cfg(feature = "server")]
pub mod service;

pub use crate::error::{SubmissionError, SubmissionErrorExt};
#[cfg(feature = "server")]
pub use crate::routes::router;

#[cfg(feature = "server")]
use cmt_domain::config::ApiConfig;
#[cfg(feature = "server")]
use cmt_domain::registry::InitializedSlice;
#[cfg(feature = "server")]
use cmt_storage::Storage;

/// Submission feature state
#[cfg(feature = "server")]
#[cmt_derive::cmt_slice]
pub struct Submission {
    pub(crate) storage: Storage,
}

/// Initialize the submission feature, bootstrapping the upload store.
///
/// # Errors
/// Fails when the upload directory cannot be created or resolved.
#[cfg(feature = "server")]
pub async fn init(config: &ApiConfig) -> Result<InitializedSlice, SubmissionError> {
    let storage = Storage::builder()
        .root(&config.storage.uploads_dir)
        .create(true)
        .max_file_size(config.storage.max_upload_bytes)
        .connect()
        .await?;

    tracing::info!("Submission server slice initialized");

    Ok(InitializedSlice::new(Submission::new(SubmissionInner { storage })))
}

/// Fetches the registered submission slice from the shared state.
#[cfg(feature = "server")]
pub(crate) fn slice(
    state: &cmt_kernel::server::ApiState,
) -> Result<&Submission, cmt_kernel::server::ApiError> {
    state.try_get_slice::<Submission>().map_err(|e| cmt_kernel::server::ApiError::Internal {
        message: e.to_string().into(),
        context: None,
    })
}
