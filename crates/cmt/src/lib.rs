//! Facade crate for the conference platform features and shared modules.
//! Re-exports domain/kernel primitives and aggregates feature initialization.
//! Keep this crate thin: it should compose other crates, not implement business logic.
//!
//! ## Usage
//! - Add `cmt` with the `server` feature flag.
//! - Call `cmt::init` to register feature slices; extend as new slices appear.

pub use cmt_domain as domain;
#[cfg(feature = "server")]
use cmt_domain::config::ApiConfig;
pub use cmt_kernel as kernel;

#[cfg(feature = "server")]
pub mod server {
    pub mod router {
        pub use cmt_conference::router as conference_router;
        pub use cmt_content::router as content_router;
        pub use cmt_identity::router as identity_router;
        pub use cmt_kernel::server::router::system_router;
        pub use cmt_review::router as review_router;
        pub use cmt_submission::router as submission_router;
    }
}

/// Feature registry for runtime introspection.
pub mod features {
    pub use cmt_conference as conference;
    pub use cmt_content as content;
    pub use cmt_identity as identity;
    pub use cmt_review as review;
    pub use cmt_submission as submission;

    /// Build-time enabled features (by Cargo feature).
    pub const ENABLED: &[&str] = &[
        #[cfg(feature = "server")]
        "server",
        #[cfg(feature = "server")]
        "identity",
        #[cfg(feature = "server")]
        "conference",
        #[cfg(feature = "server")]
        "submission",
        #[cfg(feature = "server")]
        "review",
        #[cfg(feature = "server")]
        "content",
    ];

    #[must_use]
    pub fn is_enabled(name: &str) -> bool {
        ENABLED.contains(&name)
    }
}

/// Initialize all enabled features for server mode.
///
/// # Errors
/// Returns an error if any feature initialization fails.
#[cfg(feature = "server")]
pub async fn init(
    config: &ApiConfig,
) -> Result<Vec<domain::registry::InitializedSlice>, Box<dyn std::error::Error>> {
    let mut slices = Vec::new();

    // Identity & access
    slices.push(features::identity::init(config)?);

    // Conferences and tracks
    slices.push(features::conference::init()?);

    // Submissions, bootstraps the upload store
    slices.push(features::submission::init(config).await?);

    // Review process
    slices.push(features::review::init()?);

    // Public site content
    slices.push(features::content::init()?);

    Ok(slices)
}
