//! Convenience re-exports for feature slices.

pub use crate::safe_nanoid;
pub use crate::security::resource::{ResourceGuard, ResourceGuardError};
pub use cmt_domain::config::ApiConfig;
pub use cmt_domain::registry::{FeatureSlice, InitializedSlice};

#[cfg(feature = "server")]
pub use crate::server::{ApiError, ApiErrorExt, ApiState};
