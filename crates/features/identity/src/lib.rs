//! Identity feature slice: accounts, Chair/Author roles, and bearer token auth.

mod error;

#[cfg(feature = "server")]
mod extract;
#[cfg(feature = "server")]
pub mod model;
#[cfg(feature = "server")]
mod password;
#[cfg(feature = "server")]
mod routes;
#[cfg(feature = "server")]
pub mod service;
#[cfg(feature = "server")]
mod token;

pub use crate::error::{IdentityError, IdentityErrorExt};
#[cfg(feature = "server")]
pub use crate::extract::{CurrentUser, RequireChair};
#[cfg(feature = "server")]
pub use crate::routes::router;

#[cfg(feature = "server")]
use crate::token::TokenService;
#[cfg(feature = "server")]
use cmt_domain::config::ApiConfig;
#[cfg(feature = "server")]
use cmt_domain::registry::InitializedSlice;

/// Identity feature state
#[cfg(feature = "server")]
#[cmt_derive::cmt_slice]
pub struct Identity {
    pub(crate) tokens: TokenService,
    pub(crate) sessions: moka::sync::Cache<String, CurrentUser>,
    pub(crate) salt: String,
}

/// Initialize the identity feature.
///
/// # Errors
/// Fails when the JWT secret is empty.
#[cfg(feature = "server")]
pub fn init(config: &ApiConfig) -> Result<InitializedSlice, IdentityError> {
    let identity = &config.security.identity;

    let inner = IdentityInner {
        tokens: TokenService::new(&identity.jwt)?,
        sessions: moka::sync::Cache::new(identity.session_cache_capacity),
        salt: identity.password_salt.clone(),
    };

    tracing::info!("Identity server slice initialized");

    Ok(InitializedSlice::new(Identity::new(inner)))
}

/// Fetches the registered identity slice from the shared state.
#[cfg(feature = "server")]
pub(crate) fn slice(
    state: &cmt_kernel::server::ApiState,
) -> Result<&Identity, cmt_kernel::server::ApiError> {
    state.try_get_slice::<Identity>().map_err(|e| cmt_kernel::server::ApiError::Internal {
        message: e.to_string().into(),
        context: None,
    })
}
