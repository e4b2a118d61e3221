#![allow(unreachable_pub)]
#![allow(clippy::needless_pass_by_value)]

//! # Macros
//!
//! Procedural macros for the CMT infrastructure.
//! Attribute macros here remove the boilerplate shared by every crate in the
//! workspace: error enums, API models/handlers, feature slices, and the
//! specialized async runtime entry point.

mod macros;

use proc_macro::TokenStream;
use syn::{DeriveInput, ItemFn, ItemStruct, parse_macro_input};

/// Attribute macro to bootstrap the specialized Tokio runtime.
///
/// Transforms an `async fn main` into a standard `fn main` that initializes
/// a pre-configured Tokio runtime based on the selected performance profile.
///
/// # Arguments
///
/// * `high_performance` - Optimized for high-throughput server environments.
/// * `memory_efficient` - Optimized for low-footprint environments.
/// * `default` - Worker threads auto-detected from available parallelism.
///
/// # Examples
///
/// ```rust,ignore
/// #[cmt_runtime::main(high_performance)]
/// async fn main() -> Result<(), ()> {
/// # Ok(())
/// }
/// ```
#[proc_macro_attribute]
pub fn main(args: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as ItemFn);
    macros::runtime::expand_main(args.into(), input).into()
}

/// Attribute macro to define a standard API data model.
///
/// Keeps every DTO in the platform consistent by injecting common derives
/// and serde policy.
///
/// # Injected Behaviors
///
/// * **Derives**: `Debug`, `Serialize`, and `Deserialize` when missing.
/// * **`OpenAPI`**: `utoipa::ToSchema` when the `server` feature is enabled.
/// * **Serde Policy**:
///     * `rename_all = "camelCase"` by default (can be overridden).
///     * `deny_unknown_fields` by default (can be disabled).
///
/// # Example
///
/// ```rust,ignore
/// use cmt_derive::api_model;
///
/// #[api_model(rename_all = "snake_case", deny_unknown_fields = false)]
/// pub struct ConferenceSummary {
///     pub id: String,
///     pub acronym: String,
/// }
/// ```
#[proc_macro_attribute]
pub fn api_model(attr: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as ItemStruct);
    macros::api::expand_api_model(attr.into(), input).into()
}

/// Attribute macro to bridge Axum handlers with `OpenAPI` documentation.
///
/// Wraps a standard async function and integrates it with `utoipa`.
/// Accepts the usual `utoipa::path` arguments (`get`, `post`,
/// `path = "..."`, `responses(...)`, `tag = "..."`).
///
/// # Example
///
/// ```rust,ignore
/// use cmt_derive::api_handler;
///
/// #[api_handler(
///     get,
///     path = "/health",
///     responses((status = OK, body = HealthResponse)),
///     tag = "System"
/// )]
/// pub async fn health_handler() -> Result<(), ()> {
///     Ok(())
/// }
/// ```
#[proc_macro_attribute]
pub fn api_handler(args: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as ItemFn);
    macros::api::expand_api_handler(args.into(), input).into()
}

/// A high-level attribute macro for defining domain-specific error enums.
///
/// Transforms a standard enum into a fully-featured error type integrated
/// with the CMT infrastructure.
///
/// # Features
///
/// * **Automatic Derives**: Injects `#[derive(Debug, thiserror::Error)]`.
/// * **Context Support**: Generates a companion `...Ext` trait that adds
///   `.context()` to any `Result` convertible into this error type.
/// * **Standard Conversions**: Implements `From<T>` for variants containing
///   a `#[source]` field, enabling the `?` operator for upstream errors.
/// * **Internal Fallback**: `From<&str>` and `From<String>` when an
///   `Internal` variant is present.
///
/// # Requirements
///
/// 1. Applied to an **enum**.
/// 2. Variants that support context carry `context: Option<Cow<'static, str>>`.
/// 3. Variants wrapping external errors carry a `source` field (or a field
///    marked `#[source]`/`#[from]`, compatible with `thiserror`).
/// 4. Tuple or unit variants are rejected to keep error wiring explicit.
///
/// # Example
///
/// ```rust,ignore
/// use cmt_derive::cmt_error;
/// use std::borrow::Cow;
///
/// #[cmt_error]
/// pub enum DatabaseError {
///     #[error("IO error{}: {source}", format_context(.context))]
///     Io {
///         #[source]
///         source: surrealdb::Error,
///         context: Option<Cow<'static, str>>,
///     },
///
///     #[error("Internal fault{}: {message}", format_context(.context))]
///     Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
/// }
/// ```
#[proc_macro_attribute]
pub fn cmt_error(_args: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as DeriveInput);
    macros::error::expand_derive(input).into()
}

/// Attribute macro to define a Vertical Slice handle.
///
/// Transforms a struct into the full Slice pattern:
/// 1. Generates a thread-safe `Arc` wrapper.
/// 2. Implements `Deref` for transparent access to the inner state.
/// 3. Implements `FeatureSlice` for registration in the Kernel.
///
/// # Example
/// ```rust,ignore
/// #[cmt_derive::cmt_slice]
/// pub struct Conference {
///     pub db: Database,
/// }
///
/// fn init(db: Database) -> Conference {
///     Conference::new(ConferenceInner { db })
/// }
/// ```
#[proc_macro_attribute]
pub fn cmt_slice(_attr: TokenStream, item: TokenStream) -> TokenStream {
    let input = syn::parse_macro_input!(item as ItemStruct);
    macros::slice::expand_slice(input).into()
}
