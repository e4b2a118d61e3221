//! A sandboxed file store for uploaded manuscripts.
//! It provides a secure abstraction over the filesystem with built-in protections against common
//! I/O pitfalls and security vulnerabilities. All examples use temporary directories to avoid
//! writing to the real filesystem.
//!
//! # Core Features
//!
//! - **Sandbox Security**: Strict path traversal protection using physical path canonicalization.
//! - **Atomic Writes**: Uses an "atomic swap" pattern (unique temp write + `fsync` + `rename`) to prevent data corruption during crashes.
//! - **Size Limits**: Uploads beyond the configured limit never touch the disk.
//! - **Namespacing**: Each conference stores its manuscripts under its own directory.
//! - **Self-Healing**: Automatically identifies and cleans up orphaned temporary files during initialization.
//!
//! # Architectural Overview
//!
//! The crate follows a layered approach:
//! 1.  **[`Storage`]**: The primary thread-safe handle and entry point.
//! 2.  **[`NamespacedStorage`]**: A per-conference scoped view.
//! 3.  **[`StorageBuilder`]**: A type-safe fluent builder for configuration.
//!
//! # Examples
//!
//! ```rust
//! use cmt_storage::{Storage, StorageError};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), StorageError> {
//!     // Use a temp directory for examples/tests
//!     # let tmp = tempfile::tempdir().unwrap();
//!     # let root = tmp.path().join("papers");
//!     let storage = Storage::builder()
//!         .root(&root)
//!         .create(true)
//!         .connect()
//!         .await?;
//!
//!     // Write data atomically
//!     storage.write("manifest.json", b"{}").await?;
//!
//!     let data = storage.read("manifest.json").await?;
//!     assert_eq!(data, b"{}");
//!
//!     Ok(())
//! }
//! ```

mod builder;
mod engine;
mod error;
mod maintenance;
mod namespace;
mod security;

pub use builder::StorageBuilder;
pub use engine::Storage;
pub use error::{StorageError, StorageErrorExt};
pub use namespace::NamespacedStorage;
