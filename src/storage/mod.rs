//! Content-addressed storage subsystem.
//!
//! # Data Flow
//! ```text
//! scan bytes
//!     → store.rs (PUT image blob → image URI)
//!     → metadata.rs (name, description, image URI, attributes)
//!     → store.rs (PUT metadata JSON → token URI)
//! ```
//!
//! # Design Decisions
//! - One attempt per blob, no retries
//! - No partial result is ever returned to the caller

pub mod metadata;
pub mod store;
pub mod types;
pub mod uploader;

pub use metadata::{MetadataTemplate, TokenMetadata};
pub use store::{BlobStore, BundlerStore};
pub use types::{image_content_type, StoredRelic, UploadError};
pub use uploader::{RelicUploader, StorageUploader, UploadRequest};
