//! Storage types and error definitions.

use std::path::Path;

use thiserror::Error;

/// Errors that can occur while publishing a relic.
#[derive(Debug, Error)]
pub enum UploadError {
    /// Transport-level failure talking to the bundler.
    #[error("storage request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Bundler answered with a non-success status.
    #[error("storage network rejected upload with status {status}: {body}")]
    Rejected { status: u16, body: String },

    /// Success response without a usable item id.
    #[error("storage response did not contain an item id")]
    MissingItemId,

    /// Configured endpoint could not be turned into a request URL.
    #[error("invalid storage URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    /// Metadata document could not be serialized.
    #[error("failed to encode metadata: {0}")]
    Metadata(#[from] serde_json::Error),
}

/// Result type for storage operations.
pub type UploadResult<T> = Result<T, UploadError>;

/// URIs of a published relic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredRelic {
    /// Retrievable address of the raw scan.
    pub image_uri: String,
    /// Retrievable address of the metadata document.
    pub token_uri: String,
}

pub const CONTENT_TYPE_PNG: &str = "image/png";
pub const CONTENT_TYPE_JPEG: &str = "image/jpeg";
pub const CONTENT_TYPE_JSON: &str = "application/json";

/// Content type tag for a scan, derived from its extension.
pub fn image_content_type(path: &Path) -> &'static str {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .as_deref()
    {
        Some("png") => CONTENT_TYPE_PNG,
        _ => CONTENT_TYPE_JPEG,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_content_type() {
        assert_eq!(image_content_type(Path::new("a.PNG")), "image/png");
        assert_eq!(image_content_type(Path::new("a.jpg")), "image/jpeg");
        assert_eq!(image_content_type(Path::new("a.jpeg")), "image/jpeg");
    }

    #[test]
    fn test_error_display() {
        let err = UploadError::Rejected {
            status: 402,
            body: "insufficient balance".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "storage network rejected upload with status 402: insufficient balance"
        );
    }
}
