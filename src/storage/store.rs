//! Blob uploads to the content-addressed network.
//!
//! # Bundler contract
//! ```text
//! POST {bundler_url}/bundle/data/{currency}
//!   Content-Type: <blob content type>
//!   X-API-KEY: <key>            (when configured)
//!   <raw bytes>
//!
//! 2xx → {"itemId": "<id>", ...}
//! ```
//! The retrievable URI is `{gateway_url}/{itemId}`.

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use serde::Deserialize;

use crate::config::{Secret, StorageConfig};
use crate::storage::types::{UploadError, UploadResult};

const API_KEY_HEADER: &str = "X-API-KEY";

/// Something that stores opaque blobs and hands back a retrievable URI.
#[async_trait]
pub trait BlobStore: Send + Sync {
    async fn put(&self, bytes: Vec<u8>, content_type: &str) -> UploadResult<String>;
}

#[derive(Debug, Deserialize)]
struct BundleResponse {
    #[serde(rename = "itemId")]
    item_id: Option<String>,
}

/// HTTP client for an Arseeding-style bundler.
#[derive(Clone)]
pub struct BundlerStore {
    client: reqwest::Client,
    upload_url: url::Url,
    gateway_url: String,
    api_key: Option<Secret>,
}

impl BundlerStore {
    pub fn new(config: &StorageConfig) -> UploadResult<Self> {
        let raw = format!(
            "{}/bundle/data/{}",
            config.bundler_url.trim_end_matches('/'),
            config.currency
        );
        let upload_url = url::Url::parse(&raw).map_err(|e| UploadError::InvalidUrl {
            url: raw.clone(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client: reqwest::Client::new(),
            upload_url,
            gateway_url: config.gateway_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        })
    }

    pub fn upload_url(&self) -> &url::Url {
        &self.upload_url
    }
}

#[async_trait]
impl BlobStore for BundlerStore {
    async fn put(&self, bytes: Vec<u8>, content_type: &str) -> UploadResult<String> {
        let size = bytes.len();
        let mut request = self
            .client
            .post(self.upload_url.clone())
            .header(CONTENT_TYPE, content_type)
            .body(bytes);
        if let Some(key) = &self.api_key {
            request = request.header(API_KEY_HEADER, key.expose());
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(UploadError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: BundleResponse = response.json().await?;
        let item_id = parsed
            .item_id
            .filter(|id| !id.is_empty())
            .ok_or(UploadError::MissingItemId)?;

        tracing::debug!(size, content_type, item_id = %item_id, "Blob stored");
        Ok(format!("{}/{}", self.gateway_url, item_id))
    }
}

impl std::fmt::Debug for BundlerStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BundlerStore")
            .field("upload_url", &self.upload_url.as_str())
            .field("gateway_url", &self.gateway_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "***"))
            .finish()
    }
}
