//! Two-step relic publishing: scan blob, then metadata blob.

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;

use crate::observability::metrics;
use crate::relic::RelicId;
use crate::storage::metadata::MetadataTemplate;
use crate::storage::store::BlobStore;
use crate::storage::types::{StoredRelic, UploadResult, CONTENT_TYPE_JSON};

/// A scan ready to publish.
#[derive(Debug, Clone)]
pub struct UploadRequest {
    pub image: Vec<u8>,
    pub content_type: &'static str,
    pub relic_id: RelicId,
    /// Creation timestamp recorded in the metadata.
    pub created: String,
}

/// Publishes a relic's image and metadata.
#[async_trait]
pub trait RelicUploader: Send + Sync {
    async fn upload(&self, request: UploadRequest) -> UploadResult<StoredRelic>;
}

/// Uploader backed by a [`BlobStore`].
///
/// A failure at either step fails the whole upload. An image blob stored
/// before a metadata failure stays orphaned on the network.
pub struct StorageUploader {
    store: Arc<dyn BlobStore>,
    template: MetadataTemplate,
}

impl StorageUploader {
    pub fn new(store: Arc<dyn BlobStore>, template: MetadataTemplate) -> Self {
        Self { store, template }
    }
}

#[async_trait]
impl RelicUploader for StorageUploader {
    async fn upload(&self, request: UploadRequest) -> UploadResult<StoredRelic> {
        let start = Instant::now();
        tracing::info!(
            bytes = request.image.len(),
            content_type = request.content_type,
            "Uploading scan"
        );

        let image_uri = self.store.put(request.image, request.content_type).await?;
        tracing::info!(image_uri = %image_uri, "Scan uploaded");

        let metadata = self
            .template
            .build(request.relic_id, &request.created, &image_uri);
        let token_uri = self
            .store
            .put(metadata.to_json_bytes()?, CONTENT_TYPE_JSON)
            .await?;
        tracing::info!(token_uri = %token_uri, "Metadata uploaded");

        metrics::record_stage_duration("upload", start.elapsed());
        Ok(StoredRelic {
            image_uri,
            token_uri,
        })
    }
}
