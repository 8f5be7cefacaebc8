//! Media host client.
//!
//! Images are uploaded to a third-party host; the crate only keeps the
//! returned `{publicId, url}` pair.

use async_trait::async_trait;
use reqwest::{
    multipart::{Form, Part},
    Client,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use crate::config::MediaConfig;
use crate::domain::MediaAsset;
use crate::errors::AppResult;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait MediaStore: Send + Sync {
    /// Upload a file under `folder` (relative to the configured root folder).
    async fn upload(&self, bytes: Vec<u8>, folder: &str, file_name: &str) -> AppResult<MediaAsset>;

    async fn delete(&self, public_id: &str) -> AppResult<()>;
}

/// Delete a stored file without failing the surrounding operation.
pub async fn release(media: &dyn MediaStore, asset: &MediaAsset) {
    if let Err(e) = media.delete(&asset.public_id).await {
        warn!(public_id = %asset.public_id, error = %e, "Failed to delete media asset");
    }
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    public_id: String,
    #[serde(alias = "url")]
    secure_url: String,
}

#[derive(Serialize)]
struct DestroyRequest<'a> {
    public_id: &'a str,
}

/// HTTP client for the media host
#[derive(Clone)]
pub struct MediaClient {
    client: Client,
    config: MediaConfig,
}

impl std::fmt::Debug for MediaClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MediaClient")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl MediaClient {
    pub fn new(config: MediaConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.config.api_url.trim_end_matches('/'), path)
    }
}

#[async_trait]
impl MediaStore for MediaClient {
    #[instrument(skip(self, bytes), fields(size = bytes.len()))]
    async fn upload(&self, bytes: Vec<u8>, folder: &str, file_name: &str) -> AppResult<MediaAsset> {
        let part = Part::bytes(bytes).file_name(file_name.to_string());
        let form = Form::new()
            .text("folder", format!("{}/{}", self.config.folder, folder))
            .part("file", part);

        let uploaded: UploadResponse = self
            .client
            .post(self.endpoint("upload"))
            .bearer_auth(self.config.api_key())
            .multipart(form)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        debug!(public_id = %uploaded.public_id, "Media uploaded");

        Ok(MediaAsset {
            public_id: uploaded.public_id,
            url: uploaded.secure_url,
        })
    }

    #[instrument(skip(self))]
    async fn delete(&self, public_id: &str) -> AppResult<()> {
        self.client
            .post(self.endpoint("destroy"))
            .bearer_auth(self.config.api_key())
            .json(&DestroyRequest { public_id })
            .send()
            .await?
            .error_for_status()?;

        debug!("Media deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::AppError;

    #[test]
    fn test_endpoint_joins_without_double_slash() {
        let client = MediaClient::new(MediaConfig::new("http://media.local/api/", "key", "shop"));
        assert_eq!(client.endpoint("upload"), "http://media.local/api/upload");
    }

    #[test]
    fn test_debug_hides_api_key() {
        let client = MediaClient::new(MediaConfig::new("http://media.local", "sekrit", "shop"));
        assert!(!format!("{:?}", client).contains("sekrit"));
    }

    #[tokio::test]
    async fn test_release_swallows_errors() {
        let mut media = MockMediaStore::new();
        media
            .expect_delete()
            .times(1)
            .returning(|_| Err(AppError::internal("host down")));

        let asset = MediaAsset {
            public_id: "shop/avatars/1".into(),
            url: "https://cdn/1.png".into(),
        };
        release(&media, &asset).await;
    }
}
