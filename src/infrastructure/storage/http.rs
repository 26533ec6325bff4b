//! HTTP adapter for the intercom server
//!
//! Implements the recording store (multipart upload, list, delete) and the
//! settings gateway (GET /config, PUT /config) against the unit's REST API.

use async_trait::async_trait;
use serde::Deserialize;

use crate::application::ports::{RecordingStore, SettingsGateway, StoreError};
use crate::domain::audio::EncodedArtifact;
use crate::domain::intercom::{Collection, DeviceSettings, RecordInfo};

/// Error payload the server returns on rejected requests
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

/// HTTP client for the intercom base unit
pub struct IntercomClient {
    base_url: String,
    client: reqwest::Client,
}

impl IntercomClient {
    /// Create a client for the given base URL (trailing slash tolerated)
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            client: reqwest::Client::new(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Absolute playback/download URL for one record
    pub fn download_url(&self, collection: Collection, id: &str) -> String {
        self.url(&collection.binary_path(id))
    }

    /// Turn a non-success response into a `Rejected` error, reading the
    /// server's `{"error": ...}` body when present.
    async fn rejection(response: reqwest::Response) -> StoreError {
        let status = response.status().as_u16();
        let message = match response.json::<ErrorBody>().await {
            Ok(body) => body.error,
            Err(_) => "(no error body)".to_string(),
        };
        StoreError::Rejected { status, message }
    }
}

#[async_trait]
impl RecordingStore for IntercomClient {
    async fn upload(
        &self,
        collection: Collection,
        artifact: &EncodedArtifact,
    ) -> Result<RecordInfo, StoreError> {
        let part = reqwest::multipart::Part::bytes(artifact.data().to_vec())
            .file_name(EncodedArtifact::FILE_NAME)
            .mime_str(EncodedArtifact::MEDIA_TYPE)
            .map_err(|e| StoreError::InvalidResponse(e.to_string()))?;
        let form = reqwest::multipart::Form::new().part("file", part);

        let response = self
            .client
            .post(self.url(&format!("/{}", collection)))
            .multipart(form)
            .send()
            .await
            .map_err(|e| StoreError::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(Self::rejection(response).await);
        }

        response
            .json::<RecordInfo>()
            .await
            .map_err(|e| StoreError::InvalidResponse(e.to_string()))
    }

    async fn list(&self, collection: Collection) -> Result<Vec<RecordInfo>, StoreError> {
        let response = self
            .client
            .get(self.url(&format!("/{}", collection)))
            .send()
            .await
            .map_err(|e| StoreError::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(Self::rejection(response).await);
        }

        response
            .json::<Vec<RecordInfo>>()
            .await
            .map_err(|e| StoreError::InvalidResponse(e.to_string()))
    }

    async fn delete(&self, collection: Collection, id: &str) -> Result<(), StoreError> {
        let response = self
            .client
            .delete(self.url(&format!("/{}/{}", collection, id)))
            .send()
            .await
            .map_err(|e| StoreError::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(Self::rejection(response).await);
        }
        Ok(())
    }
}

#[async_trait]
impl SettingsGateway for IntercomClient {
    async fn fetch(&self) -> Result<DeviceSettings, StoreError> {
        let response = self
            .client
            .get(self.url("/config"))
            .send()
            .await
            .map_err(|e| StoreError::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(Self::rejection(response).await);
        }

        response
            .json::<DeviceSettings>()
            .await
            .map_err(|e| StoreError::InvalidResponse(e.to_string()))
    }

    async fn replace(&self, settings: &DeviceSettings) -> Result<(), StoreError> {
        let response = self
            .client
            .put(self.url("/config"))
            .json(settings)
            .send()
            .await
            .map_err(|e| StoreError::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(Self::rejection(response).await);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_slash_is_trimmed() {
        let client = IntercomClient::new("http://unit.local:5000/");
        assert_eq!(client.url("/messages"), "http://unit.local:5000/messages");
    }

    #[test]
    fn download_url_follows_binary_path_convention() {
        let client = IntercomClient::new("http://unit.local:5000");
        assert_eq!(
            client.download_url(Collection::Records, "abc"),
            "http://unit.local:5000/records/abc/binary"
        );
    }
}
