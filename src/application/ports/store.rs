//! Server store port interfaces

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::audio::EncodedArtifact;
use crate::domain::intercom::{Collection, DeviceSettings, RecordInfo};

/// Errors talking to the intercom server
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    #[error("Request failed: {0}")]
    Network(String),

    #[error("Server rejected the request ({status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("Unexpected response from server: {0}")]
    InvalidResponse(String),
}

/// Port for the server's recording store.
///
/// Both collections share the same shape; the collection is a parameter, not
/// a separate port.
#[async_trait]
pub trait RecordingStore: Send + Sync {
    /// Upload a finished artifact; the server answers with the created record.
    async fn upload(
        &self,
        collection: Collection,
        artifact: &EncodedArtifact,
    ) -> Result<RecordInfo, StoreError>;

    /// List all records in a collection.
    async fn list(&self, collection: Collection) -> Result<Vec<RecordInfo>, StoreError>;

    /// Delete one record by id.
    async fn delete(&self, collection: Collection, id: &str) -> Result<(), StoreError>;
}

/// Port for the unit's flat settings object.
#[async_trait]
pub trait SettingsGateway: Send + Sync {
    /// Fetch the full settings object.
    async fn fetch(&self) -> Result<DeviceSettings, StoreError>;

    /// Replace the full settings object (no partial updates).
    async fn replace(&self, settings: &DeviceSettings) -> Result<(), StoreError>;
}
