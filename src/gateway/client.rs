use async_trait::async_trait;
use serde_json::Value;

use super::errors::GatewayResult;
use super::files::{FileDownload, FileKey, FileUpload};
use super::response::SaveOutcome;
use super::target::SectionTarget;
use crate::workflow::{EntityId, EntityKind};

/// Boundary to the backend that owns validation and persistence
///
/// Implementations perform exactly one request per call; retrying is left to
/// the user ("save again").
#[async_trait]
pub trait SectionGateway: Send + Sync {
    /// Submit a section's snapshot and parse the save outcome
    async fn submit_section(&self, target: &SectionTarget, body: &Value)
        -> GatewayResult<SaveOutcome>;

    /// Load the sub-entities of a table-style sub-form
    async fn list_subresource(
        &self,
        kind: EntityKind,
        entity_id: EntityId,
        subresource: &str,
    ) -> GatewayResult<Vec<Value>>;

    /// Delete one sub-entity; returns the backend's `success` flag
    async fn delete_subresource(
        &self,
        kind: EntityKind,
        subresource: &str,
        id: u64,
    ) -> GatewayResult<bool>;

    async fn download_file(&self, kind: EntityKind, key: &FileKey) -> GatewayResult<FileDownload>;

    async fn upload_file(
        &self,
        kind: EntityKind,
        key: &FileKey,
        file: FileUpload,
    ) -> GatewayResult<()>;
}
