//! Object Store Port
//!
//! Defines the interface for the remote storage backend.

use crate::domain::entities::RemoteObject;
use crate::domain::errors::ObjectStoreError;
use async_trait::async_trait;

/// Remote storage scoped to one configured bucket.
///
/// This is an outbound port; implementations may target S3, minio or an
/// in-memory store for tests. The pipeline only ever needs these five
/// operations.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    async fn bucket_exists(&self) -> Result<bool, ObjectStoreError>;

    async fn create_bucket(&self) -> Result<(), ObjectStoreError>;

    /// Store the file at `path` under `key`.
    async fn put_file(&self, key: &str, path: &std::path::Path) -> Result<(), ObjectStoreError>;

    /// List every object in the bucket. The bucket is dedicated to backup
    /// artifacts, so no filtering is applied to the listing.
    async fn list_objects(&self) -> Result<Vec<RemoteObject>, ObjectStoreError>;

    async fn delete_object(&self, key: &str) -> Result<(), ObjectStoreError>;
}
