//! Remote Sync Stage
//!
//! Replicates finished archives into the object store and applies the same
//! count-based retention rule there. Everything goes through the
//! [`ObjectStore`] port; this stage never knows which backend is behind it.

use crate::domain::entities::BackupArchive;
use crate::domain::errors::ObjectStoreError;
use crate::domain::ports::ObjectStore;
use crate::domain::services::RetentionPolicy;
use std::sync::Arc;

pub struct RemoteSync {
    store: Arc<dyn ObjectStore>,
    /// Bucket name, for log lines only; the store is already scoped to it.
    bucket: String,
}

impl RemoteSync {
    pub fn new(store: Arc<dyn ObjectStore>, bucket: impl Into<String>) -> Self {
        Self {
            store,
            bucket: bucket.into(),
        }
    }

    /// Create the bucket when absent. Idempotent, safe to call every run.
    pub async fn ensure_bucket(&self) -> Result<(), ObjectStoreError> {
        if self.store.bucket_exists().await? {
            return Ok(());
        }
        tracing::info!("creating bucket {:?}", self.bucket);
        self.store.create_bucket().await
    }

    /// Upload under the archive's base filename, so remote retention sorts
    /// by the same naming scheme as the local side.
    pub async fn upload(&self, archive: &BackupArchive) -> Result<(), ObjectStoreError> {
        tracing::info!("uploading {} to bucket {:?}", archive.name, self.bucket);
        self.store.put_file(&archive.name, &archive.path).await
    }

    /// Remove objects beyond the retention count, most recently modified
    /// kept. No filename filter here: the bucket is dedicated to backup
    /// artifacts, so every object participates.
    pub async fn prune(&self, policy: RetentionPolicy) -> Result<usize, ObjectStoreError> {
        let objects = self.store.list_objects().await?;
        let victims = policy.excess(objects, |o| o.last_modified);
        let removed = victims.len();
        for object in victims {
            tracing::info!("pruning remote object {}", object.key);
            self.store.delete_object(&object.key).await?;
        }
        Ok(removed)
    }
}
