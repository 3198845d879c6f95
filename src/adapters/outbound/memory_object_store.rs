//! In-Memory Object Store
//!
//! ObjectStore implementation backed by a map. Used by tests and dry runs.
//! Mirrors real bucket semantics where it matters to the pipeline: the
//! bucket starts absent, listing returns every object, and retention orders
//! purely by last-modified time.

use crate::domain::entities::RemoteObject;
use crate::domain::errors::ObjectStoreError;
use crate::domain::ports::ObjectStore;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::RwLock;

struct StoredObject {
    last_modified: DateTime<Utc>,
    data: Vec<u8>,
}

#[derive(Default)]
pub struct MemoryObjectStore {
    bucket_created: AtomicBool,
    objects: RwLock<BTreeMap<String, StoredObject>>,
}

impl MemoryObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an object with a chosen modification time (retention tests).
    pub async fn insert_with_time(&self, key: impl Into<String>, last_modified: DateTime<Utc>) {
        self.objects.write().await.insert(
            key.into(),
            StoredObject {
                last_modified,
                data: Vec::new(),
            },
        );
    }

    pub async fn keys(&self) -> Vec<String> {
        self.objects.read().await.keys().cloned().collect()
    }

    pub async fn contains(&self, key: &str) -> bool {
        self.objects.read().await.contains_key(key)
    }

    pub async fn object_count(&self) -> usize {
        self.objects.read().await.len()
    }

    pub async fn object_data(&self, key: &str) -> Option<Vec<u8>> {
        self.objects.read().await.get(key).map(|o| o.data.clone())
    }
}

#[async_trait]
impl ObjectStore for MemoryObjectStore {
    async fn bucket_exists(&self) -> Result<bool, ObjectStoreError> {
        Ok(self.bucket_created.load(Ordering::SeqCst))
    }

    async fn create_bucket(&self) -> Result<(), ObjectStoreError> {
        self.bucket_created.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn put_file(&self, key: &str, path: &Path) -> Result<(), ObjectStoreError> {
        let data = tokio::fs::read(path)
            .await
            .map_err(|e| ObjectStoreError(format!("cannot read {}: {e}", path.display())))?;
        self.objects.write().await.insert(
            key.to_string(),
            StoredObject {
                last_modified: Utc::now(),
                data,
            },
        );
        Ok(())
    }

    async fn list_objects(&self) -> Result<Vec<RemoteObject>, ObjectStoreError> {
        Ok(self
            .objects
            .read()
            .await
            .iter()
            .map(|(key, object)| RemoteObject {
                key: key.clone(),
                last_modified: object.last_modified,
            })
            .collect())
    }

    async fn delete_object(&self, key: &str) -> Result<(), ObjectStoreError> {
        self.objects
            .write()
            .await
            .remove(key)
            .map(|_| ())
            .ok_or_else(|| ObjectStoreError(format!("no such key: {key}")))
    }
}
