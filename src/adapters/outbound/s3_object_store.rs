//! S3 Object Store Adapter
//!
//! Implements ObjectStore with rust-s3 against any S3-compatible endpoint
//! (minio in the reference deployment). Path-style addressing, since minio
//! and friends do not resolve virtual-host bucket names.

use crate::domain::entities::RemoteObject;
use crate::domain::errors::ObjectStoreError;
use crate::domain::ports::ObjectStore;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use s3::bucket::Bucket;
use s3::creds::Credentials;
use s3::{BucketConfiguration, Region};
use std::path::Path;

/// Connection settings for one dedicated backup bucket.
#[derive(Debug, Clone)]
pub struct S3StoreConfig {
    /// Host:port of the S3 endpoint, without scheme
    pub endpoint: String,
    pub region: String,
    pub access_key: String,
    pub secret_key: String,
    pub bucket: String,
    pub use_ssl: bool,
}

impl S3StoreConfig {
    fn endpoint_url(&self) -> String {
        let scheme = if self.use_ssl { "https" } else { "http" };
        format!("{}://{}", scheme, self.endpoint)
    }

    fn s3_region(&self) -> Region {
        Region::Custom {
            region: self.region.clone(),
            endpoint: self.endpoint_url(),
        }
    }

    fn s3_credentials(&self) -> Result<Credentials, ObjectStoreError> {
        Credentials::new(
            Some(&self.access_key),
            Some(&self.secret_key),
            None,
            None,
            None,
        )
        .map_err(|e| ObjectStoreError(e.to_string()))
    }
}

pub struct S3ObjectStore {
    bucket: Box<Bucket>,
    config: S3StoreConfig,
}

impl S3ObjectStore {
    pub fn new(config: S3StoreConfig) -> Result<Self, ObjectStoreError> {
        let bucket = Bucket::new(&config.bucket, config.s3_region(), config.s3_credentials()?)
            .map_err(|e| ObjectStoreError(e.to_string()))?
            .with_path_style();
        Ok(Self { bucket, config })
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    async fn bucket_exists(&self) -> Result<bool, ObjectStoreError> {
        self.bucket
            .exists()
            .await
            .map_err(|e| ObjectStoreError(e.to_string()))
    }

    async fn create_bucket(&self) -> Result<(), ObjectStoreError> {
        Bucket::create_with_path_style(
            &self.config.bucket,
            self.config.s3_region(),
            self.config.s3_credentials()?,
            BucketConfiguration::default(),
        )
        .await
        .map(|_| ())
        .map_err(|e| ObjectStoreError(e.to_string()))
    }

    async fn put_file(&self, key: &str, path: &Path) -> Result<(), ObjectStoreError> {
        let mut file = tokio::fs::File::open(path)
            .await
            .map_err(|e| ObjectStoreError(format!("cannot open {}: {e}", path.display())))?;
        self.bucket
            .put_object_stream(&mut file, key)
            .await
            .map(|_| ())
            .map_err(|e| ObjectStoreError(e.to_string()))
    }

    async fn list_objects(&self) -> Result<Vec<RemoteObject>, ObjectStoreError> {
        let pages = self
            .bucket
            .list(String::new(), None)
            .await
            .map_err(|e| ObjectStoreError(e.to_string()))?;

        let mut objects = Vec::new();
        for page in pages {
            for object in page.contents {
                let last_modified = parse_last_modified(&object.last_modified)?;
                objects.push(RemoteObject {
                    key: object.key,
                    last_modified,
                });
            }
        }
        Ok(objects)
    }

    async fn delete_object(&self, key: &str) -> Result<(), ObjectStoreError> {
        self.bucket
            .delete_object(key)
            .await
            .map(|_| ())
            .map_err(|e| ObjectStoreError(e.to_string()))
    }
}

fn parse_last_modified(raw: &str) -> Result<DateTime<Utc>, ObjectStoreError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| ObjectStoreError(format!("bad LastModified {raw:?}: {e}")))
}
