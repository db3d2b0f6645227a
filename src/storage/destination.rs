//! Object storage destination (GCS or local filesystem)

use crate::error::{Error, Result};
use bytes::Bytes;
use object_store::gcp::GoogleCloudStorageBuilder;
use object_store::local::LocalFileSystem;
use object_store::path::Path as ObjectPath;
use object_store::ObjectStore;
use std::path::Path;
use std::sync::Arc;

/// Storage destination parsed from a bucket name or URL
#[derive(Debug, Clone)]
pub struct CloudDestination {
    /// The object store implementation
    store: Arc<dyn ObjectStore>,
    /// Base path prefix within the bucket
    prefix: String,
    /// URL scheme for logging
    scheme: String,
    /// Bucket name, or the local root directory
    location: String,
}

impl CloudDestination {
    /// Google Cloud Storage bucket, credentials from the environment
    pub fn for_bucket(bucket: &str) -> Result<Self> {
        Self::parse(&format!("gs://{bucket}"))
    }

    /// Parse a destination URL and create the matching object store
    ///
    /// Supported formats:
    /// - `gs://bucket/path/` - Google Cloud Storage
    /// - `/local/path/`, `./path/` or `file:///path` - Local filesystem
    pub fn parse(url: &str) -> Result<Self> {
        if url.starts_with("gs://") {
            Self::parse_gcs(url)
        } else if url.contains("://") && !url.starts_with("file://") {
            Err(Error::config(format!(
                "Unsupported storage destination: {url}"
            )))
        } else {
            Self::parse_local(url)
        }
    }

    /// Wrap an existing store, e.g. `object_store::memory::InMemory`
    pub fn from_store(store: Arc<dyn ObjectStore>, scheme: &str, prefix: &str) -> Self {
        Self {
            store,
            prefix: prefix.trim_matches('/').to_string(),
            scheme: scheme.to_string(),
            location: String::new(),
        }
    }

    /// Parse GCS URL
    fn parse_gcs(url: &str) -> Result<Self> {
        let without_scheme = url
            .strip_prefix("gs://")
            .ok_or_else(|| Error::config(format!("Invalid GCS URL: {url}")))?;

        let (bucket, prefix) = match without_scheme.find('/') {
            Some(idx) => (
                &without_scheme[..idx],
                without_scheme[idx + 1..].trim_matches('/').to_string(),
            ),
            None => (without_scheme, String::new()),
        };

        if bucket.is_empty() {
            return Err(Error::config(format!("Missing bucket name in {url}")));
        }

        let store = GoogleCloudStorageBuilder::from_env()
            .with_bucket_name(bucket)
            .build()
            .map_err(|e| Error::config(format!("Failed to create GCS client: {e}")))?;

        Ok(Self {
            store: Arc::new(store),
            prefix,
            scheme: "gs".to_string(),
            location: bucket.to_string(),
        })
    }

    /// Parse local filesystem path
    fn parse_local(path: &str) -> Result<Self> {
        let path = path.strip_prefix("file://").unwrap_or(path);

        std::fs::create_dir_all(path)
            .map_err(|e| Error::config(format!("Failed to create directory {path}: {e}")))?;

        let store = LocalFileSystem::new_with_prefix(path)
            .map_err(|e| Error::config(format!("Failed to create local store: {e}")))?;

        Ok(Self {
            store: Arc::new(store),
            prefix: String::new(),
            scheme: "file".to_string(),
            location: path.to_string(),
        })
    }

    /// Check if this is a cloud destination (not local)
    pub fn is_cloud(&self) -> bool {
        self.scheme != "file"
    }

    /// Get the scheme (gs, file, ...)
    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    /// Bucket name or local root
    pub fn location(&self) -> &str {
        &self.location
    }

    /// Object path for `key` under this destination's prefix
    pub fn object_path(&self, key: &str) -> ObjectPath {
        if self.prefix.is_empty() {
            ObjectPath::from(key)
        } else {
            ObjectPath::from(format!("{}/{key}", self.prefix))
        }
    }

    /// Write bytes under `key`, returning the full path for logging
    pub async fn write(&self, key: &str, data: Bytes) -> Result<String> {
        let path = self.object_path(key);

        self.store
            .put(&path, data.into())
            .await
            .map_err(|e| Error::storage(format!("Failed to write {path}: {e}")))?;

        Ok(format!("{}://{}", self.scheme, self.display_path(&path)))
    }

    /// Upload a local file under `key`
    pub async fn upload_file(&self, key: &str, local_file: &Path) -> Result<String> {
        let data = tokio::fs::read(local_file).await?;
        self.write(key, Bytes::from(data)).await
    }

    fn display_path(&self, path: &ObjectPath) -> String {
        if self.location.is_empty() {
            path.to_string()
        } else {
            format!("{}/{path}", self.location.trim_end_matches('/'))
        }
    }
}
