//! Blob storage for uploaded documents.
//!
//! [`ObjectStore`] is implemented by [`S3Store`] for S3-compatible services
//! and by [`LocalStore`] for a directory on disk. Keys are the generated
//! paths from `reelnotes_core::naming::generate_object_key`.

use std::sync::Arc;
use std::time::Duration;

pub mod config;
pub mod local;
pub mod s3;

pub use config::{S3Config, StorageConfig};
pub use local::LocalStore;
pub use s3::S3Store;

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Object not found: {0}")]
    NotFound(String),

    #[error("Invalid object key: {0}")]
    InvalidKey(String),

    #[error("Operation not supported by the {0} backend")]
    Unsupported(&'static str),

    #[error("Storage configuration error: {0}")]
    Config(String),

    #[error("Storage backend error: {0}")]
    Backend(String),

    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A fetched object.
#[derive(Debug, Clone)]
pub struct StoredObject {
    pub bytes: Vec<u8>,
    pub content_type: Option<String>,
}

#[async_trait::async_trait]
pub trait ObjectStore: Send + Sync {
    /// Short backend name for logs and health output.
    fn backend(&self) -> &'static str;

    async fn put(&self, key: &str, bytes: Vec<u8>, content_type: &str) -> Result<(), StorageError>;

    async fn get(&self, key: &str) -> Result<StoredObject, StorageError>;

    /// Remove an object. Missing objects are not an error.
    async fn delete(&self, key: &str) -> Result<(), StorageError>;

    /// Time-limited download URL.
    async fn presign(&self, key: &str, expires_in: Duration) -> Result<String, StorageError>;

    /// Make sure the backing bucket or directory exists.
    async fn ensure_ready(&self) -> Result<(), StorageError>;
}

/// Build the store selected by `config` and make sure it is usable.
pub async fn connect(config: &StorageConfig) -> Result<Arc<dyn ObjectStore>, StorageError> {
    let store: Arc<dyn ObjectStore> = match config {
        StorageConfig::S3(s3) => Arc::new(S3Store::connect(s3).await),
        StorageConfig::Local { root } => Arc::new(LocalStore::new(root.clone())),
    };
    store.ensure_ready().await?;
    tracing::info!(backend = store.backend(), "Object storage ready");
    Ok(store)
}
