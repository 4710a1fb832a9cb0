//! Storage backend selection from environment variables.

use std::path::PathBuf;

use crate::StorageError;

/// Default lifetime of presigned URLs.
pub const DEFAULT_PRESIGN_EXPIRY_SECS: u64 = 3600;

const DEFAULT_REGION: &str = "us-east-1";
const DEFAULT_UPLOAD_DIR: &str = "./uploads";

#[derive(Debug, Clone)]
pub struct S3Config {
    pub bucket: String,
    pub region: String,
    /// Custom endpoint for S3-compatible services (MinIO etc.). Enables
    /// path-style addressing.
    pub endpoint: Option<String>,
    pub access_key: Option<String>,
    pub secret_key: Option<String>,
}

#[derive(Debug, Clone)]
pub enum StorageConfig {
    S3(S3Config),
    Local { root: PathBuf },
}

impl StorageConfig {
    /// Read storage settings from the environment.
    ///
    /// | Env var         | Meaning                                      |
    /// |-----------------|----------------------------------------------|
    /// | `S3_BUCKET`     | selects the S3 backend when set              |
    /// | `S3_REGION`     | defaults to `us-east-1`                      |
    /// | `S3_ENDPOINT`   | custom endpoint URL                          |
    /// | `S3_ACCESS_KEY` | with `S3_SECRET_KEY`; default chain if unset |
    /// | `UPLOAD_DIR`    | local backend root, default `./uploads`      |
    pub fn from_env() -> Result<Self, StorageError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self, StorageError> {
        let non_empty = |name: &str| get(name).filter(|v| !v.trim().is_empty());

        let Some(bucket) = non_empty("S3_BUCKET") else {
            let root = non_empty("UPLOAD_DIR").unwrap_or_else(|| DEFAULT_UPLOAD_DIR.into());
            return Ok(StorageConfig::Local { root: root.into() });
        };

        let access_key = non_empty("S3_ACCESS_KEY");
        let secret_key = non_empty("S3_SECRET_KEY");
        if access_key.is_some() != secret_key.is_some() {
            return Err(StorageError::Config(
                "S3_ACCESS_KEY and S3_SECRET_KEY must be set together".into(),
            ));
        }

        Ok(StorageConfig::S3(S3Config {
            bucket,
            region: non_empty("S3_REGION").unwrap_or_else(|| DEFAULT_REGION.into()),
            endpoint: non_empty("S3_ENDPOINT"),
            access_key,
            secret_key,
        }))
    }
}
