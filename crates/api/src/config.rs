use reelnotes_catalog::DEFAULT_API_URL;
use reelnotes_storage::config::DEFAULT_PRESIGN_EXPIRY_SECS;
use reelnotes_storage::StorageConfig;

use crate::auth::jwt::JwtConfig;

/// Default upload size limit: 16 MiB.
const DEFAULT_MAX_UPLOAD_BYTES: usize = 16 * 1024 * 1024;

/// Server configuration loaded from environment variables.
///
/// All fields have defaults suitable for local development except
/// `JWT_SECRET`, which is required.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS`.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Body size limit for multipart upload routes.
    pub max_upload_bytes: usize,
    /// Public site URL used in the sitemap and robots.txt.
    pub site_url: String,
    /// JWT token configuration (secret, expiry).
    pub jwt: JwtConfig,
    /// Object storage backend selection.
    pub storage: StorageConfig,
    /// Lifetime of presigned document URLs in seconds.
    pub presign_expiry_secs: u64,
    /// Movie catalog base URL.
    pub catalog_api_url: String,
    /// Movie catalog API key. The catalog proxy answers 503 without it.
    pub catalog_api_key: Option<String>,
    /// Admin account ensured at startup, if configured.
    pub bootstrap_admin: Option<BootstrapAdmin>,
}

/// Credentials for the admin account created or promoted at startup.
#[derive(Clone)]
pub struct BootstrapAdmin {
    pub username: String,
    pub password: String,
    pub email: String,
}

impl std::fmt::Debug for BootstrapAdmin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BootstrapAdmin")
            .field("username", &self.username)
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                    | Default                       |
    /// |----------------------------|-------------------------------|
    /// | `HOST`                     | `0.0.0.0`                     |
    /// | `PORT`                     | `3000`                        |
    /// | `CORS_ORIGINS`             | `http://localhost:5173`       |
    /// | `REQUEST_TIMEOUT_SECS`     | `30`                          |
    /// | `MAX_UPLOAD_BYTES`         | `16777216`                    |
    /// | `SITE_URL`                 | `http://localhost:5173`       |
    /// | `S3_PRESIGN_EXPIRY_SECS`   | `3600`                        |
    /// | `MOVIE_API_URL`            | `https://api.themoviedb.org/3`|
    /// | `MOVIE_API_KEY`            | unset                         |
    /// | `BOOTSTRAP_ADMIN_USERNAME` | unset                         |
    /// | `BOOTSTRAP_ADMIN_PASSWORD` | unset                         |
    /// | `BOOTSTRAP_ADMIN_EMAIL`    | `{username}@localhost`        |
    ///
    /// Storage variables are documented on [`StorageConfig::from_env`].
    ///
    /// # Panics
    ///
    /// Panics on malformed numbers, invalid storage settings, or a bootstrap
    /// username without a password.
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let max_upload_bytes: usize = std::env::var("MAX_UPLOAD_BYTES")
            .unwrap_or_else(|_| DEFAULT_MAX_UPLOAD_BYTES.to_string())
            .parse()
            .expect("MAX_UPLOAD_BYTES must be a valid usize");

        let site_url = std::env::var("SITE_URL")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .trim_end_matches('/')
            .to_string();

        let presign_expiry_secs: u64 = std::env::var("S3_PRESIGN_EXPIRY_SECS")
            .unwrap_or_else(|_| DEFAULT_PRESIGN_EXPIRY_SECS.to_string())
            .parse()
            .expect("S3_PRESIGN_EXPIRY_SECS must be a valid u64");

        let storage = StorageConfig::from_env().expect("Invalid storage configuration");

        let catalog_api_url =
            std::env::var("MOVIE_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.into());
        let catalog_api_key = non_empty_var("MOVIE_API_KEY");

        let bootstrap_admin = non_empty_var("BOOTSTRAP_ADMIN_USERNAME").map(|username| {
            let password = non_empty_var("BOOTSTRAP_ADMIN_PASSWORD")
                .expect("BOOTSTRAP_ADMIN_PASSWORD must be set with BOOTSTRAP_ADMIN_USERNAME");
            let email = non_empty_var("BOOTSTRAP_ADMIN_EMAIL")
                .unwrap_or_else(|| format!("{username}@localhost"));
            BootstrapAdmin {
                username,
                password,
                email,
            }
        });

        let jwt = JwtConfig::from_env();

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            max_upload_bytes,
            site_url,
            jwt,
            storage,
            presign_expiry_secs,
            catalog_api_url,
            catalog_api_key,
            bootstrap_admin,
        }
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}
