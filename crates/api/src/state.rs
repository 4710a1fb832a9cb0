use std::sync::Arc;

use reelnotes_catalog::CatalogClient;
use reelnotes_storage::ObjectStore;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable: inner data is behind `Arc` or is already `Clone`.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: reelnotes_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Blob store for uploaded documents.
    pub store: Arc<dyn ObjectStore>,
    /// Movie catalog client; `None` when no API key is configured.
    pub catalog: Option<CatalogClient>,
}
