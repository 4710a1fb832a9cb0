//! Shared query parameter types for API handlers.

use serde::Deserialize;

/// Generic pagination parameters (`?limit=&offset=`).
///
/// Values are clamped in the repository layer via `clamp_limit` /
/// `clamp_offset`.
#[derive(Debug, Default, Deserialize)]
pub struct PaginationParams {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// `?search=&page=` as accepted by the catalog proxy.
#[derive(Debug, Default, Deserialize)]
pub struct SearchPageParams {
    pub search: Option<String>,
    pub page: Option<u32>,
}
