//! Client for an external movie catalog (TMDB-compatible REST API).
//!
//! Responses are passed through as raw JSON; the frontend consumes the
//! catalog's own shape.

pub mod api;

pub use api::{CatalogClient, CatalogError, DEFAULT_API_URL};
