//! REST API client for the movie catalog endpoints.
//!
//! Wraps search, popular and discover using [`reqwest`].

use serde_json::Value;

/// Public TMDB v3 endpoint.
pub const DEFAULT_API_URL: &str = "https://api.themoviedb.org/3";

const LANGUAGE: &str = "en-US";

/// HTTP client for the catalog.
#[derive(Clone)]
pub struct CatalogClient {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
}

/// Errors from the catalog REST API layer.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// The HTTP request itself failed (network, DNS, TLS, etc.).
    ///
    /// The request URL is stripped because it carries the API key.
    #[error("HTTP request failed: {0}")]
    Request(reqwest::Error),

    /// The catalog returned a non-2xx status code.
    #[error("Failed to fetch movies. Status {status}: {body}")]
    ApiError {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },
}

impl CatalogClient {
    /// Create a client.
    ///
    /// * `api_url` - Base URL without trailing slash, e.g. [`DEFAULT_API_URL`].
    pub fn new(api_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_url: api_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        }
    }

    /// Full URL for a catalog path such as `/search/movie`.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.api_url, path)
    }

    /// Free-text movie search.
    pub async fn search_movies(&self, query: &str, page: u32) -> Result<Value, CatalogError> {
        self.get(
            "/search/movie",
            &[
                ("query", query.to_string()),
                ("language", LANGUAGE.to_string()),
                ("page", page.to_string()),
            ],
        )
        .await
    }

    /// Currently popular movies.
    pub async fn popular(&self, page: u32) -> Result<Value, CatalogError> {
        self.get(
            "/movie/popular",
            &[("language", LANGUAGE.to_string()), ("page", page.to_string())],
        )
        .await
    }

    /// Discover movies, optionally restricted to a genre.
    ///
    /// The catalog cannot combine free text with discover filters, so a
    /// search term runs a search and the genre filter is applied locally.
    pub async fn discover(
        &self,
        genre_id: Option<i64>,
        search: Option<&str>,
        page: u32,
    ) -> Result<Value, CatalogError> {
        match (search.map(str::trim).filter(|s| !s.is_empty()), genre_id) {
            (Some(query), Some(genre)) => {
                let results = self.search_movies(query, page).await?;
                Ok(filter_by_genre(results, genre))
            }
            (Some(query), None) => self.search_movies(query, page).await,
            (None, genre) => {
                let mut params = vec![
                    ("language", LANGUAGE.to_string()),
                    ("sort_by", "popularity.desc".to_string()),
                    ("page", page.to_string()),
                ];
                if let Some(genre) = genre {
                    params.push(("with_genres", genre.to_string()));
                }
                self.get("/discover/movie", &params).await
            }
        }
    }

    // ---- private helpers ----

    async fn get(&self, path: &str, params: &[(&str, String)]) -> Result<Value, CatalogError> {
        let url = self.endpoint(path);
        tracing::debug!(%url, "Catalog request");

        let response = self
            .client
            .get(&url)
            .query(&[("api_key", self.api_key.as_str())])
            .query(params)
            .send()
            .await
            .map_err(request_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            tracing::warn!(%url, status = status.as_u16(), "Catalog request failed");
            return Err(CatalogError::ApiError {
                status: status.as_u16(),
                body,
            });
        }
        response.json::<Value>().await.map_err(request_error)
    }
}

fn request_error(err: reqwest::Error) -> CatalogError {
    CatalogError::Request(err.without_url())
}

/// Keep only `results` entries whose `genre_ids` contain `genre_id`.
pub fn filter_by_genre(mut value: Value, genre_id: i64) -> Value {
    if let Some(results) = value.get_mut("results").and_then(Value::as_array_mut) {
        results.retain(|movie| {
            movie
                .get("genre_ids")
                .and_then(Value::as_array)
                .is_some_and(|ids| ids.iter().any(|id| id.as_i64() == Some(genre_id)))
        });
    }
    value
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn endpoint_joins_without_double_slash() {
        let client = CatalogClient::new("https://catalog.example/3/", "key");
        assert_eq!(
            client.endpoint("/search/movie"),
            "https://catalog.example/3/search/movie"
        );
    }

    #[test]
    fn genre_filter_keeps_matching_results() {
        let value = json!({
            "page": 1,
            "results": [
                {"id": 1, "genre_ids": [18, 80]},
                {"id": 2, "genre_ids": [35]},
                {"id": 3}
            ]
        });
        let filtered = filter_by_genre(value, 80);
        let ids: Vec<i64> = filtered["results"]
            .as_array()
            .unwrap()
            .iter()
            .map(|m| m["id"].as_i64().unwrap())
            .collect();
        assert_eq!(ids, vec![1]);
        assert_eq!(filtered["page"], 1);
    }

    #[tokio::test]
    async fn request_errors_do_not_expose_the_api_key() {
        // Nothing listens on the discard port.
        let client = CatalogClient::new("http://127.0.0.1:9", "SECRET-CATALOG-KEY");

        let err = client.popular(1).await.unwrap_err();

        assert!(matches!(err, CatalogError::Request(_)));
        assert!(!err.to_string().contains("SECRET-CATALOG-KEY"));
        assert!(!format!("{err:?}").contains("SECRET-CATALOG-KEY"));
    }

    #[test]
    fn genre_filter_ignores_unexpected_shapes() {
        let value = json!({"status_message": "nope"});
        assert_eq!(filter_by_genre(value.clone(), 80), value);
    }
}
