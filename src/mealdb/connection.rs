use reqwest::Client;
use thiserror::Error;
use tracing::debug;

use super::endpoints::{MealSearchResponse, DEFAULT_BASE_URL, SEARCH_PATH};

#[derive(Debug, Error)]
pub enum MealDbError {
    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
    #[error("API error {status}: {error_body}")]
    ApiError {
        status: reqwest::StatusCode,
        error_body: String,
    },
}

/// Thin client over the public recipe search endpoint.
#[derive(Debug, Clone)]
pub struct MealDbClient {
    http: Client,
    base_url: String,
}

impl Default for MealDbClient {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

impl MealDbClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `GET {base}/search.php?s={query}`. An empty query lists whatever the service returns by default.
    pub async fn search(&self, query: &str) -> Result<MealSearchResponse, MealDbError> {
        let url = format!("{}/{}", self.base_url, SEARCH_PATH);
        debug!(%url, query, "searching remote recipes");

        let response = self
            .http
            .get(&url)
            .query(&[("s", query)])
            .send()
            .await?;

        if response.status().is_success() {
            let body = response.text().await?;
            let parsed = serde_json::from_str::<MealSearchResponse>(&body)?;
            Ok(parsed)
        } else {
            let status = response.status();
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read error body".to_string());
            Err(MealDbError::ApiError { status, error_body })
        }
    }
}
