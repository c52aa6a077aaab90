//! Web search via Serper (Google Search), behind the `SearchClient` trait.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

const SERPER_API_URL: &str = "https://google.serper.dev/search";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("search API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("failed to decode search response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("search returned no results for '{query}'")]
    NoResults { query: String },
}

/// One ranked search hit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub title: String,
    pub url: String,
    pub snippet: String,
}

#[async_trait]
pub trait SearchClient: Send + Sync {
    /// Runs a single query and returns results in rank order.
    async fn search(&self, query: &str) -> Result<Vec<SearchResult>, SearchError>;
}

#[derive(Debug, Deserialize)]
struct SerperResponse {
    #[serde(default)]
    organic: Vec<SerperResult>,
}

#[derive(Debug, Deserialize)]
struct SerperResult {
    #[serde(default)]
    link: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    snippet: String,
}

pub struct SerperClient {
    api_key: String,
    endpoint: String,
    limit: u32,
    client: Client,
}

impl SerperClient {
    pub fn new(api_key: &str, limit: u32) -> Result<Self, SearchError> {
        Self::with_endpoint(api_key, limit, SERPER_API_URL)
    }

    pub fn with_endpoint(api_key: &str, limit: u32, endpoint: &str) -> Result<Self, SearchError> {
        Ok(Self {
            api_key: api_key.to_string(),
            endpoint: endpoint.to_string(),
            limit,
            client: Client::builder().timeout(REQUEST_TIMEOUT).build()?,
        })
    }
}

#[async_trait]
impl SearchClient for SerperClient {
    async fn search(&self, query: &str) -> Result<Vec<SearchResult>, SearchError> {
        info!(query, limit = self.limit, "Serper search");

        let body = serde_json::json!({
            "q": query,
            "num": self.limit,
        });

        let resp = self
            .client
            .post(&self.endpoint)
            .header("X-API-KEY", &self.api_key)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        let text = resp.text().await?;

        if !status.is_success() {
            return Err(SearchError::Api {
                status: status.as_u16(),
                message: text,
            });
        }

        let data: SerperResponse = serde_json::from_str(&text)?;

        let results: Vec<SearchResult> = data
            .organic
            .into_iter()
            .filter(|r| !r.link.trim().is_empty())
            .map(|r| SearchResult {
                url: r.link,
                title: r.title,
                snippet: r.snippet,
            })
            .collect();

        info!(query, count = results.len(), "Serper search complete");
        Ok(results)
    }
}
