//! Knowledge lookup tool backed by the Wikipedia (MediaWiki) Action API.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use super::Tool;

const API_URL: &str = "https://en.wikipedia.org/w/api.php";
const MAX_EXTRACT_CHARS: usize = 4000;

#[derive(Debug, Error)]
pub enum LookupError {
    #[error("No Wikipedia results for: {0}")]
    NoResults(String),

    #[error("Wikipedia request failed: {0}")]
    Request(String),

    #[error("Unexpected Wikipedia response shape")]
    BadResponse,
}

/// Searches Wikipedia and returns the lead extract of the best match.
pub struct KnowledgeLookup {
    http: reqwest::Client,
    api_url: String,
}

impl KnowledgeLookup {
    pub fn new() -> Self {
        Self::with_api_url(API_URL.to_string())
    }

    /// Point the tool at a different MediaWiki endpoint (tests).
    pub fn with_api_url(api_url: String) -> Self {
        let http = reqwest::Client::builder()
            .user_agent("math-assistant/0.3 (tool: wikipedia)")
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self { http, api_url }
    }

    async fn get_json(&self, query: &str) -> Result<Value, LookupError> {
        let url = format!("{}?{}", self.api_url, query);
        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| LookupError::Request(e.to_string()))?;

        if !response.status().is_success() {
            return Err(LookupError::Request(format!(
                "HTTP {}",
                response.status()
            )));
        }

        response
            .json()
            .await
            .map_err(|e| LookupError::Request(e.to_string()))
    }

    /// Find the title of the best search match for `query`.
    async fn search_title(&self, query: &str) -> Result<String, LookupError> {
        let body = self
            .get_json(&format!(
                "action=query&list=search&srlimit=1&format=json&srsearch={}",
                urlencoding::encode(query)
            ))
            .await?;

        body["query"]["search"]
            .as_array()
            .and_then(|hits| hits.first())
            .and_then(|hit| hit["title"].as_str())
            .map(|title| title.to_string())
            .ok_or_else(|| LookupError::NoResults(query.to_string()))
    }

    /// Fetch the plain-text lead section of an article.
    async fn fetch_extract(&self, title: &str) -> Result<String, LookupError> {
        let body = self
            .get_json(&format!(
                "action=query&prop=extracts&exintro=1&explaintext=1&format=json&titles={}",
                urlencoding::encode(title)
            ))
            .await?;

        let pages = body["query"]["pages"]
            .as_object()
            .ok_or(LookupError::BadResponse)?;

        pages
            .values()
            .filter_map(|page| page["extract"].as_str())
            .find(|extract| !extract.trim().is_empty())
            .map(|extract| extract.to_string())
            .ok_or(LookupError::BadResponse)
    }

    pub async fn lookup(&self, query: &str) -> Result<String, LookupError> {
        let title = self.search_title(query).await?;
        let extract = self.fetch_extract(&title).await?;
        Ok(format!("{}\n\n{}", title, truncate(&extract, MAX_EXTRACT_CHARS)))
    }
}

impl Default for KnowledgeLookup {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Tool for KnowledgeLookup {
    fn name(&self) -> &str {
        "wikipedia"
    }

    fn description(&self) -> &str {
        "Searches Wikipedia for information on a topic. Input is a free-text search query; returns a summary of the best-matching article."
    }

    async fn invoke(&self, input: &str) -> anyhow::Result<String> {
        Ok(self.lookup(input.trim()).await?)
    }
}

/// Truncate at a char boundary, marking the cut.
fn truncate(s: &str, max: usize) -> String {
    if s.len() <= max {
        return s.to_string();
    }
    let mut idx = max;
    while idx > 0 && !s.is_char_boundary(idx) {
        idx -= 1;
    }
    format!("{}... [truncated]", &s[..idx])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_respects_char_boundaries() {
        let s = "ααααα"; // two bytes per char
        let cut = truncate(s, 5);
        assert!(cut.starts_with("αα"));
        assert!(cut.ends_with("[truncated]"));
    }

    #[test]
    fn truncate_is_identity_for_short_strings() {
        assert_eq!(truncate("short", 100), "short");
    }
}
