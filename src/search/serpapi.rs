//! SerpAPI 客户端
//!
//! GET `{base_url}/search.json?engine=<engine>&q=<query>&api_key=<key>&num=<n>`，返回 organic_results。
//! 429 → RateLimited；401/403 → InvalidKey；其它非 2xx → Provider；不重试。
//! 200 且 `error` 字段表示「无结果」时视为空列表。

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::config::SearchSection;
use crate::search::{OrganicResult, SearchError, SearchProvider};

/// SerpAPI 在查询无结果时仍返回 200，并在 error 中给出此类说明
const NO_RESULTS_MARKER: &str = "hasn't returned any results";

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    organic_results: Vec<OrganicResult>,
    #[serde(default)]
    error: Option<String>,
}

pub struct SerpApiClient {
    client: Client,
    base_url: String,
    engine: String,
    num_results: u32,
    api_key: String,
}

impl SerpApiClient {
    pub fn new(section: &SearchSection, api_key: &str) -> Result<Self, SearchError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(section.timeout_secs))
            .build()
            .map_err(|e| SearchError::Network(format!("build http client: {}", e)))?;
        Ok(Self {
            client,
            base_url: section.base_url.trim_end_matches('/').to_string(),
            engine: section.engine.clone(),
            num_results: section.num_results,
            api_key: api_key.to_string(),
        })
    }

    pub fn engine(&self) -> &str {
        &self.engine
    }
}

#[async_trait]
impl SearchProvider for SerpApiClient {
    async fn search(&self, query: &str) -> Result<Vec<OrganicResult>, SearchError> {
        let url = format!("{}/search.json", self.base_url);
        tracing::debug!(engine = %self.engine, query = %query, "serpapi search");

        let num = self.num_results.to_string();
        let resp = self
            .client
            .get(&url)
            .query(&[
                ("engine", self.engine.as_str()),
                ("q", query),
                ("num", num.as_str()),
                ("api_key", self.api_key.as_str()),
            ])
            .send()
            .await
            .map_err(|e| SearchError::Network(e.to_string()))?;

        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|e| SearchError::Network(format!("read body: {}", e)))?;

        if !status.is_success() {
            let message = serde_json::from_str::<SearchResponse>(&body)
                .ok()
                .and_then(|r| r.error)
                .unwrap_or(body);
            return Err(match status.as_u16() {
                429 => SearchError::RateLimited,
                401 | 403 => SearchError::InvalidKey(message),
                code => SearchError::Provider {
                    status: code,
                    message,
                },
            });
        }

        let parsed: SearchResponse =
            serde_json::from_str(&body).map_err(|e| SearchError::Malformed(e.to_string()))?;

        match parsed.error {
            Some(err) if err.contains(NO_RESULTS_MARKER) => Ok(Vec::new()),
            Some(err) => Err(SearchError::Provider {
                status: status.as_u16(),
                message: err,
            }),
            None => Ok(parsed.organic_results),
        }
    }
}
