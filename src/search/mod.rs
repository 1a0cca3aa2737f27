//! 搜索层：搜索服务抽象（SerpAPI / 静态 Mock）与结果记录
//!
//! run_search 是所有搜索调用的统一入口：调用 provider 并把结果原样写入日志，
//! 供直接使用（google_only 策略）或包装为 Agent 工具。

pub mod mock;
pub mod serpapi;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use mock::StaticSearchProvider;
pub use serpapi::SerpApiClient;

/// 搜索服务错误；原样上抛，不重试
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SearchError {
    #[error("search request failed: {0}")]
    Network(String),

    #[error("search provider rate limit exceeded")]
    RateLimited,

    #[error("search provider rejected API key: {0}")]
    InvalidKey(String),

    #[error("search provider error (HTTP {status}): {message}")]
    Provider { status: u16, message: String },

    #[error("malformed search response: {0}")]
    Malformed(String),
}

/// 单条自然搜索结果；字段形状由上游服务决定，未建模的字段保存在 extra
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrganicResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<u32>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub link: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snippet: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl OrganicResult {
    pub fn new(title: impl Into<String>, link: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            link: link.into(),
            ..Self::default()
        }
    }
}

/// 搜索服务 trait
#[async_trait]
pub trait SearchProvider: Send + Sync {
    async fn search(&self, query: &str) -> Result<Vec<OrganicResult>, SearchError>;
}

/// 执行搜索并记录原始结果
pub async fn run_search(
    provider: &dyn SearchProvider,
    query: &str,
) -> Result<Vec<OrganicResult>, SearchError> {
    let results = provider.search(query).await?;
    let raw = serde_json::to_string(&results).unwrap_or_else(|_| "[]".to_string());
    tracing::info!(query = %query, count = results.len(), results = %raw, "google search results");
    Ok(results)
}

/// 将结果渲染为编号列表，超过 max_chars 时截断并追加 ...[truncated]
pub fn format_results(results: &[OrganicResult], max_chars: usize) -> String {
    if results.is_empty() {
        return "No results found.".to_string();
    }
    let mut out = String::new();
    for (i, r) in results.iter().enumerate() {
        out.push_str(&format!("{}. {} - {}\n", i + 1, r.title, r.link));
        if let Some(snippet) = r.snippet.as_deref().filter(|s| !s.is_empty()) {
            out.push_str(&format!("   {}\n", snippet));
        }
    }
    if out.chars().count() > max_chars {
        out.chars().take(max_chars).collect::<String>() + "\n...[truncated]"
    } else {
        out
    }
}
