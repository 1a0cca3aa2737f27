//! 静态 Mock 搜索服务（用于测试，无需 API）

use std::sync::Mutex;

use async_trait::async_trait;

use crate::search::{OrganicResult, SearchError, SearchProvider};

/// 每次搜索返回同一结果（或同一错误），并记录查询词
#[derive(Debug)]
pub struct StaticSearchProvider {
    outcome: Result<Vec<OrganicResult>, SearchError>,
    queries: Mutex<Vec<String>>,
}

impl StaticSearchProvider {
    pub fn new(results: Vec<OrganicResult>) -> Self {
        Self {
            outcome: Ok(results),
            queries: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(err: SearchError) -> Self {
        Self {
            outcome: Err(err),
            queries: Mutex::new(Vec::new()),
        }
    }

    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap_or_else(|p| p.into_inner()).clone()
    }

    pub fn call_count(&self) -> usize {
        self.queries.lock().unwrap_or_else(|p| p.into_inner()).len()
    }
}

#[async_trait]
impl SearchProvider for StaticSearchProvider {
    async fn search(&self, query: &str) -> Result<Vec<OrganicResult>, SearchError> {
        self.queries
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .push(query.to_string());
        self.outcome.clone()
    }
}
