//! 搜索工具：把 SearchProvider 包装成 Agent 可调用的闭包工具
//!
//! 输入为查询文本；输出为编号的 title / link / snippet 列表，超过 max_result_chars 截断。

use std::sync::Arc;

use crate::search::{format_results, run_search, SearchProvider};
use crate::tools::ToolDescriptor;

pub fn search_tool(
    name: &str,
    description: &str,
    provider: Arc<dyn SearchProvider>,
    max_result_chars: usize,
) -> ToolDescriptor {
    ToolDescriptor::new(name, description, move |query: String| {
        let provider = provider.clone();
        async move {
            let query = query.trim();
            if query.is_empty() {
                return Err("Missing search query".to_string());
            }
            let results = run_search(provider.as_ref(), query)
                .await
                .map_err(|e| e.to_string())?;
            Ok(format_results(&results, max_result_chars))
        }
    })
}
