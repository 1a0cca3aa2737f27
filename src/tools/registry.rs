//! 工具注册表
//!
//! 所有工具实现 Tool trait（name / description / execute），由 ToolRegistry 按名注册与查找，
//! ToolExecutor 在调用时加超时并统一转 AssistError。

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;

/// 工具 trait：名称、描述（供 LLM 理解）、异步执行（输入为一段文本）
#[async_trait]
pub trait Tool: Send + Sync {
    /// 工具名称（用于 JSON 中的 "tool" 字段）
    fn name(&self) -> &str;

    /// 工具描述（供 LLM 理解功能）
    fn description(&self) -> &str;

    async fn execute(&self, input: &str) -> Result<String, String>;
}

/// 工具注册表：按名称存储 Arc<dyn Tool>
#[derive(Default)]
pub struct ToolRegistry {
    tools: HashMap<String, Arc<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, tool: impl Tool + 'static) {
        let name = tool.name().to_string();
        self.tools.insert(name, Arc::new(tool));
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    pub async fn execute(&self, name: &str, input: &str) -> Result<String, String> {
        let tool = self.tools.get(name).ok_or_else(|| format!("Unknown tool: {name}"))?;
        tool.execute(input).await
    }

    /// 按名字排序，保证 prompt 稳定
    pub fn tool_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.tools.keys().cloned().collect();
        names.sort();
        names
    }

    /// 返回 (name, description) 列表，用于生成 prompt 中的 Available tools 段落
    pub fn tool_descriptions(&self) -> Vec<(String, String)> {
        self.tool_names()
            .into_iter()
            .filter_map(|name| {
                let description = self.tools.get(&name)?.description().to_string();
                Some((name, description))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::ToolDescriptor;

    fn upper() -> ToolDescriptor {
        ToolDescriptor::new("upper", "Uppercase the input", |input: String| async move {
            Ok(input.to_uppercase())
        })
    }

    #[tokio::test]
    async fn test_register_and_execute() {
        let mut registry = ToolRegistry::new();
        registry.register(upper());
        assert!(registry.contains("upper"));
        assert_eq!(registry.execute("upper", "abc").await.unwrap(), "ABC");
    }

    #[tokio::test]
    async fn test_unknown_tool() {
        let registry = ToolRegistry::new();
        let err = registry.execute("missing", "x").await.unwrap_err();
        assert_eq!(err, "Unknown tool: missing");
    }

    #[test]
    fn test_descriptions_sorted_by_name() {
        let mut registry = ToolRegistry::new();
        registry.register(ToolDescriptor::new("zeta", "z", |_: String| async {
            Ok(String::new())
        }));
        registry.register(upper());
        assert_eq!(registry.tool_names(), vec!["upper", "zeta"]);
        assert_eq!(
            registry.tool_descriptions()[0],
            ("upper".to_string(), "Uppercase the input".to_string())
        );
    }
}
