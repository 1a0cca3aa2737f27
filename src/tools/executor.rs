//! 工具执行器
//!
//! 持有 ToolRegistry 与单次调用超时，execute(tool_name, input) 在超时内调用 registry.execute，
//! 超时或失败时转为 AssistError（ToolTimeout / ToolInvocation）；每次调用输出结构化审计日志（JSON）。

use std::time::{Duration, Instant};

use tokio::time::timeout;

use crate::core::AssistError;
use crate::tools::ToolRegistry;

/// 工具执行器：对每次调用施加超时，并将结果映射为 AssistError
pub struct ToolExecutor {
    registry: ToolRegistry,
    timeout: Duration,
}

impl ToolExecutor {
    pub fn new(registry: ToolRegistry, timeout_secs: u64) -> Self {
        Self {
            registry,
            timeout: Duration::from_secs(timeout_secs),
        }
    }

    /// 执行指定工具；超时返回 ToolTimeout，工具返回 Err 则转为 ToolInvocation；输出 JSON 审计日志
    pub async fn execute(&self, tool_name: &str, input: &str) -> Result<String, AssistError> {
        let start = Instant::now();
        let result = timeout(self.timeout, self.registry.execute(tool_name, input)).await;

        let (ok, outcome): (bool, &str) = match &result {
            Ok(Ok(_)) => (true, "ok"),
            Ok(Err(_)) => (false, "error"),
            Err(_) => (false, "timeout"),
        };
        let duration_ms = start.elapsed().as_millis() as u64;
        let audit = serde_json::json!({
            "event": "tool_audit",
            "tool": tool_name,
            "ok": ok,
            "outcome": outcome,
            "duration_ms": duration_ms,
            "input_preview": input_preview(input),
        });
        tracing::info!(audit = %audit.to_string(), "tool");

        match result {
            Ok(Ok(content)) => Ok(content),
            Ok(Err(reason)) => Err(AssistError::ToolInvocation {
                tool: tool_name.to_string(),
                reason,
            }),
            Err(_) => Err(AssistError::ToolTimeout(tool_name.to_string())),
        }
    }

    pub fn has_tool(&self, name: &str) -> bool {
        self.registry.contains(name)
    }

    pub fn tool_names(&self) -> Vec<String> {
        self.registry.tool_names()
    }

    pub fn tool_descriptions(&self) -> Vec<(String, String)> {
        self.registry.tool_descriptions()
    }
}

fn input_preview(input: &str) -> String {
    if input.chars().count() > 200 {
        format!("{}...", input.chars().take(200).collect::<String>())
    } else {
        input.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::ToolDescriptor;
    use tracing_test::traced_test;

    fn executor(timeout_secs: u64) -> ToolExecutor {
        let mut registry = ToolRegistry::new();
        registry.register(ToolDescriptor::new("echo", "Echo input", |input: String| async move {
            Ok(input)
        }));
        registry.register(ToolDescriptor::new("broken", "Always fails", |_: String| async {
            Err::<String, String>("search rate limited".to_string())
        }));
        registry.register(ToolDescriptor::new("slow", "Never finishes in time", |_: String| async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok("late".to_string())
        }));
        ToolExecutor::new(registry, timeout_secs)
    }

    #[tokio::test]
    #[traced_test]
    async fn test_success_writes_audit_line() {
        let out = executor(5).execute("echo", "hello").await.unwrap();
        assert_eq!(out, "hello");
        assert!(logs_contain("tool_audit"));
        assert!(logs_contain("\"outcome\":\"ok\""));
    }

    #[tokio::test]
    async fn test_failure_maps_to_tool_invocation() {
        let err = executor(5).execute("broken", "x").await.unwrap_err();
        match err {
            AssistError::ToolInvocation { tool, reason } => {
                assert_eq!(tool, "broken");
                assert_eq!(reason, "search rate limited");
            }
            other => panic!("Expected ToolInvocation, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_timeout_maps_to_tool_timeout() {
        let err = executor(1).execute("slow", "x").await.unwrap_err();
        assert!(matches!(err, AssistError::ToolTimeout(name) if name == "slow"));
    }

    #[test]
    fn test_input_preview_truncates() {
        let long = "q".repeat(300);
        let preview = input_preview(&long);
        assert_eq!(preview.chars().count(), 203);
        assert!(preview.ends_with("..."));
    }
}
