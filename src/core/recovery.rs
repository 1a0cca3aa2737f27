//! 错误恢复引擎
//!
//! 根据 AssistError 类型返回 RecoveryAction，供 ReAct 循环决定是注入纠正提示重试还是终止。

use crate::core::{AssistError, RecoveryAction};

/// 语义化错误恢复：格式错误与幻觉工具可纠正，其余一律终止
#[derive(Debug, Default)]
pub struct RecoveryEngine;

impl RecoveryEngine {
    pub fn new() -> Self {
        Self
    }

    /// tool_names 用于在幻觉工具时提示模型可用的工具
    pub fn handle(&self, err: &AssistError, tool_names: &[String]) -> RecoveryAction {
        match err {
            AssistError::MalformedOutput(raw) => RecoveryAction::RetryWithPrompt(format!(
                "Your previous reply could not be parsed as a tool call: {raw}. \
                To call a tool, reply with exactly one JSON object of the form \
                {{\"tool\": \"<tool name>\", \"input\": \"<text>\"}} and nothing else. \
                To finish, reply with plain text starting with \"Final Answer:\"."
            )),
            AssistError::HallucinatedTool(name) => RecoveryAction::RetryWithPrompt(format!(
                "'{name}' is not a valid tool. Available tools: {}. \
                Call one of them or give your Final Answer.",
                tool_names.join(", ")
            )),
            _ => RecoveryAction::Abort,
        }
    }
}
