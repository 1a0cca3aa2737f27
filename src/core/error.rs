//! 诊断错误类型与恢复动作
//!
//! 与 RecoveryEngine 配合：Agent 循环内可纠正的错误（格式错误、幻觉工具）转为 RetryWithPrompt，其余终止并交给 FailureGuard。

use std::time::Duration;

use thiserror::Error;

use crate::llm::LlmError;
use crate::search::SearchError;

/// 诊断过程中可能出现的错误（配置、工具、Agent、LLM、搜索、超时）
#[derive(Error, Debug)]
pub enum AssistError {
    #[error("{0} not defined in environment")]
    MissingCredential(&'static str),

    #[error("Unknown assistance strategy: {0}")]
    UnknownStrategy(String),

    #[error("Tool '{tool}' failed: {reason}")]
    ToolInvocation { tool: String, reason: String },

    #[error("Tool timeout: {0}")]
    ToolTimeout(String),

    #[error("Agent execution failed: {0}")]
    AgentExecution(String),

    #[error("Malformed agent output: {0}")]
    MalformedOutput(String),

    #[error("Hallucinated tool: {0}")]
    HallucinatedTool(String),

    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),

    #[error("Search error: {0}")]
    Search(#[from] SearchError),

    #[error("Deadline exceeded after {0:?}")]
    DeadlineExceeded(Duration),

    #[error("Config error: {0}")]
    Config(String),
}

impl AssistError {
    /// 运行期可预期的失败（网络、服务商、解析、超时、Agent 不收敛）。
    /// 配置类错误不在此列：到达 FailureGuard 时按 error 级别记录。
    pub fn is_expected(&self) -> bool {
        matches!(
            self,
            AssistError::ToolInvocation { .. }
                | AssistError::ToolTimeout(_)
                | AssistError::AgentExecution(_)
                | AssistError::MalformedOutput(_)
                | AssistError::HallucinatedTool(_)
                | AssistError::Llm(_)
                | AssistError::Search(_)
                | AssistError::DeadlineExceeded(_)
        )
    }
}

/// 恢复引擎根据错误类型给出的建议动作
#[derive(Debug, Clone)]
pub enum RecoveryAction {
    /// 将纠正提示注入下一轮，让 LLM 重试
    RetryWithPrompt(String),
    /// 终止当前 Agent 循环
    Abort,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expected_kinds() {
        assert!(AssistError::ToolTimeout("custom-search".into()).is_expected());
        assert!(AssistError::Llm(LlmError::EmptyResponse).is_expected());
        assert!(AssistError::Search(SearchError::RateLimited).is_expected());
        assert!(AssistError::DeadlineExceeded(Duration::from_secs(1)).is_expected());
    }

    #[test]
    fn test_configuration_kinds_are_unexpected() {
        assert!(!AssistError::MissingCredential("OPENAI_API_KEY").is_expected());
        assert!(!AssistError::UnknownStrategy("nope".into()).is_expected());
        assert!(!AssistError::Config("bad template".into()).is_expected());
    }

    #[test]
    fn test_display_includes_cause() {
        let err = AssistError::ToolInvocation {
            tool: "custom-search".into(),
            reason: "search rate limited".into(),
        };
        assert_eq!(
            err.to_string(),
            "Tool 'custom-search' failed: search rate limited"
        );
    }
}
