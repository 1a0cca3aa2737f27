//! LLM 客户端抽象
//!
//! 所有后端（OpenAI 兼容 / 脚本化 Mock）实现 LlmClient::complete（非流式）。

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use crate::diagnosis::Prompt;
use crate::llm::Message;

/// LLM 调用错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LlmError {
    #[error("LLM request timed out after {0:?}")]
    Timeout(Duration),

    #[error("LLM API error: {0}")]
    Api(String),

    #[error("LLM returned an empty completion")]
    EmptyResponse,

    #[error("Invalid LLM request: {0}")]
    InvalidRequest(String),
}

/// LLM 客户端 trait
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// 非流式完成，返回首条回复文本
    async fn complete(&self, messages: &[Message]) -> Result<String, LlmError>;

    /// system + user 两条消息的单轮完成
    async fn complete_prompt(&self, prompt: &Prompt) -> Result<String, LlmError> {
        self.complete(&prompt.to_messages()).await
    }
}
