//! 脚本化 Mock LLM 客户端（用于测试，无需 API）
//!
//! 按顺序返回预设的回复或错误，并记录每次收到的消息，便于断言 ReAct 流程与调用次数。

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::llm::{LlmClient, LlmError, Message};

#[derive(Debug, Default)]
pub struct ScriptedLlmClient {
    script: Mutex<VecDeque<Result<String, LlmError>>>,
    requests: Mutex<Vec<Vec<Message>>>,
}

impl ScriptedLlmClient {
    pub fn new(script: impl IntoIterator<Item = Result<String, LlmError>>) -> Self {
        Self {
            script: Mutex::new(script.into_iter().collect()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// 只回复一段文本
    pub fn replying(text: impl Into<String>) -> Self {
        Self::new([Ok(text.into())])
    }

    /// 每次调用收到的完整消息列表
    pub fn requests(&self) -> Vec<Vec<Message>> {
        self.requests
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .clone()
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap_or_else(|p| p.into_inner()).len()
    }
}

#[async_trait]
impl LlmClient for ScriptedLlmClient {
    async fn complete(&self, messages: &[Message]) -> Result<String, LlmError> {
        self.requests
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .push(messages.to_vec());
        self.script
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .pop_front()
            .unwrap_or_else(|| Err(LlmError::Api("script exhausted".to_string())))
    }
}
