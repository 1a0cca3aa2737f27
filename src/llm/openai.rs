//! OpenAI 兼容 API 客户端
//!
//! 通过 async_openai 调用 chat completion；temperature 固定为 0，模型与可选 base_url 来自 [llm] 配置，
//! API Key 在构造时传入（由 Credentials 启动时读取）。每次回复写入日志。

use std::time::Duration;

use async_openai::config::OpenAIConfig;
use async_openai::types::chat::{
    ChatCompletionRequestAssistantMessageArgs, ChatCompletionRequestMessage,
    ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
    CreateChatCompletionRequestArgs,
};
use async_openai::Client;
use async_trait::async_trait;

use crate::config::LlmSection;
use crate::llm::{LlmClient, LlmError, Message, Role};

/// 确定性采样
pub const TEMPERATURE: f32 = 0.0;

/// OpenAI 兼容客户端：持有 Client、model 名与单次请求超时
pub struct OpenAiClient {
    client: Client<OpenAIConfig>,
    model: String,
    request_timeout: Duration,
}

impl OpenAiClient {
    pub fn new(section: &LlmSection, api_key: &str) -> Self {
        let mut config = OpenAIConfig::new().with_api_key(api_key);
        if let Some(url) = section.base_url.as_deref() {
            config = config.with_api_base(url);
        }

        Self {
            client: Client::with_config(config),
            model: section.model.clone(),
            request_timeout: Duration::from_secs(section.request_timeout_secs),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn to_openai_messages(
        &self,
        messages: &[Message],
    ) -> Result<Vec<ChatCompletionRequestMessage>, LlmError> {
        let invalid = |e: async_openai::error::OpenAIError| LlmError::InvalidRequest(e.to_string());
        messages
            .iter()
            .map(|m| {
                Ok(match m.role {
                    Role::System => ChatCompletionRequestMessage::System(
                        ChatCompletionRequestSystemMessageArgs::default()
                            .content(m.content.clone())
                            .build()
                            .map_err(invalid)?,
                    ),
                    Role::User => ChatCompletionRequestMessage::User(
                        ChatCompletionRequestUserMessageArgs::default()
                            .content(m.content.clone())
                            .build()
                            .map_err(invalid)?,
                    ),
                    Role::Assistant => ChatCompletionRequestMessage::Assistant(
                        ChatCompletionRequestAssistantMessageArgs::default()
                            .content(m.content.clone())
                            .build()
                            .map_err(invalid)?,
                    ),
                })
            })
            .collect()
    }
}

#[async_trait]
impl LlmClient for OpenAiClient {
    async fn complete(&self, messages: &[Message]) -> Result<String, LlmError> {
        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .temperature(TEMPERATURE)
            .messages(self.to_openai_messages(messages)?)
            .build()
            .map_err(|e| LlmError::InvalidRequest(e.to_string()))?;

        let response = tokio::time::timeout(self.request_timeout, self.client.chat().create(request))
            .await
            .map_err(|_| LlmError::Timeout(self.request_timeout))?
            .map_err(|e| LlmError::Api(e.to_string()))?;

        if let Some(usage) = &response.usage {
            tracing::debug!(
                prompt_tokens = usage.prompt_tokens,
                completion_tokens = usage.completion_tokens,
                "chat gpt token usage"
            );
        }

        let content = response
            .choices
            .first()
            .and_then(|c| c.message.content.clone())
            .unwrap_or_default();

        if content.trim().is_empty() {
            return Err(LlmError::EmptyResponse);
        }

        tracing::info!(model = %self.model, answer = %content, "chat gpt answer");
        Ok(content)
    }
}
