//! 诊断策略与选择器
//!
//! 策略名沿用对外的方法名（如 `ai_assistance_chatgpt_only`）。
//! StrategySelector 是按请求传递的值：configure 只保存名字（后写覆盖，不校验），
//! 直到 dispatch 才查找已注册策略，未知名字返回 UnknownStrategy。

use std::fmt;
use std::str::FromStr;

use crate::core::AssistError;

/// 已注册的诊断策略
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssistanceStrategy {
    /// 单次 LLM 调用
    ChatGptOnly,
    /// LLM + 搜索工具的 ReAct Agent
    ChatGptPlusSearch,
    /// 仅搜索，直接返回搜索结果
    SearchOnly,
}

impl AssistanceStrategy {
    pub const ALL: [AssistanceStrategy; 3] = [
        AssistanceStrategy::ChatGptOnly,
        AssistanceStrategy::ChatGptPlusSearch,
        AssistanceStrategy::SearchOnly,
    ];

    pub const DEFAULT: AssistanceStrategy = AssistanceStrategy::ChatGptOnly;

    pub fn name(self) -> &'static str {
        match self {
            AssistanceStrategy::ChatGptOnly => "ai_assistance_chatgpt_only",
            AssistanceStrategy::ChatGptPlusSearch => "ai_assistance_google_and_chatgpt",
            AssistanceStrategy::SearchOnly => "ai_assistance_google_only",
        }
    }

    /// 按名字查找已注册策略
    pub fn lookup(name: &str) -> Result<Self, AssistError> {
        Self::ALL
            .into_iter()
            .find(|s| s.name() == name)
            .ok_or_else(|| AssistError::UnknownStrategy(name.to_string()))
    }
}

impl fmt::Display for AssistanceStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for AssistanceStrategy {
    type Err = AssistError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::lookup(s)
    }
}

/// 单次诊断会话的策略选择
#[derive(Debug, Clone, Default)]
pub struct StrategySelector {
    configured: Option<String>,
}

impl StrategySelector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_method(method: impl Into<String>) -> Self {
        let mut selector = Self::new();
        selector.configure(method);
        selector
    }

    pub fn configure(&mut self, method: impl Into<String>) {
        self.configured = Some(method.into());
    }

    pub fn resolve(&self) -> &str {
        self.configured
            .as_deref()
            .unwrap_or_else(|| AssistanceStrategy::DEFAULT.name())
    }

    pub fn dispatch(&self) -> Result<AssistanceStrategy, AssistError> {
        AssistanceStrategy::lookup(self.resolve())
    }
}
