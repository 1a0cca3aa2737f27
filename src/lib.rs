//! ai-assist - 错误页 AI 诊断助手
//!
//! 把一次未处理异常（类型、消息、提示、源码片段、调用栈）变成一段修复建议：
//! 直接询问 LLM，或让带搜索工具的 ReAct Agent 先查资料再回答。任何失败都折叠为一段可展示的字符串。
//!
//! 模块划分：
//! - **assistant**: 对外入口 Assistant（策略分发、总时限、兜底）
//! - **config**: 应用配置加载（TOML + 环境变量）与 API Key
//! - **core**: 错误类型、策略选择、失败兜底、Agent 纠错
//! - **diagnosis**: 异常上下文渲染与提示词
//! - **llm**: LLM 客户端抽象与实现（OpenAI / 脚本化 Mock）
//! - **observability**: 日志初始化
//! - **react**: Planner 与 ReAct 主循环
//! - **search**: 网页搜索抽象与实现（SerpAPI / 静态 Mock）
//! - **tools**: 工具注册表、执行器与搜索工具

pub mod assistant;
pub mod config;
pub mod core;
pub mod diagnosis;
pub mod llm;
pub mod observability;
pub mod react;
pub mod search;
pub mod tools;

pub use assistant::Assistant;
pub use config::{load_config, AppConfig, Credentials};
pub use core::{AssistError, AssistanceStrategy, StrategySelector};
pub use diagnosis::{ExceptionContext, StackFrame};
