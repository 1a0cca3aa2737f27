//! 诊断层：异常上下文构建与提示词

pub mod context;
pub mod prompt;

pub use context::{build_context, render_stacktrace, ExceptionContext, StackFrame};
pub use prompt::{system_task, Prompt, PromptSet, PromptTemplate, DEFAULT_AGENT_TEMPLATE};
