//! 诊断上下文构建
//!
//! 将异常类型、请求路径、消息、提示与最内层栈帧的源码片段拼成 LLM 可读的上下文；
//! 可选追加逐帧渲染的调用栈。纯函数，唯一副作用是记录构建结果。

use serde::{Deserialize, Serialize};

/// 调用栈中的一帧（由上游栈提取服务提供，只读）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StackFrame {
    pub index: usize,
    pub context_label: String,
    pub class_name: String,
    pub method_name: String,
    pub file_path: String,
    pub line: u32,
}

/// 一次错误事件的完整描述；每次错误新建，由调用方持有
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExceptionContext {
    pub exception_type: String,
    pub exception_message: String,
    #[serde(default)]
    pub exception_hint: String,
    pub request_path: String,
    /// 最内层帧的源码片段，已由上游格式化
    #[serde(default)]
    pub source_snippet: String,
    #[serde(default)]
    pub stack_frames: Vec<StackFrame>,
}

/// 逐帧渲染调用栈，每帧一行，行首为该帧在序列中的位置（从 0 开始）
pub fn render_stacktrace(frames: &[StackFrame]) -> String {
    let mut trace = String::new();
    for (index, frame) in frames.iter().enumerate() {
        trace.push_str(&format!(
            "{}: context:{} {}{} file: {} on line {}\n",
            index,
            frame.context_label,
            frame.class_name,
            frame.method_name,
            frame.file_path,
            frame.line
        ));
    }
    trace
}

pub fn build_context(exception: &ExceptionContext, include_stacktrace: bool) -> String {
    let mut context = format!(
        "Exception Type: {} at {}\n\n\
         Exception Message: {}\n\n\
         Exception Hint: {}\n\n\
         Source Code Error Context:\n{}\n",
        exception.exception_type,
        exception.request_path,
        exception.exception_message,
        exception.exception_hint,
        exception.source_snippet,
    );

    if include_stacktrace {
        context.push_str("\n\nStacktrace:\n");
        context.push_str(&render_stacktrace(&exception.stack_frames));
    }

    tracing::info!(context = %context, "built diagnostic context");
    context
}
