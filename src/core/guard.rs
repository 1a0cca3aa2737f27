//! 失败兜底：把一次诊断的任何错误转成可直接嵌入错误页的字符串
//!
//! 成功时原样返回并记录答案；失败时记录并返回 `AI lookup failed for <strategy>: <error>`。
//! 只吸收 AssistError（封闭集合）；panic 不在此处捕获。

use std::future::Future;

use crate::core::AssistError;

/// 兜底字符串前缀
pub const FALLBACK_PREFIX: &str = "AI lookup failed for";

/// 生成兜底字符串
pub fn fallback_message(strategy: &str, err: &AssistError) -> String {
    format!("{} {}: {}", FALLBACK_PREFIX, strategy, err)
}

#[derive(Debug, Clone, Default)]
pub struct FailureGuard;

impl FailureGuard {
    pub fn new() -> Self {
        Self
    }

    /// 等待 op 完成；永远返回字符串
    pub async fn run<F>(&self, strategy: &str, op: F) -> String
    where
        F: Future<Output = Result<String, AssistError>>,
    {
        match op.await {
            Ok(solution) => {
                tracing::info!(strategy = %strategy, solution = %solution, "ai assistance solution");
                solution
            }
            Err(e) => self.absorb(strategy, &e),
        }
    }

    /// 记录错误并返回兜底字符串；预期内的失败记 warn，配置类错误记 error
    pub fn absorb(&self, strategy: &str, err: &AssistError) -> String {
        if err.is_expected() {
            tracing::warn!(strategy = %strategy, error = %err, "ai lookup failed");
        } else {
            tracing::error!(strategy = %strategy, error = %err, "ai lookup failed unexpectedly");
        }
        fallback_message(strategy, err)
    }
}
