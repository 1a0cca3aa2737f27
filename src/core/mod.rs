//! 核心层：错误与恢复、策略选择、失败兜底

pub mod error;
pub mod guard;
pub mod recovery;
pub mod strategy;

pub use error::{AssistError, RecoveryAction};
pub use guard::{fallback_message, FailureGuard, FALLBACK_PREFIX};
pub use recovery::RecoveryEngine;
pub use strategy::{AssistanceStrategy, StrategySelector};
