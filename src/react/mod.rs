//! 认知层：Planner 与 ReAct 主循环

pub mod loop_;
pub mod planner;

pub use loop_::{react_loop, ReactResult, ReactSession, DEFAULT_MAX_STEPS};
pub use planner::{agent_system_prompt, parse_llm_output, Planner, PlannerOutput, ToolCall};
