//! ReAct 主循环
//!
//! Plan -> Act (Tool) -> Observe -> 下一轮 Plan，直到模型给出最终回答或步数用尽。
//! 格式错误与幻觉工具交给 RecoveryEngine 注入纠正提示（消耗一步）；工具失败、LLM 失败直接上抛。

use crate::core::{AssistError, RecoveryAction, RecoveryEngine};
use crate::llm::Message;
use crate::react::{parse_llm_output, Planner, PlannerOutput};
use crate::tools::ToolExecutor;

/// 默认最大 ReAct 步数，防止死循环
pub const DEFAULT_MAX_STEPS: usize = 8;
/// 日志中 LLM 输出与观察结果的预览字符数
const PREVIEW_CHARS: usize = 300;

/// ReAct 循环执行结果
#[derive(Debug)]
pub struct ReactResult {
    pub answer: String,
    /// 实际消耗的步数（含最终回答那一步）
    pub steps: usize,
    pub tool_calls: usize,
}

/// ReAct 会话配置
pub struct ReactSession<'a> {
    pub planner: &'a Planner,
    pub executor: &'a ToolExecutor,
    pub recovery: &'a RecoveryEngine,
    pub max_steps: usize,
}

impl<'a> ReactSession<'a> {
    pub fn new(
        planner: &'a Planner,
        executor: &'a ToolExecutor,
        recovery: &'a RecoveryEngine,
    ) -> Self {
        Self {
            planner,
            executor,
            recovery,
            max_steps: DEFAULT_MAX_STEPS,
        }
    }

    pub fn with_max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = max_steps;
        self
    }
}

fn preview(text: &str) -> String {
    if text.chars().count() > PREVIEW_CHARS {
        format!("{}...", text.chars().take(PREVIEW_CHARS).collect::<String>())
    } else {
        text.to_string()
    }
}

/// 执行 ReAct 循环
///
/// input -> plan -> 解析输出 -> 若 ToolCall 则执行并写回 Observation -> 若 Response 则返回
pub async fn react_loop(
    session: &ReactSession<'_>,
    input: &str,
) -> Result<ReactResult, AssistError> {
    let mut messages = vec![Message::user(input.to_string())];
    let mut tool_calls = 0;

    for step in 0..session.max_steps {
        let output = session.planner.plan(&messages).await?;
        tracing::debug!(step, output = %preview(&output), "agent step");

        let parsed = parse_llm_output(&output).and_then(|parsed| match parsed {
            PlannerOutput::ToolCall(tc) if !session.executor.has_tool(&tc.tool) => {
                Err(AssistError::HallucinatedTool(tc.tool))
            }
            other => Ok(other),
        });

        match parsed {
            Ok(PlannerOutput::Response(answer)) => {
                tracing::info!(steps = step + 1, tool_calls, "agent finished");
                return Ok(ReactResult {
                    answer,
                    steps: step + 1,
                    tool_calls,
                });
            }
            Ok(PlannerOutput::ToolCall(tc)) => {
                let tool_input = tc.input_text();
                tracing::info!(step, tool = %tc.tool, input = %tool_input, "agent tool call");
                let observation = session.executor.execute(&tc.tool, &tool_input).await?;
                tool_calls += 1;
                tracing::debug!(tool = %tc.tool, observation = %preview(&observation), "agent observation");
                // 将工具调用与结果写回对话，供下一轮 Plan 使用
                messages.push(Message::assistant(output));
                messages.push(Message::user(format!(
                    "Observation from {}: {}",
                    tc.tool, observation
                )));
            }
            Err(e) => {
                let tool_names = session.executor.tool_names();
                match session.recovery.handle(&e, &tool_names) {
                    RecoveryAction::RetryWithPrompt(prompt) => {
                        tracing::warn!(step, error = %e, "agent output rejected, retrying");
                        messages.push(Message::assistant(output));
                        messages.push(Message::user(prompt));
                    }
                    RecoveryAction::Abort => return Err(e),
                }
            }
        }
    }

    Err(AssistError::AgentExecution(format!(
        "no final answer within {} steps",
        session.max_steps
    )))
}
