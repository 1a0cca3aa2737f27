//! Planner：Agent system prompt 与 Tool Call 解析
//!
//! 调用 LLM 得到最终回答或 JSON Tool Call；parse_llm_output 从文本中提取 JSON 并解析为 ToolCall 或直接回复。

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::core::AssistError;
use crate::llm::{LlmClient, Message};
use crate::tools::tool_call_schema_json;

/// 显式的最终回答标记
pub const FINAL_ANSWER_MARKER: &str = "Final Answer:";

/// LLM 返回的 Tool Call（简化 JSON：{"tool": "custom-search", "input": "..."}）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCall {
    pub tool: String,
    #[serde(default, alias = "args", alias = "query")]
    pub input: serde_json::Value,
}

impl ToolCall {
    /// 工具输入文本：字符串原样；对象取第一个字符串字段；其它转为 JSON 文本
    pub fn input_text(&self) -> String {
        match &self.input {
            serde_json::Value::String(s) => s.clone(),
            serde_json::Value::Null => String::new(),
            serde_json::Value::Object(map) => map
                .values()
                .find_map(|v| v.as_str().map(str::to_string))
                .unwrap_or_else(|| self.input.to_string()),
            other => other.to_string(),
        }
    }
}

/// Planner 输出
#[derive(Debug, Clone)]
pub enum PlannerOutput {
    /// 最终回答
    Response(String),
    /// 需要执行工具
    ToolCall(ToolCall),
}

/// 解析 LLM 输出
///
/// - 含 `Final Answer:` 时取其后的文本为最终回答；标记前若已有工具调用 JSON，或标记后为空，为 MalformedOutput
/// - 含 JSON 对象且其中出现 `"tool"` 时按 ToolCall 解析，失败为 MalformedOutput
/// - 其它非空纯文本（包括含代码花括号但不是工具调用的回答）视为最终回答
pub fn parse_llm_output(output: &str) -> Result<PlannerOutput, AssistError> {
    let trimmed = output.trim();
    if trimmed.is_empty() {
        return Err(AssistError::MalformedOutput("empty reply".to_string()));
    }

    if let Some(idx) = trimmed.find(FINAL_ANSWER_MARKER) {
        // 同一步只能二选一：工具调用或最终回答
        if looks_like_tool_call(&trimmed[..idx]) {
            return Err(AssistError::MalformedOutput(format!(
                "reply contains both a tool call and a final answer: {}",
                trimmed
            )));
        }
        let answer = trimmed[idx + FINAL_ANSWER_MARKER.len()..].trim();
        if answer.is_empty() {
            return Err(AssistError::MalformedOutput("final answer is empty".to_string()));
        }
        return Ok(PlannerOutput::Response(answer.to_string()));
    }

    // 尝试提取 JSON 块（```json ... ``` 或纯 JSON）
    let json_str = if let Some(start) = trimmed.find("```json") {
        let rest = &trimmed[start + 7..];
        rest.find("```")
            .map(|end| rest[..end].trim())
            .unwrap_or(rest.trim())
    } else if let Some(start) = trimmed.find('{') {
        match trimmed.rfind('}') {
            Some(end) if end > start => &trimmed[start..=end],
            _ => &trimmed[start..],
        }
    } else {
        return Ok(PlannerOutput::Response(trimmed.to_string()));
    };

    if !json_str.contains("\"tool\"") {
        return Ok(PlannerOutput::Response(trimmed.to_string()));
    }

    let parsed: ToolCall = serde_json::from_str(json_str)
        .map_err(|e| AssistError::MalformedOutput(format!("{}: {}", e, json_str)))?;

    if parsed.tool.trim().is_empty() {
        Ok(PlannerOutput::Response(trimmed.to_string()))
    } else {
        Ok(PlannerOutput::ToolCall(parsed))
    }
}

fn looks_like_tool_call(text: &str) -> bool {
    text.find('{')
        .map(|start| text[start..].contains("\"tool\""))
        .unwrap_or(false)
}

/// 根据可用工具生成 Agent 的 system prompt
pub fn agent_system_prompt(tools: &[(String, String)]) -> String {
    let tool_lines: Vec<String> = tools
        .iter()
        .map(|(name, description)| format!("- {}: {}", name, description))
        .collect();
    let example_tool = tools
        .first()
        .map(|(name, _)| name.as_str())
        .unwrap_or("tool-name");
    format!(
        "You are a debugging assistant. Work out a concrete fix for the error you are given.\n\n\
         Available tools:\n{}\n\n\
         At each step either call exactly one tool or give your final answer.\n\
         To call a tool, reply with only a JSON object matching this schema:\n{}\n\
         Example: {{\"tool\": \"{}\", \"input\": \"NoMethodError undefined method\"}}\n\
         Tool results come back to you as \"Observation from <tool>: ...\".\n\
         When you know the solution, reply with \"{} \" followed by the solution in plain text.",
        tool_lines.join("\n"),
        tool_call_schema_json(),
        example_tool,
        FINAL_ANSWER_MARKER
    )
}

/// Planner：持有 LLM 与 system prompt，plan 时拼 system + messages 后调用 LLM
pub struct Planner {
    llm: Arc<dyn LlmClient>,
    system_prompt: String,
}

impl Planner {
    pub fn new(llm: Arc<dyn LlmClient>, system_prompt: impl Into<String>) -> Self {
        Self {
            llm,
            system_prompt: system_prompt.into(),
        }
    }

    pub async fn plan(&self, messages: &[Message]) -> Result<String, AssistError> {
        let mut full_messages = vec![Message::system(self.system_prompt.clone())];
        full_messages.extend(messages.iter().cloned());
        Ok(self.llm.complete(&full_messages).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::{Role, ScriptedLlmClient};

    #[test]
    fn test_parse_plain_text_is_response() {
        match parse_llm_output("  Define method foo.  ").unwrap() {
            PlannerOutput::Response(r) => assert_eq!(r, "Define method foo."),
            _ => panic!("Expected Response"),
        }
    }

    #[test]
    fn test_parse_final_answer_marker() {
        let out = "Thought: I know it now.\nFinal Answer: See http://x";
        match parse_llm_output(out).unwrap() {
            PlannerOutput::Response(r) => assert_eq!(r, "See http://x"),
            _ => panic!("Expected Response"),
        }
    }

    #[test]
    fn test_parse_code_braces_without_tool_is_response() {
        let out = "Use a hash: `{ name: 'foo' }` when calling the method.";
        assert!(matches!(
            parse_llm_output(out).unwrap(),
            PlannerOutput::Response(_)
        ));
    }

    #[test]
    fn test_parse_tool_call_plain_and_fenced() {
        let plain = r#"{"tool": "custom-search", "input": "undefined method foo"}"#;
        let fenced = "I should search.\n```json\n{\"tool\": \"custom-search\", \"input\": \"undefined method foo\"}\n```";
        for out in [plain, fenced] {
            match parse_llm_output(out).unwrap() {
                PlannerOutput::ToolCall(tc) => {
                    assert_eq!(tc.tool, "custom-search");
                    assert_eq!(tc.input_text(), "undefined method foo");
                }
                _ => panic!("Expected ToolCall"),
            }
        }
    }

    #[test]
    fn test_parse_tool_call_with_args_object() {
        let out = r#"{"tool": "custom-search", "args": {"query": "rails nil error"}}"#;
        match parse_llm_output(out).unwrap() {
            PlannerOutput::ToolCall(tc) => assert_eq!(tc.input_text(), "rails nil error"),
            _ => panic!("Expected ToolCall"),
        }
    }

    #[test]
    fn test_parse_broken_tool_json_is_malformed() {
        let out = r#"{"tool": "custom-search", "input": }"#;
        assert!(matches!(
            parse_llm_output(out),
            Err(AssistError::MalformedOutput(_))
        ));
    }

    #[test]
    fn test_tool_call_followed_by_final_answer_is_malformed() {
        let out = "{\"tool\": \"custom-search\", \"input\": \"foo\"}\nObservation: made up\nFinal Answer: guessed";
        assert!(matches!(
            parse_llm_output(out),
            Err(AssistError::MalformedOutput(_))
        ));
    }

    #[test]
    fn test_final_answer_text_may_mention_tool_word() {
        let out = "Final Answer: pass {\"tool\": 1} to the helper";
        match parse_llm_output(out).unwrap() {
            PlannerOutput::Response(r) => assert_eq!(r, "pass {\"tool\": 1} to the helper"),
            _ => panic!("Expected Response"),
        }
    }

    #[test]
    fn test_empty_final_answer_is_malformed() {
        for out in ["Final Answer:   ", "Thought: done\nFinal Answer:", "   "] {
            assert!(matches!(
                parse_llm_output(out),
                Err(AssistError::MalformedOutput(_))
            ));
        }
    }

    #[test]
    fn test_system_prompt_lists_tools_and_schema() {
        let prompt = agent_system_prompt(&[(
            "custom-search".to_string(),
            "finds fixes".to_string(),
        )]);
        assert!(prompt.contains("- custom-search: finds fixes"));
        assert!(prompt.contains("\"input\""));
        assert!(prompt.contains("Final Answer:"));
    }

    #[tokio::test]
    async fn test_plan_prepends_system_prompt() {
        let llm = Arc::new(ScriptedLlmClient::replying("ok"));
        let planner = Planner::new(llm.clone(), "sys");
        let out = planner.plan(&[Message::user("hi")]).await.unwrap();
        assert_eq!(out, "ok");
        let sent = &llm.requests()[0];
        assert_eq!(sent[0], Message::system("sys"));
        assert_eq!(sent[1].role, Role::User);
    }
}
