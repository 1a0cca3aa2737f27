//! 提示词：LLM-only 的 system 任务、单次 Prompt、Agent 模板

use crate::config::PromptSection;
use crate::core::AssistError;
use crate::llm::Message;

/// Agent 模板默认值：`{framework}` 在加载时替换，`{error}` 在每次诊断时替换
pub const DEFAULT_AGENT_TEMPLATE: &str = "Given the full error reported by {framework}:\n\n{error}\n\nYour answer should contain the relevant solution.";

const ERROR_SLOT: &str = "{error}";
const FRAMEWORK_SLOT: &str = "{framework}";

/// LLM-only 策略的 system 指令
pub fn system_task(framework: &str, include_example: bool) -> String {
    let mut task = format!(
        "You are to look for the errors in the given code and respond back with a brief but \
         self explanatory correction of the errors in {}.",
        framework
    );
    if include_example {
        task.push_str(&format!(" Please show a working example in {}.", framework));
    }
    task
}

/// 单次诊断的 prompt，不持久化
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub system_instruction: String,
    pub user_content: String,
}

impl Prompt {
    pub fn new(system_instruction: impl Into<String>, user_content: impl Into<String>) -> Self {
        Self {
            system_instruction: system_instruction.into(),
            user_content: user_content.into(),
        }
    }

    pub fn to_messages(&self) -> Vec<Message> {
        vec![
            Message::system(self.system_instruction.clone()),
            Message::user(self.user_content.clone()),
        ]
    }
}

/// 只有一个 `{error}` 占位的模板
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptTemplate {
    template: String,
}

impl PromptTemplate {
    pub fn new(template: impl Into<String>) -> Result<Self, AssistError> {
        let template = template.into();
        match template.matches(ERROR_SLOT).count() {
            1 => Ok(Self { template }),
            n => Err(AssistError::Config(format!(
                "agent template must contain exactly one {} slot, found {}",
                ERROR_SLOT, n
            ))),
        }
    }

    pub fn format(&self, error: &str) -> String {
        self.template.replacen(ERROR_SLOT, error, 1)
    }
}

/// 由 [prompt] 配置构建的全部提示词
#[derive(Debug, Clone)]
pub struct PromptSet {
    pub system_task: String,
    pub agent_template: PromptTemplate,
}

impl PromptSet {
    pub fn from_config(section: &PromptSection) -> Result<Self, AssistError> {
        let agent_template = section
            .agent_template
            .replace(FRAMEWORK_SLOT, &section.framework);
        Ok(Self {
            system_task: system_task(&section.framework, section.include_example),
            agent_template: PromptTemplate::new(agent_template)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::Role;

    #[test]
    fn test_system_task_with_and_without_example() {
        let plain = system_task("Ruby on Rails", false);
        assert!(plain.contains("correction of the errors in Ruby on Rails"));
        assert!(!plain.contains("working example"));

        let with_example = system_task("Django", true);
        assert!(with_example.ends_with("Please show a working example in Django."));
    }

    #[test]
    fn test_prompt_to_messages_order() {
        let messages = Prompt::new("task", "context").to_messages();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, Role::System);
        assert_eq!(messages[0].content, "task");
        assert_eq!(messages[1].role, Role::User);
        assert_eq!(messages[1].content, "context");
    }

    #[test]
    fn test_template_substitutes_single_slot() {
        let template = PromptTemplate::new("Fix this: {error}. Thanks").unwrap();
        assert_eq!(template.format("boom"), "Fix this: boom. Thanks");
    }

    #[test]
    fn test_template_does_not_rescan_substituted_text() {
        let template = PromptTemplate::new("A {error} B").unwrap();
        assert_eq!(template.format("{error}"), "A {error} B");
    }

    #[test]
    fn test_template_rejects_missing_or_repeated_slot() {
        assert!(matches!(
            PromptTemplate::new("no slot"),
            Err(AssistError::Config(_))
        ));
        assert!(matches!(
            PromptTemplate::new("{error} and {error}"),
            Err(AssistError::Config(_))
        ));
    }

    #[test]
    fn test_prompt_set_from_default_config() {
        let set = PromptSet::from_config(&PromptSection::default()).unwrap();
        let formatted = set.agent_template.format("NoMethodError");
        assert!(formatted.contains("reported by Ruby on Rails"));
        assert!(formatted.contains("NoMethodError"));
        assert!(!formatted.contains("{framework}"));
    }
}
