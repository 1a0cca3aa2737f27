//! 应用配置：从 config/default.toml 与环境变量加载
//!
//! 加载顺序：先读 TOML 文件，再用环境变量 `AI_ASSIST__*` 覆盖（双下划线表示嵌套，如 `AI_ASSIST__LLM__MODEL=gpt-4o-mini`）。
//! API Key 不走配置文件，由 [`Credentials`] 在启动时从环境变量一次性读取。

use std::path::PathBuf;

use serde::Deserialize;

use crate::core::AssistError;

/// LLM 服务 API Key 的环境变量名
pub const OPENAI_API_KEY_VAR: &str = "OPENAI_API_KEY";
/// 搜索服务 API Key 的环境变量名
pub const SERPAPI_API_KEY_VAR: &str = "SERPAPI_API_KEY";

/// 应用配置根（对应 config/default.toml 的顶层）
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub assist: AssistSection,
    pub llm: LlmSection,
    pub search: SearchSection,
    pub agent: AgentSection,
    pub prompt: PromptSection,
}

/// [assist] 段：默认策略名与单次诊断的总时限
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AssistSection {
    /// 默认策略名；未设置时使用 ai_assistance_chatgpt_only
    pub method: Option<String>,
    /// 单次诊断（含全部网络往返）的总时限（秒）
    pub deadline_secs: u64,
}

impl Default for AssistSection {
    fn default() -> Self {
        Self {
            method: None,
            deadline_secs: 90,
        }
    }
}

/// [llm] 段：模型、可选代理地址、请求超时。temperature 固定为 0，不可配置
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LlmSection {
    pub model: String,
    pub base_url: Option<String>,
    pub request_timeout_secs: u64,
}

impl Default for LlmSection {
    fn default() -> Self {
        Self {
            model: "gpt-3.5-turbo".to_string(),
            base_url: None,
            request_timeout_secs: 60,
        }
    }
}

/// [search] 段：SerpAPI 引擎、地址、结果数、超时与观察结果最大字符数
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SearchSection {
    pub engine: String,
    pub base_url: String,
    pub num_results: u32,
    pub timeout_secs: u64,
    /// 回填给 Agent 的搜索结果超过此长度时截断
    pub max_result_chars: usize,
}

impl Default for SearchSection {
    fn default() -> Self {
        Self {
            engine: "google".to_string(),
            base_url: "https://serpapi.com".to_string(),
            num_results: 10,
            timeout_secs: 15,
            max_result_chars: 4000,
        }
    }
}

/// [agent] 段：ReAct 步数上限、工具超时、搜索工具名与描述
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AgentSection {
    pub max_steps: usize,
    pub tool_timeout_secs: u64,
    pub tool_name: String,
    pub tool_description: String,
}

impl Default for AgentSection {
    fn default() -> Self {
        Self {
            max_steps: 8,
            tool_timeout_secs: 30,
            tool_name: "custom-search".to_string(),
            tool_description: "Useful for when you need to find the solution for errors raised by the application. Input: a search query describing the error.".to_string(),
        }
    }
}

/// [prompt] 段：目标框架、是否要求示例代码、Agent 模板
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PromptSection {
    pub framework: String,
    pub include_example: bool,
    /// 必须恰好包含一个 `{error}` 占位；`{framework}` 会先被替换
    pub agent_template: String,
}

impl Default for PromptSection {
    fn default() -> Self {
        Self {
            framework: "Ruby on Rails".to_string(),
            include_example: false,
            agent_template: crate::diagnosis::DEFAULT_AGENT_TEMPLATE.to_string(),
        }
    }
}

/// 从 config 目录加载配置，环境变量 AI_ASSIST__* 可覆盖
///
/// 1. 按顺序查找 config/default.toml、../config/default.toml、default.toml，找到则作为第一源
/// 2. 若传入 config_path 且文件存在，则追加该文件（可覆盖前面的键）
/// 3. 最后叠加环境变量 AI_ASSIST__*（双下划线表示嵌套键）
pub fn load_config(config_path: Option<PathBuf>) -> Result<AppConfig, config::ConfigError> {
    let mut builder = config::Config::builder();

    let default_names = ["config/default", "../config/default", "default"];
    for name in default_names {
        let path = format!("{}.toml", name);
        if std::path::Path::new(&path).exists() {
            builder = builder.add_source(config::File::with_name(name).required(false));
            break;
        }
    }

    if let Some(ref path) = config_path {
        if path.exists() {
            builder = builder.add_source(config::File::from(path.clone()).required(false));
        }
    }

    builder = builder.add_source(
        config::Environment::with_prefix("AI_ASSIST")
            .separator("__")
            .try_parsing(true),
    );

    let c = builder.build()?;
    c.try_deserialize()
}

/// 启动时读取的 API Key；之后视为不可变
#[derive(Clone)]
pub struct Credentials {
    pub openai_api_key: String,
    pub serpapi_api_key: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("openai_api_key", &"<redacted>")
            .field("serpapi_api_key", &"<redacted>")
            .finish()
    }
}

impl Credentials {
    /// 从进程环境读取；任一缺失（或为空）即返回 MissingCredential
    pub fn from_env() -> Result<Self, AssistError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// 通过自定义查找函数读取（测试中避免修改进程环境）
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AssistError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |name: &'static str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .ok_or(AssistError::MissingCredential(name))
        };
        Ok(Self {
            openai_api_key: read(OPENAI_API_KEY_VAR)?,
            serpapi_api_key: read(SERPAPI_API_KEY_VAR)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_without_any_source() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.llm.model, "gpt-3.5-turbo");
        assert_eq!(cfg.search.engine, "google");
        assert_eq!(cfg.agent.tool_name, "custom-search");
        assert_eq!(cfg.agent.max_steps, 8);
        assert!(cfg.assist.method.is_none());
        assert!(cfg.prompt.agent_template.contains("{error}"));
    }

    #[test]
    fn test_load_config_from_file_overrides_defaults() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "[assist]\nmethod = \"ai_assistance_google_and_chatgpt\"\n\n[agent]\nmax_steps = 3\n\n[search]\nnum_results = 5"
        )
        .unwrap();

        let cfg = load_config(Some(file.path().to_path_buf())).unwrap();
        assert_eq!(
            cfg.assist.method.as_deref(),
            Some("ai_assistance_google_and_chatgpt")
        );
        assert_eq!(cfg.agent.max_steps, 3);
        assert_eq!(cfg.search.num_results, 5);
        // 未出现的键保持默认值
        assert_eq!(cfg.agent.tool_timeout_secs, 30);
        assert_eq!(cfg.search.engine, "google");
    }

    #[test]
    fn test_credentials_both_present() {
        let creds = Credentials::from_lookup(|name| match name {
            OPENAI_API_KEY_VAR => Some("sk-test".to_string()),
            SERPAPI_API_KEY_VAR => Some("serp-test".to_string()),
            _ => None,
        })
        .unwrap();
        assert_eq!(creds.openai_api_key, "sk-test");
        assert_eq!(creds.serpapi_api_key, "serp-test");
        assert!(!format!("{:?}", creds).contains("sk-test"));
    }

    #[test]
    fn test_credentials_missing_openai_key() {
        let err = Credentials::from_lookup(|name| match name {
            SERPAPI_API_KEY_VAR => Some("serp-test".to_string()),
            _ => None,
        })
        .unwrap_err();
        assert!(matches!(err, AssistError::MissingCredential(OPENAI_API_KEY_VAR)));
        assert!(err.to_string().contains("OPENAI_API_KEY"));
    }

    #[test]
    fn test_credentials_blank_serpapi_key_counts_as_missing() {
        let err = Credentials::from_lookup(|name| match name {
            OPENAI_API_KEY_VAR => Some("sk-test".to_string()),
            SERPAPI_API_KEY_VAR => Some("   ".to_string()),
            _ => None,
        })
        .unwrap_err();
        assert!(matches!(err, AssistError::MissingCredential(SERPAPI_API_KEY_VAR)));
    }
}
