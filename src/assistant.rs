//! 诊断入口
//!
//! Assistant 持有 LLM、搜索服务、提示词与 Agent 参数，构造后不可变，可在并发请求间共享。
//! 每次请求显式传入 StrategySelector：
//! 1. dispatch 在兜底之外查找策略，未知名字直接返回 UnknownStrategy（不触发任何 LLM / 搜索调用）
//! 2. 选中的策略在总时限内执行，任何错误由 FailureGuard 转为兜底字符串

use std::sync::Arc;
use std::time::Duration;

use tracing::Instrument;
use uuid::Uuid;

use crate::config::{AgentSection, AppConfig, Credentials};
use crate::core::{AssistError, AssistanceStrategy, FailureGuard, RecoveryEngine, StrategySelector};
use crate::diagnosis::{build_context, ExceptionContext, Prompt, PromptSet};
use crate::llm::{LlmClient, OpenAiClient};
use crate::react::{agent_system_prompt, react_loop, Planner, ReactSession};
use crate::search::{format_results, run_search, SearchProvider, SerpApiClient};
use crate::tools::{search_tool, ToolDescriptor, ToolExecutor, ToolRegistry};

pub struct Assistant {
    llm: Arc<dyn LlmClient>,
    search: Arc<dyn SearchProvider>,
    prompts: PromptSet,
    agent: AgentSection,
    max_result_chars: usize,
    default_method: Option<String>,
    deadline: Duration,
    guard: FailureGuard,
    recovery: RecoveryEngine,
}

impl Assistant {
    /// 从进程环境读取 API Key 并构建；缺少任一 Key 返回 MissingCredential
    pub fn from_env(cfg: &AppConfig) -> Result<Self, AssistError> {
        let credentials = Credentials::from_env()?;
        Self::from_credentials(cfg, &credentials)
    }

    pub fn from_credentials(cfg: &AppConfig, credentials: &Credentials) -> Result<Self, AssistError> {
        let llm = Arc::new(OpenAiClient::new(&cfg.llm, &credentials.openai_api_key));
        let search = Arc::new(
            SerpApiClient::new(&cfg.search, &credentials.serpapi_api_key)
                .map_err(|e| AssistError::Config(e.to_string()))?,
        );
        tracing::info!(model = %llm.model(), engine = %search.engine(), "ai assistance initialized");
        Self::with_backends(cfg, llm, search)
    }

    /// 注入任意 LLM / 搜索实现（测试或自定义后端）
    pub fn with_backends(
        cfg: &AppConfig,
        llm: Arc<dyn LlmClient>,
        search: Arc<dyn SearchProvider>,
    ) -> Result<Self, AssistError> {
        Ok(Self {
            llm,
            search,
            prompts: PromptSet::from_config(&cfg.prompt)?,
            agent: cfg.agent.clone(),
            max_result_chars: cfg.search.max_result_chars,
            default_method: cfg.assist.method.clone(),
            deadline: Duration::from_secs(cfg.assist.deadline_secs),
            guard: FailureGuard::new(),
            recovery: RecoveryEngine::new(),
        })
    }

    /// 新会话的策略选择器，预置配置中的默认策略
    pub fn selector(&self) -> StrategySelector {
        match &self.default_method {
            Some(method) => StrategySelector::with_method(method.clone()),
            None => StrategySelector::new(),
        }
    }

    /// 对外唯一入口：按 selector 选择策略并返回可直接展示的字符串
    pub async fn get_ai_assistance(
        &self,
        exception: &ExceptionContext,
        selector: &StrategySelector,
    ) -> Result<String, AssistError> {
        tracing::info!(method = %selector.resolve(), "ai_assistance called");
        let strategy = selector.dispatch()?;
        Ok(self.run_strategy(strategy, exception).await)
    }

    /// 在总时限与 FailureGuard 内执行指定策略
    pub async fn run_strategy(
        &self,
        strategy: AssistanceStrategy,
        exception: &ExceptionContext,
    ) -> String {
        let span = tracing::info_span!(
            "ai_assistance",
            diagnosis_id = %Uuid::new_v4(),
            method = strategy.name()
        );
        let deadline = self.deadline;
        let op = async move {
            match tokio::time::timeout(deadline, self.execute(strategy, exception)).await {
                Ok(result) => result,
                Err(_) => Err(AssistError::DeadlineExceeded(deadline)),
            }
        };
        self.guard.run(strategy.name(), op).instrument(span).await
    }

    async fn execute(
        &self,
        strategy: AssistanceStrategy,
        exception: &ExceptionContext,
    ) -> Result<String, AssistError> {
        match strategy {
            AssistanceStrategy::ChatGptOnly => self.chatgpt_only(exception).await,
            AssistanceStrategy::ChatGptPlusSearch => self.google_and_chatgpt(exception).await,
            AssistanceStrategy::SearchOnly => self.google_only(exception).await,
        }
    }

    async fn chatgpt_only(&self, exception: &ExceptionContext) -> Result<String, AssistError> {
        let prompt = Prompt::new(
            self.prompts.system_task.clone(),
            build_context(exception, true),
        );
        Ok(self.llm.complete_prompt(&prompt).await?)
    }

    async fn google_and_chatgpt(&self, exception: &ExceptionContext) -> Result<String, AssistError> {
        let context = build_context(exception, false);
        let search = search_tool(
            &self.agent.tool_name,
            &self.agent.tool_description,
            self.search.clone(),
            self.max_result_chars,
        );
        self.run_with_tools(&context, vec![search]).await
    }

    /// 用给定工具集运行 Agent：注册工具、套用模板、执行 ReAct 循环
    async fn run_with_tools(
        &self,
        context: &str,
        tools: Vec<ToolDescriptor>,
    ) -> Result<String, AssistError> {
        let mut registry = ToolRegistry::new();
        for tool in tools {
            registry.register(tool);
        }
        let executor = ToolExecutor::new(registry, self.agent.tool_timeout_secs);
        let planner = Planner::new(
            self.llm.clone(),
            agent_system_prompt(&executor.tool_descriptions()),
        );

        let formatted = self.prompts.agent_template.format(context);
        tracing::info!(prompt = %formatted, "formatted prompt");

        let session = ReactSession::new(&planner, &executor, &self.recovery)
            .with_max_steps(self.agent.max_steps);
        let result = react_loop(&session, &formatted).await?;
        Ok(result.answer)
    }

    async fn google_only(&self, exception: &ExceptionContext) -> Result<String, AssistError> {
        let query = format!(
            "{} {}",
            exception.exception_type, exception.exception_message
        );
        let results = run_search(self.search.as_ref(), query.trim()).await?;
        Ok(format_results(&results, self.max_result_chars))
    }
}
