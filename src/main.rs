//! ai-assist 命令行入口
//!
//! 用法：`ai-assist <context.json> [method]`
//! 读取 JSON 格式的异常上下文，按策略（默认取配置或 ai_assistance_chatgpt_only）诊断并打印结果。

use std::path::PathBuf;

use ai_assist::{load_config, observability, Assistant, ExceptionContext};
use anyhow::Context;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    observability::init();

    let mut args = std::env::args().skip(1);
    let context_path = args
        .next()
        .map(PathBuf::from)
        .context("usage: ai-assist <context.json> [method]")?;
    let method = args.next();

    let raw = std::fs::read_to_string(&context_path)
        .with_context(|| format!("Failed to read {}", context_path.display()))?;
    let exception: ExceptionContext =
        serde_json::from_str(&raw).context("Invalid exception context JSON")?;

    let cfg = load_config(None).context("Failed to load config")?;
    let assistant = Assistant::from_env(&cfg).context("Failed to create assistant")?;

    let mut selector = assistant.selector();
    if let Some(method) = method {
        selector.configure(method);
    }

    let answer = assistant
        .get_ai_assistance(&exception, &selector)
        .await
        .context("AI assistance failed")?;
    println!("{}", answer);
    Ok(())
}
