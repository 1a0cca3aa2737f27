//! 闭包工具：name + description + 一个 `Fn(String) -> Future<Result<String, String>>`
//!
//! 工具能力以普通闭包注册，不在运行时拼接或求值代码。

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use futures_util::future::BoxFuture;
use futures_util::FutureExt;

use crate::tools::Tool;

type ToolFn = Arc<dyn Fn(String) -> BoxFuture<'static, Result<String, String>> + Send + Sync>;

#[derive(Clone)]
pub struct ToolDescriptor {
    name: String,
    description: String,
    invocation: ToolFn,
}

impl ToolDescriptor {
    pub fn new<F, Fut>(name: impl Into<String>, description: impl Into<String>, f: F) -> Self
    where
        F: Fn(String) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<String, String>> + Send + 'static,
    {
        Self {
            name: name.into(),
            description: description.into(),
            invocation: Arc::new(move |input| f(input).boxed()),
        }
    }
}

impl fmt::Debug for ToolDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToolDescriptor")
            .field("name", &self.name)
            .field("description", &self.description)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl Tool for ToolDescriptor {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    async fn execute(&self, input: &str) -> Result<String, String> {
        (self.invocation)(input.to_string()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test]
    async fn test_closure_captures_state() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let tool = ToolDescriptor::new("count", "Counts calls", move |input: String| {
            let counter = counter.clone();
            async move {
                let n = counter.fetch_add(1, Ordering::SeqCst) + 1;
                Ok(format!("{input}#{n}"))
            }
        });

        assert_eq!(tool.execute("a").await.unwrap(), "a#1");
        assert_eq!(tool.execute("b").await.unwrap(), "b#2");
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(tool.name(), "count");
        assert!(format!("{:?}", tool).contains("Counts calls"));
    }

    #[tokio::test]
    async fn test_closure_error_passes_through() {
        let tool = ToolDescriptor::new("fail", "Always fails", |_: String| async {
            Err::<String, String>("nope".to_string())
        });
        assert_eq!(tool.execute("x").await.unwrap_err(), "nope");
    }
}
