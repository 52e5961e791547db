use super::registry::ToolRegistry;
use crate::shared::llm::safe_json_parse;
use contracts::domain::a003_tool_registry::aggregate::{ExecutionPlan, ExecutionType, ToolTask};
use serde_json::{Map, Value};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ToolError {
    #[error("Tool `{0}` is not registered")]
    UnknownTool(String),

    #[error("Failed to build tool HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("Tool `{tool}` request failed: {source}")]
    Http {
        tool: String,
        #[source]
        source: reqwest::Error,
    },
}

/// Таймаут одного вызова инструмента
pub const TOOL_TIMEOUT: Duration = Duration::from_secs(120);

/// Вызывает инструменты плана по HTTP и собирает результаты tool_name -> JSON
#[derive(Clone)]
pub struct ToolExecutor {
    http: reqwest::Client,
    registry: Arc<ToolRegistry>,
}

impl ToolExecutor {
    pub fn new(registry: Arc<ToolRegistry>) -> Result<Self, ToolError> {
        Self::with_timeout(registry, TOOL_TIMEOUT)
    }

    pub fn with_timeout(registry: Arc<ToolRegistry>, timeout: Duration) -> Result<Self, ToolError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(ToolError::Client)?;
        Ok(Self { http, registry })
    }

    pub async fn execute(&self, plan: &ExecutionPlan) -> Result<Map<String, Value>, ToolError> {
        match plan.execution_type {
            ExecutionType::Sequential => self.execute_sequential(&plan.task_list).await,
            ExecutionType::Parallel => self.execute_parallel(&plan.task_list).await,
        }
    }

    /// По порядку; `input_from` подставляет вывод ранее выполненного инструмента
    async fn execute_sequential(&self, tasks: &[ToolTask]) -> Result<Map<String, Value>, ToolError> {
        let mut results = Map::new();
        for task in tasks {
            let mut input = task.input.clone();
            if let Some(source) = &task.input_from {
                match results.get(source) {
                    Some(previous) => {
                        input.insert("previous_output".to_string(), previous.clone());
                    }
                    None => tracing::warn!(
                        tool = %task.tool_name,
                        input_from = %source,
                        "input_from refers to a tool without output"
                    ),
                }
            }
            let output = self.call_tool(&task.tool_name, input).await?;
            results.insert(task.tool_name.clone(), output);
        }
        Ok(results)
    }

    async fn execute_parallel(&self, tasks: &[ToolTask]) -> Result<Map<String, Value>, ToolError> {
        for task in tasks.iter().filter(|t| t.input_from.is_some()) {
            tracing::warn!(tool = %task.tool_name, "input_from is ignored in a parallel plan");
        }

        let calls = tasks
            .iter()
            .map(|task| self.call_tool(&task.tool_name, task.input.clone()));
        let outputs = futures::future::join_all(calls).await;

        let mut results = Map::new();
        for (task, output) in tasks.iter().zip(outputs) {
            results.insert(task.tool_name.clone(), output?);
        }
        Ok(results)
    }

    async fn call_tool(&self, tool_name: &str, input: Map<String, Value>) -> Result<Value, ToolError> {
        let entry = self
            .registry
            .get(tool_name)
            .ok_or_else(|| ToolError::UnknownTool(tool_name.to_string()))?;

        tracing::info!(tool = %tool_name, endpoint = %entry.endpoint, "Calling tool");
        let started = std::time::Instant::now();

        let http_err = |source| ToolError::Http {
            tool: tool_name.to_string(),
            source,
        };

        let body = self
            .http
            .post(&entry.endpoint)
            .json(&input)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(http_err)?
            .text()
            .await
            .map_err(http_err)?;

        tracing::info!(
            tool = %tool_name,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Tool responded"
        );

        Ok(normalize_output(&body))
    }
}

/// JSON-объект остаётся как есть, JSON-строка и просто текст разбираются мягко
fn normalize_output(body: &str) -> Value {
    match serde_json::from_str::<Value>(body) {
        Ok(Value::String(inner)) => safe_json_parse(&inner),
        Ok(value @ Value::Object(_)) => value,
        _ => safe_json_parse(body),
    }
}
