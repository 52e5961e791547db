use crate::domain::a002_query_metadata::{MetadataError, MetadataExtractor};
use crate::domain::a003_tool_registry::{plan_for, PlanError, ToolError, ToolExecutor, ToolRegistry};
use async_trait::async_trait;
use contracts::domain::a001_conversation::aggregate::ConversationState;
use contracts::domain::a002_query_metadata::aggregate::Metadata;
use contracts::domain::a003_tool_registry::aggregate::ExecutionPlan;
use contracts::usecases::u101_chat_pipeline::PipelineStage;
use serde_json::{Map, Value};
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Metadata(#[from] MetadataError),

    #[error(transparent)]
    Plan(#[from] PlanError),

    #[error(transparent)]
    Tool(#[from] ToolError),

    #[error("No tools were found or no plan could be executed for this query.")]
    NoResults,
}

/// Результат одного прогона конвейера
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub stage: PipelineStage,
    pub metadata: Metadata,
    pub plan: ExecutionPlan,
    /// tool_name -> вывод инструмента
    pub results: Map<String, Value>,
}

/// Шов между HTTP-слоем и конвейером
#[async_trait]
pub trait PipelineRunner: Send + Sync {
    async fn run(
        &self,
        query: &str,
        state: &ConversationState,
    ) -> Result<PipelineOutput, PipelineError>;
}

/// Метаданные -> план -> вызов инструментов
pub struct Pipeline {
    extractor: MetadataExtractor,
    registry: Arc<ToolRegistry>,
    executor: ToolExecutor,
}

impl Pipeline {
    pub fn new(extractor: MetadataExtractor, registry: Arc<ToolRegistry>) -> Result<Self, ToolError> {
        let executor = ToolExecutor::new(registry.clone())?;
        Ok(Self {
            extractor,
            registry,
            executor,
        })
    }
}

#[async_trait]
impl PipelineRunner for Pipeline {
    async fn run(
        &self,
        query: &str,
        state: &ConversationState,
    ) -> Result<PipelineOutput, PipelineError> {
        let mut stage = PipelineStage::Initialized;
        tracing::debug!(stage = stage.as_str(), "Pipeline started");

        let mut metadata = self.extractor.extract_metadata(query, Some(state)).await?;
        stage = PipelineStage::MetadataExtracted;
        tracing::debug!(stage = stage.as_str(), intents = ?metadata.intents);

        let plan = plan_for(&metadata, &self.registry)?;
        metadata.tools_required = plan.tool_names();
        stage = PipelineStage::Planned;
        tracing::debug!(stage = stage.as_str(), tools = ?metadata.tools_required);

        stage = PipelineStage::Executing;
        tracing::debug!(stage = stage.as_str());
        let results = self.executor.execute(&plan).await?;
        if results.is_empty() {
            return Err(PipelineError::NoResults);
        }

        stage = PipelineStage::Completed;
        tracing::info!(stage = stage.as_str(), tools = results.len(), "Pipeline finished");

        Ok(PipelineOutput {
            stage,
            metadata,
            plan,
            results,
        })
    }
}
