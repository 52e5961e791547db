use super::registry::ToolRegistry;
use contracts::domain::a002_query_metadata::aggregate::{Location, Metadata, UserProfile};
use contracts::domain::a003_tool_registry::aggregate::{
    ExecutionPlan, ExecutionType, SchemeMetadata, ToolTask,
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PlanError {
    #[error("No tools were found or no plan could be executed for intents {0:?}")]
    NoToolsFound(Vec<String>),

    #[error("Failed to build tool input: {0}")]
    Input(#[from] serde_json::Error),
}

/// Строит план вызова инструментов по intents из метаданных.
///
/// Каждый подходящий инструмент получает один и тот же вход `SchemeMetadata`.
/// Несколько независимых инструментов выполняются параллельно.
pub fn plan_for(metadata: &Metadata, registry: &ToolRegistry) -> Result<ExecutionPlan, PlanError> {
    let tools = registry.find_by_intents(&metadata.intents);
    if tools.is_empty() {
        return Err(PlanError::NoToolsFound(metadata.intents.clone()));
    }

    let input = scheme_input(metadata)?;
    let task_list: Vec<ToolTask> = tools
        .iter()
        .map(|entry| ToolTask {
            tool_name: entry.tool_name.clone(),
            input: input.clone(),
            input_from: None,
        })
        .collect();

    let execution_type = if task_list.len() > 1 {
        ExecutionType::Parallel
    } else {
        ExecutionType::Sequential
    };

    tracing::info!(
        execution_type = ?execution_type,
        tools = ?task_list.iter().map(|t| t.tool_name.as_str()).collect::<Vec<_>>(),
        "Execution plan built"
    );

    Ok(ExecutionPlan {
        execution_type,
        task_list,
    })
}

fn scheme_input(
    metadata: &Metadata,
) -> Result<serde_json::Map<String, serde_json::Value>, PlanError> {
    let scheme_name = metadata
        .scheme()
        .map(|s| s.values().join(", "))
        .unwrap_or_default();

    let user_profile = metadata.user_profile.clone().unwrap_or_else(|| UserProfile {
        user_type: "entrepreneur".to_string(),
        location: Location::india("India"),
    });

    let payload = SchemeMetadata {
        scheme_name,
        user_profile,
        context_entities: Some(metadata.entities.clone()),
        detected_intents: Some(metadata.intents.clone()),
        query: Some(metadata.query.clone()),
    };

    Ok(serde_json::to_value(payload)?
        .as_object()
        .cloned()
        .unwrap_or_default())
}
