use crate::domain::a002_query_metadata::aggregate::{Entities, UserProfile};
use serde::{Deserialize, Serialize};

/// Описание внешнего инструмента (MCP-сервиса), к которому обращается конвейер
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ToolRegistryEntry {
    pub tool_name: String,
    pub intents: Vec<String>,
    pub endpoint: String,
    pub input_schema: String,
    pub output_schema: String,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl ToolRegistryEntry {
    /// Обслуживает ли инструмент данный intent (без учёта регистра)
    pub fn handles(&self, intent: &str) -> bool {
        self.intents
            .iter()
            .any(|i| i.eq_ignore_ascii_case(intent.trim()))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ToolTask {
    pub tool_name: String,
    pub input: serde_json::Map<String, serde_json::Value>,
    /// Имя инструмента, чей результат нужно подать на вход
    #[serde(default)]
    pub input_from: Option<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionType {
    Sequential,
    Parallel,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExecutionPlan {
    pub execution_type: ExecutionType,
    pub task_list: Vec<ToolTask>,
}

impl ExecutionPlan {
    pub fn is_empty(&self) -> bool {
        self.task_list.is_empty()
    }

    pub fn tool_names(&self) -> Vec<String> {
        self.task_list.iter().map(|t| t.tool_name.clone()).collect()
    }
}

/// Вход инструмента-объяснителя схем
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SchemeMetadata {
    pub scheme_name: String,
    pub user_profile: UserProfile,
    #[serde(default)]
    pub context_entities: Option<Entities>,
    #[serde(default)]
    pub detected_intents: Option<Vec<String>>,
    #[serde(default)]
    pub query: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_execution_plan_from_json() {
        let raw = r#"{
            "execution_type": "parallel",
            "task_list": [
                {"tool_name": "SchemeExplainer", "input": {"scheme_name": "PMEGP"}},
                {"tool_name": "EligibilityChecker", "input": {}, "input_from": "SchemeExplainer"}
            ]
        }"#;
        let plan: ExecutionPlan = serde_json::from_str(raw).unwrap();
        assert_eq!(plan.execution_type, ExecutionType::Parallel);
        assert_eq!(plan.tool_names(), vec!["SchemeExplainer", "EligibilityChecker"]);
        assert_eq!(plan.task_list[1].input_from.as_deref(), Some("SchemeExplainer"));
    }

    #[test]
    fn test_handles_intent_case_insensitive() {
        let entry = ToolRegistryEntry {
            tool_name: "SchemeExplainer".into(),
            intents: vec!["explain".into()],
            endpoint: "http://localhost/explain".into(),
            input_schema: "SchemeMetadata".into(),
            output_schema: "SchemeExplanationResponse".into(),
            model: None,
            description: None,
        };
        assert!(entry.handles("Explain "));
        assert!(!entry.handles("register"));
    }
}
