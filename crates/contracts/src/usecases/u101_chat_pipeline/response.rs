use crate::domain::a001_conversation::aggregate::ConversationState;
use serde::{Deserialize, Serialize};

/// Стадия конвейера, которую видит клиент
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PipelineStage {
    Initialized,
    MetadataExtracted,
    Planned,
    Executing,
    Completed,
    Failed,
    InProgress,
}

impl PipelineStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            PipelineStage::Initialized => "INITIALIZED",
            PipelineStage::MetadataExtracted => "METADATA_EXTRACTED",
            PipelineStage::Planned => "PLANNED",
            PipelineStage::Executing => "EXECUTING",
            PipelineStage::Completed => "COMPLETED",
            PipelineStage::Failed => "FAILED",
            PipelineStage::InProgress => "IN_PROGRESS",
        }
    }
}

/// Ответ POST /start, POST /continue и GET /status
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PipelineResponse {
    pub message: String,
    pub stage: PipelineStage,
    pub results: Option<serde_json::Map<String, serde_json::Value>>,
    pub state: ConversationState,
}

/// Ответ GET /
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RootResponse {
    pub message: String,
}
