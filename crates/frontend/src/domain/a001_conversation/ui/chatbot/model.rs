//! Chatbot - Model (API functions)

use super::view_model::SubmitTarget;
use crate::shared::api_utils::request_json;
use contracts::usecases::u101_chat_pipeline::{PipelineResponse, QueryRequest};

fn query_body(query: &str) -> Result<String, String> {
    serde_json::to_string(&QueryRequest::new(query)).map_err(|e| format!("{e}"))
}

/// POST /start - новый диалог
pub async fn start_conversation(query: &str) -> Result<PipelineResponse, String> {
    request_json("POST", "/start", Some(query_body(query)?)).await
}

/// POST /continue - следующий ход
pub async fn continue_conversation(query: &str) -> Result<PipelineResponse, String> {
    request_json("POST", "/continue", Some(query_body(query)?)).await
}

/// GET /status
pub async fn fetch_status() -> Result<PipelineResponse, String> {
    request_json("GET", "/status", None).await
}

/// Отправить запрос туда, куда указывает view model
pub async fn submit(target: SubmitTarget, query: &str) -> Result<PipelineResponse, String> {
    match target {
        SubmitTarget::Start => start_conversation(query).await,
        SubmitTarget::Continue => continue_conversation(query).await,
    }
}
