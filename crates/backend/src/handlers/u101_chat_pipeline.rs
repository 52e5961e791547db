use axum::{extract::State, Json};
use std::sync::Arc;

use crate::routes::AppState;
use contracts::usecases::u101_chat_pipeline::{
    PipelineResponse, QueryRequest, RootResponse, ROOT_MESSAGE,
};

/// GET /
pub async fn root() -> Json<RootResponse> {
    Json(RootResponse {
        message: ROOT_MESSAGE.to_string(),
    })
}

/// POST /start
pub async fn start(
    State(state): State<Arc<AppState>>,
    Json(req): Json<QueryRequest>,
) -> Json<PipelineResponse> {
    tracing::info!("POST /start: {}", req.user_query);
    Json(state.chat.start(&req.user_query).await)
}

/// POST /continue
pub async fn continue_pipeline(
    State(state): State<Arc<AppState>>,
    Json(req): Json<QueryRequest>,
) -> Json<PipelineResponse> {
    tracing::info!("POST /continue: {}", req.user_query);
    Json(state.chat.continue_conversation(&req.user_query).await)
}

/// GET /status
pub async fn status(State(state): State<Arc<AppState>>) -> Json<PipelineResponse> {
    Json(state.chat.status().await)
}
