use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::handlers;
use crate::usecases::u101_chat_pipeline::ChatSession;

/// Общее состояние HTTP-слоя
pub struct AppState {
    pub chat: ChatSession,
}

impl AppState {
    pub fn new(chat: ChatSession) -> Self {
        Self { chat }
    }
}

/// Конфигурация всех роутов приложения
pub fn configure_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(handlers::u101_chat_pipeline::root))
        .route("/health", get(|| async { "ok" }))
        // UseCase u101: Chat pipeline
        .route("/start", post(handlers::u101_chat_pipeline::start))
        .route(
            "/continue",
            post(handlers::u101_chat_pipeline::continue_pipeline),
        )
        .route("/status", get(handlers::u101_chat_pipeline::status))
        .with_state(state)
}
