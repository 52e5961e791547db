pub mod request;
pub mod response;

pub use request::QueryRequest;
pub use response::{PipelineResponse, PipelineStage, RootResponse};

use crate::usecases::common::UseCaseMetadata;

/// Ответ, который получает пользователь при любой ошибке конвейера
pub const ERROR_MESSAGE: &str =
    "I'm sorry, I'm not able to help with that request. Please try a different query.";

/// Ответ при результатах, которые не удалось декодировать
pub const INVALID_RESULTS_MESSAGE: &str = "Invalid results format.";

pub const ROOT_MESSAGE: &str = "Pipeline API for backend is running.";

pub const STATUS_MESSAGE: &str = "Active pipeline status";

pub struct ChatPipeline;

impl UseCaseMetadata for ChatPipeline {
    fn usecase_index() -> &'static str {
        "u101"
    }

    fn usecase_name() -> &'static str {
        "chat_pipeline"
    }

    fn display_name() -> &'static str {
        "Chat pipeline"
    }

    fn description() -> &'static str {
        "Extract metadata from a user query, plan tool calls and answer with their output"
    }
}
