// UseCase handlers
pub mod u101_chat_pipeline;
