pub mod common;
pub mod u101_chat_pipeline;
pub mod u102_ingest_documents;
