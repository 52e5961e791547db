pub mod request;

pub use request::{ChunkMetadata, IngestSummary};

use crate::usecases::common::UseCaseMetadata;

pub struct IngestDocuments;

impl UseCaseMetadata for IngestDocuments {
    fn usecase_index() -> &'static str {
        "u102"
    }

    fn usecase_name() -> &'static str {
        "ingest_documents"
    }

    fn display_name() -> &'static str {
        "Document ingestion"
    }

    fn description() -> &'static str {
        "Chunk source documents, embed them and add them to the vector store"
    }
}
