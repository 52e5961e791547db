use serde::{Deserialize, Serialize};

/// Метаданные, прикрепляемые к каждому фрагменту документа
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChunkMetadata {
    pub id: String,
    pub source_file: String,
    pub original_filename: String,
    pub source: String,
    pub chunk_index: usize,
}

/// Итог прогона загрузки
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct IngestSummary {
    pub files_found: usize,
    pub documents_processed: usize,
    pub documents_skipped: usize,
    pub chunks_added: usize,
}
