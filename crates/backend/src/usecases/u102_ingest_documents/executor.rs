use super::chunker::TextSplitter;
use super::loader::{load_directory, SourceDocument};
use crate::shared::vector_store::{Document, VectorStore};
use contracts::usecases::u102_ingest_documents::{ChunkMetadata, IngestSummary};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("Source directory not found: {0}")]
    DirNotFound(PathBuf),

    #[error("Failed to read source directory: {0}")]
    Io(#[from] std::io::Error),
}

/// Executor загрузки документов в векторное хранилище
pub struct IngestExecutor {
    store: Arc<dyn VectorStore>,
    splitter: TextSplitter,
    source: String,
}

impl IngestExecutor {
    pub fn new(store: Arc<dyn VectorStore>, splitter: TextSplitter, source: impl Into<String>) -> Self {
        Self {
            store,
            splitter,
            source: source.into(),
        }
    }

    /// Разбить документы каталога на фрагменты и записать их в хранилище.
    ///
    /// Ошибка записи одного документа не останавливает остальные.
    pub async fn run(&self, dir: &Path) -> Result<IngestSummary, IngestError> {
        if !dir.is_dir() {
            return Err(IngestError::DirNotFound(dir.to_path_buf()));
        }

        let loaded = load_directory(dir)?;
        tracing::info!(
            "Found {} files to process in '{}'",
            loaded.files_found,
            dir.display()
        );

        let mut summary = IngestSummary {
            files_found: loaded.files_found,
            documents_skipped: loaded.skipped,
            ..Default::default()
        };

        for source_doc in &loaded.documents {
            tracing::info!("Processing document: {}", source_doc.id);

            let documents = self.chunk_document(source_doc);
            tracing::info!("  - Split text into {} chunks.", documents.len());
            if documents.is_empty() {
                tracing::warn!("  - No chunks generated for '{}', skipping.", source_doc.id);
                summary.documents_skipped += 1;
                continue;
            }

            match self.store.add_documents(&documents).await {
                Ok(added) => {
                    tracing::info!(
                        "  - Successfully ADDED {} chunks for '{}' to collection '{}'.",
                        added,
                        source_doc.id,
                        self.store.collection_name()
                    );
                    summary.documents_processed += 1;
                    summary.chunks_added += added;
                }
                Err(e) => {
                    tracing::error!("  - Failed to insert chunks for '{}': {}", source_doc.id, e);
                    summary.documents_skipped += 1;
                }
            }
        }

        tracing::info!(
            "Ingestion finished. Total new chunks added: {}",
            summary.chunks_added
        );
        Ok(summary)
    }

    fn chunk_document(&self, doc: &SourceDocument) -> Vec<Document> {
        self.splitter
            .split_text(&doc.text)
            .into_iter()
            .enumerate()
            .map(|(chunk_index, page_content)| Document {
                page_content,
                metadata: ChunkMetadata {
                    id: doc.id.clone(),
                    source_file: doc.path.display().to_string(),
                    original_filename: doc.filename.clone(),
                    source: self.source.clone(),
                    chunk_index,
                },
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::vector_store::VectorStoreError;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Хранилище в памяти; документы с id "broken" отклоняются
    #[derive(Default)]
    struct MemoryStore {
        docs: Mutex<Vec<Document>>,
    }

    #[async_trait]
    impl VectorStore for MemoryStore {
        async fn add_documents(&self, documents: &[Document]) -> Result<usize, VectorStoreError> {
            if documents.iter().any(|d| d.metadata.id == "broken") {
                return Err(VectorStoreError::Rejected("broken document".into()));
            }
            self.docs.lock().unwrap().extend_from_slice(documents);
            Ok(documents.len())
        }

        fn collection_name(&self) -> &str {
            "memory"
        }
    }

    #[tokio::test]
    async fn test_run_chunks_and_stores_documents() {
        let dir = tempfile::tempdir().unwrap();
        let long_text = "Export promotion capital goods scheme. ".repeat(60);
        std::fs::write(dir.path().join("epcg.txt"), &long_text).unwrap();
        std::fs::write(dir.path().join("broken.txt"), "will be rejected").unwrap();
        std::fs::write(dir.path().join("scan.pdf"), "%PDF").unwrap();

        let store = Arc::new(MemoryStore::default());
        let executor = IngestExecutor::new(store.clone(), TextSplitter::new(700, 100), "DGFT");

        let summary = executor.run(dir.path()).await.unwrap();
        assert_eq!(summary.files_found, 3);
        assert_eq!(summary.documents_processed, 1);
        assert_eq!(summary.documents_skipped, 2);

        let docs = store.docs.lock().unwrap();
        assert_eq!(summary.chunks_added, docs.len());
        assert!(docs.len() > 1);
        for (i, doc) in docs.iter().enumerate() {
            assert_eq!(doc.metadata.chunk_index, i);
            assert_eq!(doc.metadata.id, "epcg");
            assert_eq!(doc.metadata.source, "DGFT");
            assert_eq!(doc.metadata.original_filename, "epcg.txt");
        }
    }

    #[tokio::test]
    async fn test_missing_directory() {
        let executor = IngestExecutor::new(
            Arc::new(MemoryStore::default()),
            TextSplitter::default(),
            "DGFT",
        );
        let err = executor.run(Path::new("/definitely/not/here")).await.unwrap_err();
        assert!(matches!(err, IngestError::DirNotFound(_)));
    }
}
