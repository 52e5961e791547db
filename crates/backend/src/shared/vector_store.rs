use crate::shared::config::VectorStoreConfig;
use crate::shared::embedding::{EmbeddingClient, EmbeddingError};
use async_trait::async_trait;
use contracts::usecases::u102_ingest_documents::ChunkMetadata;
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum VectorStoreError {
    #[error("embedding failed: {0}")]
    Embedding(#[from] EmbeddingError),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("vector store rejected documents: {0}")]
    Rejected(String),
}

/// Фрагмент документа, готовый к записи в хранилище
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub page_content: String,
    pub metadata: ChunkMetadata,
}

impl Document {
    /// Стабильный идентификатор фрагмента: `<doc_id>-<chunk_index>`
    pub fn document_id(&self) -> String {
        format!("{}-{}", self.metadata.id, self.metadata.chunk_index)
    }
}

#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Добавить документы, вернуть число записанных
    async fn add_documents(&self, documents: &[Document]) -> Result<usize, VectorStoreError>;

    fn collection_name(&self) -> &str;
}

/// Data API принимает не больше 20 документов в одном `insertMany`
const INSERT_BATCH_SIZE: usize = 20;

/// Коллекция Astra DB через Data API (`insertMany`)
pub struct AstraVectorStore {
    http: reqwest::Client,
    embeddings: EmbeddingClient,
    api_endpoint: String,
    token: String,
    keyspace: String,
    collection: String,
}

impl AstraVectorStore {
    pub fn new(
        embeddings: EmbeddingClient,
        api_endpoint: impl Into<String>,
        token: impl Into<String>,
        keyspace: impl Into<String>,
        collection: impl Into<String>,
    ) -> Self {
        Self {
            http: reqwest::Client::new(),
            embeddings,
            api_endpoint: api_endpoint.into(),
            token: token.into(),
            keyspace: keyspace.into(),
            collection: collection.into(),
        }
    }

    pub fn from_config(
        config: &VectorStoreConfig,
        embeddings: EmbeddingClient,
    ) -> anyhow::Result<Self> {
        Ok(Self::new(
            embeddings,
            config.endpoint()?,
            config.token()?,
            config.keyspace.clone(),
            config.collection.clone(),
        ))
    }

    fn collection_url(&self) -> String {
        format!(
            "{}/api/json/v1/{}/{}",
            self.api_endpoint.trim_end_matches('/'),
            self.keyspace,
            self.collection
        )
    }

    async fn insert_batch(&self, documents: &[Document]) -> Result<usize, VectorStoreError> {
        let texts: Vec<String> = documents.iter().map(|d| d.page_content.clone()).collect();
        let vectors = self.embeddings.embed_documents(&texts).await?;

        let payload: Vec<Value> = documents
            .iter()
            .zip(vectors)
            .map(|(doc, vector)| {
                serde_json::json!({
                    "_id": doc.document_id(),
                    "content": doc.page_content,
                    "metadata": doc.metadata,
                    "$vector": vector,
                })
            })
            .collect();

        let response: Value = self
            .http
            .post(self.collection_url())
            .header("Token", &self.token)
            .json(&serde_json::json!({ "insertMany": { "documents": payload } }))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        if let Some(errors) = response.get("errors") {
            return Err(VectorStoreError::Rejected(errors.to_string()));
        }

        let inserted = response
            .pointer("/status/insertedIds")
            .and_then(Value::as_array)
            .map(|ids| ids.len())
            .unwrap_or(documents.len());

        Ok(inserted)
    }
}

#[async_trait]
impl VectorStore for AstraVectorStore {
    async fn add_documents(&self, documents: &[Document]) -> Result<usize, VectorStoreError> {
        let mut inserted = 0;
        for batch in documents.chunks(INSERT_BATCH_SIZE) {
            inserted += self.insert_batch(batch).await?;
        }
        Ok(inserted)
    }

    fn collection_name(&self) -> &str {
        &self.collection
    }
}
