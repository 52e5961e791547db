use crate::shared::config::EmbeddingConfig;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EmbeddingError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Unexpected embedding payload: {0}")]
    BadPayload(String),
}

/// Клиент HTTP-сервиса эмбеддингов (`POST {"text": ...}`)
#[derive(Clone)]
pub struct EmbeddingClient {
    http: reqwest::Client,
    url: String,
}

impl EmbeddingClient {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, EmbeddingError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            url: url.into(),
        })
    }

    pub fn from_config(config: &EmbeddingConfig) -> Result<Self, EmbeddingError> {
        Self::new(config.url.clone(), Duration::from_secs(config.timeout_secs))
    }

    /// Эмбеддинг одного текста
    pub async fn embed_query(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        let data: Value = self
            .http
            .post(&self.url)
            .json(&serde_json::json!({ "text": text }))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        parse_embedding(data)
    }

    /// Эмбеддинги нескольких текстов, по одному запросу на текст
    pub async fn embed_documents(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        let mut embeddings = Vec::with_capacity(texts.len());
        for text in texts {
            embeddings.push(self.embed_query(text).await?);
        }
        Ok(embeddings)
    }
}

/// Сервис отвечает либо `{"embedding": [...]}`, либо голым массивом
fn parse_embedding(data: Value) -> Result<Vec<f32>, EmbeddingError> {
    let vector = match data {
        Value::Object(mut map) => map
            .remove("embedding")
            .ok_or_else(|| EmbeddingError::BadPayload("missing `embedding` field".into()))?,
        other => other,
    };

    let Value::Array(items) = vector else {
        return Err(EmbeddingError::BadPayload("embedding is not an array".into()));
    };

    items
        .into_iter()
        .map(|v| {
            v.as_f64()
                .map(|f| f as f32)
                .ok_or_else(|| EmbeddingError::BadPayload(format!("non-numeric component: {}", v)))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    #[test]
    fn test_parse_embedding_shapes() {
        let wrapped = parse_embedding(serde_json::json!({"embedding": [0.5, 1.0]})).unwrap();
        assert_eq!(wrapped, vec![0.5, 1.0]);

        let bare = parse_embedding(serde_json::json!([0.25])).unwrap();
        assert_eq!(bare, vec![0.25]);

        assert!(parse_embedding(serde_json::json!({"vector": [1.0]})).is_err());
        assert!(parse_embedding(serde_json::json!(["a"])).is_err());
    }

    #[tokio::test]
    async fn test_embed_documents_posts_each_text() {
        let server = MockServer::start();
        let embed_mock = server.mock(|when, then| {
            when.method(POST)
                .path("/embed")
                .json_body(serde_json::json!({"text": "hello"}));
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(serde_json::json!({"embedding": [0.1, 0.2, 0.3]}));
        });

        let client = EmbeddingClient::new(server.url("/embed"), Duration::from_secs(5)).unwrap();
        let vectors = client
            .embed_documents(&["hello".to_string(), "hello".to_string()])
            .await
            .unwrap();

        embed_mock.assert_hits(2);
        assert_eq!(vectors.len(), 2);
        assert_eq!(vectors[0].len(), 3);
    }

    #[tokio::test]
    async fn test_http_error_is_reported() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/embed");
            then.status(503);
        });

        let client = EmbeddingClient::new(server.url("/embed"), Duration::from_secs(5)).unwrap();
        let err = client.embed_query("x").await.unwrap_err();
        assert!(matches!(err, EmbeddingError::Http(_)));
    }
}
