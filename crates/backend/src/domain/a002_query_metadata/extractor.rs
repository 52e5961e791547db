use super::location_normalizer::LocationNormalizer;
use super::prompt::{contextual_query, METADATA_SYSTEM_PROMPT};
use crate::shared::llm::{extract_embedded_json, safe_json_parse, LlmError, LlmProvider};
use contracts::domain::a001_conversation::aggregate::ConversationState;
use contracts::domain::a002_query_metadata::aggregate::{
    Entities, EntityValue, Metadata, UserProfile,
};
use serde_json::{Map, Value};
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MetadataError {
    #[error("LLM call failed: {0}")]
    Llm(#[from] LlmError),

    #[error("Metadata extraction failed: could not parse a valid JSON object with required keys.")]
    Unparseable,

    #[error("Metadata JSON missing required keys (intents/entities/user_profile).")]
    MissingKeys,

    #[error("Metadata field `{0}` has an unexpected shape")]
    InvalidField(&'static str),
}

/// Извлекает intents, сущности и профиль пользователя из запроса через LLM
pub struct MetadataExtractor {
    llm: Arc<dyn LlmProvider>,
    location_normalizer: LocationNormalizer,
}

impl MetadataExtractor {
    pub fn new(llm: Arc<dyn LlmProvider>) -> Self {
        tracing::info!(provider = llm.provider_name(), "Initializing MetadataExtractor");
        Self {
            llm,
            location_normalizer: LocationNormalizer::new(),
        }
    }

    pub async fn extract_metadata(
        &self,
        query: &str,
        state: Option<&ConversationState>,
    ) -> Result<Metadata, MetadataError> {
        tracing::info!("Extracting metadata from query: {}", query);

        let prompt = contextual_query(query, state);
        let raw_output = self.llm.run_chat(METADATA_SYSTEM_PROMPT, &prompt).await?;
        tracing::debug!("Raw output from LLM:\n{}", raw_output);

        let metadata_dict = parse_llm_output(&raw_output)?;
        let metadata = self.build_metadata(query, metadata_dict)?;

        tracing::info!(
            intents = ?metadata.intents,
            entities = ?metadata.entities,
            "Metadata extracted"
        );
        Ok(metadata)
    }

    fn build_metadata(
        &self,
        query: &str,
        mut dict: Map<String, Value>,
    ) -> Result<Metadata, MetadataError> {
        let entities = parse_entities(dict.remove("entities"))?;

        let intents = match dict.remove("intents") {
            Some(Value::Array(items)) => items.into_iter().map(value_to_string).collect(),
            Some(Value::String(single)) => vec![single],
            Some(_) => return Err(MetadataError::InvalidField("intents")),
            None => return Err(MetadataError::MissingKeys),
        };

        let profile = match dict.remove("user_profile") {
            Some(Value::Object(profile)) => profile,
            Some(_) => return Err(MetadataError::InvalidField("user_profile")),
            None => return Err(MetadataError::MissingKeys),
        };

        let user_type = profile
            .get("user_type")
            .and_then(Value::as_str)
            .ok_or(MetadataError::InvalidField("user_profile.user_type"))?
            .to_string();

        let raw_location = profile
            .get("location")
            .and_then(Value::as_str)
            .unwrap_or("");

        Ok(Metadata {
            query: query.to_string(),
            intents,
            tools_required: Vec::new(),
            entities,
            user_profile: Some(UserProfile {
                user_type,
                location: self.location_normalizer.normalize(raw_location),
            }),
        })
    }
}

/// Встроенный JSON, иначе мягкий разбор; без `user_profile` ответ непригоден
fn parse_llm_output(raw: &str) -> Result<Map<String, Value>, MetadataError> {
    match extract_embedded_json(raw) {
        Ok(map) => Ok(map),
        Err(e) => {
            tracing::warn!(
                "Embedded JSON not found or invalid: {}. Falling back to safe_json_parse.",
                e
            );
            match safe_json_parse(raw) {
                Value::Object(map) if map.contains_key("user_profile") => Ok(map),
                _ => Err(MetadataError::Unparseable),
            }
        }
    }
}

fn parse_entities(value: Option<Value>) -> Result<Entities, MetadataError> {
    let map = match value {
        None | Some(Value::Null) => return Ok(Entities::new()),
        Some(Value::Object(map)) => map,
        Some(_) => return Err(MetadataError::InvalidField("entities")),
    };

    let mut entities = Entities::new();
    for (key, value) in map {
        let entity = match value {
            Value::Null => continue,
            Value::Array(items) => {
                EntityValue::List(items.into_iter().map(value_to_string).collect())
            }
            other => EntityValue::Text(value_to_string(other)),
        };
        let entity = if key == "scheme" {
            entity.collapse_singleton()
        } else {
            entity
        };
        entities.insert(key, entity);
    }
    Ok(entities)
}

fn value_to_string(value: Value) -> String {
    match value {
        Value::String(s) => s,
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::llm::{ChatMessage, LlmResponse};
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Отвечает заранее заданным текстом и запоминает последний запрос
    struct ScriptedLlm {
        reply: String,
        last_prompt: Mutex<Option<String>>,
    }

    impl ScriptedLlm {
        fn new(reply: &str) -> Arc<Self> {
            Arc::new(Self {
                reply: reply.to_string(),
                last_prompt: Mutex::new(None),
            })
        }
    }

    #[async_trait]
    impl LlmProvider for ScriptedLlm {
        async fn chat_completion(
            &self,
            messages: Vec<ChatMessage>,
        ) -> Result<LlmResponse, LlmError> {
            *self.last_prompt.lock().unwrap() = messages.last().map(|m| m.content.clone());
            Ok(LlmResponse {
                content: self.reply.clone(),
                tokens_used: None,
                model: "scripted".into(),
                finish_reason: None,
            })
        }

        fn provider_name(&self) -> &str {
            "scripted"
        }
    }

    #[tokio::test]
    async fn test_extracts_from_prose_wrapped_json() {
        let llm = ScriptedLlm::new(
            r#"Here you go:
```json
{"intents": ["explain"], "entities": {"scheme": ["PMEGP"]}, "user_profile": {"user_type": "woman_entrepreneur", "location": "Pune, Maharashtra"}}
```"#,
        );
        let extractor = MetadataExtractor::new(llm);

        let metadata = extractor
            .extract_metadata("Explain PMEGP for me", None)
            .await
            .unwrap();

        assert_eq!(metadata.intents, vec!["explain"]);
        assert_eq!(
            metadata.scheme(),
            Some(&EntityValue::Text("PMEGP".to_string()))
        );
        let profile = metadata.user_profile.unwrap();
        assert_eq!(profile.user_type, "woman_entrepreneur");
        assert_eq!(profile.location.state.as_deref(), Some("Maharashtra"));
        assert!(metadata.tools_required.is_empty());
    }

    #[tokio::test]
    async fn test_unknown_location_becomes_india() {
        let llm = ScriptedLlm::new(
            r#"{"intents": ["check_eligibility"], "entities": {"scheme": ["Mudra", "PMEGP"]}, "user_profile": {"user_type": "student", "location": "unknown"}}"#,
        );
        let extractor = MetadataExtractor::new(llm);

        let metadata = extractor.extract_metadata("am I eligible?", None).await.unwrap();
        let location = metadata.user_profile.unwrap().location;
        assert_eq!(location.raw, "unknown");
        assert_eq!(location.country.as_deref(), Some("India"));
        assert_eq!(
            metadata.entities["scheme"],
            EntityValue::List(vec!["Mudra".into(), "PMEGP".into()])
        );
    }

    #[tokio::test]
    async fn test_prompt_carries_conversation_context() {
        let llm = ScriptedLlm::new(
            r#"{"intents": ["explain"], "entities": {}, "user_profile": {"user_type": "entrepreneur", "location": ""}}"#,
        );
        let extractor = MetadataExtractor::new(llm.clone());
        let mut state = ConversationState::new();
        state.last_tool_used = Some("SchemeExplainer".into());

        extractor
            .extract_metadata("tell me more", Some(&state))
            .await
            .unwrap();

        let prompt = llm.last_prompt.lock().unwrap().clone().unwrap();
        assert!(prompt.contains("Previous tool used: SchemeExplainer"));
        assert!(prompt.ends_with("Current query: tell me more"));
    }

    #[tokio::test]
    async fn test_plain_text_reply_is_unparseable() {
        let extractor = MetadataExtractor::new(ScriptedLlm::new("I cannot help with that."));
        let err = extractor.extract_metadata("hi", None).await.unwrap_err();
        assert!(matches!(err, MetadataError::Unparseable));
    }

    #[tokio::test]
    async fn test_missing_intents_is_error() {
        let extractor = MetadataExtractor::new(ScriptedLlm::new(
            r#"{"entities": {}, "user_profile": {"user_type": "student", "location": "india"}}"#,
        ));
        let err = extractor.extract_metadata("hi", None).await.unwrap_err();
        assert!(matches!(err, MetadataError::MissingKeys));
    }
}
