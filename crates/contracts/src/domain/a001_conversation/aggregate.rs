use crate::domain::a002_query_metadata::aggregate::EntityValue;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Роль сообщения в диалоге
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

/// Сообщение диалога
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Message {
    pub role: ChatRole,
    pub content: String,
    #[serde(default = "Utc::now")]
    pub timestamp: DateTime<Utc>,
}

impl Message {
    pub fn new(role: ChatRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(ChatRole::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(ChatRole::Assistant, content)
    }

    pub fn is_user(&self) -> bool {
        self.role == ChatRole::User
    }
}

/// Последний результат, полученный от конкретного инструмента
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct ToolMemoryEntry {
    #[serde(default)]
    pub data: Option<serde_json::Value>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl ToolMemoryEntry {
    pub fn new(data: serde_json::Value) -> Self {
        Self {
            data: Some(data),
            updated_at: Some(Utc::now()),
        }
    }

    /// Есть ли в памяти что-то кроме null / пустых контейнеров
    pub fn has_data(&self) -> bool {
        match &self.data {
            None | Some(serde_json::Value::Null) => false,
            Some(serde_json::Value::Object(map)) => !map.is_empty(),
            Some(serde_json::Value::Array(items)) => !items.is_empty(),
            Some(serde_json::Value::String(s)) => !s.is_empty(),
            Some(_) => true,
        }
    }
}

/// Полное состояние диалога, которое сервер хранит между ходами
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct ConversationState {
    #[serde(default)]
    pub messages: Vec<Message>,
    #[serde(default)]
    pub last_tool_used: Option<String>,
    #[serde(default)]
    pub tool_memory: BTreeMap<String, ToolMemoryEntry>,
    #[serde(default)]
    pub context_entities: BTreeMap<String, EntityValue>,
}

impl ConversationState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_message(&self) -> Option<&Message> {
        self.messages.last()
    }

    /// Текст последнего ответа ассистента (пустая строка, если ответов ещё не было)
    pub fn last_assistant_message(&self) -> &str {
        self.messages
            .iter()
            .rev()
            .find(|m| m.role == ChatRole::Assistant)
            .map(|m| m.content.as_str())
            .unwrap_or("")
    }

    /// Данные последнего использованного инструмента, если они непустые
    pub fn last_tool_data(&self) -> Option<(&str, &serde_json::Value)> {
        let tool = self.last_tool_used.as_deref()?;
        let entry = self.tool_memory.get(tool)?;
        if !entry.has_data() {
            return None;
        }
        entry.data.as_ref().map(|data| (tool, data))
    }
}
