use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Значение сущности: одна строка или список (например, несколько схем)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum EntityValue {
    Text(String),
    List(Vec<String>),
}

impl EntityValue {
    /// Список из одного элемента сворачивается в строку
    pub fn collapse_singleton(self) -> Self {
        match self {
            EntityValue::List(mut items) if items.len() == 1 => {
                EntityValue::Text(items.remove(0))
            }
            other => other,
        }
    }

    /// Все значения как список строк
    pub fn values(&self) -> Vec<String> {
        match self {
            EntityValue::Text(s) => vec![s.clone()],
            EntityValue::List(items) => items.clone(),
        }
    }
}

pub type Entities = BTreeMap<String, EntityValue>;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Location {
    pub raw: String,
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
}

impl Location {
    /// Локация по умолчанию, когда пользователь её не указал
    pub fn india(raw: impl Into<String>) -> Self {
        Self {
            raw: raw.into(),
            city: None,
            state: None,
            country: Some("India".to_string()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserProfile {
    /// Например "woman_entrepreneur", "student"
    pub user_type: String,
    pub location: Location,
}

/// Структурированные метаданные, извлечённые из запроса пользователя
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Metadata {
    pub query: String,
    pub intents: Vec<String>,
    /// Заполняется планировщиком
    #[serde(default)]
    pub tools_required: Vec<String>,
    #[serde(default)]
    pub entities: Entities,
    pub user_profile: Option<UserProfile>,
}

impl Metadata {
    pub fn scheme(&self) -> Option<&EntityValue> {
        self.entities.get("scheme")
    }
}
