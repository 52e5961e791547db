use serde::{Deserialize, Serialize};

/// Тело запросов POST /start и POST /continue
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QueryRequest {
    pub user_query: String,
}

impl QueryRequest {
    pub fn new(user_query: impl Into<String>) -> Self {
        Self {
            user_query: user_query.into(),
        }
    }
}
