pub mod json_extract;
pub mod openai_provider;
pub mod types;

pub use json_extract::{extract_embedded_json, safe_json_parse};
pub use openai_provider::OpenAiProvider;
pub use types::*;
