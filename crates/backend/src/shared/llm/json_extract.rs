//! Разбор JSON из ответов модели, которые могут содержать прозу вокруг объекта.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value};

static FENCED_JSON: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)```(?:json)?\s*(\{.*?\})\s*```").expect("valid regex"));

static BRACE_BLOCK: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)\{.*\}").expect("valid regex"));

/// Достаёт JSON-объект из ответа модели.
///
/// Сначала ищется блок ```json ... ```, иначе берётся самый широкий `{...}`.
pub fn extract_embedded_json(raw: &str) -> Result<Map<String, Value>, String> {
    let candidate = FENCED_JSON
        .captures(raw)
        .and_then(|c| c.get(1))
        .or_else(|| BRACE_BLOCK.find(raw))
        .map(|m| m.as_str())
        .ok_or_else(|| "No valid JSON object found in LLM response.".to_string())?;

    match serde_json::from_str::<Value>(candidate) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err("Embedded JSON is not an object.".to_string()),
        Err(e) => Err(format!("Embedded JSON is invalid: {}", e)),
    }
}

/// Мягкий разбор: объект JSON как есть, иначе текст оборачивается в
/// `{"output_text": raw}`.
pub fn safe_json_parse(raw: &str) -> Value {
    let trimmed = strip_code_fence(raw.trim());
    match serde_json::from_str::<Value>(trimmed) {
        Ok(value @ Value::Object(_)) => value,
        _ => serde_json::json!({ "output_text": raw }),
    }
}

fn strip_code_fence(s: &str) -> &str {
    let Some(rest) = s.strip_prefix("```") else {
        return s;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.strip_suffix("```").unwrap_or(rest).trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefers_fenced_block() {
        let raw = "Here is {not json} and\n```json\n{\"intents\": [\"explain\"]}\n```\nbye";
        let map = extract_embedded_json(raw).unwrap();
        assert_eq!(map["intents"][0], "explain");
    }

    #[test]
    fn test_falls_back_to_largest_brace_block() {
        let raw = "Sure! {\"entities\": {\"scheme\": \"PMEGP\"}, \"intents\": []} hope this helps";
        let map = extract_embedded_json(raw).unwrap();
        assert_eq!(map["entities"]["scheme"], "PMEGP");
    }

    #[test]
    fn test_no_json_is_error() {
        assert!(extract_embedded_json("no structured output here").is_err());
        assert!(extract_embedded_json("{broken: json}").is_err());
    }

    #[test]
    fn test_safe_json_parse() {
        let parsed = safe_json_parse("```json\n{\"a\": 1}\n```");
        assert_eq!(parsed["a"], 1);

        let wrapped = safe_json_parse("plain answer");
        assert_eq!(wrapped["output_text"], "plain answer");

        let array = safe_json_parse("[1, 2]");
        assert_eq!(array["output_text"], "[1, 2]");
    }
}
