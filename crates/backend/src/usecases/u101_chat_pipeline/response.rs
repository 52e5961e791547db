use contracts::usecases::u101_chat_pipeline::{ERROR_MESSAGE, INVALID_RESULTS_MESSAGE};
use serde_json::Value;

/// Собирает ответ ассистента из результатов инструментов.
///
/// Для каждого инструмента берётся `output_text` (или значение целиком),
/// части разделяются пустой строкой. Результаты могут прийти JSON-строкой.
pub fn extract_response_from_results(results: &Value) -> String {
    match results {
        Value::Null => ERROR_MESSAGE.to_string(),
        Value::String(raw) => match serde_json::from_str::<Value>(raw) {
            Ok(Value::String(_)) | Err(_) => INVALID_RESULTS_MESSAGE.to_string(),
            Ok(decoded) => extract_response_from_results(&decoded),
        },
        Value::Object(map) if map.is_empty() => ERROR_MESSAGE.to_string(),
        Value::Object(map) => map
            .values()
            .map(explanation_of)
            .collect::<Vec<_>>()
            .join("\n\n"),
        _ => INVALID_RESULTS_MESSAGE.to_string(),
    }
}

fn explanation_of(result: &Value) -> String {
    match result {
        Value::Object(obj) => match obj.get("output_text") {
            Some(Value::String(text)) => text.clone(),
            Some(other) => other.to_string(),
            None => result.to_string(),
        },
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_joins_output_texts_in_tool_order() {
        // порядок инструментов из плана, а не по алфавиту
        let mut results = serde_json::Map::new();
        results.insert(
            "SchemeExplainer".into(),
            json!({"output_text": "PMEGP gives a subsidy.", "raw": 1}),
        );
        results.insert(
            "EligibilityChecker".into(),
            json!({"output_text": "You qualify."}),
        );
        assert_eq!(
            extract_response_from_results(&Value::Object(results)),
            "PMEGP gives a subsidy.\n\nYou qualify."
        );
    }

    #[test]
    fn test_plain_values_are_stringified() {
        let results = json!({"B": "text answer", "A": 42});
        assert_eq!(extract_response_from_results(&results), "text answer\n\n42");
    }

    #[test]
    fn test_empty_and_missing_results() {
        assert_eq!(extract_response_from_results(&json!({})), ERROR_MESSAGE);
        assert_eq!(extract_response_from_results(&Value::Null), ERROR_MESSAGE);
    }

    #[test]
    fn test_json_string_results() {
        let encoded = Value::String(r#"{"A": {"output_text": "decoded"}}"#.to_string());
        assert_eq!(extract_response_from_results(&encoded), "decoded");

        let garbage = Value::String("not json".to_string());
        assert_eq!(extract_response_from_results(&garbage), INVALID_RESULTS_MESSAGE);
    }
}
