use contracts::domain::a001_conversation::aggregate::ConversationState;

pub const METADATA_SYSTEM_PROMPT: &str = r#"You are a metadata extraction assistant.
Your job is to extract the following structured fields from a user query:
- intents: A list of high-level user goals like 'explain', 'check_eligibility', 'register'
- entities: Key entities such as the name of the scheme. If multiple schemes are mentioned, return them as a list.
- user_profile: Includes 'user_type' (e.g., 'woman_entrepreneur', 'student') and 'location'. If no location is specified in the query, use "unknown" or "India" as a fallback.
- If user_type is not explicitly mentioned, infer it from the context (e.g., if asking about subsidies, default to "entrepreneur").
- Always return non-empty user_type and location if possible.

Respond ONLY with the following JSON structure:
{
    "intents": [...],
    "entities": {
        "scheme": "..."
    },
    "user_profile": {
        "user_type": "...",
        "location": "..."
    }
}

- Make sure all keys are enclosed in double quotes and properly comma-separated."#;

/// Подсказка из предыдущих ходов для уточняющих вопросов
pub fn context_hint(state: &ConversationState) -> String {
    let last_tool = state.last_tool_used.as_deref().unwrap_or("");
    let last_msg = state
        .last_message()
        .map(|m| m.content.as_str())
        .unwrap_or("");
    let last_entities =
        serde_json::to_string(&state.context_entities).unwrap_or_else(|_| "{}".to_string());

    format!(
        "Previous tool used: {}\n\
         Last assistant message: {}\n\
         Previously detected entities (if any): {}\n\
         Use this context if the current query is ambiguous or a follow-up.",
        last_tool, last_msg, last_entities
    )
}

/// Запрос пользователя с подмешанным контекстом диалога
pub fn contextual_query(query: &str, state: Option<&ConversationState>) -> String {
    match state {
        Some(state) => format!("{}\n\nCurrent query: {}", context_hint(state), query),
        None => query.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::domain::a001_conversation::aggregate::Message;

    #[test]
    fn test_contextual_query_includes_history() {
        let mut state = ConversationState::new();
        state.last_tool_used = Some("SchemeExplainer".into());
        state.messages.push(Message::assistant("PMEGP is a credit-linked subsidy"));

        let q = contextual_query("am I eligible?", Some(&state));
        assert!(q.contains("Previous tool used: SchemeExplainer"));
        assert!(q.contains("Last assistant message: PMEGP is a credit-linked subsidy"));
        assert!(q.ends_with("Current query: am I eligible?"));
    }

    #[test]
    fn test_plain_query_without_state() {
        assert_eq!(contextual_query("hello", None), "hello");
    }
}
