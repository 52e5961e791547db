use contracts::domain::a001_conversation::aggregate::{
    ChatRole, ConversationState, Message, ToolMemoryEntry,
};
use contracts::domain::a002_query_metadata::aggregate::Entities;
use contracts::usecases::u101_chat_pipeline::{PipelineStage, ERROR_MESSAGE};

/// Владелец состояния текущего диалога
#[derive(Debug, Default)]
pub struct StateManager {
    state: ConversationState,
    // растет при каждом reset
    generation: u64,
}

impl StateManager {
    /// Начать диалог заново
    pub fn reset(&mut self) {
        self.state = ConversationState::new();
        self.generation += 1;
    }

    /// Номер диалога; ход, начатый в другом диалоге, не должен в него писать
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn add_message(&mut self, role: ChatRole, content: impl Into<String>) {
        self.state.messages.push(Message::new(role, content));
    }

    pub fn state(&self) -> &ConversationState {
        &self.state
    }

    /// Копия состояния для запуска конвейера без удержания блокировки
    pub fn snapshot(&self) -> ConversationState {
        self.state.clone()
    }

    /// Запомнить вывод инструмента и отметить его как последний использованный
    pub fn record_tool_output(&mut self, tool_name: &str, data: serde_json::Value) {
        self.state
            .tool_memory
            .insert(tool_name.to_string(), ToolMemoryEntry::new(data));
        self.state.last_tool_used = Some(tool_name.to_string());
    }

    pub fn merge_entities(&mut self, entities: Entities) {
        self.state.context_entities.extend(entities);
    }

    /// Стадия для GET /status, выводимая из истории сообщений
    pub fn current_stage(&self) -> PipelineStage {
        match self.state.last_message() {
            Some(last) if last.role == ChatRole::Assistant => {
                if last.content == ERROR_MESSAGE {
                    PipelineStage::Failed
                } else {
                    PipelineStage::Completed
                }
            }
            _ => PipelineStage::InProgress,
        }
    }

    /// Результаты для GET /status: вывод последнего инструмента и последний ответ
    pub fn status_results(&self) -> Option<serde_json::Map<String, serde_json::Value>> {
        let (tool, data) = self.state.last_tool_data()?;
        let mut results = serde_json::Map::new();
        results.insert(
            tool.to_string(),
            serde_json::json!({
                "output_text": self.state.last_assistant_message(),
                "raw_output": data,
            }),
        );
        Some(results)
    }
}
