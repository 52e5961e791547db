use super::pipeline::{PipelineOutput, PipelineRunner};
use super::response::extract_response_from_results;
use crate::domain::a001_conversation::StateManager;
use contracts::domain::a001_conversation::aggregate::{ChatRole, Message};
use contracts::usecases::u101_chat_pipeline::{
    PipelineResponse, PipelineStage, ERROR_MESSAGE, STATUS_MESSAGE,
};
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Текущий диалог и конвейер, которым на него отвечают.
///
/// Блокировка состояния не удерживается во время прогона конвейера, поэтому
/// GET /status во время хода видит стадию IN_PROGRESS.
pub struct ChatSession {
    state: Mutex<StateManager>,
    runner: Arc<dyn PipelineRunner>,
}

impl ChatSession {
    pub fn new(runner: Arc<dyn PipelineRunner>) -> Self {
        Self {
            state: Mutex::new(StateManager::default()),
            runner,
        }
    }

    /// POST /start: сбросить диалог и ответить на первый запрос
    pub async fn start(&self, user_query: &str) -> PipelineResponse {
        tracing::info!("Starting new conversation");
        self.run_turn(user_query, true).await
    }

    /// POST /continue: следующий ход текущего диалога
    pub async fn continue_conversation(&self, user_query: &str) -> PipelineResponse {
        self.run_turn(user_query, false).await
    }

    /// GET /status
    pub async fn status(&self) -> PipelineResponse {
        let state = self.state.lock().await;
        PipelineResponse {
            message: STATUS_MESSAGE.to_string(),
            stage: state.current_stage(),
            results: state.status_results(),
            state: state.snapshot(),
        }
    }

    async fn run_turn(&self, user_query: &str, reset: bool) -> PipelineResponse {
        // Сброс и сообщение пользователя под одной блокировкой
        let (mut snapshot, generation) = {
            let mut state = self.state.lock().await;
            if reset {
                state.reset();
            }
            state.add_message(ChatRole::User, user_query);
            (state.snapshot(), state.generation())
        };

        let outcome = self.runner.run(user_query, &snapshot).await;

        let mut state = self.state.lock().await;
        // Пока шел прогон, диалог начали заново: ответ уходит клиенту, но не в историю
        let stale = state.generation() != generation;
        if stale {
            tracing::warn!(
                "Conversation was restarted while answering '{}', result is not recorded",
                user_query
            );
        }

        let (message, stage, results) = match outcome {
            Ok(output) => {
                if !stale {
                    remember_output(&mut state, &output);
                }
                let results = Value::Object(output.results.clone());
                (
                    extract_response_from_results(&results),
                    output.stage,
                    Some(output.results),
                )
            }
            Err(e) => {
                // Ошибка конвейера не превращается в 5xx: пользователь получает
                // стандартный ответ, а детали остаются в логе
                tracing::error!("Pipeline failed for query '{}': {}", user_query, e);
                (ERROR_MESSAGE.to_string(), PipelineStage::Failed, None)
            }
        };

        let state = if stale {
            snapshot
                .messages
                .push(Message::new(ChatRole::Assistant, message.clone()));
            snapshot
        } else {
            state.add_message(ChatRole::Assistant, message.clone());
            state.snapshot()
        };

        PipelineResponse {
            message,
            stage,
            results,
            state,
        }
    }
}

/// Вывод инструментов и сущности запроса переходят в контекст следующих ходов
fn remember_output(state: &mut StateManager, output: &PipelineOutput) {
    for tool_name in output.plan.tool_names() {
        if let Some(data) = output.results.get(&tool_name) {
            state.record_tool_output(&tool_name, data.clone());
        }
    }
    state.merge_entities(output.metadata.entities.clone());
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::usecases::u101_chat_pipeline::PipelineError;
    use async_trait::async_trait;
    use contracts::domain::a001_conversation::aggregate::ConversationState;
    use contracts::domain::a002_query_metadata::aggregate::{EntityValue, Metadata};
    use contracts::domain::a003_tool_registry::aggregate::{ExecutionPlan, ExecutionType, ToolTask};
    use serde_json::json;

    /// Отвечает SchemeExplainer'ом на всё, кроме запросов со словом "fail".
    /// Запросы со словом "slow" отвечают через 200 мс.
    pub struct ScriptedRunner;

    #[async_trait]
    impl PipelineRunner for ScriptedRunner {
        async fn run(
            &self,
            query: &str,
            _state: &ConversationState,
        ) -> Result<PipelineOutput, PipelineError> {
            if query.contains("slow") {
                tokio::time::sleep(std::time::Duration::from_millis(200)).await;
            }
            if query.contains("fail") {
                return Err(PipelineError::NoResults);
            }

            let mut results = serde_json::Map::new();
            results.insert(
                "SchemeExplainer".into(),
                json!({"output_text": format!("Answer to: {}", query)}),
            );

            let mut metadata = Metadata {
                query: query.to_string(),
                intents: vec!["explain".into()],
                tools_required: vec!["SchemeExplainer".into()],
                entities: Default::default(),
                user_profile: None,
            };
            metadata
                .entities
                .insert("scheme".into(), EntityValue::Text("PMEGP".into()));

            Ok(PipelineOutput {
                stage: PipelineStage::Completed,
                metadata,
                plan: ExecutionPlan {
                    execution_type: ExecutionType::Sequential,
                    task_list: vec![ToolTask {
                        tool_name: "SchemeExplainer".into(),
                        input: Default::default(),
                        input_from: None,
                    }],
                },
                results,
            })
        }
    }
}
