//! Chatbot - View Model

use contracts::domain::a001_conversation::aggregate::Message;
use contracts::usecases::u101_chat_pipeline::{PipelineResponse, PipelineStage};
use leptos::prelude::*;

/// Куда отправлять очередной запрос
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitTarget {
    Start,
    Continue,
}

#[derive(Clone, Copy)]
pub struct ChatbotVm {
    pub messages: RwSignal<Vec<Message>>,
    pub draft: RwSignal<String>,
    pub error: RwSignal<Option<String>>,
    pub is_sending: RwSignal<bool>,
    pub stage: RwSignal<Option<PipelineStage>>,
    /// Был ли уже успешный /start в этом диалоге
    pub started: RwSignal<bool>,
}

impl ChatbotVm {
    pub fn new() -> Self {
        Self {
            messages: RwSignal::new(Vec::new()),
            draft: RwSignal::new(String::new()),
            error: RwSignal::new(None),
            is_sending: RwSignal::new(false),
            stage: RwSignal::new(None),
            started: RwSignal::new(false),
        }
    }

    pub fn submit_target(&self) -> SubmitTarget {
        if self.started.get_untracked() {
            SubmitTarget::Continue
        } else {
            SubmitTarget::Start
        }
    }

    /// Забирает черновик и добавляет оптимистичное сообщение пользователя.
    ///
    /// `None`, если черновик пуст или запрос уже в полёте.
    pub fn begin_send(&self) -> Option<String> {
        if self.is_sending.get_untracked() {
            return None;
        }
        let query = self.draft.get_untracked().trim().to_string();
        if query.is_empty() {
            return None;
        }

        self.draft.set(String::new());
        self.error.set(None);
        self.is_sending.set(true);
        self.stage.set(Some(PipelineStage::InProgress));
        self.messages.update(|msgs| msgs.push(Message::user(query.clone())));
        Some(query)
    }

    /// Транскрипт заменяется состоянием сервера
    pub fn apply_response(&self, response: PipelineResponse) {
        self.messages.set(response.state.messages);
        self.stage.set(Some(response.stage));
        self.started.set(true);
        self.is_sending.set(false);
    }

    /// Откат оптимистичного сообщения; текст возвращается в черновик
    pub fn fail(&self, query: &str, error: String) {
        self.messages.update(|msgs| {
            if msgs.last().is_some_and(|m| m.is_user() && m.content == query) {
                msgs.pop();
            }
        });
        if self.draft.get_untracked().is_empty() {
            self.draft.set(query.to_string());
        }
        self.error.set(Some(error));
        self.stage.set(None);
        self.is_sending.set(false);
    }

    /// Восстановить диалог по ответу /status, если он не пуст
    pub fn restore(&self, status: PipelineResponse) {
        if status.state.messages.is_empty() || !self.messages.get_untracked().is_empty() {
            return;
        }
        self.apply_response(status);
    }

    /// Новый чат: следующий запрос снова уйдёт в /start
    pub fn reset(&self) {
        self.messages.set(Vec::new());
        self.draft.set(String::new());
        self.error.set(None);
        self.stage.set(None);
        self.started.set(false);
    }
}

impl Default for ChatbotVm {
    fn default() -> Self {
        Self::new()
    }
}

pub fn stage_label(stage: PipelineStage) -> &'static str {
    match stage {
        PipelineStage::Completed => "Answered",
        PipelineStage::Failed => "Failed",
        PipelineStage::InProgress
        | PipelineStage::Initialized
        | PipelineStage::MetadataExtracted
        | PipelineStage::Planned
        | PipelineStage::Executing => "Thinking...",
    }
}
