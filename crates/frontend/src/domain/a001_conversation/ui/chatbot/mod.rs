//! Chatbot UI Module (MVVM Standard)
//!
//! Structure:
//! - model.rs: API functions for the pipeline backend
//! - view_model.rs: ChatbotVm with RwSignals
//! - view.rs: Main component Chatbot

mod model;
mod view;
mod view_model;

pub use view::Chatbot;
pub use view_model::ChatbotVm;
