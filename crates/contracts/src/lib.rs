//! Общие типы для backend и frontend: состояние диалога, метаданные запроса,
//! реестр инструментов и DTO HTTP API.

pub mod domain;
pub mod usecases;
