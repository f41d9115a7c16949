pub mod answer_service;
pub mod models;

pub use answer_service::{
    AnswerService, CompletionProvider, NOT_IN_DOCUMENTS_PHRASE, NO_DOCUMENTS_ANSWER,
};
pub use models::{AiConfig, AnswerError, DEFAULT_MODEL};
