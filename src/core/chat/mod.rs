pub mod chat_service;
pub mod models;
pub mod transcript;

pub use chat_service::{
    interim_text, ChatService, API_KEY_ERROR_TEXT, GENERIC_ERROR_TEXT, GREETING_TEXT,
    NO_RESULTS_TEXT,
};
pub use models::{ChatMessage, MessageId, Role, SessionState};
pub use transcript::{Transcript, TranscriptError};
