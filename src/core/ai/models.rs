use thiserror::Error;

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Errors raised by answer synthesis.
#[derive(Debug, Error)]
pub enum AnswerError {
    #[error("failed to get an answer from the AI model: {0}")]
    Completion(String),
}

/// Generation settings passed through to the completion provider.
#[derive(Debug, Clone)]
pub struct AiConfig {
    pub model: String,
    pub temperature: f32,
    pub max_output_tokens: Option<u32>,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            temperature: 0.3,
            max_output_tokens: Some(1024),
        }
    }
}
