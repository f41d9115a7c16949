use super::models::{AiConfig, AnswerError};
use crate::core::drive::DriveFile;
use async_trait::async_trait;
use std::error::Error;
use std::sync::Arc;

/// Answer returned when synthesis is asked to work with no documents at all.
/// The orchestrator short-circuits before this point, so this is a safety net.
pub const NO_DOCUMENTS_ANSWER: &str =
    "I couldn't find any relevant documents in your Google Drive to answer that question.";

/// The phrase the model is instructed to emit verbatim when the supplied
/// documents do not contain the answer.
pub const NOT_IN_DOCUMENTS_PHRASE: &str = "I could not find an answer in the provided documents.";

#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Sends one prompt to the hosted model and returns its text response.
    async fn generate(
        &self,
        prompt: &str,
        config: &AiConfig,
    ) -> Result<String, Box<dyn Error + Send + Sync>>;
}

// Blanket implementations so the provider can be shared or boxed for
// runtime selection, same as the other ports.
#[async_trait]
impl CompletionProvider for Box<dyn CompletionProvider> {
    async fn generate(
        &self,
        prompt: &str,
        config: &AiConfig,
    ) -> Result<String, Box<dyn Error + Send + Sync>> {
        (**self).generate(prompt, config).await
    }
}

#[async_trait]
impl<P: CompletionProvider> CompletionProvider for Arc<P> {
    async fn generate(
        &self,
        prompt: &str,
        config: &AiConfig,
    ) -> Result<String, Box<dyn Error + Send + Sync>> {
        (**self).generate(prompt, config).await
    }
}

/// Builds one grounded prompt from the fetched documents and asks the model
/// to answer from them alone.
pub struct AnswerService<P: CompletionProvider> {
    provider: P,
    config: AiConfig,
}

impl<P: CompletionProvider> AnswerService<P> {
    pub fn new(provider: P, config: AiConfig) -> Self {
        Self { provider, config }
    }

    /// Answers `question` from the supplied documents.
    ///
    /// Every document must already have content populated (the fetch step
    /// guarantees this, substituting a sentinel for failed exports). No
    /// truncation or token budgeting is applied; an oversized prompt surfaces
    /// as a remote error.
    pub async fn synthesize(
        &self,
        question: &str,
        documents: &[DriveFile],
    ) -> Result<String, AnswerError> {
        if documents.is_empty() {
            return Ok(NO_DOCUMENTS_ANSWER.to_string());
        }

        let prompt = build_prompt(question, documents);
        tracing::debug!(
            documents = documents.len(),
            prompt_len = prompt.len(),
            model = %self.config.model,
            "requesting grounded answer"
        );

        self.provider
            .generate(&prompt, &self.config)
            .await
            .map_err(|err| AnswerError::Completion(err.to_string()))
    }
}

/// Deterministic prompt assembly: one delimited block per document, then the
/// grounding instructions and the question.
pub fn build_prompt(question: &str, documents: &[DriveFile]) -> String {
    let document_context = documents
        .iter()
        .map(|doc| {
            format!(
                "---\nDocument: \"{}\"\nContent:\n{}\n---",
                doc.name,
                doc.content.as_deref().unwrap_or_default()
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n");

    format!(
        "You are a helpful assistant for a user's Google Drive.\n\
         Your task is to answer the user's question based ONLY on the content of the documents provided below.\n\
         Do not use any external knowledge.\n\
         If the answer cannot be found in the provided documents, you MUST explicitly say \"{NOT_IN_DOCUMENTS_PHRASE}\"\n\
         Keep your answer concise and directly address the question.\n\
         \n\
         Here are the relevant documents:\n\
         {document_context}\n\
         \n\
         Now, please answer the following question:\n\
         Question: \"{question}\"\n"
    )
}
