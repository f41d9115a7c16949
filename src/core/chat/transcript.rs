use super::models::{ChatMessage, MessageId, Role};
use crate::core::drive::DriveFile;
use chrono::Utc;
use std::collections::HashSet;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TranscriptError {
    #[error("no message with id {0}")]
    UnknownMessage(MessageId),
    #[error("message {0} is not a model message")]
    NotAModelMessage(MessageId),
    #[error("message {0} was already finalized")]
    AlreadyFinalized(MessageId),
}

/// The session transcript: an append-only message list with one sanctioned
/// exception — an interim model message's text may be overwritten exactly
/// once when its final answer arrives. Id and sources never change.
#[derive(Debug, Default)]
pub struct Transcript {
    messages: Vec<ChatMessage>,
    finalized: HashSet<MessageId>,
    next_seq: u64,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn get(&self, id: MessageId) -> Option<&ChatMessage> {
        self.messages.iter().find(|m| m.id == id)
    }

    pub fn push_user(&mut self, text: impl Into<String>) -> MessageId {
        self.push(Role::User, text.into(), Vec::new())
    }

    pub fn push_model(&mut self, text: impl Into<String>) -> MessageId {
        self.push(Role::Model, text.into(), Vec::new())
    }

    /// Appends the interim "found N documents" model message carrying the
    /// search results as sources.
    pub fn push_interim(&mut self, text: impl Into<String>, sources: Vec<DriveFile>) -> MessageId {
        self.push(Role::Model, text.into(), sources)
    }

    /// Replaces the interim message's text with the final answer.
    ///
    /// Enforced invariants: the target must exist, must be a model message,
    /// and may be finalized only once. Sources are left untouched.
    pub fn resolve_interim(
        &mut self,
        id: MessageId,
        text: impl Into<String>,
    ) -> Result<(), TranscriptError> {
        if self.finalized.contains(&id) {
            return Err(TranscriptError::AlreadyFinalized(id));
        }
        let message = self
            .messages
            .iter_mut()
            .find(|m| m.id == id)
            .ok_or(TranscriptError::UnknownMessage(id))?;
        if message.role != Role::Model {
            return Err(TranscriptError::NotAModelMessage(id));
        }
        message.text = text.into();
        self.finalized.insert(id);
        Ok(())
    }

    fn push(&mut self, role: Role, text: String, sources: Vec<DriveFile>) -> MessageId {
        let id = MessageId(self.next_seq);
        self.next_seq += 1;
        self.messages.push(ChatMessage {
            id,
            role,
            text,
            sources,
            created_at: Utc::now(),
        });
        id
    }
}
