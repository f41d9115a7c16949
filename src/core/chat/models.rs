use crate::core::drive::DriveFile;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Session-unique message identifier.
///
/// A plain monotonic sequence: collision-free within one session, and stable
/// so the interim message can be targeted for its single text replacement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageId(pub u64);

impl std::fmt::Display for MessageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "msg-{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    User,
    Model,
}

/// One entry in the conversation transcript.
///
/// `sources` is ordered, set at creation and immutable afterwards; it is
/// empty for user messages and for no-results/error messages. `text` may be
/// replaced exactly once (interim → final) through the transcript reducer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: MessageId,
    pub role: Role,
    pub text: String,
    pub sources: Vec<DriveFile>,
    pub created_at: DateTime<Utc>,
}

/// Per-session UI-facing state.
///
/// `api_ready` is set once after bootstrap and never reverts. `connected`
/// flips after a successful token grant. `pending` is true exactly while one
/// turn's pipeline is in flight; submissions while pending are ignored.
#[derive(Debug, Clone, Copy, Default)]
pub struct SessionState {
    pub api_ready: bool,
    pub connected: bool,
    pub pending: bool,
}
