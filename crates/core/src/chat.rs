//! Conversation turns passed along with assistant prompts.

use serde::{Deserialize, Serialize};

/// Number of prior turns forwarded to the model.
pub const MAX_HISTORY_TURNS: usize = 5;

/// Who produced a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    #[serde(alias = "bot", alias = "model")]
    Assistant,
}

/// One message in a shopper/assistant conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    #[serde(alias = "type")]
    pub role: ChatRole,
    pub text: String,
}

impl ChatTurn {
    #[must_use]
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            text: text.into(),
        }
    }

    #[must_use]
    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            text: text.into(),
        }
    }
}

/// The tail of `history` to send with the next prompt.
///
/// Keeps at most [`MAX_HISTORY_TURNS`] turns and drops assistant turns at the
/// front, since a conversation sent to the model must open with a user turn.
#[must_use]
pub fn recent_history(history: &[ChatTurn]) -> &[ChatTurn] {
    let start = history.len().saturating_sub(MAX_HISTORY_TURNS);
    let tail = history.get(start..).unwrap_or_default();
    let first_user = tail
        .iter()
        .position(|t| t.role == ChatRole::User)
        .unwrap_or(tail.len());
    tail.get(first_user..).unwrap_or_default()
}
