//! Gemini integration for the shopping assistant.
//!
//! The assistant depends on [`TextCompletion`] rather than on the client
//! directly, so prompt handling can be exercised without network access.

mod client;
mod error;
pub mod types;

use std::future::Future;

use zar_core::ChatTurn;

pub use client::GeminiClient;
pub use error::GeminiError;
pub use types::GenerationConfig;

/// A prompt plus the prior conversation to send with it.
#[derive(Debug, Clone, Default)]
pub struct CompletionRequest {
    pub prompt: String,
    /// Prior turns, oldest first. Must open with a user turn if non-empty.
    pub history: Vec<ChatTurn>,
    pub generation: Option<GenerationConfig>,
}

impl CompletionRequest {
    /// A single-shot prompt with default sampling.
    #[must_use]
    pub fn prompt(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            ..Self::default()
        }
    }
}

/// Something that turns a prompt into free-form text.
pub trait TextCompletion: Send + Sync {
    /// Generate a reply for `request`.
    fn complete(
        &self,
        request: CompletionRequest,
    ) -> impl Future<Output = Result<String, GeminiError>> + Send;
}
