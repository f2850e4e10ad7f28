//! Chat message types and the model collaborator seam

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Author of a message in the transcript
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::User => write!(f, "user"),
            Role::Assistant => write!(f, "assistant"),
        }
    }
}

/// A single message in a conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }
}

/// A language model that turns a transcript into the next assistant reply.
///
/// Implementations own transport, auth and retries. Callers only see text in,
/// text out; any failure comes back as an `Err` for the caller to report.
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Model identifier, for display and logging
    fn model(&self) -> &str;

    /// Generate a reply for `messages` under `system`
    async fn complete(&self, system: &str, messages: &[ChatMessage]) -> Result<String>;
}
