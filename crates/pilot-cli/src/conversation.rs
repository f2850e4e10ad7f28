//! Conversation history and REPL input history
//!
//! The conversation is append-only for the lifetime of a session. The only
//! way to change existing messages is to swap the whole history on load.

use anyhow::Result;
use pilot_core::{ChatMessage, Role};
use std::fs;
use std::path::{Path, PathBuf};

/// Ordered, append-only transcript of the running session
#[derive(Debug, Clone, Default)]
pub struct ConversationStore {
    messages: Vec<ChatMessage>,
}

impl ConversationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a message at the end of the transcript
    pub fn append(&mut self, role: Role, content: impl Into<String>) {
        self.messages.push(ChatMessage::new(role, content));
    }

    /// The full transcript in insertion order
    pub fn snapshot(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Replace the whole transcript with a loaded one
    pub fn replace(&mut self, messages: Vec<ChatMessage>) {
        self.messages = messages;
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

/// REPL input history manager
pub struct InputHistory {
    /// Path to history file
    path: PathBuf,
}

impl InputHistory {
    /// Create a new history manager
    pub fn new() -> Result<Self> {
        let dir = dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("shellpilot");

        fs::create_dir_all(&dir)?;

        Ok(Self {
            path: dir.join("history"),
        })
    }

    /// Get the history file path
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_preserves_order() {
        let mut store = ConversationStore::new();
        store.append(Role::User, "list files");
        store.append(Role::Assistant, "[cmd]ls[/cmd]");
        store.append(Role::User, "Command executed: ls\nOutput: a.txt");

        let roles: Vec<Role> = store.snapshot().iter().map(|m| m.role).collect();
        assert_eq!(roles, vec![Role::User, Role::Assistant, Role::User]);
        assert_eq!(store.snapshot()[1].content, "[cmd]ls[/cmd]");
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn test_replace_swaps_everything() {
        let mut store = ConversationStore::new();
        store.append(Role::User, "old");

        store.replace(vec![ChatMessage::user("a"), ChatMessage::assistant("b")]);
        assert_eq!(store.len(), 2);
        assert_eq!(store.snapshot()[0].content, "a");

        store.replace(Vec::new());
        assert!(store.is_empty());
    }
}
