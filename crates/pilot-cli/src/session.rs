//! Session persistence for conversation history
//!
//! Saves the transcript to `conversation_<YYYYMMDD_HHMMSS>.json` and loads
//! such files back so a conversation can be resumed.

use anyhow::{Context, Result};
use chrono::{DateTime, Local, SecondsFormat};
use pilot_core::ChatMessage;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use tracing::{debug, info};

/// On-disk form of a saved conversation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    /// When the session was saved (ISO-8601)
    pub timestamp: String,
    /// Conversation messages in chronological order
    pub conversation: Vec<ChatMessage>,
}

impl Session {
    fn at(now: DateTime<Local>, messages: &[ChatMessage]) -> Self {
        Self {
            timestamp: now.to_rfc3339_opts(SecondsFormat::Secs, false),
            conversation: messages.to_vec(),
        }
    }
}

/// Session store for saving and loading sessions
pub struct SessionStore {
    /// Directory new session files are written to
    base_dir: PathBuf,
}

impl SessionStore {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    /// Save the transcript and return the path written
    pub fn save(&self, messages: &[ChatMessage]) -> Result<PathBuf> {
        let now = Local::now();
        let path = self.base_dir.join(session_file_name(&now));
        let session = Session::at(now, messages);

        fs::create_dir_all(&self.base_dir).with_context(|| {
            format!("Failed to create sessions directory {}", self.base_dir.display())
        })?;

        let json = serde_json::to_string_pretty(&session).context("Failed to serialize session")?;
        fs::write(&path, json)
            .with_context(|| format!("Failed to write session file {}", path.display()))?;

        info!(path = %path.display(), messages = messages.len(), "Saved session");
        Ok(path)
    }

    /// Load the transcript stored in `name`
    ///
    /// Absolute paths and paths that exist relative to the working directory
    /// are used as given; anything else is looked up in the store directory.
    pub fn load(&self, name: &str) -> Result<Vec<ChatMessage>> {
        let path = self.resolve(name);

        let json = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read session file {}", path.display()))?;
        let session: Session = serde_json::from_str(&json)
            .with_context(|| format!("Failed to parse session file {}", path.display()))?;

        debug!(
            path = %path.display(),
            saved_at = %session.timestamp,
            messages = session.conversation.len(),
            "Loaded session"
        );
        Ok(session.conversation)
    }

    fn resolve(&self, name: &str) -> PathBuf {
        let given = PathBuf::from(name);
        if given.is_absolute() || given.exists() {
            given
        } else {
            self.base_dir.join(given)
        }
    }
}

/// `conversation_<YYYYMMDD_HHMMSS>.json` for the given local time
fn session_file_name(now: &DateTime<Local>) -> String {
    format!("conversation_{}.json", now.format("%Y%m%d_%H%M%S"))
}
