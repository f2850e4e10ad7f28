//! pilot-core: Shared library for shellpilot
//!
//! Provides:
//! - Chat message types and the `ChatModel` seam
//! - Anthropic Messages API client
//! - Configuration loading (config.toml)

pub mod anthropic;
pub mod chat;
pub mod config;

pub use anthropic::AnthropicClient;
pub use chat::{ChatMessage, ChatModel, Role};
pub use config::{Config, ModelConfig, ReplConfig, SessionConfig};
