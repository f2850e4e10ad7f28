//! Agent loop: turn-taking between the user, the model and the shell
//!
//! Each turn sends the transcript to the model, runs the first `[cmd]`
//! directive in the reply and feeds its output back as the next message.

mod agent_loop;
mod state;

pub use agent_loop::AgentLoop;
pub use state::{AgentConfig, LoopControl};
