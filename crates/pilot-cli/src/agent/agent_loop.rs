//! Agent loop implementation

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use pilot_core::{ChatModel, Role};
use tracing::{debug, info, instrument, warn};

use crate::conversation::ConversationStore;
use crate::session::SessionStore;
use crate::tools::{extract, ShellExecutor};

use super::state::{execution_message, AgentConfig, Input, LoopControl, TurnOutcome};

// ANSI colors
const GREEN: &str = "\x1b[92m";
const BLUE: &str = "\x1b[94m";
const YELLOW: &str = "\x1b[93m";
const RED: &str = "\x1b[91m";
const DIM: &str = "\x1b[2m";
const BOLD: &str = "\x1b[1m";
const RESET: &str = "\x1b[0m";

/// Drives one session: dispatches input lines, talks to the model and runs
/// the directives it asks for.
pub struct AgentLoop<M: ChatModel> {
    model: M,
    executor: ShellExecutor,
    sessions: SessionStore,
    conversation: ConversationStore,
    config: AgentConfig,
}

impl<M: ChatModel> AgentLoop<M> {
    /// Create a new agent loop with an empty conversation
    pub fn new(model: M, sessions: SessionStore, config: AgentConfig) -> Self {
        Self {
            model,
            executor: ShellExecutor::new(),
            sessions,
            conversation: ConversationStore::new(),
            config,
        }
    }

    pub fn with_executor(mut self, executor: ShellExecutor) -> Self {
        self.executor = executor;
        self
    }

    pub fn conversation(&self) -> &ConversationStore {
        &self.conversation
    }

    pub fn model_name(&self) -> &str {
        self.model.model()
    }

    /// Handle one line of user input
    pub async fn dispatch(&mut self, line: &str) -> LoopControl {
        match Input::parse(line) {
            Input::Empty => LoopControl::Continue,
            Input::Exit => {
                println!("{}Goodbye!{}", YELLOW, RESET);
                LoopControl::Exit
            }
            Input::Save => {
                match self.save() {
                    Ok(path) => println!(
                        "{}Conversation saved to {}{}",
                        GREEN,
                        path.display(),
                        RESET
                    ),
                    Err(e) => print_error(&format!("Failed to save conversation: {:#}", e)),
                }
                LoopControl::Continue
            }
            Input::History => {
                self.show_history();
                LoopControl::Continue
            }
            Input::Load(name) => {
                self.load_and_report(name);
                LoopControl::Continue
            }
            Input::Turn(text) => {
                let outcome = self.converse(text).await;
                debug!(
                    reply_len = outcome.reply.len(),
                    model_failed = outcome.model_failed,
                    executed = outcome.execution.is_some(),
                    "Turn complete"
                );
                LoopControl::Continue
            }
        }
    }

    /// Save the conversation to a new session file
    pub fn save(&self) -> Result<PathBuf> {
        self.sessions.save(self.conversation.snapshot())
    }

    /// Replace the conversation with the one stored in `name`.
    ///
    /// The current conversation is untouched unless the whole file parses.
    pub fn load(&mut self, name: &str) -> Result<usize> {
        let messages = self.sessions.load(name)?;
        let count = messages.len();
        self.conversation.replace(messages);
        info!(file = name, messages = count, "Replaced conversation");
        Ok(count)
    }

    /// Load `name` and tell the user how it went
    pub fn load_and_report(&mut self, name: &str) {
        match self.load(name) {
            Ok(count) => println!(
                "{}Conversation loaded from {} ({} messages){}",
                GREEN, name, count, RESET
            ),
            Err(e) => print_error(&format!("Failed to load conversation: {:#}", e)),
        }
    }

    /// Save on exit when auto-save is on and there is something to save
    pub fn finish(&self) -> Option<PathBuf> {
        if !self.config.auto_save || self.conversation.is_empty() {
            return None;
        }

        match self.save() {
            Ok(path) => {
                println!("{}Saved:{} {}", DIM, RESET, path.display());
                Some(path)
            }
            Err(e) => {
                print_error(&format!("Failed to save conversation: {:#}", e));
                None
            }
        }
    }

    /// Run one conversational turn for `input`
    #[instrument(skip(self, input), fields(model = %self.model.model(), history = self.conversation.len()))]
    pub async fn converse(&mut self, input: &str) -> TurnOutcome {
        self.conversation.append(Role::User, input);

        let (reply, model_failed) = self.request_reply().await;
        print_labeled("Assistant:", &reply, BLUE);
        self.conversation.append(Role::Assistant, reply.as_str());

        // An empty directive counts as no directive
        let execution = match extract(&reply).filter(|d| !d.is_empty()) {
            Some(directive) => {
                let directive = directive.to_string();
                print_labeled("Command:", &directive, YELLOW);

                let result = self.executor.run(&directive).await;
                debug!(outcome = ?result.outcome, exit_status = ?result.exit_status, "Directive finished");
                print_labeled("Output:", &result.text, YELLOW);

                self.conversation
                    .append(Role::User, execution_message(&directive, &result));
                Some((directive, result))
            }
            None => None,
        };

        TurnOutcome {
            reply,
            model_failed,
            execution,
        }
    }

    async fn request_reply(&self) -> (String, bool) {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.cyan} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        spinner.set_message("Thinking...");
        spinner.enable_steady_tick(Duration::from_millis(100));

        let start_time = std::time::Instant::now();
        let result = self
            .model
            .complete(&self.config.system_prompt, self.conversation.snapshot())
            .await;
        spinner.finish_and_clear();

        match result {
            Ok(reply) => {
                debug!(
                    reply_len = reply.len(),
                    total_ms = start_time.elapsed().as_millis() as u64,
                    "chat_complete"
                );
                (reply, false)
            }
            Err(e) => {
                warn!(error = %e, "Model request failed");
                (format!("Error during API request: {:#}", e), true)
            }
        }
    }

    fn show_history(&self) {
        if self.conversation.is_empty() {
            println!("{}No conversation history.{}", YELLOW, RESET);
            return;
        }

        for msg in self.conversation.snapshot() {
            let color = match msg.role {
                Role::Assistant => BLUE,
                Role::User => GREEN,
            };
            println!();
            println!("{}{}{}:{}", BOLD, color, msg.role, RESET);
            println!("{}", msg.content);
        }
    }
}

fn print_labeled(label: &str, content: &str, color: &str) {
    println!();
    println!("{}{}{}{}", BOLD, color, label, RESET);
    println!("{}", content);
}

fn print_error(message: &str) {
    eprintln!("{}", error_line(message));
}

fn error_line(message: &str) -> String {
    format!("{}{}Error:{} {}", BOLD, RED, RESET, message)
}
