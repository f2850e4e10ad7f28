//! Interactive REPL
//!
//! Reads lines with history and hands each one to the agent loop until the
//! user types `exit`.

use anyhow::Result;
use pilot_core::ChatModel;
use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;
use rustyline::Editor;
use tracing::debug;

use crate::agent::{AgentLoop, LoopControl};
use crate::conversation::InputHistory;

// ANSI colors
const GREEN: &str = "\x1b[92m";
const BLUE: &str = "\x1b[94m";
const YELLOW: &str = "\x1b[93m";
const RED: &str = "\x1b[91m";
const CYAN: &str = "\x1b[96m";
const DIM: &str = "\x1b[2m";
const BOLD: &str = "\x1b[1m";
const RESET: &str = "\x1b[0m";

/// Run the interactive REPL until `exit`
pub async fn run<M: ChatModel>(
    mut agent: AgentLoop<M>,
    load: Option<String>,
    history_size: usize,
) -> Result<()> {
    // Load an existing conversation if requested; failure leaves it empty
    if let Some(name) = load {
        agent.load_and_report(&name);
    }

    let history = InputHistory::new()?;
    let editor_config = rustyline::Config::builder()
        .max_history_size(history_size)?
        .auto_add_history(false)
        .build();
    let mut rl: Editor<(), DefaultHistory> = Editor::with_config(editor_config)?;
    if let Err(e) = rl.load_history(history.path()) {
        debug!(error = %e, "No input history loaded");
    }

    print_welcome(agent.model_name());

    loop {
        let prompt = format!("\n{}>{} ", GREEN, RESET);

        match rl.readline(&prompt) {
            Ok(line) => {
                if !line.trim().is_empty() {
                    let _ = rl.add_history_entry(line.trim());
                }

                // Ctrl-C during a turn drops it, killing any running command
                let control = tokio::select! {
                    control = agent.dispatch(&line) => control,
                    Ok(()) = tokio::signal::ctrl_c() => {
                        debug!("Turn interrupted");
                        println!("{}\nInterrupted. Type 'exit' to quit{}", YELLOW, RESET);
                        LoopControl::Continue
                    }
                };
                if control == LoopControl::Exit {
                    break;
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("{}\nType 'exit' to quit{}", YELLOW, RESET);
                continue;
            }
            Err(ReadlineError::Eof) => {
                println!("{}Goodbye!{}", YELLOW, RESET);
                break;
            }
            Err(e) => {
                eprintln!("{}{}Error:{} {}", BOLD, RED, RESET, e);
                break;
            }
        }
    }

    if let Err(e) = rl.save_history(history.path()) {
        debug!(error = %e, "Failed to save input history");
    }

    agent.finish();
    Ok(())
}

fn print_welcome(model: &str) {
    println!();
    println!("{}╭─────────────────────────────────────────╮{}", DIM, RESET);
    println!(
        "{}│{} {}shellpilot{} - Command-line assistant     {}│{}",
        DIM, RESET, BOLD, RESET, DIM, RESET
    );
    println!(
        "{}│{} Model: {}{}{} {}│{}",
        DIM,
        RESET,
        BLUE,
        truncate(model, 32),
        RESET,
        DIM,
        RESET
    );
    println!(
        "{}│{} Commands: {}exit, save, load <file>, history{} {}│{}",
        DIM, RESET, CYAN, RESET, DIM, RESET
    );
    println!("{}╰─────────────────────────────────────────╯{}", DIM, RESET);
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        format!("{:width$}", s, width = max)
    } else {
        let head: String = s.chars().take(max - 3).collect();
        format!("{}...", head)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_pads_short_names() {
        assert_eq!(truncate("abc", 6), "abc   ");
    }

    #[test]
    fn test_truncate_long_names() {
        let t = truncate("claude-3-5-sonnet-20241022-with-a-very-long-suffix", 20);
        assert_eq!(t.chars().count(), 20);
        assert!(t.ends_with("..."));
    }
}
