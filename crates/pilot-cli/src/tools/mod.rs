//! Directive extraction and shell execution
//!
//! The model asks for a command by wrapping it in `[cmd]`/`[/cmd]`. The
//! extracted directive is run through the shell and its result is always
//! reported back as text, never as an error.

pub mod directive;
pub mod shell;

pub use directive::extract;
pub use shell::ShellExecutor;

use std::process::Output;
use std::time::Duration;

/// How a directive run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionOutcome {
    /// Directive was empty, nothing ran
    Rejected,
    /// Completed and produced output
    Output,
    /// Completed successfully without output
    NoOutput,
    /// Completed with a non-zero status and no output
    Failed,
    /// Killed after exceeding the time budget
    TimedOut,
    /// The shell could not be started
    LaunchFailed,
}

/// Result of running a directive
#[derive(Debug, Clone)]
pub struct ExecutionResult {
    /// Text folded back into the conversation
    pub text: String,
    /// Exit status, when the process ran to completion with one
    pub exit_status: Option<i32>,
    /// How the run ended
    pub outcome: ExecutionOutcome,
}

impl ExecutionResult {
    pub fn rejected() -> Self {
        Self {
            text: "No valid command found.".to_string(),
            exit_status: None,
            outcome: ExecutionOutcome::Rejected,
        }
    }

    pub fn timed_out(limit: Duration) -> Self {
        Self {
            text: format!("Command aborted due to timeout ({}s)", limit.as_secs()),
            exit_status: None,
            outcome: ExecutionOutcome::TimedOut,
        }
    }

    pub fn launch_failed(error: impl std::fmt::Display) -> Self {
        Self {
            text: format!("Error executing command: {}", error),
            exit_status: None,
            outcome: ExecutionOutcome::LaunchFailed,
        }
    }

    /// Classify a finished process: stdout then stderr, verbatim
    pub fn from_output(output: Output) -> Self {
        let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
        combined.push_str(&String::from_utf8_lossy(&output.stderr));

        let exit_status = output.status.code();

        if !combined.is_empty() {
            return Self {
                text: combined,
                exit_status,
                outcome: ExecutionOutcome::Output,
            };
        }

        if output.status.success() {
            Self {
                text: "Command executed (no output)".to_string(),
                exit_status,
                outcome: ExecutionOutcome::NoOutput,
            }
        } else {
            let code = exit_status
                .map(|c| c.to_string())
                .unwrap_or_else(|| "unknown".to_string());
            Self {
                text: format!("Command failed with exit status {}", code),
                exit_status,
                outcome: ExecutionOutcome::Failed,
            }
        }
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::os::unix::process::ExitStatusExt;
    use std::process::ExitStatus;

    fn output(code: i32, stdout: &str, stderr: &str) -> Output {
        Output {
            status: ExitStatus::from_raw(code << 8),
            stdout: stdout.as_bytes().to_vec(),
            stderr: stderr.as_bytes().to_vec(),
        }
    }

    #[test]
    fn test_output_concatenates_stdout_then_stderr() {
        let result = ExecutionResult::from_output(output(0, "out\n", "err\n"));
        assert_eq!(result.text, "out\nerr\n");
        assert_eq!(result.outcome, ExecutionOutcome::Output);
    }

    #[test]
    fn test_failure_with_output_keeps_output() {
        let result = ExecutionResult::from_output(output(2, "", "ls: nope\n"));
        assert_eq!(result.text, "ls: nope\n");
        assert_eq!(result.exit_status, Some(2));
    }

    #[test]
    fn test_silent_failure_reports_status() {
        let result = ExecutionResult::from_output(output(3, "", ""));
        assert_eq!(result.text, "Command failed with exit status 3");
        assert_eq!(result.outcome, ExecutionOutcome::Failed);
    }

    #[test]
    fn test_silent_success() {
        let result = ExecutionResult::from_output(output(0, "", ""));
        assert_eq!(result.text, "Command executed (no output)");
        assert_eq!(result.outcome, ExecutionOutcome::NoOutput);
    }

    #[test]
    fn test_killed_by_signal_has_unknown_status() {
        let killed = Output {
            status: ExitStatus::from_raw(9),
            stdout: Vec::new(),
            stderr: Vec::new(),
        };
        let result = ExecutionResult::from_output(killed);
        assert_eq!(result.text, "Command failed with exit status unknown");
        assert_eq!(result.exit_status, None);
    }
}
