//! Agent configuration, input dispatch and turn results

use crate::tools::ExecutionResult;

/// Built-in system prompt telling the model how to request commands
pub const DEFAULT_SYSTEM_PROMPT: &str = "# System prompt: command-line assistant

You are an AI assistant with access to the user's command line.
Follow these guidelines:

1. Running commands:
   - Wrap commands in [cmd] and [/cmd] tags.
   - Example: [cmd]mkdir new_folder[/cmd]
   - Only the first command in a reply is executed.

2. Feedback:
   - You receive the command output in the next user message.
   - Analyse it before deciding on further actions.

3. Safety:
   - Be careful with commands that modify the system.
   - Ask for confirmation before risky actions.

4. Explanations:
   - Briefly explain the effect of every command.";

/// Configuration for the agent loop
#[derive(Debug, Clone)]
pub struct AgentConfig {
    /// System prompt sent with every request
    pub system_prompt: String,
    /// Save the conversation when the loop exits
    pub auto_save: bool,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            auto_save: false,
        }
    }
}

impl AgentConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = prompt.into();
        self
    }

    pub fn with_auto_save(mut self, auto_save: bool) -> Self {
        self.auto_save = auto_save;
        self
    }
}

/// What a line of user input asks for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input<'a> {
    Empty,
    Exit,
    Save,
    History,
    Load(&'a str),
    Turn(&'a str),
}

impl<'a> Input<'a> {
    /// Classify one line read at the prompt.
    ///
    /// Keywords are matched on the trimmed line; a turn carries the line as
    /// typed.
    pub fn parse(line: &'a str) -> Self {
        let trimmed = line.trim();

        match trimmed {
            "" => Input::Empty,
            "exit" => Input::Exit,
            "save" => Input::Save,
            "history" => Input::History,
            _ => match trimmed.strip_prefix("load ") {
                Some(name) => Input::Load(name.trim()),
                None => Input::Turn(line),
            },
        }
    }
}

/// Whether the loop keeps reading input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopControl {
    Continue,
    Exit,
}

/// Everything that happened during one conversational turn
#[derive(Debug, Clone)]
pub struct TurnOutcome {
    /// Assistant reply, or the error text that replaced it
    pub reply: String,
    /// Whether the reply came from a failed model request
    pub model_failed: bool,
    /// The executed directive and its result, if the reply held one
    pub execution: Option<(String, ExecutionResult)>,
}

/// User-role message recording a directive and its result
pub fn execution_message(directive: &str, result: &ExecutionResult) -> String {
    format!("Command executed: {}\nOutput: {}", directive, result.text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_builtins() {
        assert_eq!(Input::parse("exit"), Input::Exit);
        assert_eq!(Input::parse("  save "), Input::Save);
        assert_eq!(Input::parse("history"), Input::History);
        assert_eq!(
            Input::parse("load conversation_20240101_120000.json"),
            Input::Load("conversation_20240101_120000.json")
        );
        assert_eq!(Input::parse("load   spaced.json  "), Input::Load("spaced.json"));
    }

    #[test]
    fn test_parse_empty() {
        assert_eq!(Input::parse(""), Input::Empty);
        assert_eq!(Input::parse("   \t "), Input::Empty);
    }

    #[test]
    fn test_parse_turns() {
        assert_eq!(Input::parse("list files"), Input::Turn("list files"));
        assert_eq!(Input::parse("exit now"), Input::Turn("exit now"));
        assert_eq!(Input::parse("Save"), Input::Turn("Save"));
        assert_eq!(Input::parse("loader"), Input::Turn("loader"));
        // A bare keyword without a file name is ordinary text
        assert_eq!(Input::parse("load"), Input::Turn("load"));
    }

    #[test]
    fn test_turn_keeps_line_as_typed() {
        assert_eq!(Input::parse("  list files\t"), Input::Turn("  list files\t"));
        assert_eq!(Input::parse(" exit "), Input::Exit);
    }

    #[test]
    fn test_execution_message_format() {
        let result = ExecutionResult::rejected();
        assert_eq!(
            execution_message("", &result),
            "Command executed: \nOutput: No valid command found."
        );
    }

    #[test]
    fn test_config_builder() {
        let config = AgentConfig::new()
            .with_system_prompt("custom")
            .with_auto_save(true);
        assert_eq!(config.system_prompt, "custom");
        assert!(config.auto_save);
        assert!(AgentConfig::default().system_prompt.contains("[cmd]"));
    }
}
