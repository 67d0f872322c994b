//! User decision points.
//!
//! Confirmations and alerts are routed through the [`Prompt`] trait so the
//! controller never talks to a terminal directly.

use std::collections::VecDeque;
use std::io::{BufRead, Stdout, StdinLock, Write};

use tracing::warn;

/// Asks the user yes/no questions and shows them messages.
pub trait Prompt {
    /// Ask a yes/no question. Anything other than an explicit yes is a no.
    fn confirm(&mut self, message: &str) -> bool;

    /// Show a message.
    fn alert(&mut self, message: &str);
}

/// Line-based prompt over a reader and a writer.
#[derive(Debug)]
pub struct TerminalPrompt<R, W> {
    input: R,
    output: W,
    assume_yes: bool,
}

impl TerminalPrompt<StdinLock<'static>, Stdout> {
    /// Prompt on the process's stdin and stdout.
    #[must_use]
    pub fn stdio(assume_yes: bool) -> Self {
        Self::new(std::io::stdin().lock(), std::io::stdout(), assume_yes)
    }
}

impl<R: BufRead, W: Write> TerminalPrompt<R, W> {
    /// Create a prompt. With `assume_yes`, every confirmation is answered
    /// yes without reading input.
    pub fn new(input: R, output: W, assume_yes: bool) -> Self {
        Self {
            input,
            output,
            assume_yes,
        }
    }

    /// Consume the prompt, returning the writer.
    pub fn into_output(self) -> W {
        self.output
    }

    fn ask(&mut self, message: &str) -> std::io::Result<bool> {
        write!(self.output, "{message} [y/N] ")?;
        if self.assume_yes {
            writeln!(self.output, "y")?;
            return Ok(true);
        }
        self.output.flush()?;

        let mut answer = String::new();
        self.input.read_line(&mut answer)?;
        let answer = answer.trim().to_lowercase();
        Ok(answer == "y" || answer == "yes")
    }
}

impl<R: BufRead, W: Write> Prompt for TerminalPrompt<R, W> {
    fn confirm(&mut self, message: &str) -> bool {
        self.ask(message).unwrap_or_else(|e| {
            warn!("Failed to read confirmation: {}", e);
            false
        })
    }

    fn alert(&mut self, message: &str) {
        if let Err(e) = writeln!(self.output, "{message}") {
            warn!("Failed to write message: {}", e);
        }
    }
}

/// Prompt that replays queued answers and records what it was shown.
///
/// Once the queue is empty every confirmation is answered no.
#[derive(Debug, Clone, Default)]
pub struct ScriptedPrompt {
    answers: VecDeque<bool>,
    /// Questions asked, in order.
    pub confirmations: Vec<String>,
    /// Messages shown, in order.
    pub alerts: Vec<String>,
}

impl ScriptedPrompt {
    /// Create a prompt that gives `answers` in order.
    #[must_use]
    pub fn new(answers: impl IntoIterator<Item = bool>) -> Self {
        Self {
            answers: answers.into_iter().collect(),
            ..Self::default()
        }
    }

    /// The most recent alert.
    #[must_use]
    pub fn last_alert(&self) -> Option<&str> {
        self.alerts.last().map(String::as_str)
    }
}

impl Prompt for ScriptedPrompt {
    fn confirm(&mut self, message: &str) -> bool {
        self.confirmations.push(message.to_string());
        self.answers.pop_front().unwrap_or(false)
    }

    fn alert(&mut self, message: &str) {
        self.alerts.push(message.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn terminal(input: &str, assume_yes: bool) -> TerminalPrompt<Cursor<Vec<u8>>, Vec<u8>> {
        TerminalPrompt::new(Cursor::new(input.as_bytes().to_vec()), Vec::new(), assume_yes)
    }

    #[test]
    fn test_terminal_confirm_yes() {
        for input in ["y\n", "YES\n", "  yes  \n"] {
            let mut prompt = terminal(input, false);
            assert!(prompt.confirm("Proceed?"), "input {input:?}");
        }
    }

    #[test]
    fn test_terminal_confirm_no() {
        for input in ["n\n", "\n", "", "maybe\n"] {
            let mut prompt = terminal(input, false);
            assert!(!prompt.confirm("Proceed?"), "input {input:?}");
        }
    }

    #[test]
    fn test_terminal_assume_yes_skips_input() {
        let mut prompt = terminal("n\n", true);
        assert!(prompt.confirm("Proceed?"));

        let output = String::from_utf8(prompt.into_output()).unwrap();
        assert_eq!(output, "Proceed? [y/N] y\n");
    }

    #[test]
    fn test_terminal_alert() {
        let mut prompt = terminal("", false);
        prompt.alert("DWG saved successfully.");
        let output = String::from_utf8(prompt.into_output()).unwrap();
        assert_eq!(output, "DWG saved successfully.\n");
    }

    #[test]
    fn test_scripted_prompt() {
        let mut prompt = ScriptedPrompt::new([true, false]);
        assert!(prompt.confirm("first"));
        assert!(!prompt.confirm("second"));
        assert!(!prompt.confirm("exhausted"));
        prompt.alert("done");

        assert_eq!(prompt.confirmations, vec!["first", "second", "exhausted"]);
        assert_eq!(prompt.last_alert(), Some("done"));
    }
}
