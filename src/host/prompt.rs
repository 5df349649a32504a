//! Blocking user dialogs: text prompt, confirmation, alert.

use std::io::{self, BufRead, Write};
use tracing::warn;

pub trait Prompt {
    /// `None` when the user backed out.
    fn prompt(&mut self, message: &str, default: &str) -> Option<String>;
    fn confirm(&mut self, message: &str) -> bool;
    fn alert(&mut self, message: &str);
}

/// Line based dialogs over any reader/writer pair.
///
/// An empty answer to a prompt keeps the default, end of input cancels.
pub struct LinePrompt<R, W> {
    input: R,
    output: W,
}

impl LinePrompt<io::StdinLock<'static>, io::Stderr> {
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stderr())
    }
}

impl<R: BufRead, W: Write> LinePrompt<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    fn read_line(&mut self) -> Option<String> {
        let mut line = String::new();
        match self.input.read_line(&mut line) {
            Ok(0) => None,
            Ok(_) => Some(line.trim_end_matches(['\r', '\n']).to_string()),
            Err(e) => {
                warn!("Failed to read prompt answer: {}", e);
                None
            }
        }
    }

    fn show(&mut self, text: &str) {
        if let Err(e) = write!(self.output, "{}", text).and_then(|_| self.output.flush()) {
            warn!("Failed to show prompt: {}", e);
        }
    }
}

impl<R: BufRead, W: Write> Prompt for LinePrompt<R, W> {
    fn prompt(&mut self, message: &str, default: &str) -> Option<String> {
        if default.is_empty() {
            self.show(&format!("{}: ", message));
        } else {
            self.show(&format!("{} [{}]: ", message, default));
        }
        let answer = self.read_line()?;
        if answer.is_empty() {
            Some(default.to_string())
        } else {
            Some(answer)
        }
    }

    fn confirm(&mut self, message: &str) -> bool {
        self.show(&format!("{} [y/N]: ", message));
        self.read_line()
            .map(|answer| matches!(answer.trim(), "y" | "Y" | "yes"))
            .unwrap_or(false)
    }

    fn alert(&mut self, message: &str) {
        self.show(&format!("{}\n", message));
    }
}

/// Answers dialogs from a script and records alerts.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct ScriptedPrompt {
    pub answers: std::collections::VecDeque<Option<String>>,
    pub confirmations: std::collections::VecDeque<bool>,
    pub alerts: Vec<String>,
}

#[cfg(test)]
impl ScriptedPrompt {
    pub fn answering(answers: &[Option<&str>]) -> Self {
        Self {
            answers: answers.iter().map(|a| a.map(str::to_string)).collect(),
            ..Default::default()
        }
    }

    pub fn confirming(mut self, confirmations: &[bool]) -> Self {
        self.confirmations = confirmations.iter().copied().collect();
        self
    }
}

#[cfg(test)]
impl Prompt for ScriptedPrompt {
    fn prompt(&mut self, _message: &str, _default: &str) -> Option<String> {
        self.answers.pop_front().flatten()
    }

    fn confirm(&mut self, _message: &str) -> bool {
        self.confirmations.pop_front().unwrap_or(false)
    }

    fn alert(&mut self, message: &str) {
        self.alerts.push(message.to_string());
    }
}
