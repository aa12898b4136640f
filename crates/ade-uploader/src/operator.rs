//! Human interaction behind a trait.

use std::collections::VecDeque;
use std::io::{self, BufRead, Write};

/// The person driving a run: answers questions, confirms, types secrets.
pub trait Operator {
    /// Show a line of information.
    fn say(&mut self, message: &str) -> io::Result<()>;

    /// Show `prompt` and read one line (without the line terminator).
    fn ask(&mut self, prompt: &str) -> io::Result<String>;

    /// Like [`Operator::ask`] but without echoing the answer.
    fn ask_secret(&mut self, prompt: &str) -> io::Result<String>;

    /// Yes when the answer starts with `y` or `Y`.
    fn confirm(&mut self, prompt: &str) -> io::Result<bool> {
        let answer = self.ask(prompt)?;
        Ok(answer
            .trim()
            .chars()
            .next()
            .is_some_and(|c| c.eq_ignore_ascii_case(&'y')))
    }
}

/// Operator on the controlling terminal.
///
/// Messages and prompts go to stderr so stdout stays free for the request
/// document. Answers are read from stdin, passwords from the terminal.
#[derive(Debug)]
pub struct TerminalOperator<W = io::Stderr> {
    output: W,
}

impl TerminalOperator {
    pub fn new() -> Self {
        Self::with_output(io::stderr())
    }
}

impl Default for TerminalOperator {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Write> TerminalOperator<W> {
    /// Operator showing messages and prompts on `output`.
    pub fn with_output(output: W) -> Self {
        Self { output }
    }

    pub fn into_output(self) -> W {
        self.output
    }
}

impl<W: Write> Operator for TerminalOperator<W> {
    fn say(&mut self, message: &str) -> io::Result<()> {
        writeln!(self.output, "{message}")
    }

    fn ask(&mut self, prompt: &str) -> io::Result<String> {
        write!(self.output, "{prompt}")?;
        self.output.flush()?;

        let mut line = String::new();
        if io::stdin().lock().read_line(&mut line)? == 0 {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "input closed",
            ));
        }
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }

    fn ask_secret(&mut self, prompt: &str) -> io::Result<String> {
        rpassword::prompt_password(prompt)
    }
}

/// Operator answering from a fixed script, recording everything it is shown.
#[derive(Debug, Default)]
pub struct ScriptedOperator {
    answers: VecDeque<String>,
    /// Messages and prompts, in order.
    pub transcript: Vec<String>,
}

impl ScriptedOperator {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: answers.into_iter().map(Into::into).collect(),
            transcript: Vec::new(),
        }
    }

    /// Answers not yet consumed.
    pub fn remaining(&self) -> usize {
        self.answers.len()
    }

    fn next_answer(&mut self, prompt: &str) -> io::Result<String> {
        self.transcript.push(prompt.to_string());
        self.answers.pop_front().ok_or_else(|| {
            io::Error::new(io::ErrorKind::UnexpectedEof, "script exhausted")
        })
    }
}

impl Operator for ScriptedOperator {
    fn say(&mut self, message: &str) -> io::Result<()> {
        self.transcript.push(message.to_string());
        Ok(())
    }

    fn ask(&mut self, prompt: &str) -> io::Result<String> {
        self.next_answer(prompt)
    }

    fn ask_secret(&mut self, prompt: &str) -> io::Result<String> {
        self.next_answer(prompt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminal_messages_go_to_configured_output() {
        let mut operator = TerminalOperator::with_output(Vec::new());
        operator.say("Prerequisites").unwrap();
        operator.say("Available pipelines").unwrap();
        let shown = String::from_utf8(operator.into_output()).unwrap();
        assert_eq!(shown, "Prerequisites\nAvailable pipelines\n");
    }

    #[test]
    fn terminal_default_writes_to_stderr() {
        let operator: TerminalOperator<io::Stderr> = TerminalOperator::default();
        let _ = operator.into_output();
    }

    #[test]
    fn confirm_accepts_leading_y_only() {
        let mut operator = ScriptedOperator::new(["Yes", " y", "no", ""]);
        assert!(operator.confirm("?").unwrap());
        assert!(operator.confirm("?").unwrap());
        assert!(!operator.confirm("?").unwrap());
        assert!(!operator.confirm("?").unwrap());
    }

    #[test]
    fn exhausted_script_is_eof() {
        let mut operator = ScriptedOperator::new(Vec::<String>::new());
        let err = operator.ask("name: ").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
        assert_eq!(operator.transcript, vec!["name: "]);
    }
}
