//! Interactive token relay between the operator and an uploader process.
//!
//! Authorizing an alternate client makes the uploader print a prompt such as
//! `Please enter token for coordinates [1, A]: ` and wait on stdin. The prompt
//! has no trailing newline, so stdout is read one byte at a time until the
//! `:` delimiter.
//!
//! ```text
//! PromptScan --':'--> PromptCheck --> TokenRelay --> Done
//!     |
//!     +--EOF--> PromptNotFound (nothing sent, process terminated)
//! ```
//!
//! A prompt without a coordinate annotation is logged and the operator is
//! still asked for a token.

use std::fmt;
use std::io::{self, Read, Write};
use std::process::{Child, ChildStderr, Stdio};
use std::thread::{self, JoinHandle};

use tracing::{debug, error, info, warn};

use crate::command::UploaderCommand;
use crate::error::RelayError;
use crate::operator::Operator;
use crate::token_card::{TokenCard, TokenCoordinate};

/// Byte that terminates the token prompt.
pub const PROMPT_DELIMITER: u8 = b':';

/// Read the prompt byte by byte up to the delimiter.
///
/// Returns the prompt text followed by `": "`. End of stream before the
/// delimiter is [`RelayError::PromptNotFound`].
pub fn read_prompt<R: Read + ?Sized>(reader: &mut R) -> Result<String, RelayError> {
    let mut prompt = Vec::new();
    let mut byte = [0u8; 1];
    loop {
        match reader.read(&mut byte) {
            Ok(0) => {
                return Err(RelayError::PromptNotFound {
                    partial: String::from_utf8_lossy(&prompt).into_owned(),
                });
            }
            Ok(_) if byte[0] == PROMPT_DELIMITER => break,
            Ok(_) => prompt.push(byte[0]),
            Err(err) if err.kind() == io::ErrorKind::Interrupted => {}
            Err(err) => return Err(RelayError::Io(err)),
        }
    }
    Ok(format!("{}: ", String::from_utf8_lossy(&prompt)))
}

/// Username and password for an alternate client.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Ask the operator for both values; the password is not echoed.
    pub fn ask(operator: &mut dyn Operator) -> io::Result<Self> {
        let username = operator.ask("Please enter your username: ")?;
        let password = operator.ask_secret("Please enter your password: ")?;
        Ok(Self::new(username.trim(), password))
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"****")
            .finish()
    }
}

/// What a completed relay captured.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RelayOutcome {
    /// Prompt as shown to the operator.
    pub prompt: String,
    /// Remaining stdout after the prompt.
    pub stdout: String,
    pub stderr: String,
    pub status: Option<i32>,
}

/// Answers one token challenge, from a card when possible and otherwise
/// from the operator.
pub struct TokenRelay<'a> {
    operator: &'a mut dyn Operator,
    card: Option<&'a TokenCard>,
}

impl<'a> TokenRelay<'a> {
    pub fn new(operator: &'a mut dyn Operator, card: Option<&'a TokenCard>) -> Self {
        Self { operator, card }
    }

    /// Operator answering the challenges.
    pub fn operator(&mut self) -> &mut dyn Operator {
        &mut *self.operator
    }

    /// Token for `prompt`.
    pub fn token_for(&mut self, prompt: &str) -> Result<String, RelayError> {
        let coordinate = TokenCoordinate::find(prompt);
        if coordinate.is_none() {
            warn!(prompt = prompt.trim_end(), "token prompt has no coordinates");
        }
        if let (Some(card), Some(coordinate)) = (self.card, coordinate) {
            info!(%coordinate, user = %card.username, "using token from card");
            return Ok(card.token(coordinate)?.to_string());
        }
        self.operator
            .ask_secret(prompt)
            .map_err(RelayError::Operator)
    }

    /// Run the prompt/token exchange over raw streams.
    ///
    /// `input` is closed before returning, on success and on failure.
    pub fn exchange<R, W>(&mut self, output: &mut R, mut input: W) -> Result<String, RelayError>
    where
        R: Read + ?Sized,
        W: Write,
    {
        let prompt = match read_prompt(output) {
            Ok(prompt) => prompt,
            Err(err) => {
                drop(input);
                return Err(err);
            }
        };
        let token = self.token_for(&prompt)?;
        debug!("sending token to uploader");
        input.write_all(token.as_bytes())?;
        input.flush()?;
        drop(input);
        Ok(prompt)
    }

    /// Spawn the uploader and relay its token challenge.
    ///
    /// The process is killed and reaped when no prompt arrives.
    pub fn run(
        &mut self,
        command: &UploaderCommand,
        args: &[String],
    ) -> Result<RelayOutcome, RelayError> {
        command.log_invocation(args);
        let mut child = command
            .command(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| RelayError::Spawn {
                program: command.program().to_string(),
                source,
            })?;

        // A full stderr pipe would block the child before it prints the prompt.
        let stderr_reader = child.stderr.take().map(drain);

        let exchanged = match (child.stdout.as_mut(), child.stdin.take()) {
            (Some(stdout), Some(stdin)) => self.exchange(stdout, stdin),
            _ => Err(RelayError::Io(io::Error::other("uploader pipes unavailable"))),
        };
        let prompt = match exchanged {
            Ok(prompt) => prompt,
            Err(err) => {
                terminate(&mut child);
                return Err(err);
            }
        };

        let output = child.wait_with_output()?;
        let stderr = match stderr_reader {
            Some(reader) => reader
                .join()
                .map_err(|_| io::Error::other("stderr reader panicked"))??,
            None => Vec::new(),
        };
        let outcome = RelayOutcome {
            prompt,
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&stderr).into_owned(),
            status: output.status.code(),
        };
        if !outcome.stderr.trim().is_empty() {
            warn!(stderr = outcome.stderr.trim(), "uploader wrote to stderr during relay");
        }
        Ok(outcome)
    }
}

fn drain(mut stream: ChildStderr) -> JoinHandle<io::Result<Vec<u8>>> {
    thread::spawn(move || {
        let mut buffer = Vec::new();
        stream.read_to_end(&mut buffer)?;
        Ok(buffer)
    })
}

fn terminate(child: &mut Child) {
    if let Err(err) = child.kill() {
        debug!(%err, "uploader already exited");
    }
    if let Err(err) = child.wait() {
        error!(%err, "failed to reap uploader process");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operator::ScriptedOperator;
    use std::io::Cursor;

    #[test]
    fn prompt_stops_at_first_colon() {
        let mut stream = Cursor::new(b"Please enter token for coordinates [1, A]: rest".to_vec());
        let prompt = read_prompt(&mut stream).unwrap();
        assert_eq!(prompt, "Please enter token for coordinates [1, A]: ");
        let mut rest = String::new();
        stream.read_to_string(&mut rest).unwrap();
        assert_eq!(rest, " rest");
    }

    #[test]
    fn credentials_debug_hides_password() {
        let credentials = Credentials::new("alice", "s3cret");
        let text = format!("{credentials:?}");
        assert!(text.contains("alice"));
        assert!(!text.contains("s3cret"));
    }

    #[test]
    fn operator_answers_when_no_card() {
        let mut operator = ScriptedOperator::new(["tok1"]);
        let mut relay = TokenRelay::new(&mut operator, None);
        let mut output = Cursor::new(b"Token [2, B]:".to_vec());
        let mut input = Vec::new();
        relay.exchange(&mut output, &mut input).unwrap();
        assert_eq!(input, b"tok1");
        assert_eq!(operator.transcript, vec!["Token [2, B]: "]);
    }
}
