//! Error types for uploader calls, the token relay and token cards.

use std::path::PathBuf;

use ade_request::BindingError;
use thiserror::Error;

/// Errors from invoking the uploader.
#[derive(Debug, Error)]
pub enum UploaderError {
    /// Uploader jar does not exist.
    #[error("uploader jar not found: {path}")]
    JarNotFound { path: PathBuf },

    /// Uploader configuration override file does not exist.
    #[error("uploader configuration not found: {path}")]
    ConfigNotFound { path: PathBuf },

    /// Process could not be started or waited on.
    #[error("failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// Operator input could not be read.
    #[error("failed to read operator input: {0}")]
    Operator(#[source] std::io::Error),

    /// `pipeline --list` output is not a pipeline object or array.
    #[error("couldn't decode pipeline list: {0}")]
    PipelineDecode(#[source] serde_json::Error),

    /// Relay failed for a reason other than a missing prompt.
    #[error(transparent)]
    Relay(#[from] RelayError),

    /// Identity bindings could not be read from `patient -l` output.
    #[error(transparent)]
    Bindings(#[from] BindingError),
}

/// Errors from the interactive token relay.
#[derive(Debug, Error)]
pub enum RelayError {
    /// Uploader process could not be started.
    #[error("failed to start {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// Output ended before a prompt delimiter was read.
    #[error("couldn't read token prompt from uploader (read {partial:?})")]
    PromptNotFound { partial: String },

    /// Reading the operator's answer failed.
    #[error("failed to read token from operator: {0}")]
    Operator(#[source] std::io::Error),

    /// Token card lookup failed.
    #[error(transparent)]
    TokenCard(#[from] TokenCardError),

    /// Pipe I/O with the uploader failed.
    #[error("uploader I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors loading a token card or looking a token up.
#[derive(Debug, Error)]
pub enum TokenCardError {
    #[error("failed to read token card {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid token card JSON: {0}")]
    Json(#[source] serde_json::Error),

    /// Text card without a `<name> (<userId>)` header.
    #[error("token card has no `<name> (<userId>)` header")]
    MissingHeader,

    #[error("token card has no tokens for column {column}")]
    MissingColumn { column: char },

    #[error("token card column {column} has {found} tokens, expected 8")]
    ColumnLength { column: char, found: usize },

    #[error("coordinate not in range 1 to 8. Was {row}")]
    RowOutOfRange { row: u32 },

    #[error("coordinate not in range A to H. Was {column}")]
    ColumnOutOfRange { column: char },
}
