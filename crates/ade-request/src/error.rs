//! Error types for request assembly and binding extraction.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that stop a request document from being assembled or written.
#[derive(Debug, Error)]
pub enum RequestError {
    /// A patient in the records has no identity binding.
    #[error("no identity binding for patient ref {patient_ref}")]
    MissingBinding { patient_ref: String },

    /// A scalar identifier still holds the unresolved sentinel.
    #[error("{name} is unresolved")]
    UnresolvedIdentifier { name: &'static str },

    /// A sample tag has no library type.
    #[error("sample {sample_id} of patient ref {patient_ref} has unsupported tag <{tag}>")]
    UnsupportedTag {
        patient_ref: String,
        sample_id: String,
        tag: String,
    },

    /// Document could not be serialized.
    #[error("failed to render request document: {0}")]
    Render(#[from] serde_json::Error),

    /// Document could not be written.
    #[error("failed to write request document to {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Reasons identity bindings could not be read from uploader output.
#[derive(Debug, Error)]
pub enum BindingError {
    /// No patient list in the text.
    #[error("couldn't find patient list in uploader output")]
    NotFound,

    /// A patient list was found but is not valid JSON.
    #[error("couldn't decode patient ids: {0}")]
    Decode(#[source] serde_json::Error),
}

/// Result type for request operations.
pub type Result<T> = std::result::Result<T, RequestError>;
