//! Process exit statuses.
//!
//! Each way a run can stop maps to a stable exit code so wrapper scripts can
//! tell "nothing to do" apart from "bad data" and "uploader trouble".

use ade_ingest::IngestError;
use ade_request::RequestError;
use ade_uploader::UploaderError;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitStatus {
    Success,
    /// No files, no matching files, or the folder is missing.
    NoPatientData,
    ValidationFailed,
    BindingsUnavailable,
    IdentityUnresolved,
    PipelineUnresolved,
    JarNotFound,
    ConfigNotFound,
    Failure,
}

impl ExitStatus {
    pub fn code(self) -> i32 {
        match self {
            ExitStatus::Success => 0,
            ExitStatus::NoPatientData => 1,
            ExitStatus::ValidationFailed => 2,
            ExitStatus::BindingsUnavailable => 3,
            ExitStatus::IdentityUnresolved => 4,
            ExitStatus::PipelineUnresolved => 5,
            ExitStatus::JarNotFound => 6,
            ExitStatus::ConfigNotFound => 7,
            ExitStatus::Failure => 8,
        }
    }
}

/// A run stopped at one of its gates.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct Halt {
    pub status: ExitStatus,
    pub message: String,
}

impl Halt {
    pub fn new(status: ExitStatus, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }
}

/// Exit status for a failed run, from the first recognised cause.
pub fn exit_status(error: &anyhow::Error) -> ExitStatus {
    for cause in error.chain() {
        if let Some(halt) = cause.downcast_ref::<Halt>() {
            return halt.status;
        }
        if let Some(ingest) = cause.downcast_ref::<IngestError>() {
            return ingest_status(ingest);
        }
        if let Some(uploader) = cause.downcast_ref::<UploaderError>() {
            return uploader_status(uploader);
        }
        if let Some(request) = cause.downcast_ref::<RequestError>() {
            return request_status(request);
        }
    }
    ExitStatus::Failure
}

fn ingest_status(error: &IngestError) -> ExitStatus {
    match error {
        IngestError::DirectoryNotFound { .. }
        | IngestError::NoFilesFound { .. }
        | IngestError::NoMatchingFiles { .. } => ExitStatus::NoPatientData,
        _ => ExitStatus::Failure,
    }
}

fn uploader_status(error: &UploaderError) -> ExitStatus {
    match error {
        UploaderError::JarNotFound { .. } => ExitStatus::JarNotFound,
        UploaderError::ConfigNotFound { .. } => ExitStatus::ConfigNotFound,
        UploaderError::Bindings(_) => ExitStatus::BindingsUnavailable,
        UploaderError::PipelineDecode(_) => ExitStatus::PipelineUnresolved,
        _ => ExitStatus::Failure,
    }
}

fn request_status(error: &RequestError) -> ExitStatus {
    match error {
        RequestError::MissingBinding { .. } => ExitStatus::BindingsUnavailable,
        RequestError::UnresolvedIdentifier {
            name: "user id" | "client id",
        } => ExitStatus::IdentityUnresolved,
        RequestError::UnresolvedIdentifier { .. } => ExitStatus::PipelineUnresolved,
        _ => ExitStatus::Failure,
    }
}
