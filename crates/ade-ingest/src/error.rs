//! Error types for read-file ingestion.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading an extraction rule file.
///
/// Line numbers are 1-based and point at the offending line of the file.
#[derive(Debug, Error)]
pub enum RuleError {
    /// The file holds no rules at all.
    #[error("rule file contains no rules")]
    Empty,

    /// Rules are pattern/breakdown line pairs, so the count must be even.
    #[error("rule file has {lines} lines; expected pattern and breakdown line pairs")]
    OddLineCount { lines: usize },

    /// A pattern line is blank.
    #[error("line {line}: missing pattern")]
    MissingPattern { line: usize },

    /// A breakdown line is blank.
    #[error("line {line}: missing breakdown for pattern on line {pattern_line}")]
    MissingBreakdown { line: usize, pattern_line: usize },

    /// A breakdown line must name patient-ref, sample-id and optionally tag.
    #[error("line {line}: breakdown needs 2 or 3 expressions, found {found}")]
    BreakdownArity { line: usize, found: usize },

    /// Pattern does not compile.
    #[error("line {line}: invalid pattern: {source}")]
    InvalidPattern {
        line: usize,
        #[source]
        source: Box<regex::Error>,
    },

    /// Breakdown references a capture group the pattern does not have.
    #[error("line {line}: breakdown references group {group} but the pattern has {available}")]
    GroupOutOfRange {
        line: usize,
        group: usize,
        available: usize,
    },
}

/// Errors that can occur during ingestion.
#[derive(Debug, Error)]
pub enum IngestError {
    /// Folder not found or not a directory.
    #[error("directory not found: {path}")]
    DirectoryNotFound { path: PathBuf },

    /// Failed to read directory entries.
    #[error("failed to read directory {path}: {source}")]
    DirectoryRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Folder exists but holds no files.
    #[error("no files found in {path}")]
    NoFilesFound { path: PathBuf },

    /// Files were found but none matched an extraction rule.
    #[error("found {scanned} files in {path} but none matched any rule")]
    NoMatchingFiles { path: PathBuf, scanned: usize },

    /// Rule override file not found.
    #[error("rule file not found: {path}")]
    RuleFileNotFound { path: PathBuf },

    /// Failed to read the rule override file.
    #[error("failed to read rule file {path}: {source}")]
    RuleFileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Rule override file is malformed.
    #[error("invalid rule file {path}: {source}")]
    RuleFile {
        path: PathBuf,
        #[source]
        source: RuleError,
    },
}

/// Result type for ingestion operations.
pub type Result<T> = std::result::Result<T, IngestError>;
