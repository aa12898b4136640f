//! Read-file ingestion: folder listing, extraction rules, and record building.

pub mod discovery;
pub mod error;
pub mod extract;
pub mod rules;

pub use discovery::{IngestOutcome, ingest_folder, list_files};
pub use error::{IngestError, Result, RuleError};
pub use extract::{Extraction, PatternExtractor};
pub use rules::{
    Breakdown, BreakdownToken, ExtractionRule, ILLUMINA_BREAKDOWN, ILLUMINA_PATTERN, RuleMatch,
    RuleSet,
};
