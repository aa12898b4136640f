use std::path::PathBuf;

use ade_ingest::IngestOutcome;
use ade_model::{ClientIdentity, PipelineSelection};
use ade_validate::ValidationReport;

#[derive(Debug)]
pub struct CheckResult {
    pub ingest: IngestOutcome,
    pub report: ValidationReport,
}

#[derive(Debug)]
pub enum GenerateOutcome {
    /// Operator did not confirm the prerequisites.
    Declined,
    Generated(GenerateSummary),
}

#[derive(Debug)]
pub struct GenerateSummary {
    pub folder: PathBuf,
    pub run_reference: String,
    pub identity: ClientIdentity,
    pub pipeline: PipelineSelection,
    pub patient_count: usize,
    pub analysis_count: usize,
    pub topology_count: usize,
    pub skipped_files: usize,
    /// `None` when the document went to stdout.
    pub output: Option<PathBuf>,
}
