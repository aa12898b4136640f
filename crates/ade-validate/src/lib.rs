//! Validation of extracted patient records.
//!
//! Every patient is checked in one pass and every violation is collected, so
//! a single run shows the full picture:
//!
//! - **Patient-ref length**: at most 30 characters
//! - **Sample count**: one or two samples per patient
//! - **Tag combinations**: D/R, N/T or untagged pairs; D, R or untagged singles
//! - **Sample id collisions**: a sample id belongs to one patient only
//!
//! # Example
//!
//! ```ignore
//! use ade_validate::validate_records;
//!
//! let report = validate_records(&records);
//! for problem in &report.problems {
//!     println!("{}: {}", problem.patient_ref, problem.message());
//! }
//! ```

mod checks;
mod issue;
mod report;

use ade_model::PatientRecords;
use tracing::{error, info};

pub use issue::{Issue, Problem};
pub use report::ValidationReport;

/// Validate all patients of a batch.
///
/// Problems are reported through the returned report, never raised. The
/// batch must be rejected as a whole when the report is not valid.
pub fn validate_records(records: &PatientRecords) -> ValidationReport {
    let owners = checks::sample_owners(records);
    let mut report = ValidationReport::default();

    for patient in records {
        let issues = checks::run_all(patient, &owners);
        if issues.is_empty() {
            continue;
        }
        error!(
            patient_ref = %patient.patient_ref,
            problem_count = issues.len(),
            "patient failed validation"
        );
        for issue in issues {
            error!(patient_ref = %patient.patient_ref, code = issue.code(), "{}", issue.message());
            report
                .problems
                .push(Problem::new(patient.patient_ref.clone(), issue));
        }
    }

    if report.is_valid() {
        info!(patient_count = records.len(), "all patients passed validation");
    }
    report
}
