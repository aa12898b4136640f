//! Validation issue types.
//!
//! Each variant carries only the data its message needs.

use ade_model::SampleTag;
use serde::{Deserialize, Serialize};

/// A rule a patient bucket violates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Issue {
    /// Patient-ref longer than the service accepts.
    PatientRefTooLong { length: usize, max: usize },
    /// Patient has neither one nor two samples.
    SampleCount { found: usize },
    /// Two samples that are not D/R, N/T, or both untagged.
    PairTags { first: SampleTag, second: SampleTag },
    /// Single sample tagged other than D, R or nothing.
    SingleSampleTag { tag: SampleTag },
    /// A sample id of this patient is also used by another patient.
    SampleIdCollision {
        sample_id: String,
        other_patient: String,
    },
}

impl Issue {
    /// Short stable code for tables and machine output.
    pub fn code(&self) -> &'static str {
        match self {
            Issue::PatientRefTooLong { .. } => "REF_LENGTH",
            Issue::SampleCount { .. } => "SAMPLE_COUNT",
            Issue::PairTags { .. } => "PAIR_TAGS",
            Issue::SingleSampleTag { .. } => "SINGLE_TAG",
            Issue::SampleIdCollision { .. } => "SAMPLE_COLLISION",
        }
    }

    /// Human-readable description including the offending values.
    pub fn message(&self) -> String {
        match self {
            Issue::PatientRefTooLong { length, max } => {
                format!("Patient refs can be no longer than {max} characters - found {length}")
            }
            Issue::SampleCount { found } => {
                format!("Each patient should have one or two samples - found {found}")
            }
            Issue::PairTags { first, second } => format!(
                "Patients with two samples should have D and R (mys), T and N (tumorNormal), \
                 or none - found <{first}> and <{second}>"
            ),
            Issue::SingleSampleTag { tag } => {
                format!("Single sample patients should be D, R, or empty - found <{tag}>")
            }
            Issue::SampleIdCollision {
                sample_id,
                other_patient,
            } => format!("Sample id {sample_id} is also used by patient ref {other_patient}"),
        }
    }
}

/// An issue attributed to a patient-ref.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Problem {
    pub patient_ref: String,
    pub issue: Issue,
}

impl Problem {
    pub fn new(patient_ref: impl Into<String>, issue: Issue) -> Self {
        Self {
            patient_ref: patient_ref.into(),
            issue,
        }
    }

    pub fn message(&self) -> String {
        self.issue.message()
    }
}
