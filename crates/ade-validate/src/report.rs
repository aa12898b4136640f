use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::issue::Problem;

/// Every problem found across a batch. The batch is valid only when empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub problems: Vec<Problem>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.problems.is_empty()
    }

    pub fn problem_count(&self) -> usize {
        self.problems.len()
    }

    /// Problems for one patient, in the order they were found.
    pub fn problems_for<'a>(&'a self, patient_ref: &'a str) -> impl Iterator<Item = &'a Problem> {
        self.problems
            .iter()
            .filter(move |p| p.patient_ref == patient_ref)
    }

    /// Patient-refs with at least one problem.
    pub fn failing_patients(&self) -> BTreeSet<&str> {
        self.problems
            .iter()
            .map(|p| p.patient_ref.as_str())
            .collect()
    }
}
