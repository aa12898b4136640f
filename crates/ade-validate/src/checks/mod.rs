//! Individual validation checks. Each returns the issues it found.

pub mod collision;
pub mod reference;
pub mod samples;

use std::collections::BTreeMap;

use ade_model::{PatientBucket, PatientRecords};

use crate::issue::Issue;

/// Run every per-patient check in a fixed order.
pub fn run_all(
    patient: &PatientBucket,
    sample_owners: &BTreeMap<&str, Vec<&str>>,
) -> Vec<Issue> {
    let mut issues = Vec::new();
    issues.extend(reference::check(patient));
    issues.extend(samples::check(patient));
    issues.extend(collision::check(patient, sample_owners));
    issues
}

/// sample-id -> patient-refs using it, across the whole batch.
pub fn sample_owners(records: &PatientRecords) -> BTreeMap<&str, Vec<&str>> {
    let mut owners: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
    for patient in records {
        for sample in &patient.samples {
            owners
                .entry(sample.sample_id.as_str())
                .or_default()
                .push(patient.patient_ref.as_str());
        }
    }
    owners
}
