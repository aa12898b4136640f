//! Sample ids shared between patients.

use std::collections::BTreeMap;

use ade_model::PatientBucket;

use crate::issue::Issue;

/// Report every sample id of `patient` that another patient also uses.
pub fn check(patient: &PatientBucket, sample_owners: &BTreeMap<&str, Vec<&str>>) -> Vec<Issue> {
    let mut issues = Vec::new();
    for sample in &patient.samples {
        let Some(owners) = sample_owners.get(sample.sample_id.as_str()) else {
            continue;
        };
        for other in owners.iter().filter(|o| **o != patient.patient_ref) {
            issues.push(Issue::SampleIdCollision {
                sample_id: sample.sample_id.clone(),
                other_patient: (*other).to_string(),
            });
        }
    }
    issues
}
