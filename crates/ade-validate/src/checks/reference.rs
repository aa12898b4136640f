//! Patient-ref length check.

use ade_model::{MAX_PATIENT_REF_LENGTH, PatientBucket};

use crate::issue::Issue;

/// Check the patient-ref fits the service limit (counted in characters).
pub fn check(patient: &PatientBucket) -> Option<Issue> {
    let length = patient.patient_ref.chars().count();
    (length > MAX_PATIENT_REF_LENGTH).then_some(Issue::PatientRefTooLong {
        length,
        max: MAX_PATIENT_REF_LENGTH,
    })
}
