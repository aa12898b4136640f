//! Identity binding extraction from uploader output.
//!
//! `patient -l` prints log lines around a compact JSON array of
//! `{"medicalInformationId":..,"personalInformationId":..,"userRef":".."}`
//! records. The array is located by shape, then decoded.

use std::sync::LazyLock;

use ade_model::{IdentityBinding, IdentityBindings};
use regex::Regex;
use serde::Deserialize;
use tracing::{debug, error};

use crate::error::BindingError;

static PATIENT_LIST_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    let one = r#"\{"medicalInformationId":\d+,"personalInformationId":\d+,"userRef":".+"\}"#;
    Regex::new(&format!(r"(\[{one}(,{one})*\])")).expect("Invalid patient list regex")
});

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PatientIds {
    medical_information_id: i64,
    personal_information_id: i64,
    user_ref: String,
}

/// Find and decode the embedded patient list.
///
/// A missing list and an undecodable list are distinct errors; neither yields
/// partial bindings.
pub fn extract_bindings(text: &str) -> Result<IdentityBindings, BindingError> {
    let Some(found) = PATIENT_LIST_REGEX.find(text) else {
        error!("couldn't find patient list in uploader output");
        return Err(BindingError::NotFound);
    };

    debug!("parsing patient ids");
    let entries: Vec<PatientIds> = serde_json::from_str(found.as_str()).map_err(|source| {
        error!(%source, "couldn't decode patient ids");
        BindingError::Decode(source)
    })?;

    Ok(entries
        .into_iter()
        .map(|entry| {
            (
                entry.user_ref,
                IdentityBinding::new(entry.personal_information_id, entry.medical_information_id),
            )
        })
        .collect())
}
