//! Identifiers assigned by the upload service.
//!
//! These values come from uploader calls, not from the read files. An id that
//! could not be obtained is carried as [`UNRESOLVED_ID`] and blocks request
//! assembly.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Sentinel for an identifier the upload service did not return.
pub const UNRESOLVED_ID: i64 = -1;

pub fn is_resolved(id: i64) -> bool {
    id != UNRESOLVED_ID
}

/// Personal and medical information ids assigned to one patient-ref.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentityBinding {
    pub personal_information_id: i64,
    pub medical_information_id: i64,
}

impl IdentityBinding {
    pub fn new(personal_information_id: i64, medical_information_id: i64) -> Self {
        Self {
            personal_information_id,
            medical_information_id,
        }
    }
}

/// patient-ref -> identity binding.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityBindings(BTreeMap<String, IdentityBinding>);

impl IdentityBindings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a binding. A later binding for the same patient-ref wins.
    pub fn insert(&mut self, patient_ref: impl Into<String>, binding: IdentityBinding) {
        self.0.insert(patient_ref.into(), binding);
    }

    pub fn get(&self, patient_ref: &str) -> Option<&IdentityBinding> {
        self.0.get(patient_ref)
    }

    pub fn contains(&self, patient_ref: &str) -> bool {
        self.0.contains_key(patient_ref)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &IdentityBinding)> {
        self.0.iter()
    }
}

impl<K: Into<String>> FromIterator<(K, IdentityBinding)> for IdentityBindings {
    fn from_iter<I: IntoIterator<Item = (K, IdentityBinding)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

/// Account the request is filed under (`client` block of the document).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientIdentity {
    pub user_id: i64,
    pub client_id: i64,
}

impl ClientIdentity {
    pub fn unresolved() -> Self {
        Self {
            user_id: UNRESOLVED_ID,
            client_id: UNRESOLVED_ID,
        }
    }

    pub fn is_resolved(&self) -> bool {
        is_resolved(self.user_id) && is_resolved(self.client_id)
    }
}

/// Pipeline chosen for every analysis, with the sequencer it runs on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineSelection {
    pub pipeline_id: i64,
    pub sequencer_id: i64,
}

impl PipelineSelection {
    pub fn is_resolved(&self) -> bool {
        is_resolved(self.pipeline_id) && is_resolved(self.sequencer_id)
    }
}
