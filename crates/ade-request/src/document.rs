//! ADE request document model.
//!
//! Field order follows the document layout the upload service expects, so the
//! serialized output is stable.

use std::collections::BTreeMap;

use ade_model::{IdentityBinding, LibraryType, ReferenceRole, TopologyKind};
use serde::{Deserialize, Serialize};

pub const PROTOCOL_NAME: &str = "ADE";
pub const PROTOCOL_VERSION: &str = "1";

/// Top-level request document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdeDocument {
    pub protocol_name: String,
    pub protocol_version: String,
    pub client: Client,
    pub request: Request,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    pub id: i64,
    pub user_id: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Request {
    pub definition: RequestDefinition,
    /// Always null in a new request; set by the service.
    pub state: Option<serde_json::Value>,
    pub analyses: Vec<Analysis>,
    pub topology: Vec<Topology>,
    pub files: Vec<FileEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestDefinition {
    /// Run reference.
    pub user_ref: String,
    pub sequencer_id: i64,
    /// Epoch seconds.
    pub request_date: i64,
    pub is_paired_end: bool,
    pub is_prevent: bool,
}

/// One analysis per sample.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Analysis {
    pub definition: AnalysisDefinition,
    pub patient: IdentityBinding,
    pub is_control_sample: bool,
    pub files: Vec<FileEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisDefinition {
    pub sample_id: String,
    pub multiplex_id: String,
    pub sga_pipeline_id: i64,
    /// Patient-ref, suffixed with `-<tag>` when the sample is tagged.
    pub user_ref: String,
    pub sample_type_id: i64,
    pub library_type: LibraryType,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileEntry {
    pub definition: FileDefinition,
}

impl FileEntry {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            definition: FileDefinition { name: name.into() },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileDefinition {
    pub name: String,
}

/// Declared relationship between the two samples of a patient.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Topology {
    pub definition: TopologyDefinition,
    pub references: Vec<TopologyReference>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopologyDefinition {
    #[serde(rename = "type")]
    pub kind: TopologyKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopologyReference {
    pub analysis_reference: AnalysisReference,
    pub role: ReferenceRole,
    pub metadata: BTreeMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReference {
    pub sample_id: String,
}
