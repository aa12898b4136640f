//! Request document assembly.
//!
//! Assembly is a pure function of validated records, identity bindings and
//! the scalar identifiers in [`RequestContext`]. Any missing input is a
//! precondition violation and fails the whole document.

use std::collections::BTreeMap;
use std::path::Path;

use ade_model::{
    ClientIdentity, IdentityBinding, IdentityBindings, PatientBucket, PatientRecords,
    PipelineSelection, SampleRecord, TopologyKind, is_resolved,
};
use chrono::{NaiveDateTime, Utc};
use tracing::debug;

use crate::document::{
    AdeDocument, Analysis, AnalysisDefinition, AnalysisReference, Client, FileEntry,
    PROTOCOL_NAME, PROTOCOL_VERSION, Request, RequestDefinition, Topology, TopologyDefinition,
    TopologyReference,
};
use crate::error::{RequestError, Result};

/// Sample type applied to every analysis unless overridden (peripheral blood).
pub const DEFAULT_SAMPLE_TYPE_ID: i64 = 108_000;

/// Scalar inputs of a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
    pub run_reference: String,
    pub identity: ClientIdentity,
    pub pipeline: PipelineSelection,
    pub sample_type_id: i64,
    /// Epoch seconds stamped on the request.
    pub request_date: i64,
}

impl RequestContext {
    /// Context stamped with the current time.
    pub fn new(
        run_reference: impl Into<String>,
        identity: ClientIdentity,
        pipeline: PipelineSelection,
        sample_type_id: i64,
    ) -> Self {
        Self {
            run_reference: run_reference.into(),
            identity,
            pipeline,
            sample_type_id,
            request_date: Utc::now().timestamp(),
        }
    }

    pub fn with_request_date(mut self, request_date: i64) -> Self {
        self.request_date = request_date;
        self
    }

    fn ensure_resolved(&self) -> Result<()> {
        let ids = [
            ("user id", self.identity.user_id),
            ("client id", self.identity.client_id),
            ("pipeline id", self.pipeline.pipeline_id),
            ("sequencer id", self.pipeline.sequencer_id),
        ];
        for (name, id) in ids {
            if !is_resolved(id) {
                return Err(RequestError::UnresolvedIdentifier { name });
            }
        }
        Ok(())
    }
}

/// Run reference used when none is given: `<folder name>_<YYYYMMDDHHMM>`.
pub fn default_run_reference(folder: &Path, now: NaiveDateTime) -> String {
    let name = folder
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    format!("{name}_{}", now.format("%Y%m%d%H%M"))
}

/// Assemble the request document.
///
/// Analyses follow record order, one per sample. Topologies are emitted only
/// for patients whose two samples are tagged `{D, R}` or `{N, T}`.
pub fn build_document(
    records: &PatientRecords,
    bindings: &IdentityBindings,
    context: &RequestContext,
) -> Result<AdeDocument> {
    context.ensure_resolved()?;

    let mut analyses = Vec::with_capacity(records.sample_count());
    let mut topology = Vec::new();

    for patient in records {
        let binding = bindings
            .get(&patient.patient_ref)
            .ok_or_else(|| RequestError::MissingBinding {
                patient_ref: patient.patient_ref.clone(),
            })?;

        for sample in &patient.samples {
            analyses.push(build_analysis(patient, sample, *binding, context)?);
        }

        if let Some(entry) = build_topology(patient) {
            topology.push(entry);
        }
    }

    debug!(
        analysis_count = analyses.len(),
        topology_count = topology.len(),
        "assembled request document"
    );

    Ok(AdeDocument {
        protocol_name: PROTOCOL_NAME.to_string(),
        protocol_version: PROTOCOL_VERSION.to_string(),
        client: Client {
            id: context.identity.client_id,
            user_id: context.identity.user_id,
        },
        request: Request {
            definition: RequestDefinition {
                user_ref: context.run_reference.clone(),
                sequencer_id: context.pipeline.sequencer_id,
                request_date: context.request_date,
                is_paired_end: true,
                is_prevent: false,
            },
            state: None,
            analyses,
            topology,
            files: Vec::new(),
        },
    })
}

fn build_analysis(
    patient: &PatientBucket,
    sample: &SampleRecord,
    binding: IdentityBinding,
    context: &RequestContext,
) -> Result<Analysis> {
    let library_type = sample
        .tag
        .library_type()
        .ok_or_else(|| RequestError::UnsupportedTag {
            patient_ref: patient.patient_ref.clone(),
            sample_id: sample.sample_id.clone(),
            tag: sample.tag.to_string(),
        })?;

    let user_ref = if sample.tag.is_unspecified() {
        patient.patient_ref.clone()
    } else {
        format!("{}-{}", patient.patient_ref, sample.tag)
    };

    Ok(Analysis {
        definition: AnalysisDefinition {
            sample_id: sample.sample_id.clone(),
            multiplex_id: sample.sample_id.clone(),
            sga_pipeline_id: context.pipeline.pipeline_id,
            user_ref,
            sample_type_id: context.sample_type_id,
            library_type,
        },
        patient: binding,
        is_control_sample: false,
        files: sample.files.iter().map(FileEntry::named).collect(),
    })
}

fn build_topology(patient: &PatientBucket) -> Option<Topology> {
    let kind = TopologyKind::from_tags(&patient.tags())?;
    let references = patient
        .samples
        .iter()
        .filter_map(|sample| {
            sample.tag.role().map(|role| TopologyReference {
                analysis_reference: AnalysisReference {
                    sample_id: sample.sample_id.clone(),
                },
                role,
                metadata: BTreeMap::new(),
            })
        })
        .collect();

    Some(Topology {
        definition: TopologyDefinition { kind },
        references,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn default_run_reference_uses_folder_name_and_minutes() {
        let now = NaiveDate::from_ymd_opt(2024, 3, 9)
            .unwrap()
            .and_hms_opt(7, 5, 59)
            .unwrap();
        assert_eq!(
            default_run_reference(Path::new("/data/runs/RUN_42/"), now),
            "RUN_42_202403090705"
        );
    }

    #[test]
    fn unresolved_identifier_is_named() {
        let context = RequestContext::new(
            "ref",
            ClientIdentity {
                user_id: 1,
                client_id: 2,
            },
            PipelineSelection {
                pipeline_id: 5,
                sequencer_id: ade_model::UNRESOLVED_ID,
            },
            DEFAULT_SAMPLE_TYPE_ID,
        );
        let err = context.ensure_resolved().unwrap_err();
        assert_eq!(err.to_string(), "sequencer id is unresolved");
    }
}
