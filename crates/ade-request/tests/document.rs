//! Tests for request document assembly and output.

use ade_model::{
    ClientIdentity, IdentityBinding, IdentityBindings, LibraryType, PatientRecords,
    PipelineSelection, ReferenceRole, SampleTag, TopologyKind, UNRESOLVED_ID,
};
use ade_request::{
    DEFAULT_SAMPLE_TYPE_ID, RequestContext, RequestError, build_document, render_json,
    write_document,
};
use tempfile::TempDir;

fn context() -> RequestContext {
    RequestContext::new(
        "RUN1",
        ClientIdentity {
            user_id: 3,
            client_id: 4,
        },
        PipelineSelection {
            pipeline_id: 5,
            sequencer_id: 7,
        },
        DEFAULT_SAMPLE_TYPE_ID,
    )
    .with_request_date(1_700_000_000)
}

fn paired_records() -> PatientRecords {
    let mut records = PatientRecords::new();
    records.add("P1", "S1", SampleTag::Dna, "f1.fastq.gz");
    records.add("P1", "S2", SampleTag::Rna, "f2.fastq.gz");
    records.finalize()
}

fn bindings() -> IdentityBindings {
    [("P1", IdentityBinding::new(10, 20))].into_iter().collect()
}

#[test]
fn paired_dna_rna_patient_builds_mys_topology() {
    let document = build_document(&paired_records(), &bindings(), &context()).unwrap();
    let analyses = &document.request.analyses;
    assert_eq!(analyses.len(), 2);
    assert_eq!(analyses[0].definition.user_ref, "P1-D");
    assert_eq!(analyses[0].definition.library_type, LibraryType::Dna);
    assert_eq!(analyses[1].definition.user_ref, "P1-R");
    assert_eq!(analyses[1].definition.library_type, LibraryType::Rna);
    assert_eq!(analyses[0].definition.sga_pipeline_id, 5);
    assert_eq!(analyses[0].definition.sample_type_id, 108_000);
    assert_eq!(analyses[0].patient, IdentityBinding::new(10, 20));

    let topology = &document.request.topology;
    assert_eq!(topology.len(), 1);
    assert_eq!(topology[0].definition.kind, TopologyKind::Mys);
    let references: Vec<_> = topology[0]
        .references
        .iter()
        .map(|r| (r.analysis_reference.sample_id.as_str(), r.role))
        .collect();
    assert_eq!(
        references,
        vec![("S1", ReferenceRole::Dna), ("S2", ReferenceRole::Rna)]
    );
}

#[test]
fn paired_document_renders_with_three_space_indent() {
    let document = build_document(&paired_records(), &bindings(), &context()).unwrap();
    let rendered = render_json(&document).unwrap();
    insta::assert_snapshot!("paired_dna_rna_document", rendered);
}

#[test]
fn untagged_pair_has_plain_refs_and_no_topology() {
    let mut records = PatientRecords::new();
    records.add("P1", "S1", SampleTag::Unspecified, "f1.fastq.gz");
    records.add("P1", "S2", SampleTag::Unspecified, "f2.fastq.gz");
    let records = records.finalize();

    let document = build_document(&records, &bindings(), &context()).unwrap();
    let refs: Vec<_> = document
        .request
        .analyses
        .iter()
        .map(|a| a.definition.user_ref.as_str())
        .collect();
    assert_eq!(refs, vec!["P1", "P1"]);
    assert!(document.request.topology.is_empty());
    assert!(document.request.files.is_empty());
}

#[test]
fn tumor_normal_roles_follow_sample_order() {
    let mut records = PatientRecords::new();
    records.add("P7", "S4", SampleTag::Tumor, "t.fastq.gz");
    records.add("P7", "S5", SampleTag::Normal, "n.fastq.gz");
    let bindings: IdentityBindings = [("P7", IdentityBinding::new(1, 2))].into_iter().collect();

    let document = build_document(&records.finalize(), &bindings, &context()).unwrap();
    let topology = &document.request.topology[0];
    assert_eq!(topology.definition.kind, TopologyKind::TumorNormal);
    assert_eq!(topology.references[0].role, ReferenceRole::Tumor);
    assert_eq!(topology.references[1].role, ReferenceRole::Normal);
    // Tumor and normal are both DNA libraries.
    assert!(
        document
            .request
            .analyses
            .iter()
            .all(|a| a.definition.library_type == LibraryType::Dna)
    );
}

#[test]
fn files_keep_append_order() {
    let mut records = PatientRecords::new();
    records.add("P1", "S1", SampleTag::Dna, "a_R2.fastq.gz");
    records.add("P1", "S1", SampleTag::Dna, "a_R1.fastq.gz");
    let document = build_document(&records.finalize(), &bindings(), &context()).unwrap();
    let names: Vec<_> = document.request.analyses[0]
        .files
        .iter()
        .map(|f| f.definition.name.as_str())
        .collect();
    assert_eq!(names, vec!["a_R2.fastq.gz", "a_R1.fastq.gz"]);
}

#[test]
fn missing_binding_fails_assembly() {
    let mut records = PatientRecords::new();
    records.add("P2", "S9", SampleTag::Unspecified, "f.fastq.gz");
    let err = build_document(&records.finalize(), &bindings(), &context()).unwrap_err();
    assert!(matches!(err, RequestError::MissingBinding { ref patient_ref } if patient_ref == "P2"));
}

#[test]
fn unresolved_client_fails_assembly() {
    let mut context = context();
    context.identity.client_id = UNRESOLVED_ID;
    let err = build_document(&paired_records(), &bindings(), &context).unwrap_err();
    assert!(matches!(
        err,
        RequestError::UnresolvedIdentifier { name: "client id" }
    ));
}

#[test]
fn unknown_tag_is_rejected() {
    let mut records = PatientRecords::new();
    records.add("P1", "S1", SampleTag::parse("X"), "f.fastq.gz");
    let err = build_document(&records.finalize(), &bindings(), &context()).unwrap_err();
    assert!(matches!(err, RequestError::UnsupportedTag { .. }));
}

#[test]
fn written_document_reads_back() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("ade.json");
    let document = build_document(&paired_records(), &bindings(), &context()).unwrap();

    write_document(&document, &path).unwrap();
    let text = std::fs::read_to_string(&path).unwrap();
    assert!(text.ends_with("}\n"));
    let value: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(value["protocolName"], "ADE");
    assert_eq!(value["request"]["state"], serde_json::Value::Null);
    assert_eq!(value["request"]["definition"]["requestDate"], 1_700_000_000);
}
