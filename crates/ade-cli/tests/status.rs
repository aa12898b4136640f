use std::path::PathBuf;

use ade_cli::status::{ExitStatus, Halt, exit_status};
use ade_ingest::IngestError;
use ade_request::{BindingError, RequestError};
use ade_uploader::UploaderError;
use anyhow::Context;

fn status_of<E>(error: E) -> ExitStatus
where
    E: std::error::Error + Send + Sync + 'static,
{
    exit_status(&anyhow::Error::new(error))
}

#[test]
fn codes_are_stable() {
    let codes: Vec<i32> = [
        ExitStatus::Success,
        ExitStatus::NoPatientData,
        ExitStatus::ValidationFailed,
        ExitStatus::BindingsUnavailable,
        ExitStatus::IdentityUnresolved,
        ExitStatus::PipelineUnresolved,
        ExitStatus::JarNotFound,
        ExitStatus::ConfigNotFound,
        ExitStatus::Failure,
    ]
    .into_iter()
    .map(ExitStatus::code)
    .collect();
    assert_eq!(codes, (0..=8).collect::<Vec<_>>());
}

#[test]
fn empty_or_unmatched_folders_mean_no_patient_data() {
    let path = PathBuf::from("/runs/empty");
    assert_eq!(
        status_of(IngestError::NoFilesFound { path: path.clone() }),
        ExitStatus::NoPatientData
    );
    assert_eq!(
        status_of(IngestError::NoMatchingFiles { path, scanned: 4 }),
        ExitStatus::NoPatientData
    );
}

#[test]
fn bad_rule_file_is_a_plain_failure() {
    let error = IngestError::RuleFileNotFound {
        path: PathBuf::from("rules.txt"),
    };
    assert_eq!(status_of(error), ExitStatus::Failure);
}

#[test]
fn uploader_errors_map_to_their_codes() {
    assert_eq!(
        status_of(UploaderError::JarNotFound {
            path: PathBuf::from("missing.jar")
        }),
        ExitStatus::JarNotFound
    );
    assert_eq!(
        status_of(UploaderError::ConfigNotFound {
            path: PathBuf::from("missing.yml")
        }),
        ExitStatus::ConfigNotFound
    );
    assert_eq!(
        status_of(UploaderError::Bindings(BindingError::NotFound)),
        ExitStatus::BindingsUnavailable
    );
}

#[test]
fn unresolved_identifiers_split_by_kind() {
    assert_eq!(
        status_of(RequestError::UnresolvedIdentifier { name: "client id" }),
        ExitStatus::IdentityUnresolved
    );
    assert_eq!(
        status_of(RequestError::UnresolvedIdentifier {
            name: "sequencer id"
        }),
        ExitStatus::PipelineUnresolved
    );
    assert_eq!(
        status_of(RequestError::MissingBinding {
            patient_ref: "P1".to_string()
        }),
        ExitStatus::BindingsUnavailable
    );
}

#[test]
fn halt_survives_context() {
    let result: anyhow::Result<()> =
        Err(Halt::new(ExitStatus::ValidationFailed, "2 problem(s) in 1 patient(s)").into());
    let error = result.context("generate").unwrap_err();
    assert_eq!(exit_status(&error), ExitStatus::ValidationFailed);
    assert_eq!(format!("{error:#}"), "generate: 2 problem(s) in 1 patient(s)");
}

#[test]
fn wrapped_uploader_error_is_found_in_chain() {
    let result: Result<(), UploaderError> = Err(UploaderError::JarNotFound {
        path: PathBuf::from("sg.jar"),
    });
    let error = result.context("locate uploader").unwrap_err();
    assert_eq!(exit_status(&error), ExitStatus::JarNotFound);
}

#[test]
fn unknown_errors_are_failures() {
    let error = anyhow::anyhow!("something else");
    assert_eq!(exit_status(&error), ExitStatus::Failure);
}
