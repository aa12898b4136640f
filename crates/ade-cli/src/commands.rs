use std::path::Path;
use std::time::Instant;

use ade_ingest::{IngestOutcome, PatternExtractor, RuleSet, ingest_folder};
use ade_model::IdentityBindings;
use ade_request::{
    RequestContext, build_document, default_run_reference, render_json, write_document,
};
use ade_uploader::{
    AlternateClient, Operator, TokenCard, TokenRelay, UploaderCommand,
    fetch_bindings, list_pipelines, select_pipeline, user_info,
};
use ade_validate::{ValidationReport, validate_records};
use anyhow::{Context, Result};
use chrono::Local;
use comfy_table::Table;
use tracing::{info, info_span};

use ade_cli::status::{ExitStatus, Halt};

use crate::cli::{CheckArgs, FolderArgs, GenerateArgs, RulesArgs};
use crate::summary::{apply_table_style, print_problems};
use crate::types::{CheckResult, GenerateOutcome, GenerateSummary};

const PREREQUISITES: &[&str] = &[
    "Prerequisites",
    " - be logged in with the uploader jar",
    " - all files in the target folder should use the same pipeline",
    "Please do not upload any files containing nominative information or any other direct \
     identifier related to a patient (e.g. patient's first and/or last names in file name)",
];

pub fn run_rules(args: &RulesArgs) -> Result<()> {
    let rules = load_rules(args.rules.as_deref())?;
    let mut table = Table::new();
    table.set_header(vec!["#", "Pattern", "Patient ref", "Sample id", "Tag"]);
    apply_table_style(&mut table);
    for (index, rule) in rules.rules().iter().enumerate() {
        table.add_row(vec![
            (index + 1).to_string(),
            rule.pattern().to_string(),
            rule.patient_ref().to_string(),
            rule.sample_id().to_string(),
            rule.tag().map_or_else(|| "-".to_string(), ToString::to_string),
        ]);
    }
    println!("{table}");
    Ok(())
}

pub fn run_check(args: &CheckArgs) -> Result<CheckResult> {
    let ingest = ingest(&args.folder)?;
    let report = validate(&ingest);
    Ok(CheckResult { ingest, report })
}

pub fn run_generate(args: &GenerateArgs, operator: &mut dyn Operator) -> Result<GenerateOutcome> {
    let folder = &args.folder.folder;
    let run_span = info_span!("generate", folder = %folder.display());
    let _run_guard = run_span.enter();
    let start = Instant::now();

    if !args.confirm && !confirm(operator)? {
        info!("declined at prerequisites");
        return Ok(GenerateOutcome::Declined);
    }

    let command = UploaderCommand::java(&args.jar, args.uploader_config.as_deref())
        .context("locate uploader")?
        .with_debug(args.debug);
    info!(command = %command.display(&[]), "using uploader");

    // Stage 1: read and check the folder
    let ingest = ingest(&args.folder)?;
    let report = validate(&ingest);
    if !report.is_valid() {
        print_problems(&report);
        return Err(Halt::new(
            ExitStatus::ValidationFailed,
            format!(
                "{} problem(s) in {} patient(s)",
                report.problem_count(),
                report.failing_patients().len()
            ),
        )
        .into());
    }
    let records = &ingest.records;

    // Stage 2: register patients and read back their identity bindings
    let card = args
        .token_card
        .as_deref()
        .map(TokenCard::load)
        .transpose()
        .context("load token card")?;
    let bindings = {
        let span = info_span!("identities", patient_count = records.len());
        let _guard = span.enter();
        resolve_bindings(&command, &records.patient_refs(), args.client_id, operator, card.as_ref())
            .context("obtain patient ids")?
    };

    // Stage 3: account and pipeline
    let mut identity = user_info(&command).context("fetch user info")?;
    if let Some(client_id) = args.client_id {
        identity.client_id = client_id;
    }
    if !identity.is_resolved() {
        return Err(Halt::new(ExitStatus::IdentityUnresolved, "user id or client id unresolved").into());
    }

    let pipelines = list_pipelines(&command).context("list pipelines")?;
    let pipeline = select_pipeline(&pipelines, args.pipeline, operator)?;
    if !pipeline.is_resolved() {
        return Err(Halt::new(
            ExitStatus::PipelineUnresolved,
            format!("pipeline {} is not available", pipeline.pipeline_id),
        )
        .into());
    }

    // Stage 4: assemble and emit
    let run_reference = args
        .reference
        .clone()
        .unwrap_or_else(|| default_run_reference(folder, Local::now().naive_local()));
    let assemble_span = info_span!("assemble", run_reference = %run_reference);
    let _assemble_guard = assemble_span.enter();
    let context = RequestContext::new(&run_reference, identity, pipeline, args.sample_type);
    let document = build_document(records, &bindings, &context).context("assemble request")?;

    let output = match &args.output {
        Some(path) => Some(write_document(&document, path).context("write request")?),
        None => {
            println!("{}", render_json(&document).context("render request")?);
            None
        }
    };

    info!(
        analyses = document.request.analyses.len(),
        duration_ms = start.elapsed().as_millis(),
        "request generated"
    );

    Ok(GenerateOutcome::Generated(GenerateSummary {
        folder: folder.clone(),
        run_reference,
        identity,
        pipeline,
        patient_count: records.len(),
        analysis_count: document.request.analyses.len(),
        topology_count: document.request.topology.len(),
        skipped_files: ingest.skipped.len(),
        output,
    }))
}

fn confirm(operator: &mut dyn Operator) -> Result<bool> {
    for line in PREREQUISITES {
        operator.say(line)?;
    }
    Ok(operator.confirm("Do you wish to continue? (y/n) ")?)
}

fn load_rules(path: Option<&Path>) -> Result<RuleSet> {
    match path {
        Some(path) => Ok(RuleSet::load(path)?),
        None => Ok(RuleSet::illumina()),
    }
}

fn ingest(args: &FolderArgs) -> Result<IngestOutcome> {
    let span = info_span!("ingest", folder = %args.folder.display(), deep = args.deep);
    let _guard = span.enter();
    let extractor = PatternExtractor::new(load_rules(args.rules.as_deref())?);
    let outcome = ingest_folder(&args.folder, args.deep, &extractor)?;
    info!(
        scanned = outcome.scanned,
        patients = outcome.records.len(),
        samples = outcome.records.sample_count(),
        skipped = outcome.skipped.len(),
        "folder read"
    );
    Ok(outcome)
}

fn validate(outcome: &IngestOutcome) -> ValidationReport {
    let span = info_span!("validate", patients = outcome.records.len());
    let _guard = span.enter();
    validate_records(&outcome.records)
}

fn resolve_bindings(
    command: &UploaderCommand,
    patient_refs: &[&str],
    client_id: Option<i64>,
    operator: &mut dyn Operator,
    card: Option<&TokenCard>,
) -> Result<IdentityBindings> {
    let Some(client_id) = client_id else {
        return Ok(fetch_bindings(command, patient_refs, None)?);
    };
    let relay = TokenRelay::new(operator, card);
    let mut client = AlternateClient::new(client_id, relay);
    Ok(fetch_bindings(command, patient_refs, Some(&mut client))?)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use ade_cli::status::exit_status;
    use ade_uploader::ScriptedOperator;
    use clap::Parser;
    use tempfile::TempDir;

    use super::*;

    fn folder_with(names: &[&str]) -> TempDir {
        let dir = TempDir::new().expect("temp dir");
        for name in names {
            fs::write(dir.path().join(name), "").expect("write read file");
        }
        dir
    }

    fn generate_args(extra: &[&str]) -> GenerateArgs {
        let mut argv = vec!["generate"];
        argv.extend_from_slice(extra);
        GenerateArgs::try_parse_from(argv).expect("parse generate args")
    }

    #[test]
    fn check_passes_paired_patient() {
        let dir = folder_with(&[
            "P1-D_S1_L001_R1_001.fastq.gz",
            "P1-D_S1_L001_R2_001.fastq.gz",
            "P1-R_S2_L001_R1_001.fastq.gz",
            "P1-R_S2_L001_R2_001.fastq.gz",
            "SampleSheet.csv",
        ]);
        let args = CheckArgs::try_parse_from(["check", dir.path().to_str().unwrap()]).unwrap();
        let result = run_check(&args).unwrap();
        assert!(result.report.is_valid());
        assert_eq!(result.ingest.records.len(), 1);
        assert_eq!(result.ingest.skipped.len(), 1);
    }

    #[test]
    fn check_reports_mixed_pair() {
        let dir = folder_with(&["P1-D_S1_L001_R1_001.fastq.gz", "P1-T_S2_L001_R1_001.fastq.gz"]);
        let args = CheckArgs::try_parse_from(["check", dir.path().to_str().unwrap()]).unwrap();
        let result = run_check(&args).unwrap();
        assert!(!result.report.is_valid());
        assert_eq!(result.report.failing_patients().len(), 1);
    }

    #[test]
    fn check_of_empty_folder_has_no_patient_data() {
        let dir = folder_with(&[]);
        let args = CheckArgs::try_parse_from(["check", dir.path().to_str().unwrap()]).unwrap();
        let error = run_check(&args).unwrap_err();
        assert_eq!(exit_status(&error), ExitStatus::NoPatientData);
    }

    #[test]
    fn declining_prerequisites_stops_early() {
        let dir = folder_with(&["P1-D_S1_L001_R1_001.fastq.gz"]);
        let args = generate_args(&[dir.path().to_str().unwrap(), "-j", "/missing/uploader.jar"]);
        let mut operator = ScriptedOperator::new(["n"]);
        let outcome = run_generate(&args, &mut operator).unwrap();
        assert!(matches!(outcome, GenerateOutcome::Declined));
        assert_eq!(operator.transcript[0], "Prerequisites");
        assert_eq!(
            operator.transcript.last().map(String::as_str),
            Some("Do you wish to continue? (y/n) ")
        );
    }

    #[test]
    fn missing_jar_is_reported_after_confirmation() {
        let dir = folder_with(&["P1-D_S1_L001_R1_001.fastq.gz"]);
        let args = generate_args(&[dir.path().to_str().unwrap(), "-j", "/missing/uploader.jar"]);
        let mut operator = ScriptedOperator::new(["y"]);
        let error = run_generate(&args, &mut operator).unwrap_err();
        assert_eq!(exit_status(&error), ExitStatus::JarNotFound);
    }

    #[test]
    fn missing_uploader_config_is_reported() {
        let dir = folder_with(&["P1-D_S1_L001_R1_001.fastq.gz"]);
        let jar = dir.path().join("uploader.jar");
        fs::write(&jar, "").unwrap();
        let args = generate_args(&[
            dir.path().to_str().unwrap(),
            "-c",
            "-j",
            jar.to_str().unwrap(),
            "-y",
            "/missing/application.yml",
        ]);
        let mut operator = ScriptedOperator::new(Vec::<String>::new());
        let error = run_generate(&args, &mut operator).unwrap_err();
        assert_eq!(exit_status(&error), ExitStatus::ConfigNotFound);
    }

    #[test]
    fn invalid_batch_halts_before_uploader_calls() {
        let dir = folder_with(&["P1-D_S1_L001_R1_001.fastq.gz", "P1-T_S2_L001_R1_001.fastq.gz"]);
        let jar = dir.path().join("uploader.jar");
        fs::write(&jar, "").unwrap();
        let args = generate_args(&[dir.path().to_str().unwrap(), "-c", "-j", jar.to_str().unwrap()]);
        let mut operator = ScriptedOperator::new(Vec::<String>::new());
        let error = run_generate(&args, &mut operator).unwrap_err();
        assert_eq!(exit_status(&error), ExitStatus::ValidationFailed);
        assert!(operator.transcript.is_empty());
    }
}
