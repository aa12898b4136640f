//! Tests for folder ingestion and rule overrides.

use std::fs;
use std::path::{Path, PathBuf};

use ade_ingest::{IngestError, PatternExtractor, RuleSet, ingest_folder};
use ade_model::SampleTag;
use tempfile::TempDir;

fn touch(dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, "").expect("write file");
    path
}

#[test]
fn empty_folder_reports_no_files() {
    let dir = TempDir::new().unwrap();
    let err = ingest_folder(dir.path(), false, &PatternExtractor::default()).unwrap_err();
    assert!(matches!(err, IngestError::NoFilesFound { .. }));
}

#[test]
fn unmatched_files_report_no_matches() {
    let dir = TempDir::new().unwrap();
    touch(dir.path(), "SampleSheet.csv");
    touch(dir.path(), "P1_S1_R1.fastq.gz");

    let err = ingest_folder(dir.path(), false, &PatternExtractor::default()).unwrap_err();
    assert!(matches!(err, IngestError::NoMatchingFiles { scanned: 2, .. }));
}

#[test]
fn missing_folder_is_reported() {
    let dir = TempDir::new().unwrap();
    let err = ingest_folder(&dir.path().join("absent"), false, &PatternExtractor::default())
        .unwrap_err();
    assert!(matches!(err, IngestError::DirectoryNotFound { .. }));
}

#[test]
fn paired_reads_group_into_patients() {
    let dir = TempDir::new().unwrap();
    touch(dir.path(), "P9-R_S2_L001_R1_001.fastq.gz");
    touch(dir.path(), "P9-R_S2_L001_R2_001.fastq.gz");
    touch(dir.path(), "P9-D_S1_L001_R1_001.fastq.gz");
    touch(dir.path(), "P9-D_S1_L001_R2_001.fastq.gz");
    touch(dir.path(), "P3_S3_L001_R1_001.fastq.gz");
    touch(dir.path(), "Undetermined.log");

    let outcome = ingest_folder(dir.path(), false, &PatternExtractor::default()).unwrap();
    assert_eq!(outcome.scanned, 6);
    assert_eq!(outcome.skipped.len(), 1);
    assert_eq!(outcome.records.patient_refs(), vec!["P9", "P3"]);

    let p9 = outcome.records.get("P9").unwrap();
    // Listing is sorted, so D comes before R within the folder.
    assert_eq!(p9.samples[0].sample_id, "S1");
    assert_eq!(p9.samples[0].tag, SampleTag::Dna);
    assert_eq!(p9.samples[0].files.len(), 2);
    assert_eq!(p9.samples[1].tag, SampleTag::Rna);
}

#[test]
fn override_rules_load_from_file() {
    let dir = TempDir::new().unwrap();
    let rules_path = dir.path().join("rules.txt");
    fs::write(
        &rules_path,
        "^(\\d+)_([A-Z]+\\d+)_R[12]\\.fq\\.gz$\nP0 1\n",
    )
    .unwrap();

    let rules = RuleSet::load(&rules_path).unwrap();
    let extractor = PatternExtractor::new(rules);
    let extraction = extractor.extract("0042_LIB7_R1.fq.gz").unwrap();
    assert_eq!(extraction.patient_ref, "P0042");
    assert_eq!(extraction.sample_id, "LIB7");
    assert_eq!(extraction.tag, SampleTag::Unspecified);
}

#[test]
fn malformed_rule_file_fails_fast() {
    let dir = TempDir::new().unwrap();
    let rules_path = dir.path().join("rules.txt");
    fs::write(&rules_path, "^(a)_(b)$\n0 1\n^(c)_(d)$\n").unwrap();

    let err = RuleSet::load(&rules_path).unwrap_err();
    assert!(matches!(err, IngestError::RuleFile { .. }));
    assert!(err.to_string().contains("3 lines"));

    let err = RuleSet::load(&dir.path().join("missing.txt")).unwrap_err();
    assert!(matches!(err, IngestError::RuleFileNotFound { .. }));
}
