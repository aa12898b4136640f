//! Filename to (patient-ref, sample-id, tag) extraction.

use std::path::{Path, PathBuf};

use ade_model::{AddOutcome, PatientRecords, SampleTag};
use tracing::{debug, warn};

use crate::rules::RuleSet;

/// Identity fields inferred from one read file name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extraction {
    pub patient_ref: String,
    pub sample_id: String,
    pub tag: SampleTag,
    /// Index of the rule that matched.
    pub rule_index: usize,
}

/// Applies an ordered rule set to file base names.
#[derive(Debug, Clone, Default)]
pub struct PatternExtractor {
    rules: RuleSet,
}

impl PatternExtractor {
    pub fn new(rules: RuleSet) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    /// Extract fields from a file name or path. Directories are stripped
    /// before matching; `None` when no rule matches.
    pub fn extract(&self, filename: &str) -> Option<Extraction> {
        let base_name = base_name(Path::new(filename));
        let (rule_index, matched) = self.rules.apply(base_name)?;
        Some(Extraction {
            patient_ref: matched.patient_ref,
            sample_id: matched.sample_id,
            tag: SampleTag::parse(&matched.tag),
            rule_index,
        })
    }

    /// Run every file through the rules and merge matches into records.
    ///
    /// Returns the records in canonical order together with the files no rule
    /// matched. Records keep base file names only.
    pub fn collect(&self, files: &[PathBuf]) -> (PatientRecords, Vec<PathBuf>) {
        let mut records = PatientRecords::new();
        let mut skipped = Vec::new();

        for path in files {
            let name = base_name(path);
            let Some(extraction) = self.extract(name) else {
                warn!(file = %path.display(), "skipping file: no rule matched");
                skipped.push(path.clone());
                continue;
            };
            let outcome = records.add(
                &extraction.patient_ref,
                &extraction.sample_id,
                extraction.tag.clone(),
                name,
            );
            if outcome == AddOutcome::AppendedFile {
                let existing = records
                    .get(&extraction.patient_ref)
                    .and_then(|p| p.sample(&extraction.sample_id))
                    .map(|s| &s.tag);
                if existing != Some(&extraction.tag) {
                    warn!(
                        file = %name,
                        sample_id = %extraction.sample_id,
                        tag = %extraction.tag,
                        "tag differs from earlier file of the same sample; keeping the first"
                    );
                }
            }
            debug!(
                file = %name,
                patient_ref = %extraction.patient_ref,
                sample_id = %extraction.sample_id,
                tag = %extraction.tag,
                rule = extraction.rule_index,
                ?outcome,
                "matched file"
            );
        }

        (records.finalize(), skipped)
    }
}

fn base_name(path: &Path) -> &str {
    path.file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_else(|| path.to_str().unwrap_or(""))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extract_strips_directories() {
        let extractor = PatternExtractor::default();
        let extraction = extractor
            .extract("/runs/2024/P7-T_S4_L001_R2_001.fastq.gz")
            .unwrap();
        assert_eq!(extraction.patient_ref, "P7");
        assert_eq!(extraction.sample_id, "S4");
        assert_eq!(extraction.tag, SampleTag::Tumor);
        assert_eq!(extraction.rule_index, 0);
    }

    #[test]
    fn extract_every_known_tag() {
        let extractor = PatternExtractor::default();
        for (code, tag) in [
            ("D", SampleTag::Dna),
            ("R", SampleTag::Rna),
            ("N", SampleTag::Normal),
            ("T", SampleTag::Tumor),
        ] {
            let name = format!("REF01-{code}_S3_L004_R1_001.fastq.gz");
            let extraction = extractor.extract(&name).unwrap();
            assert_eq!(extraction.patient_ref, "REF01");
            assert_eq!(extraction.sample_id, "S3");
            assert_eq!(extraction.tag, tag);
        }
        let untagged = extractor.extract("REF01_S3_L004_R1_001.fastq.gz").unwrap();
        assert_eq!(untagged.tag, SampleTag::Unspecified);
    }

    #[test]
    fn collect_groups_pairs_and_skips_unmatched() {
        let extractor = PatternExtractor::default();
        let files: Vec<PathBuf> = [
            "in/P2_S2_L001_R1_001.fastq.gz",
            "in/P1-D_S1_L001_R1_001.fastq.gz",
            "in/P1-D_S1_L001_R2_001.fastq.gz",
            "in/SampleSheet.csv",
            "in/P2_S2_L001_R2_001.fastq.gz",
        ]
        .iter()
        .map(PathBuf::from)
        .collect();

        let (records, skipped) = extractor.collect(&files);
        assert_eq!(skipped, vec![PathBuf::from("in/SampleSheet.csv")]);
        assert_eq!(records.patient_refs(), vec!["P1", "P2"]);
        let p1 = records.get("P1").unwrap();
        assert_eq!(
            p1.sample("S1").unwrap().files,
            vec![
                "P1-D_S1_L001_R1_001.fastq.gz".to_string(),
                "P1-D_S1_L001_R2_001.fastq.gz".to_string()
            ]
        );
    }
}
