//! Extraction rules: a pattern plus the field mapping applied to its captures.
//!
//! A rule file is plain text. Each rule takes two lines: the pattern, then a
//! breakdown line with space-separated expressions for patient-ref, sample-id
//! and (optionally) tag. Inside an expression every character is a token: an
//! ASCII digit selects the capture group with that index (0 is the first
//! group), anything else is copied literally.
//!
//! ```text
//! ^([^_]+?)(-([DRTN]))?_(S[1-9][0-9]*)_L\d+_R\d+_\d+\.fastq\.gz$
//! 0 3 2
//! ```

use std::fmt;
use std::path::Path;

use regex::{Captures, Regex};

use crate::error::{IngestError, Result, RuleError};

/// Pattern for the bcl2fastq naming convention with an optional tag suffix on
/// the patient-ref, e.g. `P001-D_S1_L001_R1_001.fastq.gz`.
pub const ILLUMINA_PATTERN: &str =
    r"^([^_]+?)(-([DRTN]))?_(S[1-9][0-9]*)_L\d+_R\d+_\d+\.fastq\.gz$";

/// Breakdown of [`ILLUMINA_PATTERN`]: ref, sample, tag.
pub const ILLUMINA_BREAKDOWN: [&str; 3] = ["0", "3", "2"];

/// One token of a breakdown expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BreakdownToken {
    Literal(char),
    /// 0-based capture group index.
    Group(usize),
}

/// A field expression: tokens concatenated in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Breakdown {
    source: String,
    tokens: Vec<BreakdownToken>,
}

impl Breakdown {
    pub fn parse(expression: &str) -> Self {
        let tokens = expression
            .chars()
            .map(|c| match c.to_digit(10) {
                Some(d) => BreakdownToken::Group(d as usize),
                None => BreakdownToken::Literal(c),
            })
            .collect();
        Self {
            source: expression.to_string(),
            tokens,
        }
    }

    pub fn tokens(&self) -> &[BreakdownToken] {
        &self.tokens
    }

    /// Highest group index referenced, if any.
    pub fn max_group(&self) -> Option<usize> {
        self.tokens
            .iter()
            .filter_map(|t| match t {
                BreakdownToken::Group(g) => Some(*g),
                BreakdownToken::Literal(_) => None,
            })
            .max()
    }

    /// Evaluate against a match. `None` when a referenced group did not
    /// participate in the match.
    pub fn evaluate(&self, captures: &Captures<'_>) -> Option<String> {
        let mut out = String::new();
        for token in &self.tokens {
            match token {
                BreakdownToken::Literal(c) => out.push(*c),
                BreakdownToken::Group(g) => out.push_str(captures.get(g + 1)?.as_str()),
            }
        }
        Some(out)
    }
}

impl fmt::Display for Breakdown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

/// Field values produced by a matching rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleMatch {
    pub patient_ref: String,
    pub sample_id: String,
    /// Empty when the rule has no tag expression or its group did not match.
    pub tag: String,
}

/// A pattern with its field mapping.
#[derive(Debug, Clone)]
pub struct ExtractionRule {
    pattern: Regex,
    patient_ref: Breakdown,
    sample_id: Breakdown,
    tag: Option<Breakdown>,
}

impl ExtractionRule {
    /// Build a rule, checking that every referenced group exists.
    pub fn new(
        pattern: &str,
        patient_ref: &str,
        sample_id: &str,
        tag: Option<&str>,
    ) -> std::result::Result<Self, RuleError> {
        Self::at_line(1, pattern, patient_ref, sample_id, tag)
    }

    fn at_line(
        line: usize,
        pattern: &str,
        patient_ref: &str,
        sample_id: &str,
        tag: Option<&str>,
    ) -> std::result::Result<Self, RuleError> {
        let pattern = Regex::new(pattern).map_err(|source| RuleError::InvalidPattern {
            line,
            source: Box::new(source),
        })?;
        let rule = Self {
            patient_ref: Breakdown::parse(patient_ref),
            sample_id: Breakdown::parse(sample_id),
            tag: tag.map(Breakdown::parse),
            pattern,
        };
        let available = rule.pattern.captures_len() - 1;
        for breakdown in rule.breakdowns() {
            match breakdown.max_group() {
                Some(group) if group >= available => {
                    return Err(RuleError::GroupOutOfRange {
                        line: line + 1,
                        group,
                        available,
                    });
                }
                _ => {}
            }
        }
        Ok(rule)
    }

    fn breakdowns(&self) -> impl Iterator<Item = &Breakdown> {
        [Some(&self.patient_ref), Some(&self.sample_id), self.tag.as_ref()]
            .into_iter()
            .flatten()
    }

    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }

    pub fn patient_ref(&self) -> &Breakdown {
        &self.patient_ref
    }

    pub fn sample_id(&self) -> &Breakdown {
        &self.sample_id
    }

    pub fn tag(&self) -> Option<&Breakdown> {
        self.tag.as_ref()
    }

    /// Apply the rule to a base file name.
    ///
    /// The rule does not match when the pattern fails or when a group needed
    /// by the patient-ref or sample-id expression did not participate.
    pub fn apply(&self, base_name: &str) -> Option<RuleMatch> {
        let captures = self.pattern.captures(base_name)?;
        let patient_ref = self.patient_ref.evaluate(&captures)?;
        let sample_id = self.sample_id.evaluate(&captures)?;
        let tag = self
            .tag
            .as_ref()
            .and_then(|b| b.evaluate(&captures))
            .unwrap_or_default();
        Some(RuleMatch {
            patient_ref,
            sample_id,
            tag,
        })
    }
}

/// Ordered list of rules; the first match wins.
#[derive(Debug, Clone)]
pub struct RuleSet {
    rules: Vec<ExtractionRule>,
}

impl RuleSet {
    pub fn new(rules: Vec<ExtractionRule>) -> Self {
        Self { rules }
    }

    /// Built-in rule set used when no override file is given.
    pub fn illumina() -> Self {
        let [patient_ref, sample_id, tag] = ILLUMINA_BREAKDOWN;
        let rule = ExtractionRule::new(ILLUMINA_PATTERN, patient_ref, sample_id, Some(tag))
            .expect("Invalid built-in Illumina pattern");
        Self { rules: vec![rule] }
    }

    /// Load an override rule file.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(IngestError::RuleFileNotFound {
                path: path.to_path_buf(),
            });
        }
        let text = std::fs::read_to_string(path).map_err(|source| IngestError::RuleFileRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text).map_err(|source| IngestError::RuleFile {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Parse rule file text. Trailing blank lines are ignored; anything else
    /// malformed is an error.
    pub fn parse(text: &str) -> std::result::Result<Self, RuleError> {
        let mut lines: Vec<&str> = text.lines().map(str::trim).collect();
        while lines.last().is_some_and(|l| l.is_empty()) {
            lines.pop();
        }
        if lines.is_empty() {
            return Err(RuleError::Empty);
        }
        if lines.len() % 2 != 0 {
            return Err(RuleError::OddLineCount { lines: lines.len() });
        }

        let mut rules = Vec::with_capacity(lines.len() / 2);
        for (pair_index, pair) in lines.chunks(2).enumerate() {
            let pattern_line = pair_index * 2 + 1;
            let (pattern, breakdown) = (pair[0], pair[1]);
            if pattern.is_empty() {
                return Err(RuleError::MissingPattern { line: pattern_line });
            }
            if breakdown.is_empty() {
                return Err(RuleError::MissingBreakdown {
                    line: pattern_line + 1,
                    pattern_line,
                });
            }
            let fields: Vec<&str> = breakdown.split_whitespace().collect();
            let (patient_ref, sample_id, tag) = match fields.as_slice() {
                [p, s] => (*p, *s, None),
                [p, s, t] => (*p, *s, Some(*t)),
                _ => {
                    return Err(RuleError::BreakdownArity {
                        line: pattern_line + 1,
                        found: fields.len(),
                    });
                }
            };
            rules.push(ExtractionRule::at_line(
                pattern_line,
                pattern,
                patient_ref,
                sample_id,
                tag,
            )?);
        }
        Ok(Self { rules })
    }

    pub fn rules(&self) -> &[ExtractionRule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// First matching rule, with its index.
    pub fn apply(&self, base_name: &str) -> Option<(usize, RuleMatch)> {
        self.rules
            .iter()
            .enumerate()
            .find_map(|(index, rule)| rule.apply(base_name).map(|m| (index, m)))
    }
}

impl Default for RuleSet {
    fn default() -> Self {
        Self::illumina()
    }
}
