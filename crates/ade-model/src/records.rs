//! Patient and sample records accumulated from read file names.

use serde::{Deserialize, Serialize};

use crate::tag::SampleTag;

/// One sample (library) and the read files that belong to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SampleRecord {
    pub sample_id: String,
    pub tag: SampleTag,
    /// File names in the order they were added. Usually R1 then R2.
    pub files: Vec<String>,
}

impl SampleRecord {
    pub fn new(sample_id: impl Into<String>, tag: SampleTag) -> Self {
        Self {
            sample_id: sample_id.into(),
            tag,
            files: Vec::new(),
        }
    }
}

/// All samples seen for one patient-ref, in insertion order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatientBucket {
    pub patient_ref: String,
    pub samples: Vec<SampleRecord>,
}

impl PatientBucket {
    pub fn new(patient_ref: impl Into<String>) -> Self {
        Self {
            patient_ref: patient_ref.into(),
            samples: Vec::new(),
        }
    }

    pub fn sample(&self, sample_id: &str) -> Option<&SampleRecord> {
        self.samples.iter().find(|s| s.sample_id == sample_id)
    }

    pub fn tags(&self) -> Vec<&SampleTag> {
        self.samples.iter().map(|s| &s.tag).collect()
    }

    /// Lexicographically smallest sample id, used as the canonical sort key.
    pub fn smallest_sample_id(&self) -> Option<&str> {
        self.samples.iter().map(|s| s.sample_id.as_str()).min()
    }

    pub fn file_count(&self) -> usize {
        self.samples.iter().map(|s| s.files.len()).sum()
    }
}

/// What [`PatientRecords::add`] did with a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    /// First file for a patient-ref.
    NewPatient,
    /// New sample under a known patient-ref.
    NewSample,
    /// Appended to an existing sample. The tag of the new file is ignored.
    AppendedFile,
}

/// Patient buckets keyed by patient-ref.
///
/// Buckets keep the order in which patient-refs were first seen until
/// [`PatientRecords::finalize`] puts them in canonical order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatientRecords {
    patients: Vec<PatientBucket>,
}

impl PatientRecords {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge one extracted file into the records.
    ///
    /// A `(patient_ref, sample_id)` pair maps to exactly one [`SampleRecord`];
    /// seeing the pair again appends the file to that record.
    pub fn add(
        &mut self,
        patient_ref: &str,
        sample_id: &str,
        tag: SampleTag,
        file: impl Into<String>,
    ) -> AddOutcome {
        let file = file.into();
        let Some(bucket) = self
            .patients
            .iter_mut()
            .find(|p| p.patient_ref == patient_ref)
        else {
            let mut bucket = PatientBucket::new(patient_ref);
            let mut sample = SampleRecord::new(sample_id, tag);
            sample.files.push(file);
            bucket.samples.push(sample);
            self.patients.push(bucket);
            return AddOutcome::NewPatient;
        };

        match bucket.samples.iter_mut().find(|s| s.sample_id == sample_id) {
            Some(sample) => {
                sample.files.push(file);
                AddOutcome::AppendedFile
            }
            None => {
                let mut sample = SampleRecord::new(sample_id, tag);
                sample.files.push(file);
                bucket.samples.push(sample);
                AddOutcome::NewSample
            }
        }
    }

    /// Put patients in canonical order.
    ///
    /// Patients are sorted by the smallest sample id they hold, then by
    /// patient-ref when two patients share that id. Samples stay in insertion
    /// order and never move between patients. Applying this twice is a no-op.
    #[must_use]
    pub fn finalize(mut self) -> Self {
        self.patients.sort_by(|a, b| {
            a.smallest_sample_id()
                .cmp(&b.smallest_sample_id())
                .then_with(|| a.patient_ref.cmp(&b.patient_ref))
        });
        self
    }

    pub fn patients(&self) -> &[PatientBucket] {
        &self.patients
    }

    pub fn iter(&self) -> impl Iterator<Item = &PatientBucket> {
        self.patients.iter()
    }

    pub fn get(&self, patient_ref: &str) -> Option<&PatientBucket> {
        self.patients.iter().find(|p| p.patient_ref == patient_ref)
    }

    pub fn patient_refs(&self) -> Vec<&str> {
        self.patients.iter().map(|p| p.patient_ref.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.patients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patients.is_empty()
    }

    pub fn sample_count(&self) -> usize {
        self.patients.iter().map(|p| p.samples.len()).sum()
    }

    pub fn file_count(&self) -> usize {
        self.patients.iter().map(PatientBucket::file_count).sum()
    }
}

impl<'a> IntoIterator for &'a PatientRecords {
    type Item = &'a PatientBucket;
    type IntoIter = std::slice::Iter<'a, PatientBucket>;

    fn into_iter(self) -> Self::IntoIter {
        self.patients.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn smallest_sample_id_ignores_insertion_order() {
        let mut bucket = PatientBucket::new("P1");
        bucket.samples.push(SampleRecord::new("S9", SampleTag::Dna));
        bucket.samples.push(SampleRecord::new("S10", SampleTag::Rna));
        assert_eq!(bucket.smallest_sample_id(), Some("S10"));
    }

    #[test]
    fn add_reports_what_happened() {
        let mut records = PatientRecords::new();
        assert_eq!(
            records.add("P1", "S1", SampleTag::Dna, "a"),
            AddOutcome::NewPatient
        );
        assert_eq!(
            records.add("P1", "S1", SampleTag::Dna, "b"),
            AddOutcome::AppendedFile
        );
        assert_eq!(
            records.add("P1", "S2", SampleTag::Rna, "c"),
            AddOutcome::NewSample
        );
        assert_eq!(records.len(), 1);
        assert_eq!(records.sample_count(), 2);
        assert_eq!(records.file_count(), 3);
    }
}
