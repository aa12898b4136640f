//! Sample count and tag combination checks.
//!
//! - one sample: tag must be D, R or empty
//! - two samples: tags must be {D, R}, {N, T}, or both empty
//! - anything else is a count problem

use ade_model::{PatientBucket, SampleTag, TopologyKind};

use crate::issue::Issue;

pub fn check(patient: &PatientBucket) -> Option<Issue> {
    match patient.tags().as_slice() {
        [tag] => match tag {
            SampleTag::Unspecified | SampleTag::Dna | SampleTag::Rna => None,
            other => Some(Issue::SingleSampleTag {
                tag: (*other).clone(),
            }),
        },
        pair @ [first, second] => {
            let untagged = first.is_unspecified() && second.is_unspecified();
            if untagged || TopologyKind::from_tags(pair).is_some() {
                None
            } else {
                Some(Issue::PairTags {
                    first: (*first).clone(),
                    second: (*second).clone(),
                })
            }
        }
        other => Some(Issue::SampleCount { found: other.len() }),
    }
}
