//! Sample tags and the vocabularies derived from them.
//!
//! A tag is the single-letter code carried in a read file name that classifies
//! the library a sample came from. Known codes map to a library type, a
//! topology role and a topology kind; anything else is kept verbatim so that
//! validation can report it.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Single-letter sample classification.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SampleTag {
    /// No tag present in the file name.
    Unspecified,
    /// `D`: DNA library.
    Dna,
    /// `R`: RNA library.
    Rna,
    /// `N`: normal tissue.
    Normal,
    /// `T`: tumor tissue.
    Tumor,
    /// Any other code produced by a custom extraction rule.
    Other(String),
}

impl SampleTag {
    /// Parse a tag code. Unknown codes are preserved as [`SampleTag::Other`].
    pub fn parse(code: &str) -> Self {
        match code {
            "" => Self::Unspecified,
            "D" => Self::Dna,
            "R" => Self::Rna,
            "N" => Self::Normal,
            "T" => Self::Tumor,
            other => Self::Other(other.to_string()),
        }
    }

    /// The code as it appears in file names.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Unspecified => "",
            Self::Dna => "D",
            Self::Rna => "R",
            Self::Normal => "N",
            Self::Tumor => "T",
            Self::Other(code) => code,
        }
    }

    pub fn is_unspecified(&self) -> bool {
        matches!(self, Self::Unspecified)
    }

    /// Library type recorded on an analysis. `None` for unknown codes.
    pub fn library_type(&self) -> Option<LibraryType> {
        match self {
            Self::Rna => Some(LibraryType::Rna),
            Self::Dna | Self::Normal | Self::Tumor | Self::Unspecified => Some(LibraryType::Dna),
            Self::Other(_) => None,
        }
    }

    /// Role of the sample inside a topology. Only the four known codes have one.
    pub fn role(&self) -> Option<ReferenceRole> {
        match self {
            Self::Dna => Some(ReferenceRole::Dna),
            Self::Rna => Some(ReferenceRole::Rna),
            Self::Normal => Some(ReferenceRole::Normal),
            Self::Tumor => Some(ReferenceRole::Tumor),
            Self::Unspecified | Self::Other(_) => None,
        }
    }
}

impl From<String> for SampleTag {
    fn from(value: String) -> Self {
        Self::parse(&value)
    }
}

impl From<SampleTag> for String {
    fn from(value: SampleTag) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for SampleTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `analyses[].definition.libraryType`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LibraryType {
    Dna,
    Rna,
}

impl LibraryType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Dna => "dna",
            Self::Rna => "rna",
        }
    }
}

/// `topology[].references[].role`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReferenceRole {
    Dna,
    Rna,
    Normal,
    Tumor,
}

/// `topology[].definition.type`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TopologyKind {
    /// Matched DNA and RNA samples.
    #[serde(rename = "mys")]
    Mys,
    /// Tumor and normal samples.
    #[serde(rename = "tumorNormal")]
    TumorNormal,
}

impl TopologyKind {
    /// Topology declared by a pair of sample tags, regardless of their order.
    ///
    /// Returns `None` unless there are exactly two tags forming `{D, R}` or
    /// `{N, T}`.
    pub fn from_tags(tags: &[&SampleTag]) -> Option<Self> {
        let [first, second] = tags else {
            return None;
        };
        match (first, second) {
            (SampleTag::Dna, SampleTag::Rna) | (SampleTag::Rna, SampleTag::Dna) => Some(Self::Mys),
            (SampleTag::Normal, SampleTag::Tumor) | (SampleTag::Tumor, SampleTag::Normal) => {
                Some(Self::TumorNormal)
            }
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Mys => "mys",
            Self::TumorNormal => "tumorNormal",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_round_trips_known_codes() {
        for code in ["", "D", "R", "N", "T"] {
            assert_eq!(SampleTag::parse(code).as_str(), code);
        }
        assert_eq!(SampleTag::parse("X"), SampleTag::Other("X".to_string()));
    }

    #[test]
    fn library_type_mapping() {
        assert_eq!(SampleTag::Rna.library_type(), Some(LibraryType::Rna));
        assert_eq!(SampleTag::Dna.library_type(), Some(LibraryType::Dna));
        assert_eq!(SampleTag::Normal.library_type(), Some(LibraryType::Dna));
        assert_eq!(SampleTag::Tumor.library_type(), Some(LibraryType::Dna));
        assert_eq!(SampleTag::Unspecified.library_type(), Some(LibraryType::Dna));
        assert_eq!(SampleTag::parse("X").library_type(), None);
    }

    #[test]
    fn topology_from_tags_ignores_order() {
        assert_eq!(
            TopologyKind::from_tags(&[&SampleTag::Rna, &SampleTag::Dna]),
            Some(TopologyKind::Mys)
        );
        assert_eq!(
            TopologyKind::from_tags(&[&SampleTag::Normal, &SampleTag::Tumor]),
            Some(TopologyKind::TumorNormal)
        );
        assert_eq!(
            TopologyKind::from_tags(&[&SampleTag::Dna, &SampleTag::Tumor]),
            None
        );
        assert_eq!(
            TopologyKind::from_tags(&[&SampleTag::Unspecified, &SampleTag::Unspecified]),
            None
        );
        assert_eq!(TopologyKind::from_tags(&[&SampleTag::Dna]), None);
    }

    #[test]
    fn tags_serialize_as_codes() {
        let json = serde_json::to_string(&vec![SampleTag::Unspecified, SampleTag::Tumor]).unwrap();
        assert_eq!(json, r#"["","T"]"#);
        assert_eq!(
            serde_json::to_string(&TopologyKind::TumorNormal).unwrap(),
            r#""tumorNormal""#
        );
    }
}
