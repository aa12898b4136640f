pub mod identity;
pub mod records;
pub mod tag;

pub use identity::{
    ClientIdentity, IdentityBinding, IdentityBindings, PipelineSelection, UNRESOLVED_ID,
    is_resolved,
};
pub use records::{AddOutcome, PatientBucket, PatientRecords, SampleRecord};
pub use tag::{LibraryType, ReferenceRole, SampleTag, TopologyKind};

/// Longest patient-ref the upload service accepts.
pub const MAX_PATIENT_REF_LENGTH: usize = 30;
