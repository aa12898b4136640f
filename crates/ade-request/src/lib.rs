//! ADE request document assembly.
//!
//! - [`build_document`] turns validated records, identity bindings and scalar
//!   identifiers into an [`AdeDocument`]
//! - [`extract_bindings`] reads identity bindings from uploader output
//! - [`render_json`] / [`write_document`] produce the final JSON

mod bindings;
mod builder;
pub mod document;
mod error;
mod render;

pub use bindings::extract_bindings;
pub use builder::{
    DEFAULT_SAMPLE_TYPE_ID, RequestContext, build_document, default_run_reference,
};
pub use document::AdeDocument;
pub use error::{BindingError, RequestError, Result};
pub use render::{render_json, write_document};
