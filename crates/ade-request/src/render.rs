//! JSON rendering of request documents (3-space indent).

use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use tracing::info;

use crate::document::AdeDocument;
use crate::error::{RequestError, Result};

const INDENT: &[u8] = b"   ";

/// Render the document as indented JSON without a trailing newline.
pub fn render_json(document: &AdeDocument) -> Result<String> {
    let mut buffer = Vec::new();
    let mut serializer = Serializer::with_formatter(&mut buffer, PrettyFormatter::with_indent(INDENT));
    document.serialize(&mut serializer)?;
    // serde_json only emits valid UTF-8.
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}

/// Write the rendered document to `path`, overwriting any existing file.
pub fn write_document(document: &AdeDocument, path: &Path) -> Result<PathBuf> {
    let json = render_json(document)?;
    std::fs::write(path, format!("{json}\n")).map_err(|source| RequestError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    info!(path = %path.display(), "request document written");
    Ok(path.to_path_buf())
}
