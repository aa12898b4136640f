//! Read-file discovery and the ingest stage.

use std::path::{Path, PathBuf};

use ade_model::PatientRecords;
use tracing::info;
use walkdir::WalkDir;

use crate::error::{IngestError, Result};
use crate::extract::PatternExtractor;

/// Lists regular files in a directory, descending into subdirectories when
/// `recursive` is set.
///
/// Symlinked files are listed; symlinked directories are never entered.
/// Returns files sorted by path.
pub fn list_files(dir: &Path, recursive: bool) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(IngestError::DirectoryNotFound {
            path: dir.to_path_buf(),
        });
    }

    let walker = WalkDir::new(dir)
        .min_depth(1)
        .max_depth(if recursive { usize::MAX } else { 1 });

    let mut files = Vec::new();
    for entry in walker {
        let entry = entry.map_err(|err| IngestError::DirectoryRead {
            path: err.path().unwrap_or(dir).to_path_buf(),
            source: err.into(),
        })?;
        let is_file = entry.file_type().is_file()
            || (entry.path_is_symlink() && entry.path().is_file());
        if is_file {
            files.push(entry.into_path());
        }
    }

    files.sort();

    Ok(files)
}

/// Result of ingesting a folder of read files.
#[derive(Debug, Clone)]
pub struct IngestOutcome {
    pub folder: PathBuf,
    /// Number of files listed.
    pub scanned: usize,
    /// Records in canonical order.
    pub records: PatientRecords,
    /// Files no rule matched.
    pub skipped: Vec<PathBuf>,
}

/// List a folder and extract patient records from its file names.
///
/// Fails with [`IngestError::NoFilesFound`] for an empty folder and
/// [`IngestError::NoMatchingFiles`] when files exist but none matched.
pub fn ingest_folder(
    folder: &Path,
    recursive: bool,
    extractor: &PatternExtractor,
) -> Result<IngestOutcome> {
    let files = list_files(folder, recursive)?;
    if files.is_empty() {
        return Err(IngestError::NoFilesFound {
            path: folder.to_path_buf(),
        });
    }
    info!(folder = %folder.display(), file_count = files.len(), "found files");

    let (records, skipped) = extractor.collect(&files);
    if records.is_empty() {
        return Err(IngestError::NoMatchingFiles {
            path: folder.to_path_buf(),
            scanned: files.len(),
        });
    }
    info!(
        patient_count = records.len(),
        sample_count = records.sample_count(),
        matched = records.file_count(),
        skipped = skipped.len(),
        "extracted patient records"
    );

    Ok(IngestOutcome {
        folder: folder.to_path_buf(),
        scanned: files.len(),
        records,
        skipped,
    })
}
