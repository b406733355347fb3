//! Workspace reset, zip extraction and relocation.

use std::fs::File;
use std::io;
use std::path::Path;

use super::error::PipelineError;

/// Remove a file or directory tree. Returns whether anything was there.
pub fn remove_path_if_present(path: &Path) -> io::Result<bool> {
    match std::fs::symlink_metadata(path) {
        Ok(meta) if meta.is_dir() => {
            std::fs::remove_dir_all(path)?;
            Ok(true)
        }
        Ok(_) => {
            std::fs::remove_file(path)?;
            Ok(true)
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e),
    }
}

/// Unpack `archive` into `work_dir` and check `expected_dir` appeared.
pub fn extract_archive(
    archive: &Path,
    work_dir: &Path,
    expected_dir: &str,
) -> Result<(), PipelineError> {
    let failure = |reason: String| PipelineError::ExtractionFailure {
        archive: archive.to_path_buf(),
        reason,
    };

    let file = File::open(archive).map_err(|e| failure(e.to_string()))?;
    let mut zip = zip::ZipArchive::new(file).map_err(|e| failure(e.to_string()))?;
    tracing::debug!(entries = zip.len(), dest = %work_dir.display(), "extracting");
    // ZipArchive::extract refuses entries that would escape the target dir.
    zip.extract(work_dir).map_err(|e| failure(e.to_string()))?;

    if !work_dir.join(expected_dir).is_dir() {
        return Err(PipelineError::LayoutMismatch {
            expected: expected_dir.to_string(),
            found: list_dir(work_dir),
        });
    }
    Ok(())
}

/// Rename the extracted directory to its final name.
pub fn relocate(work_dir: &Path, from: &str, to: &str) -> Result<(), PipelineError> {
    std::fs::rename(work_dir.join(from), work_dir.join(to)).map_err(|source| {
        PipelineError::RelocationFailure {
            from: from.to_string(),
            to: to.to_string(),
            source,
        }
    })
}

/// Sorted entry names of `dir`, for diagnostics.
pub fn list_dir(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = match std::fs::read_dir(dir) {
        Ok(rd) => rd
            .filter_map(|e| e.ok())
            .map(|e| e.file_name().to_string_lossy().to_string())
            .collect(),
        Err(_) => vec![],
    };
    names.sort();
    names
}
