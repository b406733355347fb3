//! Pipeline stages and the typed fatal error each one can raise.

use std::fmt;
use std::path::PathBuf;

/// Where a pipeline run currently is. `Failed` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    Start,
    Fetched,
    WorkspaceClean,
    Extracted,
    Relocated,
    PostStepsDone,
    CredentialsInstalled,
    Done,
    Failed(Stage),
}

/// The stage a failure belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Fetch,
    Extract,
    Relocate,
    PostExtract,
    Credentials,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Stage::Fetch => "fetch",
            Stage::Extract => "extract",
            Stage::Relocate => "relocate",
            Stage::PostExtract => "post-extract",
            Stage::Credentials => "credentials",
        };
        f.write_str(s)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("fetch failed for {url}: {reason}")]
    FetchFailure { url: String, reason: String },

    #[error("extraction of {} failed: {reason}", .archive.display())]
    ExtractionFailure { archive: PathBuf, reason: String },

    #[error(
        "archive did not produce expected directory '{expected}' (the upstream layout may have changed)\nwork dir contains: {}",
        list_entries(.found)
    )]
    LayoutMismatch { expected: String, found: Vec<String> },

    #[error("could not rename '{from}' to '{to}': {source}")]
    RelocationFailure {
        from: String,
        to: String,
        #[source]
        source: std::io::Error,
    },

    #[error("post-extract step {index} ('{name}') failed: {reason}")]
    PostExtractStepFailure {
        index: usize,
        name: String,
        reason: String,
    },

    #[error(
        "credential copy {} -> {} failed: {reason}",
        .source_path.display(),
        .destination.display()
    )]
    CredentialCopyFailure {
        source_path: PathBuf,
        destination: PathBuf,
        reason: String,
    },
}

fn list_entries(found: &[String]) -> String {
    if found.is_empty() {
        "(nothing)".to_string()
    } else {
        found.join(", ")
    }
}

impl PipelineError {
    pub fn stage(&self) -> Stage {
        match self {
            PipelineError::FetchFailure { .. } => Stage::Fetch,
            PipelineError::ExtractionFailure { .. } | PipelineError::LayoutMismatch { .. } => {
                Stage::Extract
            }
            PipelineError::RelocationFailure { .. } => Stage::Relocate,
            PipelineError::PostExtractStepFailure { .. } => Stage::PostExtract,
            PipelineError::CredentialCopyFailure { .. } => Stage::Credentials,
        }
    }
}
