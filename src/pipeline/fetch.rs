//! Archive download with no-clobber semantics.
//!
//! An archive already present in the work dir is reused as-is. Fresh
//! downloads land in a temp file next to the destination and are renamed
//! into place only once complete.

use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::error::PipelineError;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug)]
pub struct Fetched {
    pub path: PathBuf,
    /// False when a cached archive was reused.
    pub downloaded: bool,
}

/// Ensure `dest` holds the archive from `url`, then check it is a readable zip.
pub fn fetch_archive(url: &str, dest: &Path) -> Result<Fetched, PipelineError> {
    let failure = |reason: String| PipelineError::FetchFailure {
        url: url.to_string(),
        reason,
    };

    let downloaded = if dest.is_file() {
        println!("  {} already exists, skipping download", dest.display());
        tracing::debug!(path = %dest.display(), "reusing cached archive");
        false
    } else {
        let bytes = download_to(url, dest).map_err(failure)?;
        tracing::info!(url, bytes, path = %dest.display(), "archive downloaded");
        true
    };

    if !dest.is_file() {
        return Err(failure(format!("{} missing after download", dest.display())));
    }

    verify_zip(dest).map_err(|e| {
        failure(format!(
            "{} is not a well-formed zip archive ({}); delete it to re-fetch",
            dest.display(),
            e
        ))
    })?;

    Ok(Fetched {
        path: dest.to_path_buf(),
        downloaded,
    })
}

fn download_to(url: &str, dest: &Path) -> Result<u64, String> {
    let parent = dest
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    let mut tmp = tempfile::NamedTempFile::new_in(parent)
        .map_err(|e| format!("cannot create temp file in {}: {}", parent.display(), e))?;

    let bytes = if let Some(local) = url.strip_prefix("file://") {
        let mut src =
            File::open(local).map_err(|e| format!("cannot open {}: {}", local, e))?;
        io::copy(&mut src, tmp.as_file_mut()).map_err(|e| e.to_string())?
    } else if url.starts_with("http://") || url.starts_with("https://") {
        let agent = ureq::AgentBuilder::new()
            .timeout_connect(CONNECT_TIMEOUT)
            .user_agent(concat!("provkit/", env!("CARGO_PKG_VERSION")))
            .build();
        let resp = agent.get(url).call().map_err(|e| match e {
            ureq::Error::Status(code, resp) => {
                format!("HTTP {} {}", code, resp.status_text())
            }
            ureq::Error::Transport(t) => t.to_string(),
        })?;
        let mut reader = resp.into_reader();
        io::copy(&mut reader, tmp.as_file_mut()).map_err(|e| e.to_string())?
    } else {
        return Err("unsupported URL scheme (expected http, https or file)".to_string());
    };

    tmp.persist(dest)
        .map_err(|e| format!("cannot move download into {}: {}", dest.display(), e))?;
    Ok(bytes)
}

fn verify_zip(path: &Path) -> zip::result::ZipResult<()> {
    let file = File::open(path)?;
    zip::ZipArchive::new(file)?;
    Ok(())
}
