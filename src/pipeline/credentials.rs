//! Copy credential files into place and echo them back to the operator.

use std::path::Path;

use crate::config::targets::CredentialFile;
use crate::resolve;

use super::error::PipelineError;

pub fn install_credentials(
    creds: &[CredentialFile],
    work_dir: &Path,
    home: &Path,
) -> Result<(), PipelineError> {
    for cred in creds {
        let source = resolve::resolve_under(&cred.source, work_dir, home);
        let dest = resolve::resolve_under(&cred.destination, work_dir, home);
        let failure = |reason: String| PipelineError::CredentialCopyFailure {
            source_path: source.clone(),
            destination: dest.clone(),
            reason,
        };

        if !source.is_file() {
            return Err(failure("source file not found".to_string()));
        }
        if let Some(parent) = dest.parent() {
            std::fs::create_dir_all(parent).map_err(|e| failure(e.to_string()))?;
        }
        std::fs::copy(&source, &dest).map_err(|e| failure(e.to_string()))?;
        restrict_permissions(&dest).map_err(|e| failure(e.to_string()))?;

        let content = std::fs::read(&dest).map_err(|e| failure(e.to_string()))?;
        println!("Copied {} -> {}", source.display(), dest.display());
        println!("{}", String::from_utf8_lossy(&content));
    }
    Ok(())
}

#[cfg(unix)]
fn restrict_permissions(path: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) -> std::io::Result<()> {
    Ok(())
}
