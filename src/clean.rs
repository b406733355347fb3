//! `provkit clean`: remove what `install` left in the work dir.
//!
//! Credential files are not touched.

use anyhow::{Context, Result};
use std::path::Path;

use crate::config::targets::{InstallTarget, load_catalog};
use crate::pipeline::{Workspace, extract};
use crate::resolve;

pub fn run(name: &str, targets_file: Option<&Path>, work_dir: Option<&Path>) -> Result<()> {
    let catalog = load_catalog(targets_file)?;
    let entry = catalog.get(name)?;
    let work_dir = resolve::work_dir(work_dir).context("resolving work directory")?;
    let workspace = Workspace::new(work_dir, resolve::home_dir());

    let removed = clean(&entry.target, &workspace)?;
    if removed == 0 {
        println!("Nothing to clean for {}", name);
    } else {
        println!("Cleaned {} ({} removed)", name, removed);
    }
    Ok(())
}

/// Remove the cached archive, extracted dir and final dir. Returns how many existed.
pub fn clean(target: &InstallTarget, workspace: &Workspace) -> Result<usize> {
    let mut paths = vec![
        workspace.archive_path(target),
        workspace.work_dir.join(&target.expected_dir),
    ];
    if target.needs_relocation() {
        paths.push(workspace.project_dir(target));
    }

    let mut removed = 0;
    for path in paths {
        if extract::remove_path_if_present(&path)
            .with_context(|| format!("removing {}", path.display()))?
        {
            println!("  removed {}", path.display());
            removed += 1;
        }
    }
    Ok(removed)
}
