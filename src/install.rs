//! `provkit install`: run the pipeline for one named target.

use anyhow::{Context, Result};
use std::path::Path;

use crate::config::targets::load_catalog;
use crate::pipeline::{Pipeline, Workspace, extract};
use crate::resolve;

pub fn run(
    name: &str,
    targets_file: Option<&Path>,
    work_dir: Option<&Path>,
    refresh: bool,
) -> Result<()> {
    let catalog = load_catalog(targets_file)?;
    let entry = catalog.get(name)?;
    let work_dir = resolve::work_dir(work_dir).context("resolving work directory")?;
    let workspace = Workspace::new(work_dir, resolve::home_dir());
    tracing::info!(target_name = name, origin = %entry.origin, work_dir = %workspace.work_dir.display(), "install");

    if refresh {
        let archive = workspace.archive_path(&entry.target);
        if extract::remove_path_if_present(&archive)? {
            println!("Removed cached {}", archive.display());
        }
    }

    let mut pipeline = Pipeline::new(&entry.target, &workspace);
    pipeline
        .run()
        .map_err(|e| {
            let stage = e.stage();
            anyhow::Error::new(e).context(format!("{} stage failed for '{}'", stage, name))
        })?;
    Ok(())
}
