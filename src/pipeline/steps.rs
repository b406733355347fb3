//! Post-extract steps: dependency installs, builds and artifact copies.

use std::path::Path;

use crate::config::targets::{Step, StepAction};
use crate::resolve;
use crate::util::{copy_path, run_cmd_checked};

use super::error::PipelineError;

/// Run `steps` in order against `project_dir`, stopping at the first failure.
pub fn run_steps(steps: &[Step], project_dir: &Path, home: &Path) -> Result<(), PipelineError> {
    for (i, step) in steps.iter().enumerate() {
        let index = i + 1;
        println!("[{}/{}] {}", index, steps.len(), step.name);
        run_step(step, project_dir, home).map_err(|e| PipelineError::PostExtractStepFailure {
            index,
            name: step.name.clone(),
            reason: format!("{:#}", e),
        })?;
    }
    Ok(())
}

fn run_step(step: &Step, project_dir: &Path, home: &Path) -> anyhow::Result<()> {
    match step.action() {
        StepAction::Run { argv, cwd, env } => {
            let dir = match cwd {
                Some(sub) => resolve::resolve_under(sub, project_dir, home),
                None => project_dir.to_path_buf(),
            };
            run_cmd_checked(argv, &dir, env)
        }
        StepAction::Copy(spec) => {
            let from = resolve::resolve_under(&spec.from, project_dir, home);
            let to = resolve::resolve_under(&spec.to, project_dir, home);
            println!("  copy {} -> {}", from.display(), to.display());
            if !from.exists() {
                anyhow::bail!("{} does not exist", from.display());
            }
            let bytes = copy_path(&from, &to)?;
            tracing::debug!(bytes, to = %to.display(), "copied build artifacts");
            Ok(())
        }
    }
}
