//! Fetch-extract-install pipeline.
//!
//! One run takes one [`InstallTarget`] through a fixed sequence of stages:
//!
//!   START -> FETCHED -> WORKSPACE_CLEAN -> EXTRACTED -> RELOCATED
//!         -> POST_STEPS_DONE -> CREDENTIALS_INSTALLED -> DONE
//!
//! The first failing stage moves the run to `Failed` and returns a
//! [`PipelineError`]. Nothing is retried and nothing already done is rolled
//! back: a failed `npm install` leaves its half-populated `node_modules`
//! behind. Callers that run several targets at once must keep their work
//! dirs and credential destinations apart.

pub mod credentials;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod steps;

use std::path::{Path, PathBuf};

use crate::config::targets::InstallTarget;

pub use error::{PipelineError, PipelineState, Stage};

/// Where a run writes: archive and project under `work_dir`, `~/` under `home`.
#[derive(Debug, Clone)]
pub struct Workspace {
    pub work_dir: PathBuf,
    pub home: PathBuf,
}

impl Workspace {
    pub fn new(work_dir: impl Into<PathBuf>, home: impl Into<PathBuf>) -> Self {
        Self {
            work_dir: work_dir.into(),
            home: home.into(),
        }
    }

    pub fn archive_path(&self, target: &InstallTarget) -> PathBuf {
        self.work_dir.join(target.archive_file_name())
    }

    pub fn project_dir(&self, target: &InstallTarget) -> PathBuf {
        self.work_dir.join(target.final_dir())
    }
}

pub struct Pipeline<'a> {
    target: &'a InstallTarget,
    workspace: &'a Workspace,
    state: PipelineState,
}

impl<'a> Pipeline<'a> {
    pub fn new(target: &'a InstallTarget, workspace: &'a Workspace) -> Self {
        Self {
            target,
            workspace,
            state: PipelineState::Start,
        }
    }

    pub fn state(&self) -> PipelineState {
        self.state
    }

    /// Run every stage in order. Returns the installed project directory.
    pub fn run(&mut self) -> Result<PathBuf, PipelineError> {
        let archive = self.download()?;
        self.reset_workspace()?;
        self.extract(&archive)?;
        self.relocate()?;
        self.run_post_extract_steps()?;
        self.install_credential_files()?;
        self.state = PipelineState::Done;
        println!("Done! {} is installed.", self.target.name);
        Ok(self.workspace.project_dir(self.target))
    }

    pub fn download(&mut self) -> Result<PathBuf, PipelineError> {
        println!(
            "Fetching {} from {}",
            self.target.name, self.target.archive_url
        );
        let dest = self.workspace.archive_path(self.target);
        let fetched = self.track(fetch::fetch_archive(&self.target.archive_url, &dest))?;
        self.state = PipelineState::Fetched;
        Ok(fetched.path)
    }

    pub fn reset_workspace(&mut self) -> Result<(), PipelineError> {
        println!("Cleaning previous install");
        let target = self.target;
        let workspace = self.workspace;
        let mut dirs = vec![target.expected_dir.as_str()];
        if target.needs_relocation() {
            dirs.push(target.final_dir());
        }
        for dir in dirs {
            let path = workspace.work_dir.join(dir);
            let removed = extract::remove_path_if_present(&path).map_err(|e| {
                PipelineError::ExtractionFailure {
                    archive: workspace.archive_path(target),
                    reason: format!("cannot remove {}: {}", path.display(), e),
                }
            });
            if self.track(removed)? {
                println!("  removed {}", path.display());
            }
        }
        self.state = PipelineState::WorkspaceClean;
        Ok(())
    }

    pub fn extract(&mut self, archive: &Path) -> Result<(), PipelineError> {
        println!("Extracting {}", archive.display());
        let result = extract::extract_archive(
            archive,
            &self.workspace.work_dir,
            &self.target.expected_dir,
        );
        self.track(result)?;
        self.state = PipelineState::Extracted;
        Ok(())
    }

    /// Rename to the final directory; a no-op when the names already match.
    pub fn relocate(&mut self) -> Result<(), PipelineError> {
        if self.target.needs_relocation() {
            println!(
                "Renaming {} -> {}",
                self.target.expected_dir,
                self.target.final_dir()
            );
            let result = extract::relocate(
                &self.workspace.work_dir,
                &self.target.expected_dir,
                self.target.final_dir(),
            );
            self.track(result)?;
        }
        self.state = PipelineState::Relocated;
        Ok(())
    }

    pub fn run_post_extract_steps(&mut self) -> Result<(), PipelineError> {
        if !self.target.steps.is_empty() {
            println!("Running post-extract steps");
        }
        let project_dir = self.workspace.project_dir(self.target);
        let result = steps::run_steps(&self.target.steps, &project_dir, &self.workspace.home);
        self.track(result)?;
        self.state = PipelineState::PostStepsDone;
        Ok(())
    }

    pub fn install_credential_files(&mut self) -> Result<(), PipelineError> {
        if !self.target.credentials.is_empty() {
            println!("Installing credential files");
        }
        let result = credentials::install_credentials(
            &self.target.credentials,
            &self.workspace.work_dir,
            &self.workspace.home,
        );
        self.track(result)?;
        self.state = PipelineState::CredentialsInstalled;
        Ok(())
    }

    /// Record a failure in the state machine before handing it back.
    fn track<T>(&mut self, result: Result<T, PipelineError>) -> Result<T, PipelineError> {
        if let Err(ref e) = result {
            tracing::debug!(target_name = %self.target.name, stage = %e.stage(), "stage failed");
            self.state = PipelineState::Failed(e.stage());
        }
        result
    }
}
