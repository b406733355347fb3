//! Integration tests for the fetch-extract-install pipeline (src/pipeline/).
//!
//! Archives are served over HTTP by a local tiny_http server so the
//! no-clobber fetch can be observed through its request count.

mod common;

use common::{ArchiveServer, INSTALL_OK, project_zip, proj_targets_toml, sandbox, tree};
use provkit::config::targets::{InstallTarget, parse_targets};
use provkit::pipeline::{Pipeline, PipelineError, PipelineState, Stage, Workspace};

fn proj_target(url: &str, expected: &str, final_dir: &str, install_cmd: &str) -> InstallTarget {
    parse_targets(&proj_targets_toml(url, expected, final_dir, install_cmd))
        .unwrap()
        .remove(0)
}

#[test]
fn test_concrete_scenario_installs_project_and_credentials() {
    let sb = sandbox();
    let server = ArchiveServer::start(project_zip("proj-main"));
    let keys = br#"{"installed":{"client_id":"abc.apps.googleusercontent.com"}}"#;
    std::fs::write(sb.work.join("keys.json"), keys).unwrap();

    let target = proj_target(&server.url, "proj-main", "proj-main", INSTALL_OK);
    let ws = Workspace::new(&sb.work, &sb.home);
    let mut pipeline = Pipeline::new(&target, &ws);
    let installed = pipeline.run().unwrap();

    assert_eq!(installed, sb.work.join("proj-main"));
    assert!(installed.join("package.json").is_file());
    assert!(installed.join("node_modules/.installed").exists());
    assert_eq!(std::fs::read(sb.home.join("app/keys.json")).unwrap(), keys);
    assert_eq!(pipeline.state(), PipelineState::Done);
}

#[test]
fn test_unreachable_url_creates_nothing() {
    let sb = sandbox();
    std::fs::write(sb.work.join("keys.json"), "{}").unwrap();
    // Nothing listens on port 1.
    let target = proj_target("http://127.0.0.1:1/archive.zip", "proj-main", "proj-main", INSTALL_OK);
    let ws = Workspace::new(&sb.work, &sb.home);

    let err = Pipeline::new(&target, &ws).run().unwrap_err();
    assert!(matches!(err, PipelineError::FetchFailure { .. }));
    assert!(!sb.work.join("proj-main").exists());
    assert!(!sb.work.join("proj.zip").exists());
    assert!(!sb.home.join("app").exists());
}

#[test]
fn test_http_404_is_fetch_failure() {
    let sb = sandbox();
    let server = ArchiveServer::start(project_zip("proj-main"));
    let url = server.url.replace("archive.zip", "missing.zip");
    let target = proj_target(&url, "proj-main", "proj-main", INSTALL_OK);
    let ws = Workspace::new(&sb.work, &sb.home);

    let err = Pipeline::new(&target, &ws).run().unwrap_err();
    assert_eq!(err.stage(), Stage::Fetch);
    assert!(err.to_string().contains("HTTP 404"));
}

#[test]
fn test_second_run_reuses_cached_archive() {
    let sb = sandbox();
    let server = ArchiveServer::start(project_zip("proj-main"));
    std::fs::write(sb.work.join("keys.json"), "{}").unwrap();
    let target = proj_target(&server.url, "proj-main", "proj", INSTALL_OK);
    let ws = Workspace::new(&sb.work, &sb.home);

    Pipeline::new(&target, &ws).run().unwrap();
    assert_eq!(server.hits(), 1);
    Pipeline::new(&target, &ws).run().unwrap();
    assert_eq!(server.hits(), 1);

    // Deleting the cache forces a re-fetch.
    std::fs::remove_file(sb.work.join("proj.zip")).unwrap();
    Pipeline::new(&target, &ws).run().unwrap();
    assert_eq!(server.hits(), 2);
}

#[test]
fn test_rerun_is_idempotent() {
    let sb = sandbox();
    let server = ArchiveServer::start(project_zip("proj-main"));
    std::fs::write(sb.work.join("keys.json"), "{}").unwrap();
    let target = proj_target(&server.url, "proj-main", "proj", INSTALL_OK);
    let ws = Workspace::new(&sb.work, &sb.home);

    Pipeline::new(&target, &ws).run().unwrap();
    let first = tree(&sb.work);

    // A stale file from a previous install must not survive.
    std::fs::write(sb.work.join("proj/stale.txt"), "old").unwrap();
    Pipeline::new(&target, &ws).run().unwrap();
    let second = tree(&sb.work);

    assert_eq!(first, second);
    assert!(!sb.work.join("proj-main").exists());
    assert!(!sb.work.join("proj/proj-main").exists());
}

#[test]
fn test_layout_mismatch_halts_before_relocation() {
    let sb = sandbox();
    let server = ArchiveServer::start(project_zip("proj-master"));
    std::fs::write(sb.work.join("keys.json"), "{}").unwrap();
    let target = proj_target(&server.url, "proj-main", "proj", INSTALL_OK);
    let ws = Workspace::new(&sb.work, &sb.home);

    let mut pipeline = Pipeline::new(&target, &ws);
    let err = pipeline.run().unwrap_err();
    match &err {
        PipelineError::LayoutMismatch { expected, found } => {
            assert_eq!(expected, "proj-main");
            assert!(found.contains(&"proj-master".to_string()));
        }
        other => panic!("expected LayoutMismatch, got {:?}", other),
    }
    assert_eq!(pipeline.state(), PipelineState::Failed(Stage::Extract));
    assert!(!sb.work.join("proj").exists());
    assert!(!sb.home.join("app/keys.json").exists());
}

#[test]
fn test_failed_step_skips_credentials() {
    let sb = sandbox();
    let server = ArchiveServer::start(project_zip("proj-main"));
    std::fs::write(sb.work.join("keys.json"), "{}").unwrap();
    let target = proj_target(&server.url, "proj-main", "proj-main", "exit 3");
    let ws = Workspace::new(&sb.work, &sb.home);

    let mut pipeline = Pipeline::new(&target, &ws);
    let err = pipeline.run().unwrap_err();
    match &err {
        PipelineError::PostExtractStepFailure { index, name, reason } => {
            assert_eq!(*index, 1);
            assert_eq!(name, "install dependencies");
            assert!(reason.contains("exit 3"));
        }
        other => panic!("expected PostExtractStepFailure, got {:?}", other),
    }
    assert_eq!(pipeline.state(), PipelineState::Failed(Stage::PostExtract));
    assert!(!sb.home.join("app/keys.json").exists());
    // No rollback: the extracted tree stays.
    assert!(sb.work.join("proj-main/package.json").exists());
}

#[test]
fn test_missing_credential_source_fails_last() {
    let sb = sandbox();
    let server = ArchiveServer::start(project_zip("proj-main"));
    let target = proj_target(&server.url, "proj-main", "proj-main", INSTALL_OK);
    let ws = Workspace::new(&sb.work, &sb.home);

    let mut pipeline = Pipeline::new(&target, &ws);
    let err = pipeline.run().unwrap_err();
    assert!(matches!(err, PipelineError::CredentialCopyFailure { .. }));
    assert_eq!(pipeline.state(), PipelineState::Failed(Stage::Credentials));
    assert!(sb.work.join("proj-main/node_modules/.installed").exists());
}

#[test]
fn test_stages_can_be_driven_one_at_a_time() {
    let sb = sandbox();
    let server = ArchiveServer::start(project_zip("proj-main"));
    std::fs::write(sb.work.join("keys.json"), "{}").unwrap();
    let target = proj_target(&server.url, "proj-main", "proj", INSTALL_OK);
    let ws = Workspace::new(&sb.work, &sb.home);
    let mut p = Pipeline::new(&target, &ws);

    let archive = p.download().unwrap();
    assert_eq!(p.state(), PipelineState::Fetched);
    p.reset_workspace().unwrap();
    assert_eq!(p.state(), PipelineState::WorkspaceClean);
    p.extract(&archive).unwrap();
    assert_eq!(p.state(), PipelineState::Extracted);
    p.relocate().unwrap();
    assert_eq!(p.state(), PipelineState::Relocated);
    p.run_post_extract_steps().unwrap();
    assert_eq!(p.state(), PipelineState::PostStepsDone);
    p.install_credential_files().unwrap();
    assert_eq!(p.state(), PipelineState::CredentialsInstalled);
}
