//! Shared test fixtures and helpers.

#![allow(dead_code)]

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tempfile::TempDir;

/// Build an in-memory zip with the given (path, content) entries.
pub fn zip_bytes(entries: &[(&str, &str)]) -> Vec<u8> {
    let mut cursor = std::io::Cursor::new(Vec::new());
    {
        let mut zw = zip::ZipWriter::new(&mut cursor);
        for (name, body) in entries {
            zw.start_file(*name, zip::write::SimpleFileOptions::default())
                .unwrap();
            zw.write_all(body.as_bytes()).unwrap();
        }
        zw.finish().unwrap();
    }
    cursor.into_inner()
}

/// A project snapshot whose root folder is `root`.
pub fn project_zip(root: &str) -> Vec<u8> {
    zip_bytes(&[
        (&format!("{}/package.json", root), r#"{"name":"proj"}"#),
        (&format!("{}/src/index.js", root), "console.log('hi');\n"),
    ])
}

/// Serves one archive at /archive.zip; everything else is a 404.
pub struct ArchiveServer {
    pub url: String,
    hits: Arc<AtomicUsize>,
}

impl ArchiveServer {
    pub fn start(body: Vec<u8>) -> Self {
        let server = tiny_http::Server::http("127.0.0.1:0").expect("bind test server");
        let addr = server.server_addr().to_ip().expect("ip listener");
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&hits);
        std::thread::spawn(move || {
            for req in server.incoming_requests() {
                counter.fetch_add(1, Ordering::SeqCst);
                let resp = if req.url() == "/archive.zip" {
                    tiny_http::Response::from_data(body.clone())
                } else {
                    tiny_http::Response::from_data(b"not found".to_vec()).with_status_code(tiny_http::StatusCode(404))
                };
                let _ = req.respond(resp);
            }
        });
        Self {
            url: format!("http://{}/archive.zip", addr),
            hits,
        }
    }

    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }
}

/// Isolated work dir and home dir.
pub struct Sandbox {
    _tmp: TempDir,
    pub work: PathBuf,
    pub home: PathBuf,
}

pub fn sandbox() -> Sandbox {
    let tmp = TempDir::new().expect("failed to create temp dir");
    let work = tmp.path().join("work");
    let home = tmp.path().join("home");
    std::fs::create_dir_all(&work).unwrap();
    std::fs::create_dir_all(&home).unwrap();
    Sandbox {
        _tmp: tmp,
        work,
        home,
    }
}

/// targets.toml for a `proj` target with one install step and one credential.
pub fn proj_targets_toml(url: &str, expected_dir: &str, final_dir: &str, install_cmd: &str) -> String {
    format!(
        r#"
[targets.proj]
description = "test project"
archive_url = "{url}"
expected_dir = "{expected_dir}"
final_dir = "{final_dir}"

[[targets.proj.steps]]
name = "install dependencies"
run = ["sh", "-c", "{install_cmd}"]

[[targets.proj.credentials]]
source = "keys.json"
destination = "~/app/keys.json"
"#
    )
}

pub const INSTALL_OK: &str = "mkdir -p node_modules && touch node_modules/.installed";

/// Relative paths of every file under `root`, sorted.
pub fn tree(root: &Path) -> Vec<String> {
    fn walk(dir: &Path, root: &Path, out: &mut Vec<String>) {
        for entry in std::fs::read_dir(dir).unwrap() {
            let path = entry.unwrap().path();
            if path.is_dir() {
                walk(&path, root, out);
            } else {
                out.push(path.strip_prefix(root).unwrap().to_string_lossy().to_string());
            }
        }
    }
    let mut out = vec![];
    walk(root, root, &mut out);
    out.sort();
    out
}
