//! Path resolution for provkit work, home and config directories.
//!
//! Resolution order for the targets file:
//!   1. --targets PATH on the command line
//!   2. PROVKIT_TARGETS environment variable
//!   3. {user_config_dir}/provkit/targets.toml (via app_config)

use std::path::{Path, PathBuf};

use crate::app_config;

/// Return the user targets file, if one is configured or present.
pub fn targets_file(flag: Option<&Path>) -> Option<PathBuf> {
    if let Some(p) = flag {
        return Some(p.to_path_buf());
    }
    if let Ok(env) = std::env::var("PROVKIT_TARGETS") {
        if !env.is_empty() {
            return Some(expand_tilde(&env, &home_dir()));
        }
    }
    let default = app_config::targets_path();
    if default.exists() {
        return Some(default);
    }
    None
}

/// Return the work directory: the given path, or the current directory.
pub fn work_dir(flag: Option<&Path>) -> std::io::Result<PathBuf> {
    match flag {
        Some(p) => {
            let p = expand_tilde(&p.to_string_lossy(), &home_dir());
            std::fs::create_dir_all(&p)?;
            p.canonicalize()
        }
        None => std::env::current_dir(),
    }
}

/// Get the user's home directory.
pub fn home_dir() -> PathBuf {
    std::env::var_os("HOME")
        .or_else(|| std::env::var_os("USERPROFILE"))
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Expand a leading `~` against `home`.
pub fn expand_tilde(path: &str, home: &Path) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        home.join(rest)
    } else if path == "~" {
        home.to_path_buf()
    } else {
        PathBuf::from(path)
    }
}

/// Resolve `path` against `base` unless it is absolute or `~`-prefixed.
pub fn resolve_under(path: &str, base: &Path, home: &Path) -> PathBuf {
    let expanded = expand_tilde(path, home);
    if expanded.is_absolute() {
        expanded
    } else {
        base.join(expanded)
    }
}
