//! App-level config location for provkit.
//!
//! User targets live in {user_config_dir}/provkit/targets.toml.

use std::path::PathBuf;

use crate::resolve;

/// Return the OS-native provkit config directory.
pub fn app_config_dir() -> PathBuf {
    if let Some(proj_dirs) = directories::ProjectDirs::from("", "", "provkit") {
        proj_dirs.config_dir().to_path_buf()
    } else {
        resolve::home_dir().join(".config").join("provkit")
    }
}

/// Return the path to the user targets.toml.
pub fn targets_path() -> PathBuf {
    app_config_dir().join("targets.toml")
}
