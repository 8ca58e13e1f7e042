//! User configuration, loaded through confy
//!
//! Stored in the platform config directory as `tasknest/default-config.toml`.

use std::path::PathBuf;

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use tasknest_core::Priority;

pub const APP_NAME: &str = "tasknest";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory holding the JSON store
    pub data_directory: PathBuf,
    /// Priority for tasks without a `!priority` token
    pub default_priority: Priority,
    /// Ask before `remove` deletes a task
    pub confirm_delete: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_directory: default_data_directory(),
            default_priority: Priority::Medium,
            confirm_delete: false,
        }
    }
}

fn default_data_directory() -> PathBuf {
    match ProjectDirs::from("", "", APP_NAME) {
        Some(dirs) => dirs.data_dir().to_path_buf(),
        // No home directory; fall back to the working directory
        None => PathBuf::from(".tasknest"),
    }
}
