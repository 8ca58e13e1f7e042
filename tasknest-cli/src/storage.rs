//! JSON file storage adapter for AppState
//!
//! A directory-backed key-value store: every key lives in `<key>.json`.
//! The task list is backed up to `tasks.json.bak` before each overwrite.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use tasknest_core::{AppState, Analytics, DeletedTask, TaskList};

use crate::error::{CliError, Result};

pub const TASKS_KEY: &str = "tasks";
pub const ANALYTICS_KEY: &str = "analytics";
pub const UNDO_KEY: &str = "undo";

/// JSON storage adapter
pub struct JsonStore {
    dir: PathBuf,
}

impl JsonStore {
    /// Create a new store rooted at the given directory
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Get the storage directory
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn key_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }

    fn backup_path(&self) -> PathBuf {
        self.key_path(TASKS_KEY).with_extension("json.bak")
    }

    /// Read a key; a missing or blank file is `None`
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        let path = self.key_path(key);
        if !path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&path)
            .map_err(|e| CliError::io(format!("Failed to read {}", path.display()), e))?;
        if content.trim().is_empty() {
            return Ok(None);
        }

        serde_json::from_str(&content)
            .map(Some)
            .map_err(|e| CliError::storage_with_source(format!("Corrupt store key '{}'", key), e))
    }

    /// Write a key, creating the directory on first use
    pub fn set<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<()> {
        fs::create_dir_all(&self.dir).map_err(|e| {
            CliError::io(format!("Failed to create {}", self.dir.display()), e)
        })?;

        let path = self.key_path(key);
        let content = serde_json::to_string_pretty(value)?;
        fs::write(&path, content)
            .map_err(|e| CliError::io(format!("Failed to write {}", path.display()), e))?;
        debug!(key, "stored key");
        Ok(())
    }

    /// Delete a key if present
    pub fn remove(&self, key: &str) -> Result<()> {
        let path = self.key_path(key);
        if path.exists() {
            fs::remove_file(&path)
                .map_err(|e| CliError::io(format!("Failed to remove {}", path.display()), e))?;
        }
        Ok(())
    }

    /// Load the whole application state
    ///
    /// An unreadable task list is an error so it is never overwritten.
    /// Analytics and the undo slot fall back to defaults.
    pub fn load_state(&self) -> Result<AppState> {
        let tasks = self.get::<TaskList>(TASKS_KEY)?.unwrap_or_default();
        // Stored order may be stale if the file was edited by hand
        let tasks = TaskList::from_tasks(tasks.into_tasks());

        let analytics = self.get::<Analytics>(ANALYTICS_KEY).unwrap_or_else(|e| {
            warn!("Ignoring unreadable analytics: {}", e);
            None
        });
        let undo = self.get::<DeletedTask>(UNDO_KEY).unwrap_or_else(|e| {
            warn!("Ignoring unreadable undo buffer: {}", e);
            None
        });

        Ok(AppState::new(tasks, undo, analytics.unwrap_or_default()))
    }

    /// Persist the whole application state
    pub fn save_state(&self, state: &AppState) -> Result<()> {
        self.save_tasks(&state.tasks)?;
        self.set(ANALYTICS_KEY, &state.analytics)?;
        match &state.undo {
            Some(deleted) => self.set(UNDO_KEY, deleted),
            None => self.remove(UNDO_KEY),
        }
    }

    /// Write the task list, backing up the previous file first
    pub fn save_tasks(&self, tasks: &TaskList) -> Result<()> {
        self.backup()?;
        self.set(TASKS_KEY, tasks)
    }

    /// Create a backup of the tasks file
    pub fn backup(&self) -> Result<()> {
        let path = self.key_path(TASKS_KEY);
        if !path.exists() {
            return Ok(()); // Nothing to backup
        }

        fs::copy(&path, self.backup_path())
            .map_err(|e| CliError::io("Failed to back up tasks", e))?;
        Ok(())
    }

    /// Read the task list from the backup file
    pub fn recover(&self) -> Result<TaskList> {
        let backup_path = self.backup_path();

        if !backup_path.exists() {
            return Err(CliError::storage("Backup file not found"));
        }

        let content = fs::read_to_string(&backup_path)
            .map_err(|e| CliError::io("Failed to read backup", e))?;
        let tasks: TaskList = serde_json::from_str(&content)
            .map_err(|e| CliError::storage_with_source("Corrupt backup file", e))?;
        Ok(TaskList::from_tasks(tasks.into_tasks()))
    }

    /// Check if backup exists
    pub fn backup_exists(&self) -> bool {
        self.backup_path().exists()
    }
}
