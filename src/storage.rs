use crate::error::{IntegrationError, Result};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::debug;

/// Storage trait for persisting generated outputs
pub trait OutputStore {
    /// Write `contents` under `name`, replacing anything already there.
    /// Returns a displayable location of the written output.
    fn write_text(&self, name: &str, contents: &str) -> Result<String>;
}

/// Writes outputs as files inside one directory
pub struct FsOutputStore {
    dir: PathBuf,
}

impl FsOutputStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl OutputStore for FsOutputStore {
    fn write_text(&self, name: &str, contents: &str) -> Result<String> {
        // Ensure output directory exists
        fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(name);
        fs::write(&path, contents)?;
        debug!("Wrote {} bytes to {}", contents.len(), path.display());
        Ok(path.to_string_lossy().to_string())
    }
}

/// In-memory storage implementation for testing
#[derive(Default)]
pub struct InMemoryOutputStore {
    files: Mutex<HashMap<String, String>>,
}

impl InMemoryOutputStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<String> {
        self.files.lock().ok()?.get(name).cloned()
    }

    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .files
            .lock()
            .map(|f| f.keys().cloned().collect())
            .unwrap_or_default();
        names.sort();
        names
    }
}

impl OutputStore for InMemoryOutputStore {
    fn write_text(&self, name: &str, contents: &str) -> Result<String> {
        let mut files = self
            .files
            .lock()
            .map_err(|e| IntegrationError::Storage(format!("in-memory store lock poisoned: {e}")))?;
        files.insert(name.to_string(), contents.to_string());
        Ok(format!("memory://{name}"))
    }
}
