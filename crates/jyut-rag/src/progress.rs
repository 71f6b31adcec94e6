use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::RagError;

/// Entry IDs already uploaded, persisted as a JSON array
#[derive(Debug, Default)]
pub struct UploadProgress {
    path: PathBuf,
    done: HashSet<String>,
    dirty: bool,
}

impl UploadProgress {
    /// Load the checkpoint; a missing file is an empty checkpoint
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, RagError> {
        let path = path.into();

        let done = match std::fs::read_to_string(&path) {
            Ok(json) => serde_json::from_str::<Vec<String>>(&json)?.into_iter().collect(),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!("No progress file at {}, starting fresh", path.display());
                HashSet::new()
            }
            Err(e) => return Err(e.into()),
        };

        Ok(Self {
            path,
            done,
            dirty: false,
        })
    }

    /// Like [`load`](Self::load) but the file must exist
    pub fn load_existing(path: impl Into<PathBuf>) -> Result<Self, RagError> {
        let path = path.into();
        if !path.exists() {
            return Err(RagError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("progress file not found: {}", path.display()),
            )));
        }
        Self::load(path)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn contains(&self, entry_id: &str) -> bool {
        self.done.contains(entry_id)
    }

    pub fn len(&self) -> usize {
        self.done.len()
    }

    pub fn is_empty(&self) -> bool {
        self.done.is_empty()
    }

    /// Returns true if the ID was new
    pub fn insert(&mut self, entry_id: impl Into<String>) -> bool {
        let inserted = self.done.insert(entry_id.into());
        self.dirty |= inserted;
        inserted
    }

    /// Write the checkpoint if anything changed since the last flush.
    /// Writes to a sibling temp file first so a crash never leaves half a file.
    pub fn flush(&mut self) -> Result<(), RagError> {
        if !self.dirty {
            return Ok(());
        }

        let mut ids: Vec<&String> = self.done.iter().collect();
        ids.sort();
        let json = serde_json::to_string_pretty(&ids)?;

        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, json)?;
        std::fs::rename(&tmp, &self.path)?;

        self.dirty = false;
        tracing::debug!("Checkpoint written: {} entries", self.done.len());
        Ok(())
    }
}
