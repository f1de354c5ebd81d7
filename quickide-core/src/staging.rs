//! Staged multi-file writes.
//!
//! Every file is written in full to a temporary file next to its target
//! before any target is replaced. Dropping a [`StagedWrites`] without
//! committing deletes the temporary files and leaves the targets untouched.

use crate::{Error, Result};
use serde::Serialize;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::debug;

/// A set of file replacements applied together by [`StagedWrites::commit`].
#[derive(Debug, Default)]
pub struct StagedWrites {
    staged: Vec<(NamedTempFile, PathBuf)>,
}

impl StagedWrites {
    pub fn new() -> Self {
        Self::default()
    }

    /// Write `contents` to a temporary file beside `target`.
    ///
    /// The target's directory must already exist.
    pub fn stage<P: AsRef<Path>>(&mut self, target: P, contents: &str) -> Result<()> {
        let target = target.as_ref();
        let dir = target
            .parent()
            .ok_or_else(|| Error::generic(format!("{} has no parent directory", target.display())))?;

        let mut file = NamedTempFile::new_in(dir)?;
        file.write_all(contents.as_bytes())?;
        file.flush()?;
        self.staged.push((file, target.to_path_buf()));
        Ok(())
    }

    /// Serialize `value` as pretty JSON and stage it.
    pub fn stage_json<P: AsRef<Path>, T: Serialize>(&mut self, target: P, value: &T) -> Result<()> {
        let text = serde_json::to_string_pretty(value)?;
        self.stage(target, &text)
    }

    /// Number of staged files.
    pub fn len(&self) -> usize {
        self.staged.len()
    }

    pub fn is_empty(&self) -> bool {
        self.staged.is_empty()
    }

    /// Move every staged file over its target, in staging order.
    pub fn commit(self) -> Result<usize> {
        let count = self.staged.len();
        for (file, target) in self.staged {
            file.persist(&target).map_err(|e| Error::Io(e.error))?;
            debug!("Committed {}", target.display());
        }
        Ok(count)
    }
}
