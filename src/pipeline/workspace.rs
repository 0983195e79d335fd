use crate::error::Result;
use std::ffi::{OsStr, OsString};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Scratch directory next to one input archive, holding its extracted
/// contents for a single conversion. Removed on `remove` or drop.
#[derive(Debug)]
pub struct TempWorkspace {
    path: PathBuf,
    removed: bool,
}

impl TempWorkspace {
    /// `<input dir>/<prefix><input stem>`
    pub fn path_for(input: &Path, prefix: &str) -> PathBuf {
        let parent = input.parent().unwrap_or_else(|| Path::new(""));
        let mut name = OsString::from(prefix);
        name.push(input.file_stem().unwrap_or_else(|| OsStr::new("archive")));

        parent.join(name)
    }

    /// Creates an empty workspace for `input`. A leftover directory from an
    /// earlier interrupted run is emptied and reused.
    pub fn create(input: &Path, prefix: &str) -> Result<Self> {
        let path = Self::path_for(input, prefix);

        if path.is_dir() {
            debug!(path = %path.display(), "clearing leftover workspace");
            fs::remove_dir_all(&path)?;
        }
        fs::create_dir_all(&path)?;

        debug!(path = %path.display(), "created workspace");
        Ok(Self {
            path,
            removed: false,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Best-effort recursive removal; failures are only logged.
    pub fn remove(mut self) {
        self.remove_inner();
    }

    fn remove_inner(&mut self) {
        if self.removed {
            return;
        }
        self.removed = true;

        if let Err(e) = fs::remove_dir_all(&self.path) {
            if self.path.exists() {
                debug!(path = %self.path.display(), error = %e, "workspace cleanup failed");
            }
        }
    }
}

impl Drop for TempWorkspace {
    fn drop(&mut self) {
        self.remove_inner();
    }
}
