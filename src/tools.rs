use crate::config::ToolsConfig;
use std::path::{Path, PathBuf};
use tracing::debug;

#[cfg(windows)]
pub const UNRAR_EXECUTABLE: &str = "unrar.exe";
#[cfg(not(windows))]
pub const UNRAR_EXECUTABLE: &str = "unrar";

/// Where an external tool path came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolSource {
    Configured,
    Bundled,
    SearchPath,
    WorkingDirectory,
}

#[derive(Debug, Clone)]
pub struct ToolPaths {
    pub unrar: PathBuf,
    pub unrar_source: ToolSource,
}

impl ToolPaths {
    /// Resolves tool locations once at startup. Precedence: configured value,
    /// a copy bundled next to the running executable, `PATH`, then the
    /// working directory.
    pub fn resolve(config: &ToolsConfig) -> Self {
        let bundle_dir = std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(Path::to_path_buf));
        Self::resolve_with(config, bundle_dir.as_deref())
    }

    pub fn resolve_with(config: &ToolsConfig, bundle_dir: Option<&Path>) -> Self {
        let (unrar, unrar_source) = resolve_unrar(config, bundle_dir);
        debug!(path = %unrar.display(), source = ?unrar_source, "resolved unrar");

        Self {
            unrar,
            unrar_source,
        }
    }
}

fn resolve_unrar(config: &ToolsConfig, bundle_dir: Option<&Path>) -> (PathBuf, ToolSource) {
    if let Some(ref configured) = config.unrar_path {
        return (configured.clone(), ToolSource::Configured);
    }

    if let Some(dir) = bundle_dir {
        let bundled = dir.join(UNRAR_EXECUTABLE);
        if bundled.is_file() {
            return (bundled, ToolSource::Bundled);
        }
    }

    if let Ok(found) = which::which(UNRAR_EXECUTABLE) {
        return (found, ToolSource::SearchPath);
    }

    let local = std::env::current_dir()
        .map(|dir| dir.join(UNRAR_EXECUTABLE))
        .unwrap_or_else(|_| PathBuf::from(UNRAR_EXECUTABLE));
    (local, ToolSource::WorkingDirectory)
}
