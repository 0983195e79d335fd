use crate::error::{RezipError, Result};
use std::path::{Component, Path, PathBuf};
use walkdir::WalkDir;

#[derive(Debug, Clone)]
pub struct StagedFile {
    pub source_path: PathBuf,
    /// Path relative to the workspace root, `/`-separated.
    pub entry_name: String,
    pub size: u64,
}

/// Lists every regular file below `root`, sorted by entry name. Directories
/// (including empty ones) and symlinks are not listed.
pub fn scan_workspace(root: &Path) -> Result<Vec<StagedFile>> {
    if !root.is_dir() {
        return Err(RezipError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("{} is not a directory", root.display()),
        )));
    }

    let mut files = Vec::new();

    let walker = WalkDir::new(root)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter();

    for entry in walker {
        let entry = entry.map_err(|e| RezipError::Io(e.into()))?;

        if !entry.file_type().is_file() {
            continue;
        }

        let relative = relative_path(entry.path(), root)?;
        let metadata = entry.metadata().map_err(|e| RezipError::Io(e.into()))?;

        files.push(StagedFile {
            source_path: entry.path().to_path_buf(),
            entry_name: entry_name(&relative)?,
            size: metadata.len(),
        });
    }

    Ok(files)
}

fn relative_path(file_path: &Path, root: &Path) -> Result<PathBuf> {
    let relative = file_path.strip_prefix(root).map_err(|_| {
        RezipError::Io(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            format!(
                "Cannot calculate relative path for {} from root {}",
                file_path.display(),
                root.display()
            ),
        ))
    })?;

    if relative
        .components()
        .any(|c| matches!(c, Component::ParentDir))
    {
        return Err(RezipError::Io(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            format!(
                "Path contains parent directory references: {}",
                relative.display()
            ),
        )));
    }

    Ok(relative.to_path_buf())
}

/// Joins the normal components with `/`. Names that are not UTF-8 are refused.
fn entry_name(relative: &Path) -> Result<String> {
    let mut parts = Vec::new();
    for component in relative.components() {
        if let Component::Normal(part) = component {
            let part = part.to_str().ok_or_else(|| RezipError::Write {
                path: relative.display().to_string(),
                message: "entry name is not valid UTF-8".to_string(),
            })?;
            parts.push(part);
        }
    }
    Ok(parts.join("/"))
}
