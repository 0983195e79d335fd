use super::{ArchiveFormat, Decoder};
use crate::error::{RezipError, Result};
use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf, MAIN_SEPARATOR};
use std::process::{Command, Stdio};
use tracing::debug;

/// Delegates to an external `unrar` executable at a fixed path.
pub struct RarDecoder {
    tool: PathBuf,
}

impl RarDecoder {
    pub fn new<P: Into<PathBuf>>(tool: P) -> Self {
        Self { tool: tool.into() }
    }

    // x: keep paths, -y: assume yes, -idq: quiet, -p-: never prompt for a password.
    // unrar treats the destination as a directory only with a trailing separator.
    fn arguments(archive: &Path, destination: &Path) -> Vec<OsString> {
        let mut dest = destination.as_os_str().to_os_string();
        if !dest.to_string_lossy().ends_with(MAIN_SEPARATOR) {
            dest.push(MAIN_SEPARATOR.to_string());
        }

        vec![
            OsString::from("x"),
            OsString::from("-y"),
            OsString::from("-idq"),
            OsString::from("-p-"),
            archive.as_os_str().to_os_string(),
            dest,
        ]
    }
}

impl Decoder for RarDecoder {
    fn format(&self) -> ArchiveFormat {
        ArchiveFormat::Rar
    }

    fn extract_all(&self, archive: &Path, destination: &Path) -> Result<()> {
        debug!(
            archive = %archive.display(),
            tool = %self.tool.display(),
            "running unrar"
        );

        let output = Command::new(&self.tool)
            .args(Self::arguments(archive, destination))
            .stdin(Stdio::null())
            .output()
            .map_err(|e| match e.kind() {
                io::ErrorKind::NotFound => RezipError::ToolNotFound {
                    tool: self.tool.display().to_string(),
                },
                _ => RezipError::Extraction {
                    format: ArchiveFormat::Rar,
                    message: format!("failed to run {}: {}", self.tool.display(), e),
                },
            })?;

        if output.status.success() {
            return Ok(());
        }

        let stderr = String::from_utf8_lossy(&output.stderr);
        let detail = stderr.trim();
        let message = match output.status.code() {
            Some(code) if detail.is_empty() => format!("unrar exited with code {}", code),
            Some(code) => format!("unrar exited with code {}: {}", code, detail),
            None => "unrar was terminated by a signal".to_string(),
        };

        Err(RezipError::Extraction {
            format: ArchiveFormat::Rar,
            message,
        })
    }
}
