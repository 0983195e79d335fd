use crate::error::{RezipError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub output: OutputConfig,
    pub workspace: WorkspaceConfig,
    pub tools: ToolsConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Appended to the input's stem, before any `_<n>` disambiguator.
    pub suffix: String,
    pub compression: Compression,
    /// Write to a sibling temp file and rename into place once complete.
    pub atomic: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct WorkspaceConfig {
    pub prefix: String,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct ToolsConfig {
    pub unrar_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Compression {
    Deflated,
    Stored,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            suffix: "_converted".to_string(),
            compression: Compression::Deflated,
            atomic: true,
        }
    }
}

impl Default for WorkspaceConfig {
    fn default() -> Self {
        Self {
            prefix: "temp_".to_string(),
        }
    }
}

impl Config {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(RezipError::Config {
                message: format!("Configuration file not found: {}", path.display()),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| RezipError::Config {
            message: format!("Failed to read config file {}: {}", path.display(), e),
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| RezipError::Config {
            message: format!("Failed to parse config file {}: {}", path.display(), e),
        })?;

        Ok(config)
    }

    pub fn load_with_defaults<P: AsRef<Path>>(config_path: Option<P>) -> Result<Self> {
        match config_path {
            Some(path) => Self::load_from_file(path),
            None => {
                let default_paths = ["rezip.toml", ".rezip.toml"];

                for default_path in &default_paths {
                    if Path::new(default_path).exists() {
                        return Self::load_from_file(default_path);
                    }
                }

                Ok(Self::default())
            }
        }
    }

    pub fn merge_with_cli_args(&mut self, cli_args: &CliOverrides) {
        if let Some(ref suffix) = cli_args.suffix {
            self.output.suffix = suffix.clone();
        }

        if let Some(compression) = cli_args.compression {
            self.output.compression = compression;
        }

        if let Some(atomic) = cli_args.atomic {
            self.output.atomic = atomic;
        }

        if let Some(ref unrar_path) = cli_args.unrar_path {
            self.tools.unrar_path = Some(unrar_path.clone());
        }
    }

    pub fn validate(&self) -> Result<()> {
        // Both values end up inside a single file name
        if self.output.suffix.is_empty() {
            return Err(RezipError::Config {
                message: "Output suffix must not be empty".to_string(),
            });
        }

        if has_separator(&self.output.suffix) {
            return Err(RezipError::Config {
                message: format!(
                    "Output suffix must not contain path separators: {}",
                    self.output.suffix
                ),
            });
        }

        if self.workspace.prefix.is_empty() {
            return Err(RezipError::Config {
                message: "Workspace prefix must not be empty".to_string(),
            });
        }

        if has_separator(&self.workspace.prefix) {
            return Err(RezipError::Config {
                message: format!(
                    "Workspace prefix must not contain path separators: {}",
                    self.workspace.prefix
                ),
            });
        }

        if let Some(ref unrar) = self.tools.unrar_path {
            if unrar.as_os_str().is_empty() {
                return Err(RezipError::Config {
                    message: "unrar_path must not be empty when set".to_string(),
                });
            }
        }

        Ok(())
    }

    pub fn create_sample_config() -> String {
        let sample_config = Self::default();
        toml::to_string_pretty(&sample_config).unwrap_or_else(|_| String::new())
    }
}

fn has_separator(value: &str) -> bool {
    value.contains('/') || value.contains('\\')
}

#[derive(Debug, Default)]
pub struct CliOverrides {
    pub suffix: Option<String>,
    pub compression: Option<Compression>,
    pub atomic: Option<bool>,
    pub unrar_path: Option<PathBuf>,
}

impl CliOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_suffix(mut self, suffix: Option<String>) -> Self {
        self.suffix = suffix;
        self
    }

    pub fn with_compression(mut self, compression: Option<Compression>) -> Self {
        self.compression = compression;
        self
    }

    pub fn with_atomic(mut self, atomic: Option<bool>) -> Self {
        self.atomic = atomic;
        self
    }

    pub fn with_unrar_path(mut self, unrar_path: Option<PathBuf>) -> Self {
        self.unrar_path = unrar_path;
        self
    }
}
