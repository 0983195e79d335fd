use crate::decoder::ArchiveFormat;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RezipError {
    #[error("File does not exist: {path}")]
    MissingInput { path: String },

    #[error("Unsupported archive format: {extension}")]
    UnsupportedFormat { extension: String },

    #[error("Failed to extract {format} archive: {message}")]
    Extraction {
        format: ArchiveFormat,
        message: String,
    },

    #[error("Unpacking tool not found: {tool}")]
    ToolNotFound { tool: String },

    #[error("Failed to write zip archive {path}: {message}")]
    Write { path: String, message: String },

    #[error("IO operation failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("A conversion batch is already running")]
    BatchInProgress,

    #[error("No input files selected")]
    NoInput,

    #[error("Conversion worker failed: {message}")]
    Worker { message: String },
}

pub trait UserFriendlyError {
    fn user_message(&self) -> String;
    fn suggestion(&self) -> Option<String>;
}

impl UserFriendlyError for RezipError {
    fn user_message(&self) -> String {
        match self {
            RezipError::MissingInput { path } => {
                format!("File {} does not exist", path)
            }
            RezipError::UnsupportedFormat { extension } => {
                if extension.is_empty() {
                    "Unsupported format: file has no extension".to_string()
                } else {
                    format!("Unsupported format: .{}", extension)
                }
            }
            RezipError::Extraction { format, message } => {
                format!("Could not extract {} archive: {}", format, message)
            }
            RezipError::ToolNotFound { tool } => {
                format!("Unpacking tool not found: {}", tool)
            }
            RezipError::Write { path, message } => {
                format!("Could not write {}: {}", path, message)
            }
            RezipError::Config { message } => {
                format!("Configuration error: {}", message)
            }
            _ => self.to_string(),
        }
    }

    fn suggestion(&self) -> Option<String> {
        match self {
            RezipError::UnsupportedFormat { .. } => Some(
                "Only .7z, .rar, .zip and .tar archives can be converted.".to_string(),
            ),
            RezipError::ToolNotFound { .. } => Some(
                "Install unrar, place it next to the rezip executable, or pass --unrar-path."
                    .to_string(),
            ),
            RezipError::Extraction { .. } => Some(
                "The archive may be corrupted, truncated or password protected.".to_string(),
            ),
            RezipError::Write { .. } => Some(
                "Check free disk space and write permissions for the output directory."
                    .to_string(),
            ),
            RezipError::Config { .. } => Some(
                "Check your configuration file syntax or regenerate it with --generate-config."
                    .to_string(),
            ),
            RezipError::NoInput => Some(
                "Pass archive paths as arguments or with --files \"a.7z; b.rar\".".to_string(),
            ),
            RezipError::BatchInProgress => {
                Some("Wait for the running batch to finish.".to_string())
            }
            _ => None,
        }
    }
}

impl From<toml::de::Error> for RezipError {
    fn from(error: toml::de::Error) -> Self {
        RezipError::Config {
            message: error.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, RezipError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_friendly_messages() {
        let error = RezipError::UnsupportedFormat {
            extension: "gz".to_string(),
        };
        assert!(error.user_message().contains("Unsupported format"));
        assert!(error.user_message().contains(".gz"));
        assert!(error.suggestion().is_some());
    }

    #[test]
    fn test_missing_input_message() {
        let error = RezipError::MissingInput {
            path: "nowhere.7z".to_string(),
        };
        assert_eq!(error.user_message(), "File nowhere.7z does not exist");
        assert!(error.suggestion().is_none());
    }

    #[test]
    fn test_extraction_message_names_format() {
        let error = RezipError::Extraction {
            format: ArchiveFormat::Rar,
            message: "CRC failed".to_string(),
        };
        assert!(error.user_message().contains("rar"));
        assert!(error.to_string().contains("CRC failed"));
    }

    #[test]
    fn test_toml_error_conversion() {
        let toml_error = toml::from_str::<toml::Value>("not = [valid").unwrap_err();
        let error = RezipError::from(toml_error);
        assert!(matches!(error, RezipError::Config { .. }));
    }
}
