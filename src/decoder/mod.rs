//! Format-specific decoders that unpack a whole archive into a directory.

pub mod rar;
pub mod sevenz;
pub mod tar;
pub mod zip;

pub use self::rar::RarDecoder;
pub use self::sevenz::SevenZDecoder;
pub use self::tar::TarDecoder;
pub use self::zip::ZipDecoder;

use crate::error::{RezipError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Component, Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArchiveFormat {
    #[serde(rename = "7z")]
    SevenZ,
    Rar,
    Zip,
    Tar,
}

impl ArchiveFormat {
    pub const ALL: [ArchiveFormat; 4] = [
        ArchiveFormat::SevenZ,
        ArchiveFormat::Rar,
        ArchiveFormat::Zip,
        ArchiveFormat::Tar,
    ];

    pub fn extension(self) -> &'static str {
        match self {
            ArchiveFormat::SevenZ => "7z",
            ArchiveFormat::Rar => "rar",
            ArchiveFormat::Zip => "zip",
            ArchiveFormat::Tar => "tar",
        }
    }

    pub fn from_extension(extension: &str) -> Option<Self> {
        let extension = extension.to_lowercase();
        Self::ALL
            .into_iter()
            .find(|format| format.extension() == extension)
    }

    /// Detects the format from the last extension of `path`, ignoring case.
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("");

        Self::from_extension(extension).ok_or_else(|| RezipError::UnsupportedFormat {
            extension: extension.to_lowercase(),
        })
    }
}

impl fmt::Display for ArchiveFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

pub trait Decoder: Send + Sync {
    fn format(&self) -> ArchiveFormat;

    /// Extracts every entry of `archive` below `destination`, which must exist.
    fn extract_all(&self, archive: &Path, destination: &Path) -> Result<()>;
}

pub struct DecoderRegistry {
    decoders: Vec<Box<dyn Decoder>>,
}

impl DecoderRegistry {
    /// Registry with the built-in decoder for every supported format.
    pub fn new(unrar_path: PathBuf) -> Self {
        Self {
            decoders: vec![
                Box::new(SevenZDecoder),
                Box::new(RarDecoder::new(unrar_path)),
                Box::new(ZipDecoder),
                Box::new(TarDecoder),
            ],
        }
    }

    pub fn empty() -> Self {
        Self {
            decoders: Vec::new(),
        }
    }

    /// Registers `decoder`, replacing any decoder already handling its format.
    pub fn with_decoder<D: Decoder + 'static>(mut self, decoder: D) -> Self {
        let format = decoder.format();
        self.decoders.retain(|d| d.format() != format);
        self.decoders.push(Box::new(decoder));
        self
    }

    pub fn for_format(&self, format: ArchiveFormat) -> Result<&dyn Decoder> {
        self.decoders
            .iter()
            .find(|d| d.format() == format)
            .map(|d| d.as_ref())
            .ok_or_else(|| RezipError::UnsupportedFormat {
                extension: format.extension().to_string(),
            })
    }
}

pub(crate) fn extraction_error<E: fmt::Display>(format: ArchiveFormat, error: E) -> RezipError {
    RezipError::Extraction {
        format,
        message: error.to_string(),
    }
}

/// True when `name` stays below the extraction root: no root, no drive
/// prefix and no `..` component.
pub(crate) fn is_enclosed_entry(name: &Path) -> bool {
    name.components()
        .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
}
