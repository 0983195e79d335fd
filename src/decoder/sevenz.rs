use super::{extraction_error, is_enclosed_entry, ArchiveFormat, Decoder};
use crate::error::{RezipError, Result};
use std::path::Path;
use tracing::{debug, warn};

pub struct SevenZDecoder;

impl Decoder for SevenZDecoder {
    fn format(&self) -> ArchiveFormat {
        ArchiveFormat::SevenZ
    }

    fn extract_all(&self, archive: &Path, destination: &Path) -> Result<()> {
        debug!(archive = %archive.display(), "decompressing 7z archive");

        let mut rejected: Option<String> = None;
        let result = sevenz_rust::decompress_file_with_extract_fn(
            archive,
            destination,
            |entry, reader, dest| {
                if !is_enclosed_entry(Path::new(entry.name())) {
                    warn!(entry = entry.name(), "refusing 7z entry outside the workspace");
                    rejected = Some(entry.name().to_string());
                    return Err(sevenz_rust::Error::other("entry escapes the destination"));
                }
                sevenz_rust::default_entry_extract_fn(entry, reader, dest)
            },
        );

        match (result, rejected) {
            (_, Some(name)) => Err(RezipError::Extraction {
                format: ArchiveFormat::SevenZ,
                message: format!("entry {} escapes the destination directory", name),
            }),
            (Err(e), None) => Err(extraction_error(ArchiveFormat::SevenZ, e)),
            (Ok(()), None) => Ok(()),
        }
    }
}
