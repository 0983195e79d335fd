use super::{extraction_error, ArchiveFormat, Decoder};
use crate::error::Result;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::debug;

pub struct ZipDecoder;

impl Decoder for ZipDecoder {
    fn format(&self) -> ArchiveFormat {
        ArchiveFormat::Zip
    }

    fn extract_all(&self, archive: &Path, destination: &Path) -> Result<()> {
        let file = File::open(archive)?;
        let mut zip = ::zip::ZipArchive::new(BufReader::new(file))
            .map_err(|e| extraction_error(ArchiveFormat::Zip, e))?;

        debug!(archive = %archive.display(), entries = zip.len(), "extracting zip archive");

        // Entries whose names escape `destination` are rejected by the library
        zip.extract(destination)
            .map_err(|e| extraction_error(ArchiveFormat::Zip, e))
    }
}
