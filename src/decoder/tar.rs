use super::{extraction_error, ArchiveFormat, Decoder};
use crate::error::Result;
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;
use tracing::debug;

const GZIP_MAGIC: &[u8] = &[0x1F, 0x8B];
const BZIP2_MAGIC: &[u8] = b"BZh";
const XZ_MAGIC: &[u8] = &[0xFD, 0x37, 0x7A, 0x58, 0x5A, 0x00];

/// Stream compression wrapped around a tar archive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TarCompression {
    None,
    Gzip,
    Bzip2,
    Xz,
}

impl TarCompression {
    fn sniff(header: &[u8]) -> Self {
        if header.starts_with(GZIP_MAGIC) {
            TarCompression::Gzip
        } else if header.starts_with(BZIP2_MAGIC) {
            TarCompression::Bzip2
        } else if header.starts_with(XZ_MAGIC) {
            TarCompression::Xz
        } else {
            TarCompression::None
        }
    }
}

/// Tar archives, plain or wrapped in gzip, bzip2 or xz. The wrapper is
/// detected from the leading bytes, not the file name.
pub struct TarDecoder;

impl TarDecoder {
    fn open_stream(archive: &Path) -> Result<(TarCompression, Box<dyn Read>)> {
        let mut reader = BufReader::new(File::open(archive)?);
        let compression = TarCompression::sniff(reader.fill_buf()?);

        let stream: Box<dyn Read> = match compression {
            TarCompression::None => Box::new(reader),
            TarCompression::Gzip => Box::new(flate2::read::GzDecoder::new(reader)),
            TarCompression::Bzip2 => Box::new(bzip2::read::BzDecoder::new(reader)),
            TarCompression::Xz => Box::new(xz2::read::XzDecoder::new(reader)),
        };
        Ok((compression, stream))
    }
}

impl Decoder for TarDecoder {
    fn format(&self) -> ArchiveFormat {
        ArchiveFormat::Tar
    }

    fn extract_all(&self, archive: &Path, destination: &Path) -> Result<()> {
        let (compression, stream) = Self::open_stream(archive)?;
        debug!(archive = %archive.display(), ?compression, "unpacking tar archive");

        ::tar::Archive::new(stream)
            .unpack(destination)
            .map_err(|e| extraction_error(ArchiveFormat::Tar, e))
    }
}
