use crate::config::Compression;
use crate::error::{RezipError, Result};
use crate::pipeline::scanner::StagedFile;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{self, BufReader, Seek, Write};
use std::path::Path;
use tracing::debug;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackSummary {
    pub entries: usize,
    pub bytes: u64,
}

const COPY_BUFFER_SIZE: usize = 64 * 1024;

pub struct ZipPackager {
    compression: Compression,
    atomic: bool,
}

impl ZipPackager {
    pub fn new() -> Self {
        Self {
            compression: Compression::Deflated,
            atomic: true,
        }
    }

    pub fn with_compression(mut self, compression: Compression) -> Self {
        self.compression = compression;
        self
    }

    pub fn with_atomic(mut self, atomic: bool) -> Self {
        self.atomic = atomic;
        self
    }

    /// Writes `files` into a new zip at `output`. Never replaces an existing
    /// file. In atomic mode nothing appears at `output` unless the archive
    /// was written completely.
    pub fn pack(&self, files: &[StagedFile], output: &Path) -> Result<PackSummary> {
        if self.atomic {
            self.pack_atomic(files, output)
        } else {
            self.pack_direct(files, output)
        }
    }

    fn pack_atomic(&self, files: &[StagedFile], output: &Path) -> Result<PackSummary> {
        let dir = match output.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let file_name = output
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "output.zip".to_string());

        let partial = tempfile::Builder::new()
            .prefix(&format!(".{}.", file_name))
            .suffix(".partial")
            .tempfile_in(dir)
            .map_err(|e| write_error(output, e))?;
        debug!(partial = %partial.path().display(), "writing zip to partial file");

        let (partial, summary) = self.write_entries(partial, files, output)?;

        // A failed persist drops the partial file, which deletes it
        partial
            .persist_noclobber(output)
            .map_err(|e| write_error(output, e.error))?;

        Ok(summary)
    }

    fn pack_direct(&self, files: &[StagedFile], output: &Path) -> Result<PackSummary> {
        let file = File::options()
            .write(true)
            .create_new(true)
            .open(output)
            .map_err(|e| write_error(output, e))?;

        let (mut file, summary) = self.write_entries(file, files, output)?;
        file.flush().map_err(|e| write_error(output, e))?;

        Ok(summary)
    }

    fn write_entries<W: Write + Seek>(
        &self,
        sink: W,
        files: &[StagedFile],
        output: &Path,
    ) -> Result<(W, PackSummary)> {
        let mut writer = ZipWriter::new(sink);
        let mut summary = PackSummary::default();

        for file in files {
            let options = SimpleFileOptions::default()
                .compression_method(self.compression_method())
                .large_file(file.size >= u64::from(u32::MAX));

            writer
                .start_file(file.entry_name.clone(), options)
                .map_err(|e| write_error(output, e))?;

            let source = File::open(&file.source_path).map_err(|e| write_error(output, e))?;
            let mut reader = BufReader::with_capacity(COPY_BUFFER_SIZE, source);
            let copied = io::copy(&mut reader, &mut writer).map_err(|e| write_error(output, e))?;

            summary.entries += 1;
            summary.bytes += copied;
        }

        let sink = writer.finish().map_err(|e| write_error(output, e))?;
        debug!(
            output = %output.display(),
            entries = summary.entries,
            bytes = summary.bytes,
            "zip archive written"
        );

        Ok((sink, summary))
    }

    fn compression_method(&self) -> CompressionMethod {
        match self.compression {
            Compression::Deflated => CompressionMethod::Deflated,
            Compression::Stored => CompressionMethod::Stored,
        }
    }
}

impl Default for ZipPackager {
    fn default() -> Self {
        Self::new()
    }
}

fn write_error<E: std::fmt::Display>(output: &Path, error: E) -> RezipError {
    RezipError::Write {
        path: output.display().to_string(),
        message: error.to_string(),
    }
}
