use crate::config::Config;
use crate::decoder::{ArchiveFormat, Decoder, DecoderRegistry};
use crate::error::Result;
use crate::pipeline::packager::{PackSummary, ZipPackager};
use crate::pipeline::scanner::scan_workspace;
use crate::pipeline::workspace::TempWorkspace;
use crate::tools::ToolPaths;
use std::path::Path;
use tracing::{debug, info};

/// Converts a single archive: extract into a private workspace, repack the
/// extracted files as zip, remove the workspace.
pub struct Converter {
    decoders: DecoderRegistry,
    packager: ZipPackager,
    workspace_prefix: String,
}

impl Converter {
    pub fn new(config: &Config, tools: &ToolPaths) -> Self {
        Self::with_decoders(config, DecoderRegistry::new(tools.unrar.clone()))
    }

    pub fn with_decoders(config: &Config, decoders: DecoderRegistry) -> Self {
        let packager = ZipPackager::new()
            .with_compression(config.output.compression)
            .with_atomic(config.output.atomic);

        Self {
            decoders,
            packager,
            workspace_prefix: config.workspace.prefix.clone(),
        }
    }

    /// The workspace is gone when this returns, whatever the outcome.
    pub fn convert(&self, input: &Path, output: &Path) -> Result<PackSummary> {
        let format = ArchiveFormat::from_path(input)?;
        let decoder = self.decoders.for_format(format)?;

        let workspace = TempWorkspace::create(input, &self.workspace_prefix)?;
        let result = self.extract_and_pack(decoder, input, workspace.path(), output);
        workspace.remove();

        if let Ok(ref summary) = result {
            info!(
                input = %input.display(),
                output = %output.display(),
                entries = summary.entries,
                "converted archive"
            );
        }
        result
    }

    fn extract_and_pack(
        &self,
        decoder: &dyn Decoder,
        input: &Path,
        workspace: &Path,
        output: &Path,
    ) -> Result<PackSummary> {
        decoder.extract_all(input, workspace)?;

        let files = scan_workspace(workspace)?;
        debug!(files = files.len(), "staged files ready for packing");

        self.packager.pack(&files, output)
    }

    pub fn workspace_prefix(&self) -> &str {
        &self.workspace_prefix
    }
}
