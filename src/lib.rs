pub mod batch;
pub mod cli;
pub mod config;
pub mod decoder;
pub mod error;
pub mod logging;
pub mod pipeline;
pub mod selection;
pub mod tools;
pub mod ui;

// Public API re-exports
pub use cli::{Cli, OutputFormat};
pub use config::{CliOverrides, Compression, Config, OutputConfig, ToolsConfig, WorkspaceConfig};
pub use error::{Result, RezipError, UserFriendlyError};

// Core functionality re-exports
pub use batch::{
    unique_output_path, BatchEvent, BatchHandle, BatchRunner, BatchSummary, GateGuard,
    ItemOutcome, ItemStatus, TriggerGate,
};
pub use decoder::{ArchiveFormat, Decoder, DecoderRegistry};
pub use pipeline::{Converter, PackSummary, StagedFile, TempWorkspace, ZipPackager};
pub use selection::{Selection, SELECTION_SEPARATOR};
pub use tools::{ToolPaths, ToolSource};
pub use ui::{OutputFormatter, OutputMode, ProgressManager};

use std::path::Path;
use std::sync::Arc;
use tracing::debug;

/// Main library interface: owns the resolved configuration, the converter
/// and the trigger gate for one process.
pub struct Rezip {
    config: Config,
    tools: ToolPaths,
    runner: BatchRunner,
    gate: TriggerGate,
    output_formatter: OutputFormatter,
    progress_manager: ProgressManager,
}

impl Rezip {
    pub fn new(config: Config, output_mode: OutputMode, verbose: u8, quiet: bool) -> Self {
        let tools = ToolPaths::resolve(&config.tools);
        Self::with_tools(config, tools, output_mode, verbose, quiet)
    }

    pub fn with_tools(
        config: Config,
        tools: ToolPaths,
        output_mode: OutputMode,
        verbose: u8,
        quiet: bool,
    ) -> Self {
        let converter = Converter::new(&config, &tools);
        let runner = BatchRunner::new(Arc::new(converter), config.output.suffix.clone());
        let output_formatter = OutputFormatter::new(output_mode, verbose, quiet);
        let progress_manager = ProgressManager::new(!quiet && output_mode == OutputMode::Human);

        Self {
            config,
            tools,
            runner,
            gate: TriggerGate::new(),
            output_formatter,
            progress_manager,
        }
    }

    pub fn from_cli(cli_args: &Cli) -> Result<Self> {
        let config = cli_args.load_config()?;
        let output_mode = match cli_args.output_format {
            OutputFormat::Human => OutputMode::Human,
            OutputFormat::Json => OutputMode::Json,
            OutputFormat::Plain => OutputMode::Plain,
        };

        Ok(Self::new(
            config,
            output_mode,
            cli_args.verbose,
            cli_args.quiet,
        ))
    }

    /// Starts a batch on the background worker. Fails while another batch
    /// holds the trigger gate.
    pub fn start_batch(&self, selection: &Selection) -> Result<BatchHandle> {
        if selection.is_empty() {
            return Err(RezipError::NoInput);
        }

        let guard = self.gate.try_acquire()?;
        debug!(selection = %selection.join(), "starting batch");
        Ok(self.runner.spawn(selection.entries().to_vec(), guard))
    }

    /// Runs a batch to completion, rendering each event as it arrives.
    pub async fn convert_all(
        &self,
        selection: &Selection,
        report_path: Option<&Path>,
    ) -> Result<BatchSummary> {
        let mut handle = self.start_batch(selection)?;

        self.output_formatter
            .start_operation(&format!("Converting {} archive(s)", selection.len()));
        let progress = self
            .progress_manager
            .create_batch_progress(selection.len() as u64);

        while let Some(event) = handle.next_event().await {
            match event {
                BatchEvent::ItemFinished(ref outcome) => {
                    ui::progress::update_batch_progress(&progress, outcome);
                    self.progress_manager
                        .suspend(|| self.output_formatter.print_event(&event));
                }
                BatchEvent::Finished(ref summary) => {
                    ui::progress::finish_batch_progress(&progress, summary);
                    self.progress_manager.clear();
                    self.output_formatter.print_event(&event);
                }
            }
        }

        let summary = handle.join().await?;

        if let Some(path) = report_path {
            summary.save_json(path)?;
            self.output_formatter
                .info(&format!("Report written to {}", path.display()));
        }

        Ok(summary)
    }

    pub fn generate_sample_config<P: AsRef<Path>>(output_path: P) -> Result<()> {
        let sample_config = Config::create_sample_config();
        std::fs::write(output_path.as_ref(), sample_config)?;
        Ok(())
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn tools(&self) -> &ToolPaths {
        &self.tools
    }

    pub fn gate(&self) -> &TriggerGate {
        &self.gate
    }

    pub fn output_formatter(&self) -> &OutputFormatter {
        &self.output_formatter
    }

    pub fn handle_error(&self, error: &RezipError) {
        self.output_formatter.print_user_friendly_error(error);
    }
}
