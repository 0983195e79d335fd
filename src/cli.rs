use crate::config::{CliOverrides, Compression, Config};
use crate::error::Result;
use crate::selection::Selection;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "rezip")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Convert 7z, rar, zip and tar archives into zip archives")]
#[command(
    long_about = "rezip extracts each selected archive into a temporary directory next to it \
                  and repacks the contents as <name>_converted.zip. Existing files are never \
                  overwritten; a numbered name is chosen instead."
)]
#[command(after_help = "EXAMPLES:\n  \
    rezip photos.7z backup.rar\n  \
    rezip --files \"photos.7z; backup.rar; site.tar\"\n  \
    rezip *.rar --unrar-path /opt/unrar/unrar --report report.json\n  \
    rezip data.zip --stored --suffix _flat")]
pub struct Cli {
    /// Archives to convert
    #[arg(value_name = "FILES")]
    pub files: Vec<PathBuf>,

    /// Archives as one string, separated by "; "
    #[arg(long = "files", value_name = "LIST")]
    pub files_list: Option<String>,

    /// Configuration file path
    #[arg(short, long, help = "Path to TOML configuration file")]
    pub config: Option<PathBuf>,

    /// Output format for results
    #[arg(long, value_enum, default_value_t = OutputFormat::Human)]
    pub output_format: OutputFormat,

    /// Verbose output level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (suppress non-essential output)
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Path to the unrar executable
    #[arg(long, env = "REZIP_UNRAR_PATH")]
    pub unrar_path: Option<PathBuf>,

    /// Text appended to the archive name for the output file
    #[arg(long, help = "Output name suffix (default: _converted)")]
    pub suffix: Option<String>,

    /// Store entries without compression
    #[arg(long)]
    pub stored: bool,

    /// Write output files directly instead of via a temporary file
    #[arg(long)]
    pub no_atomic: bool,

    /// Write a JSON report of the batch to this path
    #[arg(long, value_name = "PATH")]
    pub report: Option<PathBuf>,

    /// Dry run (show what would be done without executing)
    #[arg(long, help = "Show the conversion plan without touching any file")]
    pub dry_run: bool,

    /// Generate sample configuration file
    #[arg(long, help = "Generate a sample configuration file")]
    pub generate_config: bool,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable colored output
    Human,
    /// JSON formatted output
    Json,
    /// Plain text output
    Plain,
}

impl Cli {
    pub fn load_config(&self) -> Result<Config> {
        let mut config = Config::load_with_defaults(self.config.as_ref())?;

        let overrides = self.create_cli_overrides();
        config.merge_with_cli_args(&overrides);
        config.validate()?;

        Ok(config)
    }

    pub fn create_cli_overrides(&self) -> CliOverrides {
        let compression = self.stored.then_some(Compression::Stored);
        let atomic = self.no_atomic.then_some(false);

        CliOverrides::new()
            .with_suffix(self.suffix.clone())
            .with_compression(compression)
            .with_atomic(atomic)
            .with_unrar_path(self.unrar_path.clone())
    }

    /// Positional paths first, then the entries of `--files`.
    pub fn selection(&self) -> Selection {
        let mut selection = Selection::from_paths(&self.files);
        if let Some(ref joined) = self.files_list {
            selection.extend(Selection::parse(joined));
        }
        selection
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("rezip").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_positional_and_joined_files() {
        let cli = parse(&["a.7z", "b.rar", "--files", "c.zip; d.tar"]);
        let expected: Vec<PathBuf> = ["a.7z", "b.rar", "c.zip", "d.tar"]
            .iter()
            .map(PathBuf::from)
            .collect();
        assert_eq!(cli.selection().entries(), expected);
    }

    #[test]
    fn test_no_files_is_empty_selection() {
        let cli = parse(&[]);
        assert!(cli.selection().is_empty());
    }

    #[test]
    fn test_overrides_from_flags() {
        let cli = parse(&["x.zip", "--stored", "--no-atomic", "--suffix", "_flat"]);
        let overrides = cli.create_cli_overrides();

        assert_eq!(overrides.suffix.as_deref(), Some("_flat"));
        assert_eq!(overrides.compression, Some(Compression::Stored));
        assert_eq!(overrides.atomic, Some(false));
    }

    #[test]
    fn test_defaults_leave_config_untouched() {
        let cli = parse(&["x.zip"]);
        let overrides = cli.create_cli_overrides();

        assert!(overrides.suffix.is_none());
        assert!(overrides.compression.is_none());
        assert!(overrides.atomic.is_none());
    }

    #[test]
    fn test_quiet_conflicts_with_verbose() {
        let result = Cli::try_parse_from(["rezip", "-q", "-v", "a.7z"]);
        assert!(result.is_err());
    }
}
