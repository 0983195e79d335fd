use clap::Parser;
use rezip::{
    logging, unique_output_path, ArchiveFormat, Cli, OutputFormatter, OutputMode, Rezip,
    RezipError, Selection, UserFriendlyError,
};
use std::path::PathBuf;
use std::process;

#[tokio::main]
async fn main() {
    let exit_code = run().await;
    process::exit(exit_code);
}

async fn run() -> i32 {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose, cli.quiet);

    if cli.generate_config {
        return handle_generate_config(&cli);
    }

    let rezip = match Rezip::from_cli(&cli) {
        Ok(rezip) => rezip,
        Err(e) => {
            print_startup_error(&e);
            return 1;
        }
    };

    let selection = cli.selection();
    if selection.is_empty() {
        rezip.output_formatter().warning("No files selected");
        return 1;
    }

    if cli.dry_run {
        return handle_dry_run(&rezip, &selection);
    }

    for path in selection.unsupported() {
        rezip.output_formatter().info(&format!(
            "{} does not look like a supported archive",
            path.display()
        ));
    }

    match rezip.convert_all(&selection, cli.report.as_deref()).await {
        Ok(summary) => {
            if summary.all_succeeded() {
                0
            } else {
                2
            }
        }
        Err(e) => {
            rezip.handle_error(&e);
            1
        }
    }
}

fn handle_generate_config(cli: &Cli) -> i32 {
    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(|| PathBuf::from("rezip.toml"));

    if config_path.exists() {
        eprintln!(
            "Refusing to overwrite existing file: {}",
            config_path.display()
        );
        return 1;
    }

    match Rezip::generate_sample_config(&config_path) {
        Ok(()) => {
            println!(
                "Generated sample configuration file: {}",
                config_path.display()
            );
            println!("\nTo use this configuration:");
            println!("  rezip <archives...> --config {}", config_path.display());
            0
        }
        Err(e) => {
            eprintln!(
                "Failed to generate configuration file: {}",
                e.user_message()
            );
            if let Some(suggestion) = e.suggestion() {
                eprintln!("Suggestion: {}", suggestion);
            }
            1
        }
    }
}

fn handle_dry_run(rezip: &Rezip, selection: &Selection) -> i32 {
    let formatter = rezip.output_formatter();
    let config = rezip.config();

    formatter.print_header("DRY RUN - no files will be written");
    println!("  Output suffix:  {}", config.output.suffix);
    println!("  Compression:    {:?}", config.output.compression);
    println!("  Atomic writes:  {}", config.output.atomic);
    println!("  Workspace:      {}<name>", config.workspace.prefix);
    println!(
        "  unrar:          {} ({:?})",
        rezip.tools().unrar.display(),
        rezip.tools().unrar_source
    );
    formatter.print_separator();

    let planned = print_plan(rezip, selection);

    formatter.print_separator();
    formatter.success(&format!(
        "{} of {} archive(s) planned",
        planned,
        selection.len()
    ));
    0
}

/// Prints one plan line per convertible input and an error for the rest.
/// Returns how many inputs would be converted.
fn print_plan(rezip: &Rezip, selection: &Selection) -> usize {
    let formatter = rezip.output_formatter();
    let mut planned = 0;

    for input in selection.entries() {
        if !input.exists() {
            formatter.error(
                &RezipError::MissingInput {
                    path: input.display().to_string(),
                }
                .user_message(),
            );
            continue;
        }

        match ArchiveFormat::from_path(input) {
            Ok(format) => {
                let output = unique_output_path(input, &rezip.config().output.suffix);
                println!("  {} [{}] -> {}", input.display(), format, output.display());
                planned += 1;
            }
            Err(e) => formatter.error(&format!("{}: {}", input.display(), e.user_message())),
        }
    }

    planned
}

fn print_startup_error(error: &RezipError) {
    let formatter = OutputFormatter::new(OutputMode::Human, 0, false);
    formatter.print_user_friendly_error(error);
}
