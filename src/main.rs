// roitab - main.rs
//
// Application entry point. Handles:
// 1. CLI argument parsing
// 2. Configuration loading (roitab.toml)
// 3. Logging initialisation (debug mode support)
// 4. Mode dispatch: single file pair or directory pair

use clap::Parser;
use roitab::app::batch::{convert_dir, BatchOptions};
use roitab::app::config;
use roitab::app::convert::{convert_file, ConvertOptions};
use roitab::util;
use std::path::PathBuf;
use std::process::ExitCode;

/// roitab - Reformat ROI coordinate logs into pivoted CSV tables.
///
/// Point roitab at a coordinate log (or a directory of them) to produce a
/// wide table per input: rows indexed by element number, one column per
/// coordinate-pair type.
#[derive(Parser, Debug)]
#[command(name = "roitab", version, about)]
struct Cli {
    /// Input log file, or directory of input logs.
    input: PathBuf,

    /// Output table file, or directory for the produced tables.
    /// In directory mode the output directory must already exist.
    output: PathBuf,

    /// Path to a roitab.toml configuration file.
    #[arg(short = 'c', long = "config")]
    config: Option<PathBuf>,

    /// Enable debug logging (equivalent to RUST_LOG=debug).
    #[arg(short = 'd', long = "debug")]
    debug: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Determine config path: CLI override > roitab.toml in the working dir.
    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(|| PathBuf::from(util::constants::CONFIG_FILE_NAME));
    let (app_config, config_warnings) = config::load_config(&config_path);

    // Initialise logging subsystem (config level applies unless overridden).
    util::logging::init(cli.debug, app_config.log_level.as_deref());

    tracing::info!(
        version = util::constants::APP_VERSION,
        debug = cli.debug,
        "roitab starting"
    );

    for warning in &config_warnings {
        tracing::warn!(warning = %warning, "Config warning");
    }

    // Resolve the mode from the input path. Argument mistakes are
    // diagnosed here, before the core is ever invoked.
    let input_is_dir = match std::fs::metadata(&cli.input) {
        Ok(meta) => meta.is_dir(),
        Err(e) => {
            eprintln!("Error: cannot access input '{}': {e}", cli.input.display());
            return ExitCode::from(2);
        }
    };

    if input_is_dir {
        if cli.output.is_file() {
            eprintln!(
                "Error: input '{}' is a directory but output '{}' is a file. \
                 A directory input needs a directory output.",
                cli.input.display(),
                cli.output.display()
            );
            return ExitCode::from(2);
        }
        run_directory(&cli, &app_config)
    } else {
        if cli.output.is_dir() {
            eprintln!(
                "Error: input '{}' is a file but output '{}' is a directory. \
                 A file input needs a file output.",
                cli.input.display(),
                cli.output.display()
            );
            return ExitCode::from(2);
        }
        run_single(&cli, &app_config)
    }
}

/// Convert one input file to one output file.
fn run_single(cli: &Cli, app_config: &config::AppConfig) -> ExitCode {
    let options = ConvertOptions::from(app_config);
    match convert_file(&cli.input, &cli.output, &options) {
        Ok(report) => {
            println!(
                "Converted '{}' -> '{}' ({} rows, {} columns)",
                report.input.display(),
                report.output.display(),
                report.rows,
                report.columns
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = %e, "Conversion failed");
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Convert every matching file in the input directory.
fn run_directory(cli: &Cli, app_config: &config::AppConfig) -> ExitCode {
    let options = BatchOptions::from(app_config);
    match convert_dir(&cli.input, &cli.output, &options) {
        Ok(summary) => {
            for warning in &summary.warnings {
                tracing::warn!(warning = %warning, "Discovery warning");
            }
            println!(
                "Converted {} file(s), {} failed, {} skipped",
                summary.converted.len(),
                summary.failed.len(),
                summary.skipped
            );
            for (path, error) in &summary.failed {
                eprintln!("Error: '{}': {error}", path.display());
            }
            if summary.all_converted() {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            }
        }
        Err(e) => {
            tracing::error!(error = %e, "Directory conversion failed");
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
