//! scrollwatch - Entry Point
//!
//! Replays a JSON-lines signal trace against the tracking core and prints
//! every "reached bottom" notification it produced.

use clap::Parser;
use scrollwatch::logging::LogTarget;
use scrollwatch::model::error::AppError;
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info};

/// scrollwatch - replay scroll signal traces through the bottom detector
#[derive(Parser, Debug)]
#[command(name = "scrollwatch")]
#[command(version)]
#[command(about = "Replay scroll signal traces and report reached-bottom notifications")]
pub struct Args {
    /// Path to JSONL trace file (reads from stdin if not provided)
    pub trace: Option<PathBuf>,

    /// Path to configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Debounce delay in milliseconds
    #[arg(long)]
    pub debounce_ms: Option<u64>,

    /// Distance from the bottom, in pixels, that counts as reached
    #[arg(long)]
    pub bottom_margin: Option<u32>,

    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,

    /// Log to stderr instead of the log file
    #[arg(long)]
    pub log_stderr: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "replay failed");
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<(), AppError> {
    // Defaults → Config File → Env Vars → CLI Args
    let config = {
        let config_file = scrollwatch::config::load_config_with_precedence(args.config.clone())?;
        let merged = scrollwatch::config::merge_config(config_file);
        let with_env = scrollwatch::config::apply_env_overrides(merged)?;
        scrollwatch::config::apply_cli_overrides(with_env, args.debounce_ms, args.bottom_margin)
    };

    let log_target = if args.log_stderr {
        LogTarget::Stderr
    } else {
        LogTarget::File(config.log_file_path.clone())
    };
    scrollwatch::logging::init(&log_target)?;

    info!(config = ?config, "Configuration loaded and resolved");

    let steps = scrollwatch::source::read_trace(args.trace.clone())?;
    let report = scrollwatch::integration::replay(&steps, config.tracker);

    let mut stdout = std::io::stdout().lock();
    if args.json {
        serde_json::to_writer_pretty(&mut stdout, &report).map_err(std::io::Error::from)?;
        writeln!(stdout)?;
    } else {
        writeln!(stdout, "{}", report)?;
    }

    Ok(())
}
