//! a11y - Accessibility Analyzer
//!
//! Runs the analyzer API server or checks pages from the command line.

use anyhow::Result;
use clap::Parser;
use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod output;

use commands::{Cli, Commands};

const DEFAULT_FILTER: &str = "a11y=info,a11y_web=debug,a11y_core=info";
const VERBOSE_FILTER: &str = "a11y=debug,a11y_web=debug,a11y_core=debug,a11y_db=debug";
const DEFAULT_LOG_FILE: &str = ".a11y/serve.log";

/// Initialize tracing with optional file logging.
///
/// The returned guard flushes the log file on drop and must be held for the
/// life of the process.
fn init_tracing(log_file: Option<&Path>, verbose: bool) -> Option<WorkerGuard> {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| {
            tracing_subscriber::EnvFilter::new(if verbose { VERBOSE_FILTER } else { DEFAULT_FILTER })
        });

    let file_writer = log_file.and_then(|path| {
        let dir = path.parent().filter(|p| !p.as_os_str().is_empty()).unwrap_or(Path::new("."));
        let name = path.file_name()?;
        if let Err(e) = std::fs::create_dir_all(dir) {
            eprintln!("Cannot create log directory {}: {}", dir.display(), e);
            return None;
        }
        Some(tracing_appender::non_blocking(tracing_appender::rolling::never(dir, name)))
    });

    match file_writer {
        Some((writer, guard)) => {
            // Log to both stdout and file when --log is used
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer())
                .with(tracing_subscriber::fmt::layer().with_writer(writer).with_ansi(false))
                .init();
            Some(guard)
        }
        None => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
                .init();
            None
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    a11y_core::config::load_dotenv();
    let cli = Cli::parse();

    let log_file = match &cli.command {
        Commands::Serve(args) if args.log => Some(
            args.log_file
                .clone()
                .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_FILE)),
        ),
        _ => None,
    };

    let _guard = init_tracing(log_file.as_deref(), cli.verbose);

    cli.execute().await
}
