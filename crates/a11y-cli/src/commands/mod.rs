//! CLI command definitions and handlers.

use a11y_core::config::AppConfig;
use anyhow::Result;
use clap::{Parser, Subcommand};

pub mod analyze;
pub mod reports;
pub mod rules;
pub mod serve;

/// Accessibility Analyzer - static WCAG checks with AI fix suggestions
#[derive(Parser)]
#[command(name = "a11y")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the API server
    Serve(serve::ServeArgs),

    /// Analyze a URL or a local HTML file
    Analyze(analyze::AnalyzeArgs),

    /// Manage stored reports
    #[command(subcommand)]
    Reports(reports::ReportCommands),

    /// List the accessibility rules
    Rules,
}

impl Cli {
    pub async fn execute(self) -> Result<()> {
        let config = AppConfig::from_env()?;

        match self.command {
            Commands::Serve(args) => serve::execute(args, &config).await,
            Commands::Analyze(args) => analyze::execute(args, &config).await,
            Commands::Reports(cmd) => reports::execute(cmd, &config),
            Commands::Rules => rules::execute(),
        }
    }
}
