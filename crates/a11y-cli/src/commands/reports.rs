//! Stored report commands.

use a11y_core::config::AppConfig;
use a11y_core::report;
use anyhow::{Context, Result};
use clap::Subcommand;
use colored::Colorize;

use crate::output;

#[derive(Subcommand)]
pub enum ReportCommands {
    /// List a user's reports, newest first
    List {
        /// Owner uid
        #[arg(long)]
        user: String,
    },

    /// Show one report
    Show {
        /// Report ID
        id: String,

        /// Owner uid
        #[arg(long)]
        user: String,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Delete a report
    Delete {
        /// Report ID
        id: String,

        /// Owner uid
        #[arg(long)]
        user: String,
    },
}

pub fn execute(cmd: ReportCommands, config: &AppConfig) -> Result<()> {
    let pool = a11y_db::init_pool(&config.database_path)
        .with_context(|| format!("Failed to open database at {}", config.database_path.display()))?;

    match cmd {
        ReportCommands::List { user } => {
            let reports = report::list_user_reports(&pool, &user)?;
            output::print_reports_table(&reports);
        }
        ReportCommands::Show { id, user, json } => {
            let found = report::get_user_report(&pool, &id, &user)?
                .ok_or_else(|| anyhow::anyhow!("Report {} not found for user '{}'", id, user))?;
            if json {
                println!("{}", serde_json::to_string_pretty(&found)?);
            } else {
                output::print_report(&found);
            }
        }
        ReportCommands::Delete { id, user } => {
            report::delete_user_report(&pool, &id, &user)?;
            println!("{} Deleted report {}", "✓".green().bold(), id.dimmed());
        }
    }

    Ok(())
}
