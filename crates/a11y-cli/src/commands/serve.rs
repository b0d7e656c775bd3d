//! API server command.

use a11y_core::analyzer::Analyzer;
use a11y_core::config::AppConfig;
use a11y_web::auth::firebase::FirebaseTokenValidator;
use a11y_web::AppState;
use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args)]
pub struct ServeArgs {
    /// Host to bind to
    #[arg(long, default_value = "0.0.0.0")]
    pub host: String,

    /// Port to listen on
    #[arg(long, default_value = "8000")]
    pub port: u16,

    /// Accept unauthenticated requests as the `anonymous` user
    #[arg(long)]
    pub no_auth: bool,

    /// Also write logs to a file
    #[arg(long)]
    pub log: bool,

    /// Log file path (default: .a11y/serve.log)
    #[arg(long, requires = "log")]
    pub log_file: Option<PathBuf>,
}

pub async fn execute(args: ServeArgs, config: &AppConfig) -> Result<()> {
    let pool = a11y_db::init_pool(&config.database_path)
        .with_context(|| format!("Failed to open database at {}", config.database_path.display()))?;
    let analyzer = Analyzer::from_config(config)?;

    let mut state = AppState::new(Arc::new(pool), Arc::new(analyzer)).with_cache_ttl(config.cache_ttl);

    if !args.no_auth {
        let project_id = config.firebase_project_id.as_deref().ok_or_else(|| {
            anyhow::anyhow!(
                "Firebase is not configured. Set FIREBASE_PROJECT_ID or FIREBASE_SERVICE_ACCOUNT_BASE64, or run with --no-auth."
            )
        })?;
        tracing::info!(project_id, "Verifying Firebase ID tokens");
        state = state.with_auth(Arc::new(FirebaseTokenValidator::new(project_id)));
    }

    println!();
    println!("  {} {}", "Accessibility Analyzer".cyan().bold(), "API Server".bold());
    println!();
    println!("  {}       http://{}:{}/api", "API".green(), args.host, args.port);
    println!("  {}  {}", "Database".green(), config.database_path.display());
    if args.no_auth {
        println!("  {}      {}", "Auth".yellow(), "disabled".yellow());
    }
    println!();
    println!("  {}", "Ctrl+C to stop".dimmed());
    println!();

    a11y_web::run_server(state, &config.cors_origins, &args.host, args.port).await
}
