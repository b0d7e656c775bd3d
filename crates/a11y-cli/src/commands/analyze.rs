//! Local page analysis.

use a11y_core::analyzer::{Analyzer, PageAnalysis};
use a11y_core::config::AppConfig;
use a11y_core::fetch::{validate_url, HttpFetcher};
use a11y_core::report::build_report;
use a11y_core::suggest::GeminiClient;
use anyhow::{Context, Result};
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use crate::output;

/// Owner recorded on reports produced by the CLI.
const LOCAL_USER: &str = "local";

#[derive(Args)]
pub struct AnalyzeArgs {
    /// Page URL or path to an HTML file
    pub target: String,

    /// Print the full report as JSON
    #[arg(long)]
    pub json: bool,

    /// Request AI fix suggestions (needs GEMINI_API_KEY)
    #[arg(long)]
    pub ai: bool,
}

fn build_analyzer(config: &AppConfig, ai: bool) -> Result<Analyzer> {
    let fetcher = HttpFetcher::new(config.fetch_timeout)?;
    let analyzer = Analyzer::new(Arc::new(fetcher)).with_concurrency(config.ai_concurrency);

    if !ai {
        return Ok(analyzer);
    }
    let client = GeminiClient::from_config(config)
        .ok_or_else(|| anyhow::anyhow!("--ai requires GEMINI_API_KEY to be set"))?;
    Ok(analyzer.with_suggestions(Arc::new(client)))
}

fn spinner(message: String, hidden: bool) -> Result<ProgressBar> {
    if hidden {
        return Ok(ProgressBar::hidden());
    }
    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::with_template("{spinner:.cyan} {msg}")?);
    pb.set_message(message);
    pb.enable_steady_tick(Duration::from_millis(100));
    Ok(pb)
}

pub async fn execute(args: AnalyzeArgs, config: &AppConfig) -> Result<()> {
    let analyzer = build_analyzer(config, args.ai)?;
    let pb = spinner(format!("Analyzing {}", args.target), args.json)?;

    let path = Path::new(&args.target);
    let (source, analysis): (String, PageAnalysis) = if path.is_file() {
        let html = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        (path.display().to_string(), analyzer.analyze_html(html).await)
    } else {
        let url = validate_url(&args.target)?;
        let analysis = analyzer.analyze_url(&url).await.inspect_err(|_| pb.finish_and_clear())?;
        (url.to_string(), analysis)
    };
    pb.finish_and_clear();

    let report = build_report(&source, LOCAL_USER, &analysis);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        output::print_report(&report);
    }
    Ok(())
}
