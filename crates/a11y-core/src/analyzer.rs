//! Analysis pipeline: fetch, run rules, attach suggestions.

use futures::stream::{self, StreamExt};
use std::sync::Arc;
use tracing::{info, warn};
use url::Url;

use crate::config::AppConfig;
use crate::document::Document;
use crate::error::A11yResult;
use crate::fetch::{HttpFetcher, PageFetcher};
use crate::model::Issue;
use crate::rules::RuleSet;
use crate::suggest::{GeminiClient, SuggestionProvider};

/// Outcome of analysing one page.
#[derive(Debug, Clone)]
pub struct PageAnalysis {
    pub issues: Vec<Issue>,
    pub html: String,
    /// Trimmed `<title>`, or `"N/A"`.
    pub title: String,
}

pub struct Analyzer {
    fetcher: Arc<dyn PageFetcher>,
    suggester: Option<Arc<dyn SuggestionProvider>>,
    rules: RuleSet,
    ai_concurrency: usize,
}

impl Analyzer {
    pub fn new(fetcher: Arc<dyn PageFetcher>) -> Self {
        Self {
            fetcher,
            suggester: None,
            rules: RuleSet::default(),
            ai_concurrency: 4,
        }
    }

    /// HTTP fetcher plus Gemini suggestions when an API key is configured.
    pub fn from_config(config: &AppConfig) -> A11yResult<Self> {
        let fetcher = HttpFetcher::new(config.fetch_timeout)?;
        let mut analyzer = Self::new(Arc::new(fetcher)).with_concurrency(config.ai_concurrency);

        match GeminiClient::from_config(config) {
            Some(client) => analyzer = analyzer.with_suggestions(Arc::new(client)),
            None => warn!("GEMINI_API_KEY is not set; reports will carry built-in suggestions only"),
        }
        Ok(analyzer)
    }

    pub fn with_suggestions(mut self, provider: Arc<dyn SuggestionProvider>) -> Self {
        self.suggester = Some(provider);
        self
    }

    pub fn without_suggestions(mut self) -> Self {
        self.suggester = None;
        self
    }

    pub fn with_rules(mut self, rules: RuleSet) -> Self {
        self.rules = rules;
        self
    }

    pub fn with_concurrency(mut self, limit: usize) -> Self {
        self.ai_concurrency = limit.max(1);
        self
    }

    pub fn has_suggestions(&self) -> bool {
        self.suggester.is_some()
    }

    /// Fetch a page and analyse it.
    pub async fn analyze_url(&self, url: &Url) -> A11yResult<PageAnalysis> {
        info!(%url, "Starting analysis");
        let html = self.fetcher.fetch(url).await?;
        let analysis = self.analyze_html(html).await;
        info!(%url, issues = analysis.issues.len(), "Analysis finished");
        Ok(analysis)
    }

    /// Analyse markup that is already in hand.
    pub async fn analyze_html(&self, html: String) -> PageAnalysis {
        let (issues, title) = self.inspect(&html);
        let issues = self.enrich(issues).await;
        PageAnalysis { issues, html, title }
    }

    /// Parsing stays out of the async path: the parsed tree is not `Send`.
    fn inspect(&self, html: &str) -> (Vec<Issue>, String) {
        let doc = Document::parse(html);
        let title = doc.title().unwrap_or_else(|| "N/A".to_string());
        (self.rules.check(&doc), title)
    }

    /// Replace built-in suggestions with AI ones, keeping issue order. A
    /// failed request leaves the built-in suggestion in place.
    async fn enrich(&self, issues: Vec<Issue>) -> Vec<Issue> {
        let Some(provider) = &self.suggester else {
            return issues;
        };

        stream::iter(issues.into_iter().map(|mut issue| {
            let provider = Arc::clone(provider);
            async move {
                match provider
                    .suggest(&issue.description, &issue.help, issue.primary_html())
                    .await
                {
                    Ok(suggestion) => issue.ai_suggestions = Some(suggestion),
                    Err(e) => warn!(issue = %issue.id, error = %e, "Keeping built-in suggestion"),
                }
                issue
            }
        }))
        .buffered(self.ai_concurrency)
        .collect()
        .await
    }
}
