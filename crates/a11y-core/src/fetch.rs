//! Page retrieval.

use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;
use url::Url;

use crate::error::{A11yError, A11yResult};

const USER_AGENT: &str = concat!("a11y-analyzer/", env!("CARGO_PKG_VERSION"));

/// Parse and check a user-supplied page URL. Only absolute http(s) URLs
/// with a host are accepted.
pub fn validate_url(raw: &str) -> A11yResult<Url> {
    let url = Url::parse(raw.trim()).map_err(|e| A11yError::InvalidUrl(format!("{}: {}", raw, e)))?;

    match url.scheme() {
        "http" | "https" => {}
        other => {
            return Err(A11yError::InvalidUrl(format!(
                "{}: unsupported scheme '{}'",
                raw, other
            )))
        }
    }
    if url.host_str().is_none_or(str::is_empty) {
        return Err(A11yError::InvalidUrl(format!("{}: missing host", raw)));
    }
    Ok(url)
}

/// Source of page HTML.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, url: &Url) -> A11yResult<String>;
}

/// Fetches pages over HTTP(S).
#[derive(Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new(timeout: Duration) -> A11yResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()
            .map_err(|e| A11yError::config(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self { client })
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &Url) -> A11yResult<String> {
        let fetch_error = |e: reqwest::Error| A11yError::Fetch {
            url: url.to_string(),
            message: e.to_string(),
        };

        let response = self
            .client
            .get(url.clone())
            .header(reqwest::header::ACCEPT, "text/html,application/xhtml+xml;q=0.9,*/*;q=0.8")
            .send()
            .await
            .map_err(fetch_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(A11yError::FetchStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.text().await.map_err(fetch_error)?;
        debug!(%url, bytes = body.len(), "Fetched page");
        Ok(body)
    }
}
