//! AI fix suggestions via the Gemini `generateContent` API.
//!
//! The model is asked for a JSON object with `short_fix` and `detailed_fix`
//! keys, enforced through a response schema.

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use tracing::debug;

use crate::config::AppConfig;
use crate::error::{A11yError, A11yResult};
use crate::model::AiSuggestion;

/// Produces remediation advice for an issue.
#[async_trait]
pub trait SuggestionProvider: Send + Sync {
    async fn suggest(&self, description: &str, help: &str, html: &str) -> A11yResult<AiSuggestion>;
}

/// Gemini API client.
#[derive(Clone)]
pub struct GeminiClient {
    base_url: String,
    model: String,
    api_key: String,
    client: reqwest::Client,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Deserialize)]
struct Part {
    text: Option<String>,
}

impl GeminiClient {
    pub fn new(base_url: &str, model: &str, api_key: &str) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .unwrap_or_default();

        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            api_key: api_key.to_string(),
            client,
        }
    }

    /// Client from configuration, or `None` when no API key is set.
    pub fn from_config(config: &AppConfig) -> Option<Self> {
        config
            .gemini_api_key
            .as_deref()
            .map(|key| Self::new(&config.gemini_base_url, &config.gemini_model, key))
    }

    fn prompt(description: &str, help: &str, html: &str) -> String {
        format!(
            "You are an expert web accessibility consultant. Give a concise \"short fix\" and a \
             step-by-step \"detailed fix\" for the accessibility issue below. Be professional and \
             action-oriented, and reference the element where useful.\n\n\
             Accessibility issue: {description}\n\
             Why it matters: {help}\n\
             Offending HTML: `{html}`\n\n\
             Respond with a JSON object with exactly two string keys: \"short_fix\" and \"detailed_fix\"."
        )
    }

    /// Request a suggestion and parse the first usable candidate part.
    pub async fn generate(&self, description: &str, help: &str, html: &str) -> Result<AiSuggestion> {
        let payload = json!({
            "contents": [{
                "role": "user",
                "parts": [{ "text": Self::prompt(description, help, html) }]
            }],
            "generationConfig": {
                "responseMimeType": "application/json",
                "responseSchema": {
                    "type": "OBJECT",
                    "properties": {
                        "short_fix": { "type": "STRING" },
                        "detailed_fix": { "type": "STRING" }
                    },
                    "required": ["short_fix", "detailed_fix"]
                }
            }
        });

        let response = self
            .client
            .post(format!(
                "{}/v1beta/models/{}:generateContent",
                self.base_url, self.model
            ))
            .query(&[("key", self.api_key.as_str())])
            .json(&payload)
            .send()
            .await
            .context("Failed to connect to Gemini")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Gemini API error ({}): {}", status, body);
        }

        let result: GenerateResponse = response
            .json()
            .await
            .context("Failed to parse Gemini response")?;

        let parts = result
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|c| c.parts)
            .unwrap_or_default();

        for text in parts.into_iter().filter_map(|p| p.text) {
            match serde_json::from_str::<AiSuggestion>(&text) {
                Ok(suggestion) => {
                    debug!(short_fix = %suggestion.short_fix, "Received AI suggestion");
                    return Ok(suggestion);
                }
                Err(e) => debug!(error = %e, "Skipping unusable Gemini part"),
            }
        }

        anyhow::bail!("Gemini response contained no suggestion with short_fix and detailed_fix")
    }
}

#[async_trait]
impl SuggestionProvider for GeminiClient {
    async fn suggest(&self, description: &str, help: &str, html: &str) -> A11yResult<AiSuggestion> {
        self.generate(description, help, html)
            .await
            .map_err(|e| A11yError::Suggestion(format!("{:#}", e)))
    }
}
