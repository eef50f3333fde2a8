//! Analysis gateway
//!
//! Validates an analysis request, sends exactly one upstream call to the
//! selected provider and turns the reply into analysis text. There is no
//! retry, backoff or caching: every failure is reported to the caller once.

use crate::core::config::Config;
use crate::core::constants::message;
use crate::core::provider::{Provider, ProviderKind, ProxyError};
use crate::core::providers::{GeminiProvider, PerplexityProvider};
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode, redirect};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// Something that can turn news text into provider analysis text
#[async_trait]
pub trait Analyzer: Send + Sync {
    /// Run one analysis against `provider`
    async fn analyze(&self, text: &str, provider: ProviderKind) -> Result<String, ProxyError>;

    /// Whether `provider` has a credential configured
    fn is_configured(&self, provider: ProviderKind) -> bool;
}

/// Validate raw request fields in wire order: text first, then provider.
///
/// # Errors
///
/// Returns [`ProxyError::InvalidInput`] for missing or blank text and for a
/// missing or unknown provider selector.
pub fn validate_request<'a>(
    news: Option<&'a str>,
    api_type: Option<&str>,
) -> Result<(&'a str, ProviderKind), ProxyError> {
    let news = news
        .filter(|n| !n.trim().is_empty())
        .ok_or_else(|| ProxyError::InvalidInput(message::NEWS_REQUIRED.to_string()))?;

    let provider = api_type
        .and_then(ProviderKind::from_api_type)
        .ok_or_else(|| ProxyError::InvalidInput(message::INVALID_API_TYPE.to_string()))?;

    Ok((news, provider))
}

/// Pull a human-readable message out of an upstream error body.
///
/// An empty body falls back to the status's canonical reason.
fn upstream_error_message(status: StatusCode, body: &str) -> String {
    let message = serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| {
            v.get("error")
                .and_then(|e| e.get("message"))
                .and_then(Value::as_str)
                .map(|m| m.trim().to_string())
        })
        .unwrap_or_else(|| body.trim().to_string());

    if message.is_empty() {
        status
            .canonical_reason()
            .unwrap_or("Unknown error")
            .to_string()
    } else {
        message
    }
}

/// HTTP gateway to the Gemini and Perplexity APIs
pub struct Gateway {
    client: Client,
    gemini: GeminiProvider,
    perplexity: PerplexityProvider,
    timeout: Duration,
}

impl Gateway {
    /// Create a gateway from configuration
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client cannot be built.
    pub fn new(config: &Config) -> Result<Self> {
        let timeout = Duration::from_secs(config.request_timeout);
        let client = Client::builder()
            .timeout(timeout)
            // A redirect would be a second outbound call
            .redirect(redirect::Policy::none())
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            gemini: GeminiProvider::new(config.gemini_api_key.clone(), config.gemini.clone()),
            perplexity: PerplexityProvider::new(
                config.perplexity_api_key.clone(),
                config.perplexity.clone(),
            ),
            timeout,
        })
    }

    fn provider(&self, kind: ProviderKind) -> &dyn Provider {
        match kind {
            ProviderKind::Gemini => &self.gemini,
            ProviderKind::Perplexity => &self.perplexity,
        }
    }

    /// Map a reqwest failure without leaking the URL, which may carry a key
    fn transport_error(&self, kind: ProviderKind, err: reqwest::Error) -> ProxyError {
        let message = if err.is_timeout() {
            format!("request timed out after {}s", self.timeout.as_secs())
        } else {
            err.without_url().to_string()
        };
        ProxyError::Transport {
            provider: kind,
            message,
        }
    }

    async fn send(&self, provider: &dyn Provider, text: &str) -> Result<String, ProxyError> {
        let kind = provider.kind();
        let request = provider.build_request(&self.client, text)?;

        let response = request
            .send()
            .await
            .map_err(|e| self.transport_error(kind, e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| self.transport_error(kind, e))?;

        if !status.is_success() {
            error!(
                provider = %kind,
                status = status.as_u16(),
                body = %body,
                "Upstream API error"
            );
            return Err(ProxyError::Upstream {
                provider: kind,
                status: status.as_u16(),
                message: upstream_error_message(status, &body),
            });
        }

        let value: Value = serde_json::from_str(&body).map_err(|e| {
            error!(provider = %kind, body = %body, "Upstream returned invalid JSON: {}", e);
            ProxyError::InvalidResponse {
                provider: kind,
                message: e.to_string(),
            }
        })?;

        match provider.extract_text(value).filter(|t| !t.is_empty()) {
            Some(text) => Ok(text),
            None => {
                warn!(provider = %kind, body = %body, "No completion text in upstream response");
                Ok(message::NO_ANALYSIS.to_string())
            }
        }
    }
}

#[async_trait]
impl Analyzer for Gateway {
    async fn analyze(&self, text: &str, provider: ProviderKind) -> Result<String, ProxyError> {
        if text.trim().is_empty() {
            return Err(ProxyError::InvalidInput(message::NEWS_REQUIRED.to_string()));
        }

        info!(provider = %provider, chars = text.chars().count(), "Analyzing news text");

        let result = self.send(self.provider(provider), text).await;
        match &result {
            Ok(analysis) => debug!(provider = %provider, chars = analysis.len(), "Analysis received"),
            Err(ProxyError::MissingCredential(_)) => {
                error!(provider = %provider, "API key not configured")
            }
            Err(e) => error!(provider = %provider, "Analysis failed: {}", e),
        }
        result
    }

    fn is_configured(&self, provider: ProviderKind) -> bool {
        self.provider(provider).has_credential()
    }
}
