//! Perplexity provider implementation

use crate::core::config::ProviderSettings;
use crate::core::constants::{prompt, role};
use crate::core::provider::{Provider, ProviderKind, ProxyError};
use crate::models::perplexity::{PerplexityMessage, PerplexityRequest, PerplexityResponse};
use reqwest::{Client, RequestBuilder};
use serde_json::Value;

/// Perplexity chat-completions provider (bearer token auth)
pub struct PerplexityProvider {
    api_key: Option<String>,
    settings: ProviderSettings,
}

impl PerplexityProvider {
    pub fn new(api_key: Option<String>, settings: ProviderSettings) -> Self {
        Self { api_key, settings }
    }

    fn endpoint_url(&self) -> String {
        format!(
            "{}/chat/completions",
            self.settings.base_url.trim_end_matches('/')
        )
    }

    fn build_payload(&self, text: &str) -> PerplexityRequest {
        PerplexityRequest {
            model: self.settings.model.clone(),
            messages: vec![
                PerplexityMessage {
                    role: role::SYSTEM.to_string(),
                    content: Some(prompt::PERPLEXITY_SYSTEM.to_string()),
                },
                PerplexityMessage {
                    role: role::USER.to_string(),
                    content: Some(text.to_string()),
                },
            ],
            temperature: self.settings.temperature,
            max_tokens: self.settings.max_output_tokens,
        }
    }
}

impl Provider for PerplexityProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Perplexity
    }

    fn has_credential(&self) -> bool {
        self.api_key.is_some()
    }

    fn build_request(&self, client: &Client, text: &str) -> Result<RequestBuilder, ProxyError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(ProxyError::MissingCredential(ProviderKind::Perplexity))?;

        Ok(client
            .post(self.endpoint_url())
            .header("Content-Type", "application/json")
            .bearer_auth(api_key)
            .json(&self.build_payload(text)))
    }

    fn extract_text(&self, body: Value) -> Option<String> {
        serde_json::from_value::<PerplexityResponse>(body)
            .ok()?
            .first_content()
    }
}
