//! Gemini provider implementation

use crate::core::config::ProviderSettings;
use crate::core::constants::{prompt, role};
use crate::core::provider::{Provider, ProviderKind, ProxyError};
use crate::models::gemini::{
    GeminiContent, GeminiGenerationConfig, GeminiPart, GeminiRequest, GeminiResponse,
};
use reqwest::{Client, RequestBuilder};
use serde_json::Value;

/// Google Gemini `generateContent` provider.
///
/// The key travels as the `key` query parameter, so request URLs must never
/// be logged.
pub struct GeminiProvider {
    api_key: Option<String>,
    settings: ProviderSettings,
}

impl GeminiProvider {
    pub fn new(api_key: Option<String>, settings: ProviderSettings) -> Self {
        Self { api_key, settings }
    }

    /// Get the endpoint URL for the configured model, without the key
    fn endpoint_url(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.settings.base_url.trim_end_matches('/'),
            self.settings.model
        )
    }

    /// The instruction and the quoted news go in a single user turn
    fn build_payload(&self, text: &str) -> GeminiRequest {
        GeminiRequest {
            contents: vec![GeminiContent {
                role: Some(role::USER.to_string()),
                parts: vec![GeminiPart {
                    text: Some(format!("{}:\n\n\"{}\"", prompt::GEMINI_INSTRUCTION, text)),
                }],
            }],
            generation_config: GeminiGenerationConfig {
                temperature: self.settings.temperature,
                max_output_tokens: self.settings.max_output_tokens,
            },
        }
    }
}

impl Provider for GeminiProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Gemini
    }

    fn has_credential(&self) -> bool {
        self.api_key.is_some()
    }

    fn build_request(&self, client: &Client, text: &str) -> Result<RequestBuilder, ProxyError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(ProxyError::MissingCredential(ProviderKind::Gemini))?;

        Ok(client
            .post(self.endpoint_url())
            .query(&[("key", api_key)])
            .header("Content-Type", "application/json")
            .json(&self.build_payload(text)))
    }

    fn extract_text(&self, body: Value) -> Option<String> {
        serde_json::from_value::<GeminiResponse>(body)
            .ok()?
            .first_text()
    }
}
