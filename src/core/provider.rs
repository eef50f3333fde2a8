//! Provider abstraction layer for the upstream analysis APIs
//!
//! Each vendor implements [`Provider`]: it knows how to turn news text into
//! an outbound HTTP request and how to pull the analysis text back out of
//! the vendor's response envelope. Sending, status handling and fallbacks
//! are shared by the gateway.

use reqwest::{Client, RequestBuilder};
use serde_json::Value;
use std::fmt;
use thiserror::Error;

/// Error types for gateway operations
#[derive(Debug, Error)]
pub enum ProxyError {
    /// Rejected before any upstream call
    #[error("{0}")]
    InvalidInput(String),

    #[error("{} API Key not configured.", .0.display_name())]
    MissingCredential(ProviderKind),

    #[error("{} API responded with status {status}: {message}", .provider.display_name())]
    Upstream {
        provider: ProviderKind,
        status: u16,
        message: String,
    },

    #[error("Failed to parse {} response: {message}", .provider.display_name())]
    InvalidResponse {
        provider: ProviderKind,
        message: String,
    },

    #[error("{} request failed: {message}", .provider.display_name())]
    Transport {
        provider: ProviderKind,
        message: String,
    },
}

/// Supported providers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderKind {
    Gemini,
    Perplexity,
}

impl ProviderKind {
    pub const ALL: [ProviderKind; 2] = [ProviderKind::Gemini, ProviderKind::Perplexity];

    /// Parse the `apiType` wire value. Only the exact lowercase literals match.
    pub fn from_api_type(s: &str) -> Option<Self> {
        match s {
            "gemini" => Some(ProviderKind::Gemini),
            "perplexity" => Some(ProviderKind::Perplexity),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::Gemini => "gemini",
            ProviderKind::Perplexity => "perplexity",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            ProviderKind::Gemini => "Gemini",
            ProviderKind::Perplexity => "Perplexity",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-vendor request building and response extraction
pub trait Provider: Send + Sync {
    fn kind(&self) -> ProviderKind;

    /// Whether an API key is available
    fn has_credential(&self) -> bool;

    /// Build the outbound request for `text`.
    ///
    /// # Errors
    ///
    /// Returns [`ProxyError::MissingCredential`] when no key is configured.
    fn build_request(&self, client: &Client, text: &str) -> Result<RequestBuilder, ProxyError>;

    /// Extract the first completion text from a successful response body
    fn extract_text(&self, body: Value) -> Option<String>;
}
