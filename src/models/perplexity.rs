//! Perplexity chat-completions data models

use serde::{Deserialize, Serialize};

/// Chat message, used in both directions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PerplexityMessage {
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub content: Option<String>,
}

/// Chat completion request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PerplexityRequest {
    pub model: String,
    pub messages: Vec<PerplexityMessage>,
    pub temperature: f32,
    pub max_tokens: u32,
}

/// Chat completion response, tolerant of missing fields
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PerplexityResponse {
    #[serde(default)]
    pub choices: Vec<PerplexityChoice>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PerplexityChoice {
    #[serde(default)]
    pub message: Option<PerplexityMessage>,
}

impl PerplexityResponse {
    /// `choices[0].message.content`
    pub fn first_content(self) -> Option<String> {
        self.choices.into_iter().next()?.message?.content
    }
}
