//! Constants for prompts, provider defaults and wire messages
//!
//! This module defines the fixed strings shared by the gateway, the HTTP
//! endpoints and the command-line client.

/// Message role constants
pub mod role {
    /// User role identifier
    pub const USER: &str = "user";

    /// System role identifier
    pub const SYSTEM: &str = "system";
}

/// Instruction prompts sent to the upstream models
pub mod prompt {
    /// Prefix placed in front of the quoted news text for Gemini
    pub const GEMINI_INSTRUCTION: &str = "Analyze the following news text for authenticity, bias, and factual accuracy. Provide a concise summary and clearly state if it's \"likely real,\" \"likely fake,\" or \"uncertain.\" Also mention the basis of your conclusion in a simple, direct manner. Keep the response to max 200 words.";

    /// System message for Perplexity chat completions
    pub const PERPLEXITY_SYSTEM: &str = "You are a helpful AI assistant specialized in news analysis. Analyze the provided text for authenticity, bias, and factual accuracy. Provide a concise summary and clearly state if it's 'likely real,' 'likely fake,' or 'uncertain.' Briefly explain your reasoning. Keep the response to max 200 words.";
}

/// Client-facing messages
pub mod message {
    pub const INVALID_JSON: &str = "Invalid JSON payload";
    pub const NEWS_REQUIRED: &str = "News text is required.";
    pub const INVALID_API_TYPE: &str = "Invalid API type specified.";

    /// Placeholder returned when the upstream envelope carries no text
    pub const NO_ANALYSIS: &str = "No analysis available";

    /// Prefix of every 500 body
    pub const INTERNAL_ERROR_PREFIX: &str = "Internal server error";
}

/// Upstream defaults
pub mod defaults {
    pub const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
    pub const GEMINI_MODEL: &str = "gemini-2.0-flash";

    pub const PERPLEXITY_BASE_URL: &str = "https://api.perplexity.ai";
    pub const PERPLEXITY_MODEL: &str = "sonar-small-chat";

    pub const TEMPERATURE: f32 = 0.7;
    pub const MAX_OUTPUT_TOKENS: u32 = 200;
}

/// Environment variables holding provider secrets
pub mod env {
    pub const GEMINI_API_KEY: &str = "GEMINI_API_KEY";
    pub const PERPLEXITY_API_KEY: &str = "PERPLEXITY_API_KEY";
}

/// HTTP route paths
pub mod path {
    /// Path the browser form posts to
    pub const ANALYZE_NEWS: &str = "/.netlify/functions/analyze-news";

    /// Short alias of [`ANALYZE_NEWS`]
    pub const ANALYZE_NEWS_SHORT: &str = "/analyze-news";

    pub const HEALTH: &str = "/health";
}
