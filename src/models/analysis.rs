//! Proxy endpoint data models

use crate::verdict::Verdict;
use serde::{Deserialize, Serialize};

/// Body posted to the analyze endpoint.
///
/// Both fields are optional at the serde level so a missing field becomes a
/// 400 with a specific message instead of a parse error. Unknown fields are
/// ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AnalyzeNewsRequest {
    #[serde(default)]
    pub news: Option<String>,
    #[serde(default, rename = "apiType")]
    pub api_type: Option<String>,
}

/// Success body, and also the body of 500 responses
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzeNewsResponse {
    pub analysis: String,
    #[serde(default, skip_serializing_if = "Option::is_none", skip_deserializing)]
    pub verdict: Option<Verdict>,
}

impl AnalyzeNewsResponse {
    pub fn new(analysis: impl Into<String>) -> Self {
        Self {
            analysis: analysis.into(),
            verdict: None,
        }
    }
}

/// 400 body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}
