//! API endpoint handlers
//!
//! This module implements the HTTP endpoints of the news analysis proxy:
//! the analyze endpoint, a service banner and a health check.

use crate::core::config::Config;
use crate::core::constants::{message, path};
use crate::core::gateway::{Analyzer, validate_request};
use crate::core::provider::{ProviderKind, ProxyError};
use crate::models::analysis::{AnalyzeNewsRequest, AnalyzeNewsResponse, ErrorResponse};
use crate::verdict::Classifier;
use axum::{
    Json, Router,
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub analyzer: Arc<dyn Analyzer>,
    pub classifier: Arc<Classifier>,
}

/// Create the API router with all endpoints.
///
/// The analyze routes only accept POST; other methods get a 405 from the
/// method router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route(path::ANALYZE_NEWS, post(analyze_news))
        .route(path::ANALYZE_NEWS_SHORT, post(analyze_news))
        .route(path::HEALTH, get(health_check))
        .with_state(state)
}

fn client_error(message: impl Into<String>) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
        .into_response()
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        match self {
            ProxyError::InvalidInput(message) => client_error(message),
            other => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(AnalyzeNewsResponse::new(format!(
                    "{}: {}",
                    message::INTERNAL_ERROR_PREFIX,
                    other
                ))),
            )
                .into_response(),
        }
    }
}

/// POST /.netlify/functions/analyze-news - Analyze news text
///
/// The body is parsed by hand so a malformed payload yields a 400 with the
/// proxy's own error shape regardless of the Content-Type header.
async fn analyze_news(State(state): State<AppState>, body: Bytes) -> Response {
    let request_id = uuid::Uuid::new_v4().to_string();

    let request: AnalyzeNewsRequest = match serde_json::from_slice(&body) {
        Ok(request) => request,
        Err(e) => {
            warn!(%request_id, "Rejected malformed JSON body: {}", e);
            return client_error(message::INVALID_JSON);
        }
    };

    let (news, provider) =
        match validate_request(request.news.as_deref(), request.api_type.as_deref()) {
            Ok(valid) => valid,
            Err(e) => {
                warn!(%request_id, api_type = ?request.api_type, "Rejected request: {}", e);
                return e.into_response();
            }
        };

    info!(%request_id, provider = %provider, "📥 Incoming analysis request");

    match state.analyzer.analyze(news, provider).await {
        Ok(analysis) => {
            let verdict = state
                .config
                .attach_verdict
                .then(|| state.classifier.classify(&analysis));
            if let Some(v) = &verdict {
                debug!(%request_id, label = v.label.as_str(), confidence = v.confidence, "Classified analysis");
            }
            Json(AnalyzeNewsResponse { analysis, verdict }).into_response()
        }
        Err(e) => e.into_response(),
    }
}

/// GET / - Root endpoint
async fn root(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({
        "message": format!("News Verdict Proxy v{}", env!("CARGO_PKG_VERSION")),
        "status": "running",
        "providers": {
            "gemini": {
                "model": state.config.gemini.model,
                "api_key_configured": state.analyzer.is_configured(ProviderKind::Gemini),
            },
            "perplexity": {
                "model": state.config.perplexity.model,
                "api_key_configured": state.analyzer.is_configured(ProviderKind::Perplexity),
            },
        },
        "confidence_ranges": state.classifier.ranges(),
        "endpoints": {
            "analyze": path::ANALYZE_NEWS,
            "analyze_short": path::ANALYZE_NEWS_SHORT,
            "health": path::HEALTH,
        },
    }))
}

/// GET /health - Health check endpoint
async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "gemini_configured": state.analyzer.is_configured(ProviderKind::Gemini),
        "perplexity_configured": state.analyzer.is_configured(ProviderKind::Perplexity),
    }))
}
