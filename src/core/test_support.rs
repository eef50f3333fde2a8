//! Shared test helpers: an in-process mock upstream and config builders

use crate::core::config::Config;
use axum::Router;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, HeaderValue, StatusCode, Uri, header};
use axum::response::{IntoResponse, Response};
use serde_json::Value;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;
use tokio::sync::oneshot;

#[derive(Default)]
struct Recorded {
    uri: Option<String>,
    authorization: Option<String>,
    body: Option<Value>,
}

struct MockState {
    hits: AtomicUsize,
    status: StatusCode,
    body: String,
    location: Option<String>,
    recorded: Mutex<Recorded>,
}

/// Answers every request with a canned status and body, recording the last
/// request it saw. Shut down on drop.
pub struct MockUpstream {
    addr: SocketAddr,
    state: Arc<MockState>,
    shutdown: Option<oneshot::Sender<()>>,
}

async fn record_and_reply(
    State(state): State<Arc<MockState>>,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    state.hits.fetch_add(1, Ordering::SeqCst);
    {
        let mut recorded = state.recorded.lock().unwrap();
        recorded.uri = Some(uri.to_string());
        recorded.authorization = headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        recorded.body = serde_json::from_slice(&body).ok();
    }
    let mut response = (
        state.status,
        [("content-type", "application/json")],
        state.body.clone(),
    )
        .into_response();
    if let Some(location) = state.location.as_deref().and_then(|l| l.parse::<HeaderValue>().ok()) {
        response.headers_mut().insert(header::LOCATION, location);
    }
    response
}

impl MockUpstream {
    pub async fn spawn(status: StatusCode, body: Value) -> Self {
        Self::spawn_raw(status, &body.to_string()).await
    }

    pub async fn spawn_raw(status: StatusCode, body: &str) -> Self {
        Self::start(status, body, None).await
    }

    /// Answers every request with a 302 pointing at `location`
    pub async fn spawn_redirect(location: &str) -> Self {
        Self::start(StatusCode::FOUND, "", Some(location.to_string())).await
    }

    async fn start(status: StatusCode, body: &str, location: Option<String>) -> Self {
        let state = Arc::new(MockState {
            hits: AtomicUsize::new(0),
            status,
            body: body.to_string(),
            location,
            recorded: Mutex::new(Recorded::default()),
        });

        let app = Router::new()
            .fallback(record_and_reply)
            .with_state(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind should succeed");
        let addr = listener.local_addr().expect("local_addr should succeed");

        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        tokio::spawn(async move {
            let _ = axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    let _ = shutdown_rx.await;
                })
                .await;
        });

        Self {
            addr,
            state,
            shutdown: Some(shutdown_tx),
        }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn hits(&self) -> usize {
        self.state.hits.load(Ordering::SeqCst)
    }

    pub fn last_uri(&self) -> Option<String> {
        self.state.recorded.lock().unwrap().uri.clone()
    }

    pub fn last_authorization(&self) -> Option<String> {
        self.state.recorded.lock().unwrap().authorization.clone()
    }

    pub fn last_body(&self) -> Option<Value> {
        self.state.recorded.lock().unwrap().body.clone()
    }
}

impl Drop for MockUpstream {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
    }
}

/// Config pointing both providers at `base_url`. Gemini is served under
/// `/v1beta` to mirror the real path layout.
pub fn test_config(
    base_url: &str,
    gemini_key: Option<&str>,
    perplexity_key: Option<&str>,
) -> Config {
    test_config_with(base_url, gemini_key, perplexity_key, "")
}

/// Like [`test_config`] with extra TOML appended
pub fn test_config_with(
    base_url: &str,
    gemini_key: Option<&str>,
    perplexity_key: Option<&str>,
    extra_toml: &str,
) -> Config {
    let toml = format!(
        r#"
        [request]
        request_timeout = 5

        [gemini]
        base_url = "{base_url}/v1beta"

        [perplexity]
        base_url = "{base_url}"

        {extra_toml}
        "#
    );
    let gemini_key = gemini_key.map(str::to_string);
    let perplexity_key = perplexity_key.map(str::to_string);

    Config::from_toml_str(&toml, move |name| match name {
        "GEMINI_API_KEY" => gemini_key.clone(),
        "PERPLEXITY_API_KEY" => perplexity_key.clone(),
        _ => None,
    })
    .expect("test config should load")
}
