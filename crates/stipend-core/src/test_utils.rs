//! Test utilities for stipend-core
//!
//! A mock OpenAI-compatible server for exercising the remote advice path
//! (success, error status, slow responses) without network access.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    extract::{Json, State},
    http::{header, HeaderMap, StatusCode},
    routing::{get, post},
    Router,
};
use serde_json::{json, Value};
use tokio::sync::oneshot;

struct MockState {
    reply: String,
    status: StatusCode,
    delay: Option<Duration>,
    last_authorization: Mutex<Option<String>>,
    requests: Mutex<Vec<Value>>,
}

/// Mock chat completions server on an ephemeral port
pub struct MockAdviceServer {
    addr: SocketAddr,
    state: Arc<MockState>,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl MockAdviceServer {
    /// Start a server that answers "Mock advice."
    pub async fn start() -> Self {
        Self::spawn("Mock advice.", StatusCode::OK, None).await
    }

    pub async fn with_reply(reply: &str) -> Self {
        Self::spawn(reply, StatusCode::OK, None).await
    }

    /// Every completion request fails with 500
    pub async fn failing() -> Self {
        Self::spawn("", StatusCode::INTERNAL_SERVER_ERROR, None).await
    }

    /// Answer only after `delay`
    pub async fn delayed(reply: &str, delay: Duration) -> Self {
        Self::spawn(reply, StatusCode::OK, Some(delay)).await
    }

    async fn spawn(reply: &str, status: StatusCode, delay: Option<Duration>) -> Self {
        let state = Arc::new(MockState {
            reply: reply.to_string(),
            status,
            delay,
            last_authorization: Mutex::new(None),
            requests: Mutex::new(Vec::new()),
        });

        let app = Router::new()
            .route("/v1/models", get(handle_models))
            .route("/v1/chat/completions", post(handle_completions))
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let (shutdown_tx, shutdown_rx) = oneshot::channel();

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    shutdown_rx.await.ok();
                })
                .await
                .unwrap();
        });

        Self {
            addr,
            state,
            shutdown_tx: Some(shutdown_tx),
        }
    }

    /// Base URL for this mock server
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Authorization header of the most recent completion request
    pub fn last_authorization(&self) -> Option<String> {
        self.state.last_authorization.lock().unwrap().clone()
    }

    /// JSON bodies of all completion requests received so far
    pub fn requests(&self) -> Vec<Value> {
        self.state.requests.lock().unwrap().clone()
    }

    pub fn stop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

impl Drop for MockAdviceServer {
    fn drop(&mut self) {
        self.stop();
    }
}

async fn handle_models() -> Json<Value> {
    Json(json!({
        "object": "list",
        "data": [{"id": "gpt-test", "object": "model"}]
    }))
}

async fn handle_completions(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Json(request): Json<Value>,
) -> (StatusCode, Json<Value>) {
    let auth = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    *state.last_authorization.lock().unwrap() = auth;
    state.requests.lock().unwrap().push(request.clone());

    if let Some(delay) = state.delay {
        tokio::time::sleep(delay).await;
    }

    if !state.status.is_success() {
        return (
            state.status,
            Json(json!({"error": {"message": "mock failure"}})),
        );
    }

    let model = request["model"].as_str().unwrap_or("gpt-test");
    (
        StatusCode::OK,
        Json(json!({
            "id": "chatcmpl-mock",
            "object": "chat.completion",
            "model": model,
            "choices": [{
                "index": 0,
                "message": {"role": "assistant", "content": state.reply},
                "finish_reason": "stop"
            }]
        })),
    )
}
