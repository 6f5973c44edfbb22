//! Mock Gemini backend answering every `generateContent` call
//!
//! Returns a fixed JSON document as the candidate text, or fails with 500.

use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::{Json, Router};
use serde_json::{Value, json};
use tokio_util::sync::CancellationToken;

pub struct MockGemini {
    addr: SocketAddr,
    shutdown: CancellationToken,
    state: Arc<MockGeminiState>,
}

struct MockGeminiState {
    calls: AtomicU32,
    /// `None` answers every call with 500
    reply: Option<String>,
}

impl MockGemini {
    /// Answer every call with `reply` serialized as the model's text
    pub async fn start(reply: &Value) -> anyhow::Result<Self> {
        Self::start_inner(Some(reply.to_string())).await
    }

    /// Answer with text that is not JSON
    pub async fn start_with_text(text: &str) -> anyhow::Result<Self> {
        Self::start_inner(Some(text.to_owned())).await
    }

    /// Fail every call
    pub async fn start_failing() -> anyhow::Result<Self> {
        Self::start_inner(None).await
    }

    async fn start_inner(reply: Option<String>) -> anyhow::Result<Self> {
        let state = Arc::new(MockGeminiState {
            calls: AtomicU32::new(0),
            reply,
        });

        // Model ids share a path segment with the `:generateContent` verb
        let app = Router::new().fallback(handle_generate).with_state(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let shutdown = CancellationToken::new();
        let shutdown_clone = shutdown.clone();

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    shutdown_clone.cancelled().await;
                })
                .await
                .ok();
        });

        Ok(Self { addr, shutdown, state })
    }

    /// Base URL to configure as `[ai] base_url`
    pub fn base_url(&self) -> String {
        format!("http://{}/v1beta", self.addr)
    }

    /// Number of generation calls received
    pub fn calls(&self) -> u32 {
        self.state.calls.load(Ordering::Relaxed)
    }
}

impl Drop for MockGemini {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

async fn handle_generate(State(state): State<Arc<MockGeminiState>>) -> Response {
    state.calls.fetch_add(1, Ordering::Relaxed);

    match &state.reply {
        Some(text) => Json(json!({
            "candidates": [{
                "content": { "role": "model", "parts": [{ "text": text }] },
                "finishReason": "STOP"
            }]
        }))
        .into_response(),
        None => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": { "code": 500, "message": "backend unavailable" } })),
        )
            .into_response(),
    }
}
