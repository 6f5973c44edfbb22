//! Mock identity provider implementing `accounts:lookup`
//!
//! `token-<uid>` resolves to `<uid>` with email `<uid>@example.com`,
//! `noemail-<uid>` resolves without an email, anything else is rejected.

use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::{Json, Router, routing};
use serde_json::{Value, json};
use tokio_util::sync::CancellationToken;

pub struct MockIdentity {
    addr: SocketAddr,
    shutdown: CancellationToken,
    lookups: Arc<AtomicU32>,
}

impl MockIdentity {
    pub async fn start() -> anyhow::Result<Self> {
        let lookups = Arc::new(AtomicU32::new(0));

        let app = Router::new()
            .route("/v1/accounts:lookup", routing::post(handle_lookup))
            .with_state(Arc::clone(&lookups));

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

        Ok(Self {
            addr,
            shutdown,
            lookups,
        })
    }

    /// Base URL to configure as `[identity] base_url`
    pub fn base_url(&self) -> String {
        format!("http://{}/v1", self.addr)
    }

    /// Number of lookups served
    pub fn lookups(&self) -> u32 {
        self.lookups.load(Ordering::Relaxed)
    }
}

impl Drop for MockIdentity {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

async fn handle_lookup(State(lookups): State<Arc<AtomicU32>>, Json(body): Json<Value>) -> impl IntoResponse {
    lookups.fetch_add(1, Ordering::Relaxed);

    let token = body["idToken"].as_str().unwrap_or_default();

    if let Some(uid) = token.strip_prefix("token-") {
        return (
            StatusCode::OK,
            Json(json!({ "users": [{ "localId": uid, "email": format!("{uid}@example.com") }] })),
        );
    }

    if let Some(uid) = token.strip_prefix("noemail-") {
        return (StatusCode::OK, Json(json!({ "users": [{ "localId": uid }] })));
    }

    (
        StatusCode::BAD_REQUEST,
        Json(json!({ "error": { "code": 400, "message": "INVALID_ID_TOKEN" } })),
    )
}
