//! Test server wrapper that starts Flourish on a random port

use std::net::SocketAddr;
use std::sync::Arc;

use flourish_config::Config;
use flourish_core::ManualClock;
use flourish_server::{AppState, Server};
use flourish_store::Store;
use jiff::Timestamp;
use reqwest::{Method, StatusCode};
use serde_json::Value;
use tokio_util::sync::CancellationToken;

/// Instant every test server's clock starts at
pub const START: &str = "2025-03-12T09:00:00Z";

/// A running test server instance
pub struct TestServer {
    addr: SocketAddr,
    prefix: String,
    shutdown: CancellationToken,
    client: reqwest::Client,
    state: AppState,
    clock: Arc<ManualClock>,
}

impl TestServer {
    /// Start a test server with the given configuration
    ///
    /// Binds to port 0 for automatic port assignment. Time is frozen at
    /// [`START`] until moved through [`TestServer::clock`].
    pub async fn start(config: Config) -> anyhow::Result<Self> {
        Self::start_with_store(config, |store| store).await
    }

    /// Start a test server whose store is replaced by `wrap(store)`
    pub async fn start_with_store(
        config: Config,
        wrap: impl FnOnce(Arc<dyn Store>) -> Arc<dyn Store>,
    ) -> anyhow::Result<Self> {
        let clock = Arc::new(ManualClock::new(START.parse::<Timestamp>()?));
        let mut state = AppState::with_clock(&config, clock.clone())?;
        state.store = wrap(state.store);
        let server = Server::with_state(&config, state.clone())?;
        let shutdown = CancellationToken::new();
        let shutdown_clone = shutdown.clone();

        // Bind the listener here so we know the actual port
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;

        tokio::spawn(async move {
            axum::serve(
                listener,
                server.into_router().into_make_service_with_connect_info::<SocketAddr>(),
            )
            .with_graceful_shutdown(async move {
                shutdown_clone.cancelled().await;
            })
            .await
            .ok();
        });

        Ok(Self {
            addr,
            prefix: config.server.api_prefix.trim_end_matches('/').to_owned(),
            shutdown,
            client: reqwest::Client::new(),
            state,
            clock,
        })
    }

    /// Absolute URL for a raw path
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{path}", self.addr)
    }

    /// Absolute URL for a path under the API prefix
    pub fn api(&self, path: &str) -> String {
        self.url(&format!("{}{path}", self.prefix))
    }

    /// Get a reference to the HTTP client
    pub fn client(&self) -> &reqwest::Client {
        &self.client
    }

    /// Shared handler state, for inspecting the store
    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn clock(&self) -> &ManualClock {
        &self.clock
    }

    /// Send a JSON request under the API prefix and decode the reply
    pub async fn call(&self, method: Method, path: &str, token: Option<&str>, body: Option<Value>) -> (StatusCode, Value) {
        let mut request = self.client.request(method, self.api(path));
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }
        if let Some(body) = body {
            request = request.json(&body);
        }

        let response = request.send().await.expect("request failed");
        let status = response.status();
        let body = response.json().await.unwrap_or(Value::Null);
        (status, body)
    }

    pub async fn get(&self, path: &str, token: &str) -> (StatusCode, Value) {
        self.call(Method::GET, path, Some(token), None).await
    }

    pub async fn post(&self, path: &str, token: &str, body: Value) -> (StatusCode, Value) {
        self.call(Method::POST, path, Some(token), Some(body)).await
    }

    pub async fn put(&self, path: &str, token: &str, body: Value) -> (StatusCode, Value) {
        self.call(Method::PUT, path, Some(token), Some(body)).await
    }

    /// Create `uid` through `POST /user/init`
    pub async fn sign_up(&self, uid: &str) {
        let (status, _) = self
            .post("/user/init", &super::token(uid), serde_json::json!({ "displayName": "Sam" }))
            .await;
        assert!(status.is_success(), "sign up failed with {status}");
    }

    /// Create `uid` with premium granted through the admin endpoint
    pub async fn sign_up_premium(&self, uid: &str) {
        self.sign_up(uid).await;
        let (status, _) = self
            .post("/admin/set-premium", &super::token(uid), serde_json::json!({}))
            .await;
        assert_eq!(status, StatusCode::OK);
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}
