#![allow(clippy::missing_errors_doc, clippy::must_use_candidate)]

mod auth;
mod catalog;
mod cors;
mod error;
mod extract;
mod handlers;
mod rate_limit;
mod response;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::routing::{MethodRouter, get, post};
use flourish_config::Config;
use flourish_core::ApiError;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

pub use auth::{AuthUser, PremiumUser, VerifiedCaller};
pub use catalog::default_challenges;
pub use error::{ApiResult, AppError};
pub use state::AppState;

use crate::handlers::{admin, ai, budget, challenges, health, user, webhook, wins};

/// Assembled server with all routes and middleware
pub struct Server {
    router: Router,
    listen_address: SocketAddr,
}

impl Server {
    /// Build the server and its state from configuration
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let state = AppState::from_config(config)?;
        Self::with_state(config, state)
    }

    /// Build the server around existing state
    ///
    /// Routing and middleware still come from `config`.
    pub fn with_state(config: &Config, state: AppState) -> anyhow::Result<Self> {
        let listen_address = config
            .server
            .listen_address
            .unwrap_or_else(|| SocketAddr::from(([0, 0, 0, 0], 3000)));

        let mut api = api_routes();
        if config.server.health.enabled {
            api = api.route(&config.server.health.path, allow(get(health::health), "GET"));
        }
        let api = api.with_state(state);

        let prefix = config.server.api_prefix.trim_end_matches('/');
        let mut app = if prefix.is_empty() {
            Router::new().merge(api)
        } else {
            Router::new().nest(prefix, api)
        };

        app = app.fallback(|| async { AppError(ApiError::not_found("Route")) });

        // Middleware, innermost first

        if let Some(ref rl_config) = config.server.rate_limit {
            let limiter = Arc::new(rate_limit::ClientLimiter::new(rl_config)?);
            app = app.layer(axum::middleware::from_fn(move |req, next| {
                let limiter = Arc::clone(&limiter);
                async move { rate_limit::rate_limit_middleware(limiter, req, next).await }
            }));
        }

        app = app.layer(TimeoutLayer::new(config.server.request_timeout_duration()?));

        app = app.layer(TraceLayer::new_for_http());

        let cors_config = config.server.cors.clone().unwrap_or_default();
        app = app.layer(cors::cors_layer(&cors_config));

        Ok(Self {
            router: app,
            listen_address,
        })
    }

    /// Get the configured listen address
    pub const fn listen_address(&self) -> SocketAddr {
        self.listen_address
    }

    /// Consume the server and return the inner router
    ///
    /// Useful for testing when the caller manages the listener
    pub fn into_router(self) -> Router {
        self.router
    }

    /// Start serving requests
    ///
    /// Blocks until the cancellation token is triggered.
    pub async fn serve(self, shutdown: tokio_util::sync::CancellationToken) -> anyhow::Result<()> {
        let listener = tokio::net::TcpListener::bind(self.listen_address).await?;
        let local_addr = listener.local_addr()?;
        tracing::info!(%local_addr, "server listening");

        axum::serve(
            listener,
            self.router.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(async move {
            shutdown.cancelled().await;
            tracing::info!("graceful shutdown initiated");
        })
        .await?;

        Ok(())
    }
}

fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/user/init", allow(post(user::init), "POST"))
        .route(
            "/user/profile",
            allow(get(user::get_profile).put(user::update_profile), "GET, PUT"),
        )
        .route("/user/sync-subscription", allow(post(user::sync_subscription), "POST"))
        .route("/wins", allow(get(wins::list).post(wins::create), "GET, POST"))
        .route("/wins/summary", allow(get(wins::summary), "GET"))
        .route("/budget", allow(get(budget::list).post(budget::create), "GET, POST"))
        .route("/challenges", allow(get(challenges::list), "GET"))
        .route("/challenges/start", allow(post(challenges::start), "POST"))
        .route("/challenges/complete", allow(post(challenges::complete), "POST"))
        .route("/admin/set-premium", allow(post(admin::set_premium), "POST"))
        .route("/ai/smart-swap", allow(post(ai::smart_swap), "POST"))
        .route("/ai/meal-plan", allow(post(ai::meal_plan), "POST"))
        .route("/ai/goal", allow(post(ai::goal), "POST"))
        .route("/ai/chat", allow(post(ai::chat), "POST"))
        .route("/webhooks/revenuecat", allow(post(webhook::revenuecat), "POST"))
}

/// Answer any other method on the route with 405 naming `allowed`
fn allow(methods: MethodRouter<AppState>, allowed: &'static str) -> MethodRouter<AppState> {
    methods.fallback(move || async move { AppError(ApiError::MethodNotAllowed(allowed.to_owned())) })
}
