//! DoodleDream image generation proxy.
//!
//! A small HTTP service that turns a topic into a coloring page by
//! forwarding a line-art prompt to an upstream image model. Requests are
//! rate limited per client and restricted to an origin allow-list.

pub mod config;
pub mod cors;
pub mod error;
pub mod limiter;
pub mod routes;
pub mod upstream;

use axum::routing::{get, post};
use axum::Router;
use doodledream_core::api::{GENERATE_PATH, HEALTH_PATH};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::warn;

pub use config::ServerConfig;
pub use error::ApiError;
pub use limiter::{Clock, ManualClock, RateDecision, RateLimiter, SystemClock};
pub use upstream::{GenerateError, ImageGenerator, OpenAiGenerator};

/// Shared application state
pub struct AppState {
    pub config: Arc<ServerConfig>,
    pub limiter: Arc<RateLimiter>,
    /// `None` when no API key is configured.
    pub generator: Option<Arc<dyn ImageGenerator>>,
}

impl AppState {
    pub fn new(
        config: ServerConfig,
        limiter: RateLimiter,
        generator: Option<Arc<dyn ImageGenerator>>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            limiter: Arc::new(limiter),
            generator,
        }
    }

    /// State for a real server: wall-clock limiter and the OpenAI client.
    pub fn from_config(config: ServerConfig) -> Self {
        let limiter = RateLimiter::system(config.rate_limit_max, config.rate_limit_window());
        let generator = config.api_key().and_then(|key| {
            match OpenAiGenerator::new(key, config.upstream_timeout()) {
                Ok(generator) => Some(Arc::new(generator) as Arc<dyn ImageGenerator>),
                Err(e) => {
                    warn!("Failed to build upstream client: {}", e);
                    None
                }
            }
        });
        Self::new(config, limiter, generator)
    }
}

/// Build the HTTP router.
pub fn router(state: Arc<AppState>) -> Router {
    let cors = cors::cors_layer(state.config.frontend_origin().map(str::to_string));

    Router::new()
        .route("/", get(routes::index))
        .route(HEALTH_PATH, get(routes::health))
        .route(GENERATE_PATH, post(routes::generate))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
