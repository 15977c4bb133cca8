//! Request handlers.

use axum::extract::rejection::JsonRejection;
use axum::extract::{ConnectInfo, FromRequestParts, State};
use axum::http::request::Parts;
use axum::Json;
use doodledream_core::api::{
    GenerateResponse, HealthResponse, coloring_page_prompt, validate_prompt_value,
};
use doodledream_core::Complexity;
use serde_json::Value;
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::error::ApiError;
use crate::limiter::RateDecision;
use crate::AppState;

/// Index page
pub async fn index() -> &'static str {
    "DoodleDream image generation proxy - POST /api/generate"
}

/// Health check
pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".into(),
        has_open_ai_key: state.config.api_key().is_some(),
        has_gemini_key: state.config.has_gemini_key(),
    })
}

/// Generate a coloring page for a topic.
pub async fn generate(
    State(state): State<Arc<AppState>>,
    ClientIp(client): ClientIp,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<GenerateResponse>, ApiError> {
    if let RateDecision::Limited { retry_after } = state.limiter.check(&client) {
        warn!(%client, "rate limited");
        return Err(ApiError::RateLimited { retry_after });
    }

    let Json(body) = body.map_err(|_| ApiError::InvalidJson)?;
    let topic = validate_prompt_value(body.get("prompt"))?;
    let complexity = parse_complexity(body.get("complexity"))?;

    let Some(generator) = state.generator.as_ref() else {
        error!("generation requested without an API key");
        return Err(ApiError::MissingApiKey);
    };

    info!(%client, topic, complexity = complexity.label(), "generating coloring page");
    let prompt = coloring_page_prompt(topic, complexity);
    let image = generator.generate(&prompt).await.map_err(|e| {
        error!("Generation failed: {}", e);
        ApiError::from(e)
    })?;

    Ok(Json(GenerateResponse {
        success: true,
        image: format!("data:image/png;base64,{image}"),
    }))
}

fn parse_complexity(value: Option<&Value>) -> Result<Complexity, ApiError> {
    match value {
        None | Some(Value::Null) => Ok(Complexity::default()),
        Some(value) => {
            serde_json::from_value(value.clone()).map_err(|_| ApiError::InvalidComplexity)
        }
    }
}

/// The client address used as the rate limit key.
///
/// Taken from the first `X-Forwarded-For` entry when the server trusts its
/// proxy, otherwise from the socket peer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientIp(pub String);

impl FromRequestParts<Arc<AppState>> for ClientIp {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        if state.config.trust_proxy {
            let forwarded = parts
                .headers
                .get("x-forwarded-for")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.split(',').next())
                .map(str::trim)
                .filter(|v| !v.is_empty());
            if let Some(ip) = forwarded {
                return Ok(ClientIp(ip.to_string()));
            }
        }

        let ip = parts
            .extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| addr.ip().to_string())
            .unwrap_or_else(|| "unknown".to_string());
        Ok(ClientIp(ip))
    }
}
