//! HTTP error responses.

use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::Json;
use doodledream_core::api::ErrorResponse;
use doodledream_core::PromptError;
use std::time::Duration;
use thiserror::Error;

use crate::upstream::GenerateError;

/// Everything a request can fail with.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    InvalidPrompt(#[from] PromptError),
    #[error("Invalid JSON body")]
    InvalidJson,
    #[error("Complexity must be \"simple\" or \"detailed\"")]
    InvalidComplexity,
    #[error("Too many requests. Please wait a minute before trying again.")]
    RateLimited { retry_after: Duration },
    #[error("OPENAI_API_KEY not configured. Set it in the server environment")]
    MissingApiKey,
    #[error(transparent)]
    Upstream(#[from] GenerateError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidPrompt(_) | ApiError::InvalidJson | ApiError::InvalidComplexity => {
                StatusCode::BAD_REQUEST
            }
            ApiError::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
            ApiError::MissingApiKey | ApiError::Upstream(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = Json(ErrorResponse {
            error: self.to_string(),
        });
        let mut response = (status, body).into_response();
        if let ApiError::RateLimited { retry_after } = self {
            // Whole seconds, rounded up.
            let secs = retry_after.as_secs() + u64::from(retry_after.subsec_nanos() > 0);
            if let Ok(value) = HeaderValue::from_str(&secs.max(1).to_string()) {
                response.headers_mut().insert(header::RETRY_AFTER, value);
            }
        }
        response
    }
}
