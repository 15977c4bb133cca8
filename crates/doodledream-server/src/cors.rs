//! CORS allow-list.

use axum::http::{HeaderValue, Method, header, request};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing::warn;

/// Whether `origin` may call the API.
///
/// Accepts `file://` pages, `localhost` and `127.0.0.1` over http or https
/// on any port, and the configured production origin.
pub fn is_allowed_origin(origin: &str, production: Option<&str>) -> bool {
    if origin.starts_with("file://") {
        return true;
    }
    if production.is_some_and(|allowed| allowed == origin) {
        return true;
    }
    is_local_origin(origin)
}

fn is_local_origin(origin: &str) -> bool {
    let Some(rest) = origin
        .strip_prefix("http://")
        .or_else(|| origin.strip_prefix("https://"))
    else {
        return false;
    };
    let (host, port) = match rest.split_once(':') {
        Some((host, port)) => (host, Some(port)),
        None => (rest, None),
    };
    if host != "localhost" && host != "127.0.0.1" {
        return false;
    }
    match port {
        None => true,
        Some(port) => !port.is_empty() && port.bytes().all(|b| b.is_ascii_digit()),
    }
}

/// CORS layer for the API routes. Blocked origins get no CORS headers.
pub fn cors_layer(production: Option<String>) -> CorsLayer {
    let allow = AllowOrigin::predicate(move |origin: &HeaderValue, _: &request::Parts| {
        let allowed = origin
            .to_str()
            .map(|origin| is_allowed_origin(origin, production.as_deref()))
            .unwrap_or(false);
        if !allowed {
            warn!(?origin, "CORS blocked origin");
        }
        allowed
    });

    CorsLayer::new()
        .allow_origin(allow)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE])
}
