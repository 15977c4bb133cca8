//! Upstream image generation client.

use serde::{Deserialize, Serialize};
use std::future::Future;
use std::pin::Pin;
use std::time::Duration;
use thiserror::Error;
use tracing::{error, info};

/// Boxed future returned by [`ImageGenerator`].
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

const OPENAI_IMAGES_URL: &str = "https://api.openai.com/v1/images/generations";

/// Errors from the upstream generator.
#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("Image generation timed out")]
    Timeout,
    #[error("{0}")]
    Request(String),
    #[error("{0}")]
    Api(String),
    #[error("No image data in response")]
    MissingImage,
}

/// Something that turns a prompt into a base64-encoded PNG.
pub trait ImageGenerator: Send + Sync {
    fn generate<'a>(&'a self, prompt: &'a str) -> BoxFuture<'a, Result<String, GenerateError>>;
}

#[derive(Serialize)]
struct ImagesRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    n: u32,
    size: &'a str,
    quality: &'a str,
    response_format: &'a str,
}

#[derive(Deserialize)]
struct ImagesResponse {
    #[serde(default)]
    data: Vec<ImageData>,
    error: Option<ApiErrorBody>,
}

#[derive(Deserialize)]
struct ImageData {
    b64_json: Option<String>,
}

#[derive(Deserialize)]
struct ApiErrorBody {
    message: Option<String>,
}

/// DALL-E 3 over the OpenAI images API.
pub struct OpenAiGenerator {
    client: reqwest::Client,
    api_key: String,
    endpoint: String,
}

impl OpenAiGenerator {
    pub fn new(api_key: impl Into<String>, timeout: Duration) -> Result<Self, GenerateError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| GenerateError::Request(e.to_string()))?;
        Ok(Self {
            client,
            api_key: api_key.into(),
            endpoint: OPENAI_IMAGES_URL.to_string(),
        })
    }

    /// Point at a different images endpoint.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    async fn request(&self, prompt: &str) -> Result<String, GenerateError> {
        let body = ImagesRequest {
            model: "dall-e-3",
            prompt,
            n: 1,
            size: "1024x1024",
            quality: "standard",
            response_format: "b64_json",
        };

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(map_reqwest)?;
        let status = response.status();
        let parsed: ImagesResponse = response.json().await.map_err(map_reqwest)?;

        if let Some(err) = parsed.error {
            let message = err
                .message
                .unwrap_or_else(|| format!("Upstream error ({status})"));
            error!(%status, %message, "image API error");
            return Err(GenerateError::Api(message));
        }

        parsed
            .data
            .into_iter()
            .next()
            .and_then(|d| d.b64_json)
            .filter(|b64| !b64.is_empty())
            .ok_or(GenerateError::MissingImage)
    }
}

impl ImageGenerator for OpenAiGenerator {
    fn generate<'a>(&'a self, prompt: &'a str) -> BoxFuture<'a, Result<String, GenerateError>> {
        Box::pin(async move {
            let image = self.request(prompt).await?;
            info!(bytes = image.len(), "image generated");
            Ok(image)
        })
    }
}

fn map_reqwest(err: reqwest::Error) -> GenerateError {
    if err.is_timeout() {
        GenerateError::Timeout
    } else {
        GenerateError::Request(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::Router;
    use axum::http::{HeaderMap, StatusCode, header};
    use axum::routing::post;
    use axum::Json;
    use serde_json::{Value, json};
    use std::sync::{Arc, Mutex};

    type Seen = Arc<Mutex<Option<(Option<String>, Value)>>>;

    /// Serve `app` on an ephemeral local port and return its images URL.
    async fn serve(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}/v1/images/generations")
    }

    /// Images API that records the request and answers with `status` and `reply`.
    fn images_api(seen: Seen, status: StatusCode, reply: Value) -> Router {
        Router::new().route(
            "/v1/images/generations",
            post(move |headers: HeaderMap, Json(body): Json<Value>| async move {
                let auth = headers
                    .get(header::AUTHORIZATION)
                    .and_then(|v| v.to_str().ok())
                    .map(str::to_string);
                *seen.lock().unwrap() = Some((auth, body));
                (status, Json(reply))
            }),
        )
    }

    fn client(endpoint: String, timeout: Duration) -> OpenAiGenerator {
        OpenAiGenerator::new("sk-test", timeout)
            .unwrap()
            .with_endpoint(endpoint)
    }

    #[tokio::test]
    async fn test_generate_sends_prompt_and_returns_image() {
        let seen = Seen::default();
        let endpoint = serve(images_api(
            seen.clone(),
            StatusCode::OK,
            json!({ "data": [{ "b64_json": "iVBORw0KGgo=" }] }),
        ))
        .await;

        let image = client(endpoint, Duration::from_secs(5))
            .generate("an owl")
            .await
            .unwrap();
        assert_eq!(image, "iVBORw0KGgo=");

        let (auth, body) = seen.lock().unwrap().take().unwrap();
        assert_eq!(auth.as_deref(), Some("Bearer sk-test"));
        assert_eq!(
            body,
            json!({
                "model": "dall-e-3",
                "prompt": "an owl",
                "n": 1,
                "size": "1024x1024",
                "quality": "standard",
                "response_format": "b64_json",
            })
        );
    }

    #[tokio::test]
    async fn test_generate_reports_api_error_message() {
        let endpoint = serve(images_api(
            Seen::default(),
            StatusCode::BAD_REQUEST,
            json!({ "error": { "message": "Your request was rejected" } }),
        ))
        .await;

        let err = client(endpoint, Duration::from_secs(5))
            .generate("owl")
            .await
            .unwrap_err();
        assert!(matches!(err, GenerateError::Api(_)));
        assert_eq!(err.to_string(), "Your request was rejected");
    }

    #[tokio::test]
    async fn test_generate_without_image_data() {
        let endpoint = serve(images_api(
            Seen::default(),
            StatusCode::OK,
            json!({ "data": [] }),
        ))
        .await;

        let err = client(endpoint, Duration::from_secs(5))
            .generate("owl")
            .await
            .unwrap_err();
        assert!(matches!(err, GenerateError::MissingImage));
        assert_eq!(err.to_string(), "No image data in response");
    }

    #[tokio::test]
    async fn test_generate_times_out() {
        let slow = Router::new().route(
            "/v1/images/generations",
            post(|| async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                Json(json!({ "data": [{ "b64_json": "late" }] }))
            }),
        );
        let endpoint = serve(slow).await;

        let err = client(endpoint, Duration::from_millis(200))
            .generate("owl")
            .await
            .unwrap_err();
        assert!(matches!(err, GenerateError::Timeout));
        assert_eq!(err.to_string(), "Image generation timed out");
    }

    #[test]
    fn test_request_body_shape() {
        let body = ImagesRequest {
            model: "dall-e-3",
            prompt: "owl",
            n: 1,
            size: "1024x1024",
            quality: "standard",
            response_format: "b64_json",
        };
        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(value["response_format"], "b64_json");
        assert_eq!(value["n"], 1);
    }

    #[test]
    fn test_response_parsing() {
        let ok: ImagesResponse =
            serde_json::from_str(r#"{"data":[{"b64_json":"iVBORw0"}]}"#).unwrap();
        assert_eq!(ok.data[0].b64_json.as_deref(), Some("iVBORw0"));

        let err: ImagesResponse =
            serde_json::from_str(r#"{"error":{"message":"bad prompt"}}"#).unwrap();
        assert!(err.data.is_empty());
        assert_eq!(err.error.and_then(|e| e.message).as_deref(), Some("bad prompt"));
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            GenerateError::MissingImage.to_string(),
            "No image data in response"
        );
        assert_eq!(GenerateError::Api("quota".into()).to_string(), "quota");
    }
}
