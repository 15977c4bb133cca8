//! Fetching coloring pages: preset assets or the generation proxy.
//!
//! Requests run on a worker thread. The UI polls the returned
//! [`GenerationJob`] each frame; dropping or cancelling the job discards
//! its result.

use doodledream_core::api::{GenerateRequest, GenerateResponse};
use doodledream_core::assets;
use doodledream_core::{Complexity, ImageSource};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::time::Duration;
use thiserror::Error;

/// Longer than the proxy's upstream timeout.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(75);

/// Errors shown to the user when a page cannot be fetched.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("Cannot connect to server. Make sure the server is running on port 3001.")]
    Connect,
    #[error("{0}")]
    Server(String),
    #[error("No image in response")]
    MissingImage,
    #[error("Unsupported image reference in response")]
    UnsupportedImage,
    #[error("Failed to read {}: {source}", path.display())]
    Asset {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{0}")]
    Request(String),
}

/// What to fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    pub topic: String,
    pub complexity: Complexity,
}

/// Fetch a page synchronously: presets from disk, everything else from the
/// proxy at `api_url`.
pub fn fetch_page(
    request: &GenerationRequest,
    api_url: &str,
    assets_dir: &Path,
) -> Result<ImageSource, GenerationError> {
    if let Some(preset) = assets::lookup(&request.topic) {
        log::info!("Using preset page '{}'", preset.label);
        return load_preset(&preset.path_in(assets_dir));
    }
    fetch_remote(request, api_url)
}

fn load_preset(path: &Path) -> Result<ImageSource, GenerationError> {
    std::fs::read(path)
        .map(ImageSource::Bytes)
        .map_err(|source| GenerationError::Asset {
            path: path.to_path_buf(),
            source,
        })
}

fn fetch_remote(request: &GenerationRequest, api_url: &str) -> Result<ImageSource, GenerationError> {
    log::info!("Requesting page for '{}' from {}", request.topic, api_url);
    let client = reqwest::blocking::Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .build()
        .map_err(|e| GenerationError::Request(e.to_string()))?;

    let body = GenerateRequest {
        prompt: request.topic.clone(),
        complexity: Some(request.complexity),
    };
    let response = client.post(api_url).json(&body).send().map_err(|e| {
        if e.is_connect() {
            GenerationError::Connect
        } else {
            GenerationError::Request(e.to_string())
        }
    })?;

    let status = response.status();
    let payload: Option<serde_json::Value> = response.json().ok();
    if !status.is_success() {
        let message = server_error_message(status.as_u16(), payload.as_ref());
        log::error!("Server returned error: {}", message);
        return Err(GenerationError::Server(message));
    }

    let image = payload
        .and_then(|value| serde_json::from_value::<GenerateResponse>(value).ok())
        .map(|response| response.image)
        .filter(|image| !image.is_empty())
        .ok_or(GenerationError::MissingImage)?;
    ImageSource::from_uri(image).ok_or(GenerationError::UnsupportedImage)
}

/// The `error` field of an error body, or a generic message naming the
/// status code.
pub fn server_error_message(status: u16, body: Option<&serde_json::Value>) -> String {
    body.and_then(|b| b.get("error"))
        .and_then(|e| e.as_str())
        .filter(|e| !e.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| format!("Server error ({status})"))
}

/// A page request running on a worker thread.
pub struct GenerationJob {
    topic: String,
    receiver: Receiver<Result<ImageSource, GenerationError>>,
    cancelled: Arc<AtomicBool>,
}

impl GenerationJob {
    /// Start fetching `request` in the background.
    pub fn spawn(request: GenerationRequest, api_url: String, assets_dir: PathBuf) -> Self {
        let topic = request.topic.clone();
        Self::spawn_with(topic, move || fetch_page(&request, &api_url, &assets_dir))
    }

    /// Run `work` on a worker thread.
    pub fn spawn_with<F>(topic: String, work: F) -> Self
    where
        F: FnOnce() -> Result<ImageSource, GenerationError> + Send + 'static,
    {
        let (sender, receiver) = mpsc::channel();
        let cancelled = Arc::new(AtomicBool::new(false));
        let flag = cancelled.clone();
        std::thread::spawn(move || {
            let result = work();
            if flag.load(Ordering::Acquire) {
                log::debug!("Discarding result of cancelled request");
                return;
            }
            // The job may already be gone.
            let _ = sender.send(result);
        });
        Self {
            topic,
            receiver,
            cancelled,
        }
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    /// The result, once the worker has finished. Always `None` after
    /// cancellation.
    pub fn poll(&self) -> Option<Result<ImageSource, GenerationError>> {
        if self.is_cancelled() {
            return None;
        }
        match self.receiver.try_recv() {
            Ok(result) => Some(result),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => Some(Err(GenerationError::Request(
                "Generation worker stopped unexpectedly".to_string(),
            ))),
        }
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }
}

impl Drop for GenerationJob {
    fn drop(&mut self) {
        self.cancel();
    }
}
