//! Wire types and prompt rules shared by the generation proxy and its
//! clients.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Longest accepted prompt, in characters, after trimming.
pub const MAX_PROMPT_CHARS: usize = 500;

/// Route of the generation endpoint.
pub const GENERATE_PATH: &str = "/api/generate";

/// Route of the health endpoint.
pub const HEALTH_PATH: &str = "/api/health";

/// How much detail to ask for in a generated page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Complexity {
    /// Big shapes for young children.
    #[default]
    Simple,
    /// More detail for older children.
    Detailed,
}

impl Complexity {
    pub fn label(&self) -> &'static str {
        match self {
            Complexity::Simple => "Simple",
            Complexity::Detailed => "Detailed",
        }
    }

    fn style_line(&self) -> &'static str {
        match self {
            Complexity::Simple => "Simple shapes suitable for young children to color.",
            Complexity::Detailed => {
                "Moderate detail with clear separate regions, suitable for older children to color."
            }
        }
    }
}

/// Request body of `POST /api/generate`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateRequest {
    pub prompt: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub complexity: Option<Complexity>,
}

/// Success body of `POST /api/generate`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateResponse {
    pub success: bool,
    /// `data:image/png;base64,...`
    pub image: String,
}

/// Error body of any failed request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Body of `GET /api/health`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    pub has_open_ai_key: bool,
    pub has_gemini_key: bool,
}

/// Reasons a prompt is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PromptError {
    #[error("Prompt is required")]
    Missing,
    #[error("Prompt must be a string")]
    NotAString,
    #[error("Prompt cannot be empty")]
    Blank,
    #[error("Prompt must be 500 characters or less")]
    TooLong,
}

/// Trim and check a prompt. Returns the trimmed topic.
pub fn validate_prompt(prompt: &str) -> Result<&str, PromptError> {
    if prompt.is_empty() {
        return Err(PromptError::Missing);
    }
    let trimmed = prompt.trim();
    if trimmed.is_empty() {
        return Err(PromptError::Blank);
    }
    if trimmed.chars().count() > MAX_PROMPT_CHARS {
        return Err(PromptError::TooLong);
    }
    Ok(trimmed)
}

/// Validate the `prompt` field of an untyped JSON body.
pub fn validate_prompt_value(value: Option<&serde_json::Value>) -> Result<&str, PromptError> {
    match value {
        None | Some(serde_json::Value::Null) => Err(PromptError::Missing),
        Some(serde_json::Value::String(s)) => validate_prompt(s),
        Some(serde_json::Value::Bool(false)) => Err(PromptError::Missing),
        Some(serde_json::Value::Number(n)) if n.as_f64() == Some(0.0) => Err(PromptError::Missing),
        Some(_) => Err(PromptError::NotAString),
    }
}

/// The line-art prompt sent upstream for a validated topic.
pub fn coloring_page_prompt(topic: &str, complexity: Complexity) -> String {
    format!(
        "A simple black and white coloring book page illustration of: {topic}.\n\
         Style: Clean line art with thick black outlines on pure white background.\n\
         {}\n\
         No shading, no gray tones, no colors - just black lines on white.\n\
         Cute and child-friendly design.",
        complexity.style_line()
    )
}
