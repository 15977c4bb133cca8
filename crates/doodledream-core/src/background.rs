//! Background line-art images: decoding and fitting to the canvas.

use crate::color::{blend_over, WHITE};
use base64::{engine::general_purpose::STANDARD, Engine};
use image::imageops::{self, FilterType};
use image::RgbaImage;
use thiserror::Error;

/// Errors from loading a background image.
#[derive(Debug, Error)]
pub enum BackgroundError {
    #[error("Invalid data URI: {0}")]
    InvalidDataUri(String),
    #[error("Invalid base64 image data: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("Could not decode image: {0}")]
    Decode(#[from] image::ImageError),
    #[error("Image has no pixels")]
    Empty,
}

/// Result type for background operations.
pub type BackgroundResult<T> = Result<T, BackgroundError>;

/// Where a background image comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSource {
    /// Encoded image file contents (PNG, JPEG or WebP).
    Bytes(Vec<u8>),
    /// A `data:<mime>;base64,<payload>` URI, as returned by the generation
    /// proxy.
    DataUri(String),
}

impl ImageSource {
    /// Pick the variant from a string: `data:` URIs are kept as such.
    pub fn from_uri(uri: impl Into<String>) -> Option<Self> {
        let uri = uri.into();
        uri.starts_with("data:").then_some(ImageSource::DataUri(uri))
    }

    /// The encoded image bytes.
    pub fn encoded_bytes(&self) -> BackgroundResult<Vec<u8>> {
        match self {
            ImageSource::Bytes(bytes) => Ok(bytes.clone()),
            ImageSource::DataUri(uri) => parse_data_uri(uri).map(|(_, bytes)| bytes),
        }
    }

    /// Decode into RGBA pixels at native size.
    pub fn decode(&self) -> BackgroundResult<RgbaImage> {
        let bytes = self.encoded_bytes()?;
        let image = image::load_from_memory(&bytes)?.to_rgba8();
        if image.width() == 0 || image.height() == 0 {
            return Err(BackgroundError::Empty);
        }
        Ok(image)
    }
}

/// Split a base64 data URI into its MIME type and decoded payload.
pub fn parse_data_uri(uri: &str) -> BackgroundResult<(String, Vec<u8>)> {
    let rest = uri
        .strip_prefix("data:")
        .ok_or_else(|| BackgroundError::InvalidDataUri("missing 'data:' prefix".to_string()))?;
    let (header, payload) = rest
        .split_once(',')
        .ok_or_else(|| BackgroundError::InvalidDataUri("missing ',' separator".to_string()))?;
    let mime = header
        .strip_suffix(";base64")
        .ok_or_else(|| {
            BackgroundError::InvalidDataUri("only base64 data URIs are supported".to_string())
        })?;
    let bytes = STANDARD.decode(payload.trim())?;
    Ok((mime.to_string(), bytes))
}

/// Encode bytes as a base64 data URI.
pub fn to_data_uri(mime: &str, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", mime, STANDARD.encode(bytes))
}

/// Scale `image` to fit `width` × `height` preserving aspect ratio, center
/// it, and flatten it over white.
pub fn fit_to_canvas(image: &RgbaImage, width: u32, height: u32) -> RgbaImage {
    let mut canvas = RgbaImage::from_pixel(width, height, WHITE);
    if image.width() == 0 || image.height() == 0 || width == 0 || height == 0 {
        return canvas;
    }

    let scale = (width as f64 / image.width() as f64).min(height as f64 / image.height() as f64);
    let fit_w = ((image.width() as f64 * scale).round() as u32).clamp(1, width);
    let fit_h = ((image.height() as f64 * scale).round() as u32).clamp(1, height);

    let scaled;
    let source = if (fit_w, fit_h) == image.dimensions() {
        image
    } else {
        scaled = imageops::resize(image, fit_w, fit_h, FilterType::Triangle);
        &scaled
    };

    let offset_x = (width - fit_w) / 2;
    let offset_y = (height - fit_h) / 2;
    for (x, y, px) in source.enumerate_pixels() {
        canvas.put_pixel(offset_x + x, offset_y + y, blend_over(WHITE, *px));
    }
    canvas
}
