//! PNG export of the canvas.

use crate::buffer::PixelBuffer;
use thiserror::Error;

/// Default name offered when saving a page.
pub const DEFAULT_EXPORT_NAME: &str = "my-coloring-page.png";

/// Errors from exporting the canvas.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Canvas is empty")]
    EmptyCanvas,
    #[error("PNG encoding failed: {0}")]
    Encoding(#[from] png::EncodingError),
}

/// Encode the buffer as an 8-bit RGBA PNG.
pub fn encode_png(buffer: &PixelBuffer) -> Result<Vec<u8>, ExportError> {
    let (width, height) = buffer.dimensions();
    if width == 0 || height == 0 {
        return Err(ExportError::EmptyCanvas);
    }

    let mut png_data = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut png_data, width, height);
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);
        let mut writer = encoder.write_header()?;
        writer.write_image_data(buffer.as_raw())?;
        writer.finish()?;
    }
    log::info!("Exported {}x{} PNG ({} bytes)", width, height, png_data.len());
    Ok(png_data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::BLACK;

    #[test]
    fn test_png_decodes_to_same_pixels() {
        let mut buffer = PixelBuffer::new(6, 4);
        buffer.put(2, 1, BLACK);
        let bytes = encode_png(&buffer).unwrap();
        assert!(bytes.starts_with(&[0x89, b'P', b'N', b'G']));

        let decoded = image::load_from_memory(&bytes).unwrap().to_rgba8();
        assert_eq!(decoded.as_raw(), buffer.as_raw());
    }

    #[test]
    fn test_empty_canvas_rejected() {
        let buffer = PixelBuffer::new(0, 0);
        assert!(matches!(encode_png(&buffer), Err(ExportError::EmptyCanvas)));
    }
}
