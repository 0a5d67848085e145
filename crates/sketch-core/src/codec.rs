//! Bitmap ↔ image data URL.
//!
//! The browser persists and exports drawings as `data:image/png;base64,...`
//! strings, the same shape `HTMLCanvasElement.toDataURL()` produces, so a
//! record written by either side can be read back by the other.

use crate::bitmap::Bitmap;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use image::{DynamicImage, RgbaImage};
use std::io::Cursor;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CodecError {
    #[error("not a base64 image data URL")]
    NotDataUrl,
    #[error("unsupported media type: {0}")]
    UnsupportedMediaType(String),
    #[error("invalid base64 payload: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("image codec error: {0}")]
    Image(#[from] image::ImageError),
    #[error("decoded image has inconsistent size {width}x{height}")]
    BadDimensions { width: u32, height: u32 },
}

/// Image encodings available for persistence and export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImageFormat {
    #[default]
    Png,
    Jpeg,
}

impl ImageFormat {
    pub fn media_type(self) -> &'static str {
        match self {
            ImageFormat::Png => "image/png",
            ImageFormat::Jpeg => "image/jpeg",
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            ImageFormat::Png => "png",
            ImageFormat::Jpeg => "jpg",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "png" => Some(ImageFormat::Png),
            "jpg" | "jpeg" => Some(ImageFormat::Jpeg),
            _ => None,
        }
    }

    fn to_image(self) -> image::ImageFormat {
        match self {
            ImageFormat::Png => image::ImageFormat::Png,
            ImageFormat::Jpeg => image::ImageFormat::Jpeg,
        }
    }
}

/// Encode a bitmap into image file bytes.
///
/// JPEG has no alpha channel, so pixels are flattened to RGB first.
pub fn encode_image(bitmap: &Bitmap, format: ImageFormat) -> Result<Vec<u8>, CodecError> {
    let (width, height) = bitmap.dimensions();
    let rgba = RgbaImage::from_raw(width, height, bitmap.as_rgba().to_vec())
        .ok_or(CodecError::BadDimensions { width, height })?;
    let image = match format {
        ImageFormat::Png => DynamicImage::ImageRgba8(rgba),
        ImageFormat::Jpeg => DynamicImage::ImageRgb8(DynamicImage::ImageRgba8(rgba).to_rgb8()),
    };
    let mut out = Cursor::new(Vec::new());
    image.write_to(&mut out, format.to_image())?;
    Ok(out.into_inner())
}

/// Decode image file bytes (PNG or JPEG, sniffed) into a bitmap.
pub fn decode_image(bytes: &[u8]) -> Result<Bitmap, CodecError> {
    let rgba = image::load_from_memory(bytes)?.to_rgba8();
    let (width, height) = rgba.dimensions();
    Bitmap::from_rgba(width, height, rgba.into_raw())
        .ok_or(CodecError::BadDimensions { width, height })
}

/// Encode a bitmap as `data:<media type>;base64,<payload>`.
pub fn encode_data_url(bitmap: &Bitmap, format: ImageFormat) -> Result<String, CodecError> {
    let bytes = encode_image(bitmap, format)?;
    Ok(format!(
        "data:{};base64,{}",
        format.media_type(),
        STANDARD.encode(bytes)
    ))
}

/// Decode a base64 image data URL back into a bitmap.
pub fn decode_data_url(url: &str) -> Result<Bitmap, CodecError> {
    let rest = url.trim().strip_prefix("data:").ok_or(CodecError::NotDataUrl)?;
    let (header, payload) = rest.split_once(',').ok_or(CodecError::NotDataUrl)?;
    let media_type = header
        .strip_suffix(";base64")
        .ok_or(CodecError::NotDataUrl)?;
    if !media_type.starts_with("image/") {
        return Err(CodecError::UnsupportedMediaType(media_type.to_string()));
    }
    let bytes = STANDARD.decode(payload)?;
    decode_image(&bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;
    use pretty_assertions::assert_eq;

    fn sample() -> Bitmap {
        let mut bmp = Bitmap::new(4, 3, Color::WHITE);
        bmp.set_pixel(1, 1, Color::rgb(200, 10, 30));
        bmp.set_pixel(3, 2, Color::rgba(0, 0, 255, 100));
        bmp
    }

    #[test]
    fn png_data_url_is_lossless() {
        let bmp = sample();
        let url = encode_data_url(&bmp, ImageFormat::Png).unwrap();
        assert!(url.starts_with("data:image/png;base64,"));
        let back = decode_data_url(&url).unwrap();
        assert_eq!(back, bmp);
    }

    #[test]
    fn jpeg_keeps_dimensions() {
        let bmp = Bitmap::new(16, 8, Color::rgb(30, 60, 90));
        let url = encode_data_url(&bmp, ImageFormat::Jpeg).unwrap();
        assert!(url.starts_with("data:image/jpeg;base64,"));
        let back = decode_data_url(&url).unwrap();
        assert_eq!(back.dimensions(), (16, 8));
        assert_eq!(back.pixel(0, 0).map(|c| c.a), Some(255));
    }

    #[test]
    fn rejects_non_data_urls() {
        assert!(matches!(
            decode_data_url("https://example.com/a.png"),
            Err(CodecError::NotDataUrl)
        ));
        assert!(matches!(
            decode_data_url("data:image/png,rawbytes"),
            Err(CodecError::NotDataUrl)
        ));
        assert!(matches!(
            decode_data_url("data:text/plain;base64,aGVsbG8="),
            Err(CodecError::UnsupportedMediaType(_))
        ));
    }

    #[test]
    fn rejects_bad_payloads() {
        assert!(matches!(
            decode_data_url("data:image/png;base64,!!!"),
            Err(CodecError::Base64(_))
        ));
        assert!(matches!(
            decode_data_url("data:image/png;base64,aGVsbG8="),
            Err(CodecError::Image(_))
        ));
    }

    #[test]
    fn format_names() {
        assert_eq!(ImageFormat::from_name("JPG"), Some(ImageFormat::Jpeg));
        assert_eq!(ImageFormat::from_name("png"), Some(ImageFormat::Png));
        assert_eq!(ImageFormat::from_name("gif"), None);
        assert_eq!(ImageFormat::Jpeg.extension(), "jpg");
    }
}
