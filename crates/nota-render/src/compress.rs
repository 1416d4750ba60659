//! # Image Compression
//!
//! Shrinks an uploaded logo/avatar into a data-URI string the spreadsheet
//! store will accept.
//!
//! ## The Size Ceiling
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  The store caps one cell at ~50,000 characters. We target 40,000.      │
//! │                                                                         │
//! │  decode ──► scale to fit (never upscale) ──► JPEG @ quality            │
//! │                                     │                                   │
//! │                     len > 40,000?  ──► ONE retry @ quality 0.5         │
//! │                                     │                                   │
//! │                     result returned REGARDLESS of the retry's length   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The single fixed-quality retry is deliberate: it keeps the operation
//! bounded and predictable. A pathological source can still exceed the
//! ceiling; the store write then fails visibly instead of this code
//! looping on ever-lower qualities.

use std::path::Path;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use image::imageops::FilterType;
use image::DynamicImage;
use tokio::task;
use tracing::debug;

use nota_core::MAX_ENCODED_IMAGE_LEN;

use crate::error::CompressError;

/// Default bounding box for stored logos, in pixels.
pub const DEFAULT_MAX_DIMENSION: u32 = 150;

/// Default JPEG quality for the first encode (0.0–1.0).
pub const DEFAULT_QUALITY: f32 = 0.7;

/// Fixed quality for the single oversize retry.
const FALLBACK_QUALITY: f32 = 0.5;

/// Compresses raw image bytes into a bounded data-URI string.
///
/// Scaling preserves the aspect ratio: the factor is
/// `min(max_width/w, max_height/h)` clamped to `<= 1`, so images already
/// inside the box are re-encoded at their original size.
///
/// Decode and encode are CPU-bound and run on the blocking pool; the
/// caller is suspended, not blocked.
///
/// ## Errors
/// [`CompressError::Decode`] when the bytes are not a valid image. No
/// partial artifact is ever returned.
pub async fn compress(
    bytes: Vec<u8>,
    max_width: u32,
    max_height: u32,
    quality: f32,
) -> Result<String, CompressError> {
    task::spawn_blocking(move || compress_blocking(&bytes, max_width, max_height, quality)).await?
}

/// Reads a file and compresses it. Read failures surface as
/// [`CompressError::Read`].
pub async fn compress_file(
    path: impl AsRef<Path>,
    max_width: u32,
    max_height: u32,
    quality: f32,
) -> Result<String, CompressError> {
    let bytes = tokio::fs::read(path.as_ref()).await?;
    compress(bytes, max_width, max_height, quality).await
}

fn compress_blocking(
    bytes: &[u8],
    max_width: u32,
    max_height: u32,
    quality: f32,
) -> Result<String, CompressError> {
    let source = image::load_from_memory(bytes).map_err(CompressError::Decode)?;
    let (w, h) = (source.width(), source.height());

    let scale = f64::from(max_width) / f64::from(w.max(1));
    let scale = scale.min(f64::from(max_height) / f64::from(h.max(1)));
    // Clamp so upscaling never occurs
    let scale = scale.min(1.0);

    let new_w = ((f64::from(w) * scale).round() as u32).max(1);
    let new_h = ((f64::from(h) * scale).round() as u32).max(1);

    let resized = if (new_w, new_h) == (w, h) {
        source
    } else {
        source.resize_exact(new_w, new_h, FilterType::Triangle)
    };
    // JPEG has no alpha channel; flatten before encoding
    let raster = DynamicImage::ImageRgb8(resized.to_rgb8());

    let encoded = encode_jpeg_data_uri(&raster, quality)?;
    if encoded.len() <= MAX_ENCODED_IMAGE_LEN {
        return Ok(encoded);
    }

    // Exactly one retry at the fixed fallback quality. The result is
    // returned even if it still exceeds the ceiling.
    debug!(
        first_len = encoded.len(),
        "encoded image over ceiling, retrying at fallback quality"
    );
    encode_jpeg_data_uri(&raster, FALLBACK_QUALITY)
}

/// JPEG-encodes a raster at `quality` (0.0–1.0) into a data-URI string.
fn encode_jpeg_data_uri(raster: &DynamicImage, quality: f32) -> Result<String, CompressError> {
    let percent = (quality.clamp(0.0, 1.0) * 100.0).round() as u8;

    let mut jpeg = Vec::new();
    let encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(&mut jpeg, percent);
    raster
        .write_with_encoder(encoder)
        .map_err(CompressError::Encode)?;

    Ok(format!("data:image/jpeg;base64,{}", BASE64.encode(&jpeg)))
}

/// Decodes a data-URI string back into a raster. Used by the receipt
/// renderer to embed the stored logo.
pub(crate) fn decode_data_uri(encoded: &str) -> Result<DynamicImage, CompressError> {
    let payload = encoded
        .split_once("base64,")
        .map(|(_, rest)| rest)
        .unwrap_or(encoded);
    let bytes = BASE64.decode(payload.trim()).map_err(|e| {
        CompressError::Decode(image::ImageError::Decoding(
            image::error::DecodingError::new(image::error::ImageFormatHint::Unknown, e),
        ))
    })?;
    image::load_from_memory(&bytes).map_err(CompressError::Decode)
}

// =============================================================================
// Unit Tests
// =============================================================================
