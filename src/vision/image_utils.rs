// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Upload decoding shared by all detection endpoints
//!
//! Turns raw multipart bytes into a `DynamicImage` plus the metadata the
//! handlers report back (original dimensions, detected format). The byte cap
//! is enforced before any decoding work happens.

use image::{DynamicImage, ImageFormat};
use thiserror::Error;

/// Default cap on uploaded image payloads (10MB)
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Errors raised while turning an upload into a raster
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("Image data is empty")]
    Empty,

    #[error("Image data is too large: {actual} bytes (max: {limit} bytes)")]
    TooLarge { actual: usize, limit: usize },

    #[error("Unsupported image format")]
    UnsupportedFormat,

    #[error("Failed to decode image: {0}")]
    Malformed(String),
}

/// Image metadata captured during decoding
#[derive(Debug, Clone)]
pub struct UploadInfo {
    /// Width in pixels, before normalization
    pub width: u32,
    /// Height in pixels, before normalization
    pub height: u32,
    /// Detected format
    pub format: ImageFormat,
    /// Size in bytes
    pub size_bytes: usize,
}

/// Decode raw upload bytes into a raster, enforcing the byte cap first.
///
/// The format is sniffed from magic bytes, so a mislabeled multipart
/// content-type never matters; the decoder's own guess covers formats the
/// sniffer does not know.
///
/// # Returns
/// * `Ok((DynamicImage, UploadInfo))` - The decoded image and metadata
/// * `Err(DecodeError)` - If the bytes are not a decodable image
pub fn decode_upload(
    bytes: &[u8],
    max_bytes: usize,
) -> Result<(DynamicImage, UploadInfo), DecodeError> {
    if bytes.is_empty() {
        return Err(DecodeError::Empty);
    }

    if bytes.len() > max_bytes {
        return Err(DecodeError::TooLarge {
            actual: bytes.len(),
            limit: max_bytes,
        });
    }

    let format = match sniff_format(bytes) {
        Ok(format) => format,
        Err(_) => image::guess_format(bytes).map_err(|_| DecodeError::UnsupportedFormat)?,
    };

    let image = image::load_from_memory_with_format(bytes, format)
        .map_err(|e| DecodeError::Malformed(e.to_string()))?;

    let info = UploadInfo {
        width: image.width(),
        height: image.height(),
        format,
        size_bytes: bytes.len(),
    };

    Ok((image, info))
}

/// Detect the image format from magic bytes
pub fn sniff_format(bytes: &[u8]) -> Result<ImageFormat, DecodeError> {
    if bytes.len() < 4 {
        return Err(DecodeError::UnsupportedFormat);
    }

    match bytes {
        // PNG: 89 50 4E 47
        [0x89, 0x50, 0x4E, 0x47, ..] => Ok(ImageFormat::Png),
        // JPEG: FF D8 FF
        [0xFF, 0xD8, 0xFF, ..] => Ok(ImageFormat::Jpeg),
        // WebP: RIFF....WEBP
        [0x52, 0x49, 0x46, 0x46, _, _, _, _, 0x57, 0x45, 0x42, 0x50, ..] => Ok(ImageFormat::WebP),
        // GIF87a / GIF89a
        [0x47, 0x49, 0x46, 0x38, x, ..] if *x == 0x37 || *x == 0x39 => Ok(ImageFormat::Gif),
        // BMP: BM
        [0x42, 0x4D, ..] => Ok(ImageFormat::Bmp),
        // TIFF, both byte orders
        [0x49, 0x49, 0x2A, 0x00, ..] | [0x4D, 0x4D, 0x00, 0x2A, ..] => Ok(ImageFormat::Tiff),
        _ => Err(DecodeError::UnsupportedFormat),
    }
}
