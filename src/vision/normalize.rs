// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Bounded RGB normalization applied before inference

use image::imageops::FilterType;
use image::{DynamicImage, RgbImage};

/// Default bound on the longer edge of a normalized raster
pub const DEFAULT_MAX_EDGE: u32 = 640;

/// Downscale a decoded image so neither edge exceeds `max_edge`, preserving
/// aspect ratio. Lanczos resampling keeps small objects legible for the
/// detector. Images already within the bound pass through with only the RGB
/// conversion; upscaling never happens.
pub fn normalize(image: &DynamicImage, max_edge: u32) -> RgbImage {
    if image.width() <= max_edge && image.height() <= max_edge {
        return image.to_rgb8();
    }

    image
        .resize(max_edge, max_edge, FilterType::Lanczos3)
        .to_rgb8()
}
