// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Bounding-box rendering for annotated result images

use image::codecs::jpeg::JpegEncoder;
use image::{ExtendedColorType, Rgb, RgbImage};
use imageproc::drawing::draw_hollow_rect_mut;
use imageproc::rect::Rect;

use super::detector::Detection;

/// JPEG quality for annotated output images
const JPEG_QUALITY: u8 = 90;

/// Colors cycled through per class id, so boxes of one class share a color
const PALETTE: [Rgb<u8>; 6] = [
    Rgb([255, 56, 56]),
    Rgb([50, 205, 50]),
    Rgb([64, 128, 255]),
    Rgb([255, 200, 0]),
    Rgb([255, 64, 255]),
    Rgb([0, 220, 220]),
];

/// Color assigned to a class id
pub fn class_color(class_id: u32) -> Rgb<u8> {
    PALETTE[class_id as usize % PALETTE.len()]
}

/// Draw a hollow box for each detection onto a copy of the raster.
///
/// Boxes are stroked two pixels wide where they fit; parts that fall outside
/// the image are clipped by the drawing routine. The input raster is never
/// modified.
pub fn annotate(image: &RgbImage, detections: &[Detection]) -> RgbImage {
    let mut canvas = image.clone();

    for detection in detections {
        let [x1, y1, x2, y2] = detection.bbox;
        let left = x1.round() as i32;
        let top = y1.round() as i32;
        let width = ((x2 - x1).round() as i32).max(1) as u32;
        let height = ((y2 - y1).round() as i32).max(1) as u32;

        let color = class_color(detection.class_id);
        draw_hollow_rect_mut(&mut canvas, Rect::at(left, top).of_size(width, height), color);
        if width > 2 && height > 2 {
            let inner = Rect::at(left + 1, top + 1).of_size(width - 2, height - 2);
            draw_hollow_rect_mut(&mut canvas, inner, color);
        }
    }

    canvas
}

/// Encode an annotated raster as JPEG for embedding and persistence
pub fn encode_jpeg(image: &RgbImage) -> Result<Vec<u8>, image::ImageError> {
    let mut buffer = Vec::new();
    let encoder = JpegEncoder::new_with_quality(&mut buffer, JPEG_QUALITY);
    encoder.encode(
        image.as_raw(),
        image.width(),
        image.height(),
        ExtendedColorType::Rgb8,
    )?;
    Ok(buffer)
}
