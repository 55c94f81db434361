// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Per-upload detection pipeline: decode, normalize, detect
//!
//! Every upload endpoint funnels through `run_detection`, so failure
//! classification happens in one place and the handlers only translate the
//! typed outcome onto the wire.

use image::{ImageFormat, RgbImage};
use std::time::Instant;
use thiserror::Error;
use tracing::debug;

use super::detector::{Detection, Detector, DetectorError};
use super::image_utils::{decode_upload, DecodeError};
use super::normalize::normalize;

/// Everything produced by one pass over an uploaded image
#[derive(Debug)]
pub struct DetectionRun {
    /// The normalized raster the detector saw; `detections` coordinates are
    /// pixels in this raster
    pub image: RgbImage,
    pub detections: Vec<Detection>,
    /// Upload dimensions before normalization
    pub original_width: u32,
    pub original_height: u32,
    pub format: ImageFormat,
    pub inference_time_ms: u64,
}

/// Pipeline failure, split by the stage that gave up
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Detect(#[from] DetectorError),
}

/// Run the full decode, normalize, detect pass for one upload.
///
/// There are no retries and no partial results: the first failing stage
/// aborts the run and its error names the stage.
pub fn run_detection(
    detector: &dyn Detector,
    bytes: &[u8],
    max_edge: u32,
    max_upload_bytes: usize,
) -> Result<DetectionRun, PipelineError> {
    let (decoded, info) = decode_upload(bytes, max_upload_bytes)?;
    let image = normalize(&decoded, max_edge);

    debug!(
        "Normalized upload: {}x{} {:?} -> {}x{}",
        info.width,
        info.height,
        info.format,
        image.width(),
        image.height()
    );

    let started = Instant::now();
    let detections = detector.detect(&image)?;
    let inference_time_ms = started.elapsed().as_millis() as u64;

    debug!(
        "Detector returned {} detections in {}ms",
        detections.len(),
        inference_time_ms
    );

    Ok(DetectionRun {
        image,
        detections,
        original_width: info.width,
        original_height: info.height,
        format: info.format,
        inference_time_ms,
    })
}
