// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Detector contract and detection data model

use image::RgbImage;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::labels::{class_name, VEHICLE_CLASS_SET};

/// One model-reported object instance.
///
/// `bbox` is `[x1, y1, x2, y2]` in pixel coordinates of the normalized
/// raster the detector ran on, with `x1 <= x2` and `y1 <= y2`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    /// COCO class id
    pub class_id: u32,
    /// Confidence score in [0, 1]
    pub confidence: f32,
    /// Corner coordinates [x1, y1, x2, y2]
    pub bbox: [f32; 4],
}

impl Detection {
    /// Human-readable COCO label for this detection
    pub fn label(&self) -> &'static str {
        class_name(self.class_id)
    }

    /// Whether this detection's class is in the vehicle set
    pub fn is_vehicle(&self) -> bool {
        VEHICLE_CLASS_SET.contains(&self.class_id)
    }
}

/// Errors surfaced by a detector backend
#[derive(Debug, Error)]
pub enum DetectorError {
    #[error("Inference failed: {0}")]
    Inference(String),

    #[error("Unexpected model output shape: expected {expected}, got {got}")]
    OutputShape { expected: String, got: String },
}

/// Capability contract for object detection backends.
///
/// The pipeline treats the detector as opaque: any implementation that
/// returns zero or more detections over the supplied raster satisfies it.
/// The handle is built once at startup and shared read-only across requests,
/// so implementations manage their own interior synchronization.
pub trait Detector: Send + Sync {
    /// Run detection over an RGB raster
    fn detect(&self, image: &RgbImage) -> Result<Vec<Detection>, DetectorError>;
}
