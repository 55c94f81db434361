// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Detection response types

use serde::{Deserialize, Serialize};

use crate::vision::Detection;

/// One detection as reported on the wire
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DetectionJson {
    /// COCO class id
    pub class_id: u32,
    /// Human-readable class name
    pub label: String,
    /// Confidence score (0.0-1.0)
    pub confidence: f32,
    /// [x1, y1, x2, y2] in pixel coordinates of the normalized image
    pub bbox: [f32; 4],
}

impl From<&Detection> for DetectionJson {
    fn from(detection: &Detection) -> Self {
        Self {
            class_id: detection.class_id,
            label: detection.label().to_string(),
            confidence: detection.confidence,
            bbox: detection.bbox,
        }
    }
}

/// Dimensions of the raster the bbox coordinates refer to
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ImageSize {
    pub width: u32,
    pub height: u32,
}

/// Response from POST /api/detect
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectResponse {
    /// All detections above the confidence threshold, in model order
    pub detections: Vec<DetectionJson>,
    /// The normalized image the bbox coordinates refer to
    pub image: ImageSize,
    /// Inference time in milliseconds
    pub inference_time_ms: u64,
}

impl DetectResponse {
    pub fn new(detections: &[Detection], width: u32, height: u32, inference_time_ms: u64) -> Self {
        Self {
            detections: detections.iter().map(DetectionJson::from).collect(),
            image: ImageSize { width, height },
            inference_time_ms,
        }
    }
}
