// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! ONNX Runtime detector backend for YOLOv8-family models
//!
//! Wraps an exported YOLOv8 detection model behind the `Detector` contract:
//! letterbox preprocessing to the model's square input, decoding of the
//! `[1, 84, anchors]` output head, per-class non-maximum suppression, and
//! mapping of the surviving boxes back into the normalized raster's pixel
//! coordinates.

use anyhow::{Context, Result};
use image::imageops::FilterType;
use image::RgbImage;
use ndarray::{Array4, ArrayViewD};
use ort::execution_providers::CPUExecutionProvider;
use ort::session::builder::GraphOptimizationLevel;
use ort::session::Session;
use ort::value::Value;
use std::path::Path;
use std::sync::Mutex;
use tracing::{debug, info};

use super::detector::{Detection, Detector, DetectorError};
use super::labels::COCO_CLASSES;

/// Square input edge expected by YOLOv8 exports
const INPUT_SIZE: u32 = 640;

/// Features per anchor: 4 box coordinates plus one score per class
const OUTPUT_FEATURES: usize = 4 + COCO_CLASSES.len();

/// Normalized gray value used for letterbox padding
const PAD_VALUE: f32 = 114.0 / 255.0;

impl From<ort::Error> for DetectorError {
    fn from(e: ort::Error) -> Self {
        DetectorError::Inference(e.to_string())
    }
}

/// ONNX-backed YOLO detector.
///
/// The session needs exclusive access to run, so inference is serialized
/// behind a mutex; concurrent requests queue on it instead of failing.
pub struct YoloDetector {
    session: Mutex<Session>,
    confidence_threshold: f32,
    iou_threshold: f32,
}

/// Letterbox geometry needed to map boxes back to source pixels
#[derive(Debug, Clone, Copy)]
struct Letterbox {
    scale: f32,
    pad_x: f32,
    pad_y: f32,
    width: u32,
    height: u32,
}

impl YoloDetector {
    /// Load a YOLOv8 ONNX model from disk.
    ///
    /// Fails early when the file is missing so startup can report a usable
    /// path instead of an opaque runtime error.
    pub fn load(model_path: &Path, confidence_threshold: f32, iou_threshold: f32) -> Result<Self> {
        if !model_path.exists() {
            anyhow::bail!("ONNX model file not found: {}", model_path.display());
        }

        info!(
            "🔍 Loading YOLO detection model from: {}",
            model_path.display()
        );

        let session = Session::builder()
            .context("Failed to create session builder")?
            .with_execution_providers([CPUExecutionProvider::default().build()])
            .context("Failed to set CPU execution provider")?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .context("Failed to set optimization level")?
            .with_intra_threads(4)
            .context("Failed to set thread count")?
            .commit_from_file(model_path)
            .with_context(|| format!("Failed to load ONNX model from {}", model_path.display()))?;

        info!(
            "✅ YOLO model loaded ({0}x{0} input, confidence >= {1}, NMS IoU {2})",
            INPUT_SIZE, confidence_threshold, iou_threshold
        );

        Ok(Self {
            session: Mutex::new(session),
            confidence_threshold,
            iou_threshold,
        })
    }
}

impl std::fmt::Debug for YoloDetector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("YoloDetector")
            .field("confidence_threshold", &self.confidence_threshold)
            .field("iou_threshold", &self.iou_threshold)
            .finish_non_exhaustive()
    }
}

impl Detector for YoloDetector {
    fn detect(&self, image: &RgbImage) -> Result<Vec<Detection>, DetectorError> {
        let (input, letterbox) = preprocess(image);
        let input_value = Value::from_array(input)?;

        let mut session = self
            .session
            .lock()
            .map_err(|_| DetectorError::Inference("Session lock poisoned".to_string()))?;
        let outputs = session.run(ort::inputs![input_value])?;

        let output = outputs[0].try_extract_array::<f32>()?;

        decode_output(
            output.view(),
            self.confidence_threshold,
            self.iou_threshold,
            letterbox,
        )
    }
}

/// Letterbox an RGB raster into the NCHW input tensor: scale to fit the
/// square input, center on a gray canvas, normalize to [0, 1].
fn preprocess(image: &RgbImage) -> (Array4<f32>, Letterbox) {
    let (width, height) = image.dimensions();
    let size = INPUT_SIZE;

    let scale = (size as f32 / width as f32).min(size as f32 / height as f32);
    let scaled_w = ((width as f32 * scale).round() as u32).clamp(1, size);
    let scaled_h = ((height as f32 * scale).round() as u32).clamp(1, size);

    let resized = image::imageops::resize(image, scaled_w, scaled_h, FilterType::Triangle);

    let pad_x = (size - scaled_w) / 2;
    let pad_y = (size - scaled_h) / 2;

    let mut input = Array4::<f32>::from_elem((1, 3, size as usize, size as usize), PAD_VALUE);
    for (x, y, pixel) in resized.enumerate_pixels() {
        let tx = (x + pad_x) as usize;
        let ty = (y + pad_y) as usize;
        input[[0, 0, ty, tx]] = pixel[0] as f32 / 255.0;
        input[[0, 1, ty, tx]] = pixel[1] as f32 / 255.0;
        input[[0, 2, ty, tx]] = pixel[2] as f32 / 255.0;
    }

    let letterbox = Letterbox {
        scale,
        pad_x: pad_x as f32,
        pad_y: pad_y as f32,
        width,
        height,
    };

    (input, letterbox)
}

/// Decode the raw output head into thresholded, suppressed detections.
///
/// YOLOv8 exports emit `[1, 84, anchors]` with box centers and per-class
/// scores and no separate objectness; some conversion tooling transposes the
/// trailing axes, so both layouts are accepted.
fn decode_output(
    output: ArrayViewD<'_, f32>,
    confidence_threshold: f32,
    iou_threshold: f32,
    letterbox: Letterbox,
) -> Result<Vec<Detection>, DetectorError> {
    let shape = output.shape();
    if shape.len() != 3 || shape[0] != 1 {
        return Err(DetectorError::OutputShape {
            expected: format!("[1, {OUTPUT_FEATURES}, anchors]"),
            got: format!("{shape:?}"),
        });
    }

    let (anchors, transposed) = if shape[1] == OUTPUT_FEATURES {
        (shape[2], false)
    } else if shape[2] == OUTPUT_FEATURES {
        (shape[1], true)
    } else {
        return Err(DetectorError::OutputShape {
            expected: format!("[1, {OUTPUT_FEATURES}, anchors]"),
            got: format!("{shape:?}"),
        });
    };

    let at = |feature: usize, anchor: usize| -> f32 {
        if transposed {
            output[[0, anchor, feature]]
        } else {
            output[[0, feature, anchor]]
        }
    };

    let max_x = letterbox.width as f32;
    let max_y = letterbox.height as f32;
    let mut candidates = Vec::new();

    for anchor in 0..anchors {
        let mut best_class = 0usize;
        let mut best_score = f32::NEG_INFINITY;
        for class in 0..COCO_CLASSES.len() {
            let score = at(4 + class, anchor);
            if score > best_score {
                best_score = score;
                best_class = class;
            }
        }

        if !best_score.is_finite() || best_score < confidence_threshold {
            continue;
        }

        let cx = at(0, anchor);
        let cy = at(1, anchor);
        let w = at(2, anchor);
        let h = at(3, anchor);
        if !cx.is_finite() || !cy.is_finite() || w <= 0.0 || h <= 0.0 {
            continue;
        }

        // Undo the letterbox to land in the normalized raster's pixels
        let x1 = ((cx - w / 2.0 - letterbox.pad_x) / letterbox.scale).clamp(0.0, max_x);
        let y1 = ((cy - h / 2.0 - letterbox.pad_y) / letterbox.scale).clamp(0.0, max_y);
        let x2 = ((cx + w / 2.0 - letterbox.pad_x) / letterbox.scale).clamp(0.0, max_x);
        let y2 = ((cy + h / 2.0 - letterbox.pad_y) / letterbox.scale).clamp(0.0, max_y);
        if x2 - x1 < 1.0 || y2 - y1 < 1.0 {
            continue;
        }

        candidates.push(Detection {
            class_id: best_class as u32,
            confidence: best_score,
            bbox: [x1, y1, x2, y2],
        });
    }

    debug!(
        "{} candidates above confidence {} before NMS",
        candidates.len(),
        confidence_threshold
    );

    Ok(non_max_suppression(candidates, iou_threshold))
}

/// Greedy per-class non-maximum suppression
fn non_max_suppression(mut candidates: Vec<Detection>, iou_threshold: f32) -> Vec<Detection> {
    candidates.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));

    let mut kept = Vec::new();
    while !candidates.is_empty() {
        let best = candidates.remove(0);
        candidates.retain(|other| {
            other.class_id != best.class_id || iou(&best.bbox, &other.bbox) < iou_threshold
        });
        kept.push(best);
    }

    kept
}

/// Intersection over union of two corner-coordinate boxes
fn iou(a: &[f32; 4], b: &[f32; 4]) -> f32 {
    let x1 = a[0].max(b[0]);
    let y1 = a[1].max(b[1]);
    let x2 = a[2].min(b[2]);
    let y2 = a[3].min(b[3]);

    let intersection = (x2 - x1).max(0.0) * (y2 - y1).max(0.0);
    let area_a = (a[2] - a[0]) * (a[3] - a[1]);
    let area_b = (b[2] - b[0]) * (b[3] - b[1]);
    let union = area_a + area_b - intersection;

    if union > 0.0 {
        intersection / union
    } else {
        0.0
    }
}
