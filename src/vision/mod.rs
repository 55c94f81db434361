// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Vision pipeline for parking occupancy detection
//!
//! This module provides:
//! - Upload decoding and bounded RGB normalization
//! - YOLOv8 object detection via ONNX Runtime (CPU)
//! - Occupancy classification over the detected objects
//! - Bounding-box annotation of result images

pub mod annotate;
pub mod detector;
pub mod image_utils;
pub mod labels;
pub mod normalize;
pub mod occupancy;
pub mod pipeline;
pub mod yolo;

pub use annotate::{annotate, class_color, encode_jpeg};
pub use detector::{Detection, Detector, DetectorError};
pub use image_utils::{decode_upload, sniff_format, DecodeError, UploadInfo};
pub use labels::{class_name, COCO_CLASSES, VEHICLE_CLASSES, VEHICLE_CLASS_SET};
pub use normalize::{normalize, DEFAULT_MAX_EDGE};
pub use occupancy::{classify, classify_with_mode, OccupancyMode, OccupancyResult};
pub use pipeline::{run_detection, DetectionRun, PipelineError};
pub use yolo::YoloDetector;
