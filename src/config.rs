// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Runtime configuration, sourced from CLI flags and environment variables

use anyhow::Result;
use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;

use crate::vision::OccupancyMode;

/// Parkwatch node configuration.
///
/// Every flag can also be set through its `PARKWATCH_*` environment
/// variable; a `.env` file in the working directory is honored when present.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "parkwatch-node",
    version,
    about = "Parking occupancy detection node"
)]
pub struct Config {
    /// Socket address the HTTP server binds to
    #[arg(long, env = "PARKWATCH_ADDR", default_value = "0.0.0.0:5000")]
    pub addr: SocketAddr,

    /// Path to the YOLOv8 ONNX detection model
    #[arg(long, env = "PARKWATCH_MODEL_PATH", default_value = "models/yolov8n.onnx")]
    pub model_path: PathBuf,

    /// Directory annotated images and detection records are written to
    #[arg(long, env = "PARKWATCH_RESULT_DIR", default_value = "result_images")]
    pub result_dir: PathBuf,

    /// Longest edge allowed for a normalized image (uploads are never upscaled)
    #[arg(long, env = "PARKWATCH_MAX_EDGE", default_value_t = 640)]
    pub max_edge: u32,

    /// Upload size cap in bytes
    #[arg(long, env = "PARKWATCH_MAX_UPLOAD_BYTES", default_value_t = 10 * 1024 * 1024)]
    pub max_upload_bytes: usize,

    /// Confidence threshold for reported detections
    #[arg(long, env = "PARKWATCH_CONFIDENCE", default_value_t = 0.25)]
    pub confidence: f32,

    /// IoU threshold for non-maximum suppression
    #[arg(long, env = "PARKWATCH_IOU", default_value_t = 0.45)]
    pub iou: f32,

    /// Which detections mark a space occupied: 'vehicles' or 'any'
    #[arg(long, env = "PARKWATCH_OCCUPANCY_MODE", default_value = "vehicles")]
    pub occupancy_mode: OccupancyMode,
}

impl Config {
    /// Range checks clap cannot express
    pub fn validate(&self) -> Result<()> {
        anyhow::ensure!(self.max_edge > 0, "max_edge must be positive");
        anyhow::ensure!(
            self.max_upload_bytes > 0,
            "max_upload_bytes must be positive"
        );
        anyhow::ensure!(
            (0.0..=1.0).contains(&self.confidence),
            "confidence must be within [0, 1]"
        );
        anyhow::ensure!(
            (0.0..=1.0).contains(&self.iou),
            "iou must be within [0, 1]"
        );
        Ok(())
    }
}
