// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Upload response types

use serde::{Deserialize, Serialize};

use crate::api::detect::DetectionJson;
use crate::storage::DetectionRecord;

/// Response from POST /upload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadResponse {
    /// Server-generated id the stored artifacts are keyed by
    pub artifact_id: String,
    /// Original client filename, kept as metadata only
    pub filename: String,
    /// Route serving the stored annotated image
    pub image_url: String,
    pub occupied: bool,
    pub vehicle_count: usize,
    pub detections: Vec<DetectionJson>,
}

impl UploadResponse {
    pub fn new(record: &DetectionRecord) -> Self {
        Self {
            artifact_id: record.artifact_id.clone(),
            filename: record.filename.clone(),
            image_url: format!("/results/images/{}", record.artifact_id),
            occupied: record.occupied,
            vehicle_count: record.vehicle_count,
            detections: record.detections.iter().map(DetectionJson::from).collect(),
        }
    }
}
