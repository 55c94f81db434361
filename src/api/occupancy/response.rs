// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Occupancy response types

use serde::{Deserialize, Serialize};

use crate::api::detect::DetectionJson;
use crate::vision::{OccupancyResult, VEHICLE_CLASSES};

/// Response from POST /api/occupancy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OccupancyResponse {
    /// True when the frame holds at least one qualifying detection
    pub occupied: bool,
    /// Legacy textual flag: "ocupado" or "libre"
    pub estado: String,
    /// Count of detections in the vehicle class set
    pub vehicle_count: usize,
    /// Class ids treated as vehicles
    pub vehicle_classes: Vec<u32>,
    /// The full detection list the signal was derived from, in model order
    pub detections: Vec<DetectionJson>,
}

impl OccupancyResponse {
    pub fn new(result: &OccupancyResult) -> Self {
        Self {
            occupied: result.occupied,
            estado: result.estado().to_string(),
            vehicle_count: result.vehicle_count,
            vehicle_classes: VEHICLE_CLASSES.to_vec(),
            detections: result.detections.iter().map(DetectionJson::from).collect(),
        }
    }
}
