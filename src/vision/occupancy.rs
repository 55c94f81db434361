// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Occupancy classification over raw detections
//!
//! A pure reduction from a detection list to the parking occupancy signal.
//! Given identical inputs it always produces identical outputs, and the
//! incoming detection order survives untouched in the result.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use super::detector::Detection;

/// How the occupied flag is derived from a detection list.
///
/// Deployed variants of this service disagreed on the rule: some flagged a
/// space occupied only for vehicle classes, others for any detection at all.
/// The mode makes that divergence an explicit configuration choice instead
/// of a buried handler difference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OccupancyMode {
    /// Only detections in the vehicle class set flip the flag (default)
    #[default]
    #[serde(rename = "vehicles")]
    Vehicles,
    /// Any detection at all flips the flag
    #[serde(rename = "any")]
    AnyDetection,
}

impl FromStr for OccupancyMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "vehicles" | "vehicle" => Ok(OccupancyMode::Vehicles),
            "any" | "all" => Ok(OccupancyMode::AnyDetection),
            other => Err(format!(
                "Unknown occupancy mode: {other} (expected 'vehicles' or 'any')"
            )),
        }
    }
}

impl fmt::Display for OccupancyMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OccupancyMode::Vehicles => write!(f, "vehicles"),
            OccupancyMode::AnyDetection => write!(f, "any"),
        }
    }
}

/// Result of classifying one frame's detections
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OccupancyResult {
    /// True when the frame holds at least one qualifying detection
    pub occupied: bool,
    /// Count of detections whose class is in the vehicle set
    pub vehicle_count: usize,
    /// The full detection list, in the order the detector reported it
    pub detections: Vec<Detection>,
}

impl OccupancyResult {
    /// Legacy textual form of the occupied flag
    pub fn estado(&self) -> &'static str {
        if self.occupied {
            "ocupado"
        } else {
            "libre"
        }
    }
}

/// Count the detections whose class falls in `vehicle_classes` and derive
/// the occupancy signal from that count.
pub fn classify(detections: Vec<Detection>, vehicle_classes: &HashSet<u32>) -> OccupancyResult {
    let vehicle_count = detections
        .iter()
        .filter(|d| vehicle_classes.contains(&d.class_id))
        .count();

    OccupancyResult {
        occupied: vehicle_count > 0,
        vehicle_count,
        detections,
    }
}

/// `classify`, with the occupied flag widened to any detection when the mode
/// asks for it. `vehicle_count` always reports the vehicle-only count.
pub fn classify_with_mode(
    detections: Vec<Detection>,
    vehicle_classes: &HashSet<u32>,
    mode: OccupancyMode,
) -> OccupancyResult {
    let mut result = classify(detections, vehicle_classes);
    if mode == OccupancyMode::AnyDetection {
        result.occupied = !result.detections.is_empty();
    }
    result
}
