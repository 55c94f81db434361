// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod api;
pub mod config;
pub mod storage;
pub mod version;
pub mod vision;

// Re-export main types for convenience
pub use api::{build_router, start_server, ApiError, AppState, ErrorResponse};
pub use config::Config;
pub use storage::{ArtifactStore, DetectionRecord, StoreError};
pub use vision::{
    classify, classify_with_mode, Detection, Detector, DetectorError, OccupancyMode,
    OccupancyResult, YoloDetector,
};
