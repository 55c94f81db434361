// Version information for the Parkwatch Node

/// Full version string with feature description
pub const VERSION: &str = "v0.1.0-occupancy-pipeline-2026-08-20";

/// Semantic version number
pub const VERSION_NUMBER: &str = "0.1.0";

/// Major version number
pub const VERSION_MAJOR: u32 = 0;

/// Minor version number
pub const VERSION_MINOR: u32 = 1;

/// Patch version number
pub const VERSION_PATCH: u32 = 0;

/// Build date
pub const BUILD_DATE: &str = "2026-08-20";

/// Supported features in this version
pub const FEATURES: &[&str] = &[
    "yolov8-onnx-detection",
    "vehicle-occupancy",
    "annotated-images",
    "artifact-store",
    "html-upload-form",
    "coco-labels",
    "configurable-occupancy-mode",
];

/// Get formatted version string for logging
pub fn get_version_string() -> String {
    format!("Parkwatch Node {} ({})", VERSION_NUMBER, BUILD_DATE)
}

/// Get full version info for API responses
pub fn get_version_info() -> serde_json::Value {
    serde_json::json!({
        "version": VERSION_NUMBER,
        "build": VERSION,
        "date": BUILD_DATE,
        "features": FEATURES,
    })
}
