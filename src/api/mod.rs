// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod detect;
pub mod errors;
pub mod http_server;
pub mod multipart;
pub mod occupancy;
pub mod pages;
pub mod results;
pub mod upload;

pub use detect::{
    api_detect_handler, detect_page_handler, DetectResponse, DetectionJson, ImageSize,
};
pub use errors::{ApiError, ErrorResponse};
pub use http_server::{build_router, start_server, AppState};
pub use multipart::{extract_image_field, ImageUpload};
pub use occupancy::{occupancy_handler, OccupancyResponse};
pub use results::{
    get_image_handler, get_record_handler, list_images_handler, list_records_handler,
};
pub use upload::{upload_handler, UploadResponse};
