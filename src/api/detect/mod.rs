// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Object detection endpoint module
//!
//! Provides POST /api/detect for raw detection JSON and POST /detect for
//! the browser flow with an annotated result page.

pub mod handler;
pub mod response;

pub use handler::{api_detect_handler, detect_page_handler, detect_redirect_handler};
pub use response::{DetectResponse, DetectionJson, ImageSize};
