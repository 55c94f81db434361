// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Upload endpoint module
//!
//! Provides POST /upload for detection with persisted results.

pub mod handler;
pub mod response;

pub use handler::{upload_handler, upload_redirect_handler};
pub use response::UploadResponse;
