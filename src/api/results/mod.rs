// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Artifact retrieval endpoint module
//!
//! Provides GET /results/json and GET /results/images plus their per-id
//! variations for fetching persisted detection results.

pub mod handler;

pub use handler::{get_image_handler, get_record_handler, list_images_handler, list_records_handler};
