// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Parking occupancy endpoint module
//!
//! Provides POST /api/occupancy for the smart-parking occupancy signal.

pub mod handler;
pub mod response;

pub use handler::occupancy_handler;
pub use response::OccupancyResponse;
