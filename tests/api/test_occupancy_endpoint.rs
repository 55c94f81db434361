// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Occupancy endpoint tests for POST /api/occupancy
//!
//! These tests verify that the occupancy handler correctly:
//! - Counts only detections in the vehicle class set {2, 3, 5, 7}
//! - Derives occupied/estado from the vehicle count in default mode
//! - Keeps the full detection list, in model order, alongside the signal
//! - Honors the any-detection occupancy mode
//! - Returns 503 when no model is loaded

use axum::http::StatusCode;

use super::common::*;

#[cfg(test)]
mod occupancy_endpoint_tests {
    use super::*;

    /// Test 1: A vehicle in frame marks the space occupied
    #[tokio::test]
    async fn test_occupied_with_vehicle() {
        let (app, _dir) = test_router(fixed(vec![detection(2, 0.9)])).await;

        let response = post_image(&app, "/api/occupancy", "lot.png", &tiny_png()).await;

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["occupied"], true);
        assert_eq!(json["estado"], "ocupado");
        assert_eq!(json["vehicle_count"], 1);
    }

    /// Test 2: Non-vehicle detections alone leave the space vacant
    #[tokio::test]
    async fn test_vacant_with_only_non_vehicles() {
        // person (0) and traffic light (9) are not vehicles
        let (app, _dir) = test_router(fixed(vec![detection(0, 0.9), detection(9, 0.8)])).await;

        let response = post_image(&app, "/api/occupancy", "lot.png", &tiny_png()).await;

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["occupied"], false);
        assert_eq!(json["estado"], "libre");
        assert_eq!(json["vehicle_count"], 0);
        // The non-vehicle detections are still reported
        assert_eq!(json["detections"].as_array().unwrap().len(), 2);
    }

    /// Test 3: Mixed frame counts vehicles only and keeps model order
    #[tokio::test]
    async fn test_mixed_frame_counts_vehicles_only() {
        let detections = vec![
            detection(2, 0.9), // car
            detection(0, 0.8), // person
            detection(7, 0.7), // truck
            detection(3, 0.6), // motorcycle
        ];
        let (app, _dir) = test_router(fixed(detections)).await;

        let response = post_image(&app, "/api/occupancy", "lot.png", &tiny_png()).await;

        let json = body_json(response).await;
        assert_eq!(json["vehicle_count"], 3);
        assert_eq!(json["occupied"], true);

        let class_ids: Vec<u64> = json["detections"]
            .as_array()
            .unwrap()
            .iter()
            .map(|d| d["class_id"].as_u64().unwrap())
            .collect();
        assert_eq!(class_ids, vec![2, 0, 7, 3]);
    }

    /// Test 4: Response advertises the vehicle class set
    #[tokio::test]
    async fn test_vehicle_classes_advertised() {
        let (app, _dir) = test_router(fixed(vec![])).await;

        let response = post_image(&app, "/api/occupancy", "lot.png", &tiny_png()).await;

        let json = body_json(response).await;
        assert_eq!(json["vehicle_classes"], serde_json::json!([2, 3, 5, 7]));
    }

    /// Test 5: Empty frame is vacant
    #[tokio::test]
    async fn test_empty_frame_is_vacant() {
        let (app, _dir) = test_router(fixed(vec![])).await;

        let response = post_image(&app, "/api/occupancy", "lot.png", &tiny_png()).await;

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["occupied"], false);
        assert_eq!(json["estado"], "libre");
        assert_eq!(json["vehicle_count"], 0);
        assert_eq!(json["detections"].as_array().unwrap().len(), 0);
    }

    /// Test 6: Any-detection mode flips occupied for non-vehicle frames
    ///
    /// vehicle_count still counts only vehicle classes; only the occupied
    /// flag widens.
    #[tokio::test]
    async fn test_any_detection_mode() {
        let (app, _dir) =
            test_router_with_mode(fixed(vec![detection(0, 0.9)]), "any").await;

        let response = post_image(&app, "/api/occupancy", "lot.png", &tiny_png()).await;

        let json = body_json(response).await;
        assert_eq!(json["occupied"], true);
        assert_eq!(json["estado"], "ocupado");
        assert_eq!(json["vehicle_count"], 0);
    }

    /// Test 7: Missing model returns 503 model_unavailable
    #[tokio::test]
    async fn test_occupancy_without_model() {
        let (app, _dir) = test_router(None).await;

        let response = post_image(&app, "/api/occupancy", "lot.png", &tiny_png()).await;

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        let json = body_json(response).await;
        assert_eq!(json["error_type"], "model_unavailable");
    }
}
