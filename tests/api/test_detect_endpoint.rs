// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Detection endpoint tests for POST /api/detect and the HTML /detect form
//!
//! These tests verify that the detect handlers correctly:
//! - Return the full detection list with labels and image dimensions
//! - Map decode, validation, inference and no-model failures to the
//!   documented status codes and error_type values
//! - Render the HTML result page with an inline annotated image
//! - Redirect browser GETs on /detect back to the upload form

use axum::http::{header, StatusCode};

use super::common::*;

#[cfg(test)]
mod detect_endpoint_tests {
    use super::*;

    // =============================================================================
    // JSON Endpoint Tests (POST /api/detect)
    // =============================================================================

    /// Test 1: Successful detection returns labelled detections and dimensions
    #[tokio::test]
    async fn test_detect_returns_detections() {
        let (app, _dir) = test_router(fixed(vec![detection(2, 0.9)])).await;

        let response = post_image(&app, "/api/detect", "lot.png", &tiny_png()).await;

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;

        let detections = json["detections"].as_array().unwrap();
        assert_eq!(detections.len(), 1);
        assert_eq!(detections[0]["class_id"], 2);
        assert_eq!(detections[0]["label"], "car");
        let confidence = detections[0]["confidence"].as_f64().unwrap();
        assert!((confidence - 0.9).abs() < 1e-6);
        assert_eq!(detections[0]["bbox"].as_array().unwrap().len(), 4);

        // The fixture is 1x1, well inside the downscale bound
        assert_eq!(json["image"]["width"], 1);
        assert_eq!(json["image"]["height"], 1);
        assert!(json["inference_time_ms"].as_u64().is_some());
    }

    /// Test 2: Detection order from the model is preserved on the wire
    #[tokio::test]
    async fn test_detect_preserves_model_order() {
        let detections = vec![detection(7, 0.9), detection(0, 0.8), detection(2, 0.7)];
        let (app, _dir) = test_router(fixed(detections)).await;

        let response = post_image(&app, "/api/detect", "lot.png", &tiny_png()).await;

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        let labels: Vec<&str> = json["detections"]
            .as_array()
            .unwrap()
            .iter()
            .map(|d| d["label"].as_str().unwrap())
            .collect();
        assert_eq!(labels, vec!["truck", "person", "car"]);
    }

    /// Test 3: Empty detection list is a success, not an error
    #[tokio::test]
    async fn test_detect_empty_frame() {
        let (app, _dir) = test_router(fixed(vec![])).await;

        let response = post_image(&app, "/api/detect", "empty.png", &tiny_png()).await;

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["detections"].as_array().unwrap().len(), 0);
    }

    // =============================================================================
    // Error Mapping Tests
    // =============================================================================

    /// Test 4: Missing image field returns 400 validation_error
    #[tokio::test]
    async fn test_detect_missing_image_field() {
        let (app, _dir) = test_router(fixed(vec![])).await;

        // Same framing, wrong form field name
        let body = multipart_body_with_field("file", Some("lot.png"), &tiny_png());
        let response = post_raw(&app, "/api/detect", &multipart_content_type(), body).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["error_type"], "validation_error");
        assert_eq!(json["details"]["field"], "image");
        assert!(
            json["error"].as_str().unwrap().contains("image"),
            "Error should mention 'image'"
        );
    }

    /// Test 5: Undecodable upload bytes return 400 decode_error
    #[tokio::test]
    async fn test_detect_undecodable_bytes() {
        let (app, _dir) = test_router(fixed(vec![])).await;

        let response =
            post_image(&app, "/api/detect", "notes.txt", b"definitely not an image").await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["error_type"], "decode_error");
    }

    /// Test 6: Detector failure returns 500 inference_error
    #[tokio::test]
    async fn test_detect_inference_failure() {
        let (app, _dir) = test_router(failing()).await;

        let response = post_image(&app, "/api/detect", "lot.png", &tiny_png()).await;

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json = body_json(response).await;
        assert_eq!(json["error_type"], "inference_error");
        assert!(
            json["error"].as_str().unwrap().contains("session crashed"),
            "Error should carry the detector failure message"
        );
    }

    /// Test 7: Missing model returns 503 model_unavailable
    #[tokio::test]
    async fn test_detect_without_model() {
        let (app, _dir) = test_router(None).await;

        let response = post_image(&app, "/api/detect", "lot.png", &tiny_png()).await;

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        let json = body_json(response).await;
        assert_eq!(json["error_type"], "model_unavailable");
    }

    // =============================================================================
    // HTML Form Endpoint Tests (/detect)
    // =============================================================================

    /// Test 8: POST /detect renders the result page with an inline image
    #[tokio::test]
    async fn test_detect_page_renders_annotated_image() {
        let (app, _dir) = test_router(fixed(vec![detection(2, 0.9)])).await;

        let response = post_image(&app, "/detect", "lot.png", &tiny_png()).await;

        assert_eq!(response.status(), StatusCode::OK);
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .unwrap()
            .to_str()
            .unwrap()
            .to_string();
        assert!(content_type.starts_with("text/html"));

        let html = body_string(response).await;
        assert!(html.contains("data:image/jpeg;base64,"));
        assert!(html.contains("car"));
        assert!(html.contains("ocupado"));
    }

    /// Test 9: GET /detect redirects browsers back to the upload form
    #[tokio::test]
    async fn test_detect_get_redirects_to_form() {
        let (app, _dir) = test_router(fixed(vec![])).await;

        let response = get(&app, "/detect").await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            response.headers().get(header::LOCATION).unwrap(),
            "/",
            "Redirect should point at the upload form"
        );
    }
}
