// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Shared helpers for the API integration tests
//!
//! Builds a full router backed by a temp-dir artifact store and a stub
//! detector, and drives it with in-memory requests via `tower::oneshot`.

use axum::{
    body::Body,
    http::{header, Method, Request},
    response::Response,
    Router,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use clap::Parser;
use image::RgbImage;
use parkwatch_node::{
    api::{build_router, AppState},
    config::Config,
    storage::ArtifactStore,
    vision::{Detection, Detector, DetectorError},
};
use std::sync::Arc;
use tempfile::TempDir;
use tower::util::ServiceExt; // for `oneshot`

/// 1x1 red PNG - minimal valid image
pub const TINY_PNG_BASE64: &str =
    "iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mP8z8DwHwAFBQIAX8jx0gAAAABJRU5ErkJggg==";

const BOUNDARY: &str = "parkwatch-test-boundary";

/// Helper: Decode the minimal PNG fixture into raw upload bytes
pub fn tiny_png() -> Vec<u8> {
    STANDARD
        .decode(TINY_PNG_BASE64)
        .expect("Fixture PNG should be valid base64")
}

/// Helper: Build a detection with a fixed bbox
pub fn detection(class_id: u32, confidence: f32) -> Detection {
    Detection {
        class_id,
        confidence,
        bbox: [0.0, 0.0, 1.0, 1.0],
    }
}

/// Stub detector that returns the same detections for every frame
pub struct FixedDetector(pub Vec<Detection>);

impl Detector for FixedDetector {
    fn detect(&self, _image: &RgbImage) -> Result<Vec<Detection>, DetectorError> {
        Ok(self.0.clone())
    }
}

/// Stub detector that always fails, for 500-path tests
pub struct FailingDetector;

impl Detector for FailingDetector {
    fn detect(&self, _image: &RgbImage) -> Result<Vec<Detection>, DetectorError> {
        Err(DetectorError::Inference("session crashed".to_string()))
    }
}

/// Helper: Wrap a fixed detection list as the AppState detector slot
pub fn fixed(detections: Vec<Detection>) -> Option<Arc<dyn Detector>> {
    Some(Arc::new(FixedDetector(detections)))
}

/// Helper: Detector slot that fails every inference
pub fn failing() -> Option<Arc<dyn Detector>> {
    Some(Arc::new(FailingDetector))
}

/// Helper: Build a router in the default "vehicles" occupancy mode.
///
/// The returned TempDir owns the artifact store directory; keep it alive
/// for the duration of the test.
pub async fn test_router(detector: Option<Arc<dyn Detector>>) -> (Router, TempDir) {
    test_router_with_mode(detector, "vehicles").await
}

/// Helper: Build a router with an explicit occupancy mode
pub async fn test_router_with_mode(
    detector: Option<Arc<dyn Detector>>,
    mode: &str,
) -> (Router, TempDir) {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let store = ArtifactStore::open(dir.path())
        .await
        .expect("Failed to open artifact store");
    let config = Config::parse_from(["parkwatch-node", "--occupancy-mode", mode]);

    let state = AppState {
        detector,
        store,
        config: Arc::new(config),
    };
    (build_router(state), dir)
}

/// Helper: Content-Type header value matching the bodies built below
pub fn multipart_content_type() -> String {
    format!("multipart/form-data; boundary={}", BOUNDARY)
}

/// Helper: Build a single-part multipart body.
///
/// `field` is the form name; `filename` is omitted from the part header
/// when `None`, which is how browsers send non-file fields.
pub fn multipart_body_with_field(field: &str, filename: Option<&str>, bytes: &[u8]) -> Vec<u8> {
    let disposition = match filename {
        Some(name) => format!(
            "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
            field, name
        ),
        None => format!("Content-Disposition: form-data; name=\"{}\"\r\n", field),
    };

    let mut body = Vec::new();
    body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
    body.extend_from_slice(disposition.as_bytes());
    body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{}--\r\n", BOUNDARY).as_bytes());
    body
}

/// Helper: Multipart body carrying `bytes` in the `image` field
pub fn multipart_body(filename: &str, bytes: &[u8]) -> Vec<u8> {
    multipart_body_with_field("image", Some(filename), bytes)
}

/// Helper: POST a raw body with an explicit content type
pub async fn post_raw(app: &Router, uri: &str, content_type: &str, body: Vec<u8>) -> Response {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, content_type)
        .body(Body::from(body))
        .unwrap();
    app.clone().oneshot(request).await.unwrap()
}

/// Helper: POST an image upload to `uri`
pub async fn post_image(app: &Router, uri: &str, filename: &str, bytes: &[u8]) -> Response {
    post_raw(
        app,
        uri,
        &multipart_content_type(),
        multipart_body(filename, bytes),
    )
    .await
}

/// Helper: GET `uri`
pub async fn get(app: &Router, uri: &str) -> Response {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.clone().oneshot(request).await.unwrap()
}

/// Helper: Collect a response body into raw bytes
pub async fn body_bytes(response: Response) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec()
}

/// Helper: Collect a response body as UTF-8 text
pub async fn body_string(response: Response) -> String {
    String::from_utf8(body_bytes(response).await).unwrap()
}

/// Helper: Parse a response body as JSON
pub async fn body_json(response: Response) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}
