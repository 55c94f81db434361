// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use uuid::Uuid;

use crate::storage::StoreError;
use crate::vision::PipelineError;

/// Wire shape for every error leaving the service.
///
/// `error` carries the human-readable message; clients that only look at
/// that one key keep working.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ErrorResponse {
    pub error: String,
    pub error_type: String,
    pub request_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<HashMap<String, serde_json::Value>>,
}

/// Error taxonomy for the HTTP boundary.
///
/// Pipeline and storage errors are converted here exactly once; nothing
/// below this boundary retries or re-classifies.
#[derive(Debug, Clone)]
pub enum ApiError {
    /// Missing or malformed request input
    ValidationError {
        field: String,
        message: String,
    },
    /// Upload bytes are not a decodable image
    DecodeError(String),
    /// The detector backend failed mid-inference
    InferenceError(String),
    /// Artifact persistence failed
    StorageError(String),
    /// No detection model was loaded at startup
    ModelUnavailable,
    NotFound(String),
    InternalError(String),
}

impl ApiError {
    pub fn to_response(&self, request_id: Option<String>) -> ErrorResponse {
        let (error_type, message, details) = match self {
            ApiError::ValidationError { field, message } => {
                let mut details = HashMap::new();
                details.insert(
                    "field".to_string(),
                    serde_json::Value::String(field.clone()),
                );
                ("validation_error", message.clone(), Some(details))
            }
            ApiError::DecodeError(msg) => ("decode_error", msg.clone(), None),
            ApiError::InferenceError(msg) => ("inference_error", msg.clone(), None),
            ApiError::StorageError(msg) => ("storage_error", msg.clone(), None),
            ApiError::ModelUnavailable => (
                "model_unavailable",
                "Detection model is not loaded".to_string(),
                None,
            ),
            ApiError::NotFound(msg) => ("not_found", msg.clone(), None),
            ApiError::InternalError(msg) => ("internal_error", msg.clone(), None),
        };

        ErrorResponse {
            error: message,
            error_type: error_type.to_string(),
            request_id,
            details,
        }
    }

    pub fn status_code(&self) -> u16 {
        match self {
            ApiError::ValidationError { .. } | ApiError::DecodeError(_) => 400,
            ApiError::NotFound(_) => 404,
            ApiError::ModelUnavailable => 503,
            ApiError::InferenceError(_)
            | ApiError::StorageError(_)
            | ApiError::InternalError(_) => 500,
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::ValidationError { field, message } => {
                write!(f, "Validation error for {}: {}", field, message)
            }
            ApiError::DecodeError(msg) => write!(f, "Decode error: {}", msg),
            ApiError::InferenceError(msg) => write!(f, "Inference error: {}", msg),
            ApiError::StorageError(msg) => write!(f, "Storage error: {}", msg),
            ApiError::ModelUnavailable => write!(f, "Detection model is not loaded"),
            ApiError::NotFound(msg) => write!(f, "Not found: {}", msg),
            ApiError::InternalError(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl From<PipelineError> for ApiError {
    fn from(e: PipelineError) -> Self {
        match e {
            PipelineError::Decode(e) => ApiError::DecodeError(e.to_string()),
            PipelineError::Detect(e) => ApiError::InferenceError(e.to_string()),
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        ApiError::StorageError(e.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let body = self.to_response(Some(Uuid::new_v4().to_string()));
        (status, Json(body)).into_response()
    }
}
