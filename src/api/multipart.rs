// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Shared multipart extraction for the upload endpoints

use axum_extra::extract::Multipart;
use tracing::debug;

use super::errors::ApiError;

/// Name of the multipart field every upload endpoint reads
pub const IMAGE_FIELD: &str = "image";

/// An uploaded image pulled out of a multipart form
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub bytes: Vec<u8>,
    /// Client-supplied filename, when the form carried one
    pub filename: Option<String>,
}

/// Read the `image` field out of a multipart request.
///
/// Other fields are skipped. A missing or unreadable field maps to a
/// validation error, so the boundary answers with a 400.
pub async fn extract_image_field(mut multipart: Multipart) -> Result<ImageUpload, ApiError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::ValidationError {
            field: IMAGE_FIELD.to_string(),
            message: format!("Malformed multipart body: {e}"),
        })?
    {
        if field.name() != Some(IMAGE_FIELD) {
            continue;
        }

        let filename = field.file_name().map(|s| s.to_string());
        let bytes = field.bytes().await.map_err(|e| ApiError::ValidationError {
            field: IMAGE_FIELD.to_string(),
            message: format!("Failed to read image field: {e}"),
        })?;

        debug!(
            "Received image field: {} bytes (filename: {:?})",
            bytes.len(),
            filename
        );

        return Ok(ImageUpload {
            bytes: bytes.to_vec(),
            filename,
        });
    }

    Err(ApiError::ValidationError {
        field: IMAGE_FIELD.to_string(),
        message: "No image file in request".to_string(),
    })
}
