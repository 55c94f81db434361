// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Artifact persistence for processed uploads
//!
//! Each processed upload is stored under a server-generated artifact id:
//! `<root>/<id>.jpg` holds the annotated image and `<root>/<id>.json` holds
//! the detection record. Because the id, not the client filename, keys the
//! artifacts, concurrent uploads of identically named files never collide.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::vision::{Detection, OccupancyResult};

/// Errors raised by the artifact store
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Detection record JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Persisted detection record for one processed upload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectionRecord {
    /// Server-generated id the artifacts are keyed by
    pub artifact_id: String,
    /// Client-supplied upload filename, kept as metadata only
    pub filename: String,
    pub timestamp: DateTime<Utc>,
    /// Dimensions of the stored annotated image
    pub image_width: u32,
    pub image_height: u32,
    pub occupied: bool,
    pub vehicle_count: usize,
    pub detections: Vec<Detection>,
}

impl DetectionRecord {
    /// Mint a record with a fresh artifact id and the current timestamp
    pub fn new(
        filename: impl Into<String>,
        image_width: u32,
        image_height: u32,
        result: &OccupancyResult,
    ) -> Self {
        Self {
            artifact_id: Uuid::new_v4().to_string(),
            filename: filename.into(),
            timestamp: Utc::now(),
            image_width,
            image_height,
            occupied: result.occupied,
            vehicle_count: result.vehicle_count,
            detections: result.detections.clone(),
        }
    }
}

/// Directory-backed store for annotated images and detection records
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    root: PathBuf,
}

impl ArtifactStore {
    /// Open the store, creating the directory when missing
    pub async fn open(root: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let root = root.into();
        tokio::fs::create_dir_all(&root).await?;

        info!("📁 Artifact store ready at: {}", root.display());

        Ok(Self { root })
    }

    /// Persist the annotated image and its detection record together
    pub async fn put(&self, record: &DetectionRecord, annotated_jpeg: &[u8]) -> Result<(), StoreError> {
        debug!(
            "📥 Storing artifact {} ({} bytes annotated image)",
            record.artifact_id,
            annotated_jpeg.len()
        );

        tokio::fs::write(self.image_path(&record.artifact_id), annotated_jpeg).await?;

        let json = serde_json::to_vec_pretty(record)?;
        tokio::fs::write(self.record_path(&record.artifact_id), json).await?;

        info!(
            "✅ Stored artifact {} ({} detections, {} vehicles)",
            record.artifact_id,
            record.detections.len(),
            record.vehicle_count
        );

        Ok(())
    }

    /// Fetch a stored detection record; `None` when the id is unknown
    pub async fn get_record(&self, artifact_id: &str) -> Result<Option<DetectionRecord>, StoreError> {
        match tokio::fs::read(self.record_path(artifact_id)).await {
            Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                warn!("❌ No detection record for artifact: {}", artifact_id);
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Fetch a stored annotated image; `None` when the id is unknown
    pub async fn get_image(&self, artifact_id: &str) -> Result<Option<Vec<u8>>, StoreError> {
        match tokio::fs::read(self.image_path(artifact_id)).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                warn!("❌ No annotated image for artifact: {}", artifact_id);
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// List artifact ids that have a stored detection record
    pub async fn list_records(&self) -> Result<Vec<String>, StoreError> {
        self.list_with_extension("json").await
    }

    /// List artifact ids that have a stored annotated image
    pub async fn list_images(&self) -> Result<Vec<String>, StoreError> {
        self.list_with_extension("jpg").await
    }

    fn image_path(&self, artifact_id: &str) -> PathBuf {
        self.root.join(format!("{artifact_id}.jpg"))
    }

    fn record_path(&self, artifact_id: &str) -> PathBuf {
        self.root.join(format!("{artifact_id}.json"))
    }

    async fn list_with_extension(&self, extension: &str) -> Result<Vec<String>, StoreError> {
        let mut entries = tokio::fs::read_dir(&self.root).await?;
        let mut ids = Vec::new();

        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some(extension) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                ids.push(stem.to_string());
            }
        }

        ids.sort();
        Ok(ids)
    }
}
