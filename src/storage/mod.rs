pub mod artifact_store;

// Re-export main types for convenience
pub use artifact_store::{ArtifactStore, DetectionRecord, StoreError};
