use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs as async_fs;
use tracing::debug;

use crate::domain::entities::manifest::Manifest;

/// Manifest store related errors
#[derive(Debug, Error)]
pub enum ManifestStoreError {
    #[error("Manifest file not found at path: {}", .0.display())]
    ManifestFileNotFound(PathBuf),

    #[error("Manifest file read failed: {}: {source}", .path.display())]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("YAML error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    #[error("Manifest validation failed: {0}")]
    ValidationFailed(String),
}

/// Reads YAML manifests
pub struct ManifestStore;

impl ManifestStore {
    /// Load and validate a manifest file
    pub async fn load(path: impl AsRef<Path>) -> Result<Manifest, ManifestStoreError> {
        let path = path.as_ref();
        if !async_fs::try_exists(path).await.unwrap_or(false) {
            return Err(ManifestStoreError::ManifestFileNotFound(path.to_path_buf()));
        }

        let content = async_fs::read_to_string(path)
            .await
            .map_err(|source| ManifestStoreError::ReadFailed {
                path: path.to_path_buf(),
                source,
            })?;
        let manifest = Self::parse(&content)?;
        debug!(path = %path.display(), projects = manifest.projects.len(), "loaded manifest");
        Ok(manifest)
    }

    /// Parse and validate manifest YAML
    pub fn parse(content: &str) -> Result<Manifest, ManifestStoreError> {
        let manifest: Manifest = serde_yaml::from_str(content)?;
        manifest
            .validate()
            .map_err(ManifestStoreError::ValidationFailed)?;
        Ok(manifest)
    }
}
