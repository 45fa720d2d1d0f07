use std::path::{Path, PathBuf};
use anyhow::{Result, Context};
use log::{info, debug};

use crate::utils::file_utils;
use super::types::GenerationManifest;

/// Manifest storage operations
#[derive(Debug)]
pub struct ManifestStorage {
    /// Path to the manifest file
    manifest_path: PathBuf,
}

impl ManifestStorage {
    /// Create a new manifest storage with the given path
    pub fn new(manifest_path: impl AsRef<Path>) -> Self {
        Self {
            manifest_path: manifest_path.as_ref().to_path_buf(),
        }
    }

    /// Load the manifest from disk
    pub fn load(&self) -> Result<GenerationManifest> {
        let path = &self.manifest_path;
        debug!("Loading manifest from {}", path.display());

        let content = file_utils::read_file_to_string(path)?;
        let manifest: GenerationManifest = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse manifest file {}", path.display()))?;

        Ok(manifest)
    }

    /// Save the manifest to disk
    pub fn save(&self, manifest: &GenerationManifest) -> Result<()> {
        let path = &self.manifest_path;
        debug!("Saving manifest to {}", path.display());

        let content = serde_json::to_string_pretty(manifest)
            .context("Failed to serialize manifest")?;

        file_utils::write_string_to_file(path, &content)?;

        info!("Saved manifest with {} entries", manifest.entries.len());
        Ok(())
    }

    /// Get the path to the manifest file
    pub fn path(&self) -> &Path {
        &self.manifest_path
    }
}
