use std::fs;
use std::path::Path;
use anyhow::{Result, Context};
use sha2::{Sha256, Digest};
use log::trace;

/// Calculate SHA-256 hash of a string
pub fn hash_string(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Calculate SHA-256 hash of a file
pub fn hash_file(path: impl AsRef<Path>) -> Result<String> {
    let path = path.as_ref();
    trace!("Calculating hash for file: {}", path.display());

    let content = fs::read(path)
        .with_context(|| format!("Failed to read file {}", path.display()))?;

    let mut hasher = Sha256::new();
    hasher.update(&content);
    Ok(format!("{:x}", hasher.finalize()))
}
