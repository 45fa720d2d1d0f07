use std::path::{Path, PathBuf};
use std::fs;
use std::io::Write;
use anyhow::{Result, Context};
use log::{debug, trace};
use walkdir::WalkDir;

/// Create a directory (and its parents) if it doesn't exist.
///
/// Safe to call from several threads for the same path.
pub fn ensure_dir_exists(dir: impl AsRef<Path>) -> Result<()> {
    let dir = dir.as_ref();
    if !dir.is_dir() {
        debug!("Creating directory: {}", dir.display());
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create directory {}", dir.display()))?;
    }
    Ok(())
}

/// Check if a file has a specific extension
pub fn has_extension(path: impl AsRef<Path>, extension: &str) -> bool {
    let path = path.as_ref();
    if let Some(ext) = path.extension() {
        if let Some(ext_str) = ext.to_str() {
            return ext_str.eq_ignore_ascii_case(extension);
        }
    }
    false
}

/// Check if a file has one of the specified extensions
pub fn has_any_extension(path: impl AsRef<Path>, extensions: &[&str]) -> bool {
    extensions.iter().any(|ext| has_extension(path.as_ref(), ext))
}

/// Direct children of a directory, split into (files, subdirectories)
pub fn list_children(dir: impl AsRef<Path>) -> Result<(Vec<PathBuf>, Vec<PathBuf>)> {
    let dir = dir.as_ref();
    let mut files = Vec::new();
    let mut dirs = Vec::new();

    for entry in WalkDir::new(dir).min_depth(1).max_depth(1).sort_by_file_name() {
        let entry = entry.with_context(|| format!("Failed to list directory {}", dir.display()))?;
        if entry.file_type().is_dir() {
            dirs.push(entry.into_path());
        } else {
            files.push(entry.into_path());
        }
    }

    Ok((files, dirs))
}

/// Delete the files directly inside a directory, leaving subdirectories alone.
/// Returns the number of files deleted.
pub fn remove_files_in_dir(dir: impl AsRef<Path>) -> Result<usize> {
    let (files, _) = list_children(dir)?;
    let mut removed = 0;

    for file in files {
        trace!("Removing file: {}", file.display());
        fs::remove_file(&file)
            .with_context(|| format!("Failed to remove file {}", file.display()))?;
        removed += 1;
    }

    Ok(removed)
}

/// Read a file to string with better error handling
pub fn read_file_to_string(path: impl AsRef<Path>) -> Result<String> {
    let path = path.as_ref();
    fs::read_to_string(path)
        .with_context(|| format!("Failed to read file {}", path.display()))
}

/// Write a string to a file with a single write, truncating existing content.
///
/// The file handle is closed when this function returns, on success or error.
pub fn write_string_to_file(path: impl AsRef<Path>, content: &str) -> Result<()> {
    let path = path.as_ref();

    // Create parent directory if it doesn't exist
    if let Some(parent) = path.parent() {
        ensure_dir_exists(parent)?;
    }

    let mut file = fs::File::create(path)
        .with_context(|| format!("Failed to create file {}", path.display()))?;
    file.write_all(content.as_bytes())
        .with_context(|| format!("Failed to write file {}", path.display()))
}
