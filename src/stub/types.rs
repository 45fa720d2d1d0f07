use std::path::PathBuf;
use serde::{Serialize, Deserialize};

use super::filter::FilterStats;
use super::render::MemberCounts;

/// A stub file written during generation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenStub {
    pub namespace: String,
    pub class_name: String,

    /// Full path of the written file
    pub path: PathBuf,

    /// SHA-256 of the file contents
    pub sha256: String,

    pub members: MemberCounts,
}

/// A class whose stub could not be written
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassFailure {
    pub namespace: String,
    pub class_name: String,
    pub error: String,
}

/// Statistics about a generation run
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct GenerationStats {
    /// Type selection counts
    pub filter: FilterStats,

    /// Number of stub files written
    pub written_files: usize,

    /// Number of classes that failed
    pub failed_classes: usize,

    /// Stale files removed from the output root before generation
    pub removed_files: usize,

    /// Stale namespace directories removed before generation
    pub removed_dirs: usize,
}

/// Outcome of a generation run
#[derive(Debug, Default, Clone)]
pub struct GenerationReport {
    /// Written stubs, in catalog order
    pub written: Vec<WrittenStub>,

    /// Failed classes, in catalog order
    pub failures: Vec<ClassFailure>,

    pub stats: GenerationStats,

    /// Path of the manifest, when one was written
    pub manifest_path: Option<PathBuf>,
}

impl GenerationReport {
    /// Whether every selected class was written
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}
