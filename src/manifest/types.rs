use std::path::{Path, PathBuf};
use serde::{Serialize, Deserialize};
use chrono::{DateTime, Utc};

use crate::stub::{ClassFailure, GenerationReport};

/// Entry for one generated stub file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestEntry {
    pub namespace: String,
    pub class_name: String,

    /// Path relative to the output root
    pub path: PathBuf,

    /// SHA-256 of the file contents
    pub sha256: String,

    pub properties: usize,
    pub fields: usize,
    pub methods: usize,
}

/// Record of the files produced by a generation run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationManifest {
    /// When the run finished
    pub generated_at: DateTime<Utc>,

    /// Module the types were taken from
    pub module: String,

    /// Namespaces that were exported
    pub namespaces: Vec<String>,

    /// Written files, in catalog order
    pub entries: Vec<ManifestEntry>,

    /// Classes that could not be written
    #[serde(default)]
    pub failures: Vec<ClassFailure>,

    /// Version of the generator that wrote the manifest
    pub version: String,
}

impl GenerationManifest {
    /// Build a manifest from a finished run
    pub fn from_report(module: &str, namespaces: &[String], output_root: &Path, report: &GenerationReport) -> Self {
        let entries = report
            .written
            .iter()
            .map(|stub| ManifestEntry {
                namespace: stub.namespace.clone(),
                class_name: stub.class_name.clone(),
                path: stub
                    .path
                    .strip_prefix(output_root)
                    .map(Path::to_path_buf)
                    .unwrap_or_else(|_| stub.path.clone()),
                sha256: stub.sha256.clone(),
                properties: stub.members.properties,
                fields: stub.members.fields,
                methods: stub.members.methods,
            })
            .collect();

        Self {
            generated_at: Utc::now(),
            module: module.to_string(),
            namespaces: namespaces.to_vec(),
            entries,
            failures: report.failures.clone(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    /// Find the entry for a class
    pub fn entry(&self, namespace: &str, class_name: &str) -> Option<&ManifestEntry> {
        self.entries
            .iter()
            .find(|entry| entry.namespace == namespace && entry.class_name == class_name)
    }
}
