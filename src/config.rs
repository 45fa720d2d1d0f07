use std::path::{Path, PathBuf};
use anyhow::{Result, Context, bail};
use log::{debug, info, warn};
use serde::{Serialize, Deserialize};

use crate::utils::file_utils;

/// Default configuration file looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "api-stubgen.toml";

/// Configuration for a stub generation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Name of the module whose types are exported
    pub module: String,

    /// Namespaces to export, in priority order
    pub namespaces: Vec<String>,

    /// Root directory receiving one subdirectory per namespace
    pub output_root: PathBuf,

    /// Catalog file, or directory of catalog files
    pub catalog_path: PathBuf,

    /// Extension of generated stub files, without the dot
    pub file_extension: String,

    /// List members inherited from base types
    pub include_inherited: bool,

    /// Remove stubs and namespace directories recorded by the previous run's manifest
    pub prune_stale: bool,

    /// Number of worker threads; `None` picks one less than the CPU count
    pub parallel_threads: Option<usize>,

    /// Show a progress bar while rendering
    pub show_progress: bool,

    /// Write `manifest.json` at the output root
    pub write_manifest: bool,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            module: "Assembly-CSharp".to_string(),
            namespaces: vec!["Game".to_string(), "GameLogic".to_string()],
            output_root: PathBuf::from("GenAPI"),
            catalog_path: PathBuf::from("catalog.json"),
            file_extension: "stub".to_string(),
            include_inherited: true,
            prune_stale: true,
            parallel_threads: None,
            show_progress: true,
            write_manifest: true,
        }
    }
}

impl GeneratorConfig {
    /// Load configuration from a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!("Loading configuration from {}", path.display());

        let content = file_utils::read_file_to_string(path)?;
        Self::from_toml(&content)
            .with_context(|| format!("Failed to parse configuration file {}", path.display()))
    }

    /// Parse configuration from TOML text; missing keys take their defaults
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        Ok(config)
    }

    /// Load `path` if given, else the default file if present, else defaults
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => {
                let default_path = Path::new(DEFAULT_CONFIG_FILE);
                if default_path.is_file() {
                    info!("Using configuration file {}", default_path.display());
                    Self::from_file(default_path)
                } else {
                    debug!("No configuration file found, using defaults");
                    Ok(Self::default())
                }
            }
        }
    }

    /// Check the configuration and collapse duplicate namespaces.
    ///
    /// Namespaces become directory names, so they must be single path
    /// components.
    pub fn validate(&mut self) -> Result<()> {
        if self.module.trim().is_empty() {
            bail!("Configuration error: module name cannot be empty");
        }

        if self.file_extension.is_empty() || self.file_extension.contains(['/', '\\', '.']) {
            bail!("Configuration error: invalid file extension '{}'", self.file_extension);
        }

        if self.parallel_threads == Some(0) {
            bail!("Configuration error: parallel_threads must be at least 1");
        }

        let mut unique: Vec<String> = Vec::with_capacity(self.namespaces.len());
        for namespace in &self.namespaces {
            if !is_valid_path_component(namespace) {
                bail!("Configuration error: invalid namespace '{}'", namespace);
            }
            if unique.contains(namespace) {
                warn!("Duplicate namespace '{}' ignored", namespace);
                continue;
            }
            unique.push(namespace.clone());
        }
        self.namespaces = unique;

        if self.namespaces.is_empty() {
            warn!("No namespaces configured, nothing will be generated");
        }

        Ok(())
    }
}

/// Whether `name` can be used as a single file or directory name
pub fn is_valid_path_component(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains(['/', '\\', '\0'])
}
