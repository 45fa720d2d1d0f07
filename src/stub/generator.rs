use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::fs;

use anyhow::{Result, Context};
use log::{debug, info, trace, warn};

use crate::catalog::{CatalogDocument, CatalogLoader, TypeCatalog};
use crate::config::{is_valid_path_component, GeneratorConfig};
use crate::manifest::{GenerationManifest, ManifestStorage};
use crate::utils::{file_utils, hash_utils};
use super::filter::{SelectedType, TypeFilter};
use super::progress::ProgressTracker;
use super::render::RenderOptions;
use super::types::{ClassFailure, GenerationReport, GenerationStats, WrittenStub};
use super::writer::{render_and_write, stub_path};

/// File name of the manifest written at the output root
pub const MANIFEST_FILE: &str = "manifest.json";

/// A selected class ready to render, or the reason it cannot be written
type PlannedStub<'a> = std::result::Result<SelectedType<'a>, ClassFailure>;

/// Generates stub files for the exported classes of a type catalog
#[derive(Debug)]
pub struct StubGenerator {
    config: GeneratorConfig,
    progress_tracker: ProgressTracker,
}

impl StubGenerator {
    /// Create a generator, validating the configuration
    pub fn new(mut config: GeneratorConfig) -> Result<Self> {
        config.validate()?;
        let progress_tracker = ProgressTracker::new(config.show_progress);

        Ok(Self {
            config,
            progress_tracker,
        })
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Load the configured catalog and generate stubs for its module
    pub fn run(&self) -> Result<GenerationReport> {
        let document = CatalogLoader::new()
            .load(&self.config.catalog_path)
            .with_context(|| format!("Failed to load catalog {}", self.config.catalog_path.display()))?;
        self.generate(&document)
    }

    /// Generate stubs for the configured module of `document`.
    ///
    /// Fails without touching the filesystem when the module is missing.
    pub fn generate(&self, document: &CatalogDocument) -> Result<GenerationReport> {
        let module = document.require_module(&self.config.module)?;
        info!("Module name = {}", module.module_name());
        self.generate_from_catalog(module)
    }

    /// Select the exported classes of `catalog` without writing anything
    pub fn select<'a, C: TypeCatalog + ?Sized>(&'a self, catalog: &'a C) -> Vec<SelectedType<'a>> {
        TypeFilter::new(&self.config.namespaces).select(catalog).0
    }

    /// Generate stubs for every exported class of `catalog`
    pub fn generate_from_catalog<C: TypeCatalog + ?Sized>(&self, catalog: &C) -> Result<GenerationReport> {
        let (selected, filter_stats) = TypeFilter::new(&self.config.namespaces).select(catalog);
        info!(
            "Selected {} of {} types from {}",
            filter_stats.selected, filter_stats.total_types, catalog.module_name()
        );

        let planned = self.plan(selected);

        let mut stats = GenerationStats {
            filter: filter_stats,
            ..GenerationStats::default()
        };
        self.prepare_output_root(&mut stats)?;

        let outcomes = self.render_all(&planned)?;

        let mut report = GenerationReport::default();
        for outcome in outcomes {
            match outcome {
                Ok(written) => report.written.push(written),
                Err(failure) => {
                    warn!(
                        "Failed to generate {}.{}: {}",
                        failure.namespace, failure.class_name, failure.error
                    );
                    report.failures.push(failure);
                }
            }
        }

        stats.written_files = report.written.len();
        stats.failed_classes = report.failures.len();
        report.stats = stats;

        if self.config.write_manifest {
            report.manifest_path = Some(self.write_manifest(catalog.module_name(), &report)?);
        }

        info!(
            "Gen finished: {} files written, {} failed",
            report.stats.written_files, report.stats.failed_classes
        );
        Ok(report)
    }

    /// Reject classes whose output path is invalid or already taken
    fn plan<'a>(&self, selected: Vec<SelectedType<'a>>) -> Vec<PlannedStub<'a>> {
        let mut seen: HashSet<PathBuf> = HashSet::new();

        selected
            .into_iter()
            .map(|selection| -> PlannedStub<'a> {
                let failure = |error: String| ClassFailure {
                    namespace: selection.namespace.to_string(),
                    class_name: selection.descriptor.name.clone(),
                    error,
                };

                let path = stub_path(
                    &self.config.output_root,
                    selection.namespace,
                    &selection.descriptor.name,
                    &self.config.file_extension,
                )
                .map_err(|e| failure(format!("{:#}", e)))?;

                if !seen.insert(path.clone()) {
                    return Err(failure(format!("Duplicate output path {}", path.display())));
                }
                Ok(selection)
            })
            .collect()
    }

    /// Create the output root, or clear stale output from a previous run
    fn prepare_output_root(&self, stats: &mut GenerationStats) -> Result<()> {
        let root = &self.config.output_root;

        if !root.is_dir() {
            return file_utils::ensure_dir_exists(root);
        }

        // The manifest is a top-level file, read it before clearing
        let previous = if self.config.prune_stale {
            self.load_previous_manifest()
        } else {
            None
        };

        stats.removed_files += file_utils::remove_files_in_dir(root)?;

        if let Some(previous) = previous {
            self.prune_previous_output(&previous, stats)?;
        }

        debug!(
            "Cleared {} files and {} directories from {}",
            stats.removed_files, stats.removed_dirs, root.display()
        );
        Ok(())
    }

    fn load_previous_manifest(&self) -> Option<GenerationManifest> {
        let path = self.config.output_root.join(MANIFEST_FILE);
        if !path.is_file() {
            debug!("No previous manifest at {}, skipping pruning", path.display());
            return None;
        }

        match ManifestStorage::new(&path).load() {
            Ok(manifest) => Some(manifest),
            Err(e) => {
                warn!("Ignoring unreadable manifest, skipping pruning: {:#}", e);
                None
            }
        }
    }

    /// Remove stubs recorded by the previous run, then the namespace
    /// directories that are no longer exported and have been left empty.
    ///
    /// Only files that still match their recorded digest are deleted, and
    /// nothing outside the previous manifest is touched.
    fn prune_previous_output(&self, previous: &GenerationManifest, stats: &mut GenerationStats) -> Result<()> {
        let root = &self.config.output_root;

        for entry in &previous.entries {
            // The previous run may have used another extension
            let extension = entry
                .path
                .extension()
                .and_then(|ext| ext.to_str())
                .unwrap_or(self.config.file_extension.as_str());

            let Ok(path) = stub_path(root, &entry.namespace, &entry.class_name, extension) else {
                warn!("Skipping invalid manifest entry {}.{}", entry.namespace, entry.class_name);
                continue;
            };
            if !path.is_file() {
                continue;
            }

            if hash_utils::hash_file(&path)? != entry.sha256 {
                warn!("Keeping {}: modified since the last run", path.display());
                continue;
            }

            trace!("Removing stale stub {}", path.display());
            fs::remove_file(&path)
                .with_context(|| format!("Failed to remove file {}", path.display()))?;
            stats.removed_files += 1;
        }

        for namespace in &previous.namespaces {
            if self.config.namespaces.contains(namespace) || !is_valid_path_component(namespace) {
                continue;
            }

            let dir = root.join(namespace);
            if !dir.is_dir() {
                continue;
            }

            let (files, dirs) = file_utils::list_children(&dir)?;
            if files.is_empty() && dirs.is_empty() {
                debug!("Removing stale namespace directory {}", dir.display());
                fs::remove_dir(&dir)
                    .with_context(|| format!("Failed to remove directory {}", dir.display()))?;
                stats.removed_dirs += 1;
            } else {
                warn!("Keeping {}: contains files not written by this tool", dir.display());
            }
        }

        Ok(())
    }

    /// Render and write every planned stub on a worker pool
    fn render_all(&self, planned: &[PlannedStub<'_>]) -> Result<Vec<std::result::Result<WrittenStub, ClassFailure>>> {
        let threads = self.config.parallel_threads.unwrap_or_else(|| {
            let available = num_cpus::get();
            let used = std::cmp::max(1, available.saturating_sub(1));
            debug!("Using {} threads for rendering (available: {})", used, available);
            used
        });

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build()
            .context("Failed to build rendering thread pool")?;

        let options = RenderOptions {
            include_inherited: self.config.include_inherited,
        };
        let root = self.config.output_root.as_path();
        let extension = self.config.file_extension.as_str();

        let outcomes = pool.install(|| {
            self.progress_tracker.track_parallel_progress(
                planned,
                |item| match item {
                    Ok(selection) => selection.descriptor.name.clone(),
                    Err(failure) => failure.class_name.clone(),
                },
                |item| match item {
                    Ok(selection) => render_one(selection, root, extension, &options),
                    Err(failure) => Err(failure.clone()),
                },
            )
        });

        Ok(outcomes)
    }

    fn write_manifest(&self, module: &str, report: &GenerationReport) -> Result<PathBuf> {
        let path = self.config.output_root.join(MANIFEST_FILE);
        let manifest = GenerationManifest::from_report(
            module,
            &self.config.namespaces,
            &self.config.output_root,
            report,
        );
        ManifestStorage::new(&path).save(&manifest)?;
        Ok(path)
    }
}

fn render_one(
    selection: &SelectedType<'_>,
    root: &Path,
    extension: &str,
    options: &RenderOptions,
) -> std::result::Result<WrittenStub, ClassFailure> {
    render_and_write(selection.descriptor, selection.namespace, root, extension, options)
        .map_err(|e| ClassFailure {
            namespace: selection.namespace.to_string(),
            class_name: selection.descriptor.name.clone(),
            error: format!("{:#}", e),
        })
}

/// Generate stubs with `config`, loading the catalog from `config.catalog_path`
pub fn generate(config: GeneratorConfig) -> Result<GenerationReport> {
    StubGenerator::new(config)?.run()
}
