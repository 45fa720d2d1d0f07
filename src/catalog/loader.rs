use std::path::{Path, PathBuf};
use anyhow::{Result, Context, bail};
use log::{debug, info, trace};
use walkdir::WalkDir;

use crate::utils::file_utils;
use super::CatalogDocument;

/// Loads type catalogs from JSON or YAML files
#[derive(Debug)]
pub struct CatalogLoader {
    /// Valid catalog file extensions
    valid_extensions: Vec<String>,
}

impl Default for CatalogLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl CatalogLoader {
    /// Create a loader accepting `.json`, `.yaml` and `.yml` files
    pub fn new() -> Self {
        Self {
            valid_extensions: vec!["json".to_string(), "yaml".to_string(), "yml".to_string()],
        }
    }

    /// Load a catalog from a single file or from every catalog file under a directory
    pub fn load(&self, path: impl AsRef<Path>) -> Result<CatalogDocument> {
        let path = path.as_ref();

        if path.is_dir() {
            let files = self.collect_files(path)?;
            info!("Loading catalog from {} files in {}", files.len(), path.display());

            let mut document = CatalogDocument::default();
            for file in &files {
                document.merge(self.load_file(file)?);
            }
            Ok(document)
        } else {
            self.load_file(path)
        }
    }

    /// Load a single catalog file, choosing the format from its extension
    pub fn load_file(&self, path: impl AsRef<Path>) -> Result<CatalogDocument> {
        let path = path.as_ref();
        debug!("Loading catalog file: {}", path.display());

        let content = file_utils::read_file_to_string(path)?;

        let document: CatalogDocument = if file_utils::has_extension(path, "json") {
            serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse catalog file {}", path.display()))?
        } else if file_utils::has_any_extension(path, &["yaml", "yml"]) {
            serde_yaml::from_str(&content)
                .with_context(|| format!("Failed to parse catalog file {}", path.display()))?
        } else {
            bail!("Unsupported catalog file format: {}", path.display());
        };

        debug!(
            "Loaded {} modules ({} types) from {}",
            document.modules.len(),
            document.modules.iter().map(|m| m.types.len()).sum::<usize>(),
            path.display()
        );
        Ok(document)
    }

    /// Collect catalog files under a directory, sorted by path
    pub fn collect_files(&self, input_dir: impl AsRef<Path>) -> Result<Vec<PathBuf>> {
        let input_dir = input_dir.as_ref();
        debug!("Collecting catalog files from directory: {}", input_dir.display());

        let mut files = Vec::new();

        for entry in WalkDir::new(input_dir).follow_links(true).sort_by_file_name() {
            // A catalog that cannot be read must not silently drop its types
            let entry = entry
                .with_context(|| format!("Failed to read catalog directory {}", input_dir.display()))?;
            if !entry.file_type().is_file() {
                continue;
            }

            if let Some(ext) = entry.path().extension() {
                if let Some(ext_str) = ext.to_str() {
                    if self.valid_extensions.iter().any(|valid_ext| ext_str.eq_ignore_ascii_case(valid_ext)) {
                        trace!("Found catalog file: {}", entry.path().display());
                        files.push(entry.path().to_owned());
                    }
                }
            }
        }

        files.sort();
        debug!("Collected {} catalog files", files.len());
        Ok(files)
    }
}

#[cfg(test)]
mod tests {
    use std::fs;
    use anyhow::Result;
    use tempfile::tempdir;

    use super::*;
    use crate::catalog::{TypeCatalog, TypeKind};

    const JSON_CATALOG: &str = r#"{
        "modules": [{
            "name": "Assembly-CSharp",
            "types": [{
                "name": "Foo",
                "namespace": "Game",
                "kind": "class",
                "fields": [{
                    "name": "Count",
                    "type": { "name": "Int32", "namespace": "System" },
                    "flags": { "public": true, "static": true }
                }],
                "methods": [{
                    "name": "Bar",
                    "return_type": { "name": "Boolean" },
                    "flags": { "public": true },
                    "parameters": [{ "name": "name", "type": { "name": "String" } }]
                }]
            }]
        }]
    }"#;

    const YAML_CATALOG: &str = r#"
modules:
  - name: Assembly-CSharp
    types:
      - name: IDamageable
        namespace: Game
        kind: interface
      - name: Inventory
        namespace: GameLogic
        properties:
          - name: Items
            type:
              name: "List`1"
              generic_arguments:
                - name: Item
            flags:
              public: true
"#;

    #[test]
    fn test_load_json_file() -> Result<()> {
        let temp_dir = tempdir()?;
        let path = temp_dir.path().join("catalog.json");
        fs::write(&path, JSON_CATALOG)?;

        let document = CatalogLoader::new().load(&path)?;
        let module = document.require_module("Assembly-CSharp")?;
        assert_eq!(module.types().len(), 1);

        let foo = &module.types()[0];
        assert_eq!(foo.kind, TypeKind::Class);
        assert!(foo.fields[0].flags.is_static);
        assert!(foo.fields[0].flags.public);
        assert_eq!(foo.methods[0].parameters[0].parameter_type.name, "String");

        Ok(())
    }

    #[test]
    fn test_load_directory_merges_in_path_order() -> Result<()> {
        let temp_dir = tempdir()?;
        fs::write(temp_dir.path().join("b.yaml"), YAML_CATALOG)?;
        fs::write(temp_dir.path().join("a.json"), JSON_CATALOG)?;
        fs::write(temp_dir.path().join("notes.txt"), "ignored")?;

        let document = CatalogLoader::new().load(temp_dir.path())?;
        let module = document.require_module("Assembly-CSharp")?;
        let names: Vec<&str> = module.types().iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["Foo", "IDamageable", "Inventory"]);
        assert_eq!(module.types()[1].kind, TypeKind::Interface);

        Ok(())
    }

    #[test]
    fn test_missing_directory_is_an_error() -> Result<()> {
        let temp_dir = tempdir()?;
        let missing = temp_dir.path().join("catalogs");

        let err = CatalogLoader::new().collect_files(&missing).unwrap_err();
        assert!(err.to_string().contains("catalogs"));
        Ok(())
    }

    #[cfg(unix)]
    #[test]
    fn test_unreadable_entry_fails_the_load() -> Result<()> {
        let temp_dir = tempdir()?;
        fs::write(temp_dir.path().join("a.json"), JSON_CATALOG)?;
        std::os::unix::fs::symlink(
            temp_dir.path().join("missing.json"),
            temp_dir.path().join("b.json"),
        )?;

        assert!(CatalogLoader::new().load(temp_dir.path()).is_err());
        Ok(())
    }

    #[test]
    fn test_unsupported_extension_is_rejected() -> Result<()> {
        let temp_dir = tempdir()?;
        let path = temp_dir.path().join("catalog.xml");
        fs::write(&path, "<modules/>")?;

        assert!(CatalogLoader::new().load_file(&path).is_err());
        Ok(())
    }

    #[test]
    fn test_malformed_json_names_the_file() -> Result<()> {
        let temp_dir = tempdir()?;
        let path = temp_dir.path().join("broken.json");
        fs::write(&path, "{ \"modules\": [")?;

        let err = CatalogLoader::new().load_file(&path).unwrap_err();
        assert!(err.to_string().contains("broken.json"));
        Ok(())
    }
}
