pub mod types;
mod loader;

use anyhow::{Result, bail};
use serde::{Serialize, Deserialize};

// Re-export from submodules
pub use types::{
    TypeDescriptor, TypeKind, TypeRef, MemberFlags,
    PropertyDescriptor, FieldDescriptor, MethodDescriptor, ParameterDescriptor,
};
pub use loader::CatalogLoader;

/// Read-only view over the types loaded from one code module
pub trait TypeCatalog: Sync {
    /// Name of the module the types were loaded from
    fn module_name(&self) -> &str;

    /// All types in the module, in catalog order
    fn types(&self) -> &[TypeDescriptor];
}

/// Types belonging to a single module
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModuleCatalog {
    /// Module (assembly) name
    pub name: String,

    /// Types in the order the module yields them
    #[serde(default)]
    pub types: Vec<TypeDescriptor>,
}

impl ModuleCatalog {
    pub fn new(name: impl Into<String>, types: Vec<TypeDescriptor>) -> Self {
        Self {
            name: name.into(),
            types,
        }
    }
}

impl TypeCatalog for ModuleCatalog {
    fn module_name(&self) -> &str {
        &self.name
    }

    fn types(&self) -> &[TypeDescriptor] {
        &self.types
    }
}

/// A set of modules, as stored in a catalog file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogDocument {
    #[serde(default)]
    pub modules: Vec<ModuleCatalog>,
}

impl CatalogDocument {
    pub fn new(modules: Vec<ModuleCatalog>) -> Self {
        Self { modules }
    }

    /// Find a module by exact name
    pub fn find_module(&self, name: &str) -> Option<&ModuleCatalog> {
        self.modules.iter().find(|module| module.name == name)
    }

    /// Find a module by name, failing when it is absent
    pub fn require_module(&self, name: &str) -> Result<&ModuleCatalog> {
        match self.find_module(name) {
            Some(module) => Ok(module),
            None => bail!(
                "Module '{}' not found in catalog (available: {})",
                name,
                self.module_names().join(", ")
            ),
        }
    }

    pub fn module_names(&self) -> Vec<&str> {
        self.modules.iter().map(|module| module.name.as_str()).collect()
    }

    /// Merge another document into this one.
    ///
    /// Types of a module already present are appended to it, new modules are
    /// appended at the end.
    pub fn merge(&mut self, other: CatalogDocument) {
        for module in other.modules {
            match self.modules.iter_mut().find(|existing| existing.name == module.name) {
                Some(existing) => existing.types.extend(module.types),
                None => self.modules.push(module),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_module_reports_available_names() {
        let doc = CatalogDocument::new(vec![
            ModuleCatalog::new("Assembly-CSharp-Editor", Vec::new()),
            ModuleCatalog::new("UnityEngine", Vec::new()),
        ]);

        let err = doc.require_module("Assembly-CSharp").unwrap_err();
        let message = err.to_string();
        assert!(message.contains("Assembly-CSharp"));
        assert!(message.contains("UnityEngine"));
    }

    #[test]
    fn test_merge_concatenates_same_module() {
        let mut doc = CatalogDocument::new(vec![ModuleCatalog::new(
            "Assembly-CSharp",
            vec![TypeDescriptor::class("Game", "Player")],
        )]);

        doc.merge(CatalogDocument::new(vec![
            ModuleCatalog::new("Assembly-CSharp", vec![TypeDescriptor::class("Game", "Enemy")]),
            ModuleCatalog::new("Plugins", vec![TypeDescriptor::class("Vendor", "Helper")]),
        ]));

        assert_eq!(doc.module_names(), vec!["Assembly-CSharp", "Plugins"]);
        let names: Vec<&str> = doc.modules[0].types().iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["Player", "Enemy"]);
    }
}
