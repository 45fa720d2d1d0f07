pub mod catalog;
pub mod config;
pub mod manifest;
pub mod stub;
pub mod utils;

// Re-export main types and functions for easier access
pub use catalog::{CatalogDocument, CatalogLoader, ModuleCatalog, TypeCatalog, TypeDescriptor, TypeRef};
pub use config::GeneratorConfig;
pub use stub::{generate, GenerationReport, StubGenerator};

pub use manifest::{GenerationManifest, ManifestStorage};

// Re-export utility functions
pub use utils::file_utils;
