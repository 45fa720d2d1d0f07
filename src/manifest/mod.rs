pub mod types;
pub mod storage;

// Re-export main types for easier access
pub use types::{GenerationManifest, ManifestEntry};
pub use storage::ManifestStorage;
