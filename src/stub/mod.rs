pub mod types;
pub mod filter;
pub mod render;
pub mod writer;
mod progress;
mod generator;

// Re-export the main API for easier access
pub use types::{ClassFailure, GenerationReport, GenerationStats, WrittenStub};
pub use filter::{select_types, FilterStats, SelectedType, TypeFilter};
pub use render::{render_class, render_type_name, MemberCounts, RenderOptions};
pub use writer::render_and_write;
pub use progress::ProgressTracker;
pub use generator::{generate, StubGenerator, MANIFEST_FILE};
