//! I/O modules: data files, generated data and background child loading.

pub mod child_loader;
pub mod file_loader;
pub mod generator;

// Re-export commonly used types
pub use child_loader::{ChildLoader, LoadedChildren, LoadingState};
pub use file_loader::{load_records, parse_records, save_records};
pub use generator::{generate, generate_children, GeneratorParams};
