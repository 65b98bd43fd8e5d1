//! Caching modules for relative lookups.

pub mod tree_cache;

// Re-export commonly used types
pub use tree_cache::TreeCache;
