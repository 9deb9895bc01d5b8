// Public modules
pub mod config;
pub mod counter;
pub mod defaults;
pub mod error;
pub mod propagate;
pub mod renumber;

// Re-export common types for convenience
pub use error::{Error, ErrorCode, Result};
