//! Generic utility primitives with zero domain knowledge.
//!
//! - `io` - File I/O with consistent error handling and atomic writes
//! - `parser` - Line splitting, capture replacement and path resolution

pub mod io;
pub mod parser;
