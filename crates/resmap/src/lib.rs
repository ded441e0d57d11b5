//! Static resource map compilation for embedded servers.
//!
//! This crate compiles a directory tree of static resources into
//! per-directory transition tables (tries) that an embedded server links in
//! at build time and dispatches against without touching the filesystem:
//! - Directory scanning and handler-name normalization
//! - Trie compilation with lazy leaf splitting
//! - C source emission of the compiled tables
//! - Makefile dependency fragment emission

pub mod depfile;
pub mod emit;
pub mod error;
pub mod map;
pub mod registry;
pub mod scan;

// Re-export main types
pub use error::{ResmapError, Result};
pub use map::{Map, MapId, Terminal};
pub use registry::MapRegistry;
pub use scan::{scan_root, Entry, EntryKind};
