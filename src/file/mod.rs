//! Document loading for jsonprobe.
//!
//! This module reads JSON, JSONL, and YAML documents from disk or stdin,
//! with gzip support and a hard size ceiling, and classifies every failure
//! into a `LoadError`.

pub mod loader;

pub use loader::{load_file, load_stdin, Format, LoadError, MAX_FILE_SIZE};
