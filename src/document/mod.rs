//! Document model for jsonprobe.
//!
//! The document model is the tree produced by the loader and shared
//! read-only by the path index and the query evaluator.

pub mod node;
pub mod parser;

pub use node::{Number, Value};
