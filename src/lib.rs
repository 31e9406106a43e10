//! jsonprobe - an interactive terminal tool for querying JSON, JSONL, and
//! YAML documents.
//!
//! The library is split into the document model ([`document`]), file
//! loading ([`file`]), path completion ([`completion`]), the sandboxed
//! query language ([`query`]), value rendering ([`render`]), and the
//! terminal front end ([`session`], [`input`], [`ui`]).

pub mod completion;
pub mod config;
pub mod document;
pub mod file;
pub mod input;
pub mod query;
pub mod render;
pub mod session;
pub mod ui;
