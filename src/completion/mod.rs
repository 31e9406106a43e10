//! Path indexing and fuzzy completion for jsonprobe.
//!
//! The path index walks a loaded document once and records every addressable
//! path in canonical bracket notation rooted at `_`. The fuzzy matcher
//! answers "what can come next" queries over that index as the user types:
//!
//! - `_` - the document root
//! - `_['key']` - mapping member access
//! - `_[0]` - sequence element access
//!
//! Both components are total over well-formed input; malformed base paths
//! degrade to empty result sets.

pub mod index;
pub mod matcher;

pub use index::{PathIndex, ROOT_TOKEN};
pub use matcher::{FuzzyMatcher, DEFAULT_MAX_RESULTS};
