//! jstrip Core - Key exclusion over JSON trees
//!
//! This crate holds the filtering engine for jstrip with no I/O dependencies
//! beyond `std::io::Write` sinks. It includes:
//!
//! - Case-insensitive exclusion sets
//! - Integer/float number classification
//! - Streaming filter that emits while it walks the tree
//! - Intermediate-tree filter and dry-run counting
//! - Error types

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod exclusion;
pub mod filter;
pub mod number;

// Re-export commonly used types
pub use error::{FilterError, Result};
pub use exclusion::ExclusionSet;
pub use filter::{count_matches, filter, filter_to_vec, filter_value};
pub use number::NumberRepr;

/// Output formatting options for the streaming filter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterOptions {
    /// Pretty-print the output (multi-line, indented)
    pub pretty: bool,
    /// Spaces per nesting level when `pretty` is set
    pub indent: usize,
    /// Terminate the document with a newline
    pub trailing_newline: bool,
}

impl Default for FilterOptions {
    fn default() -> Self {
        Self {
            pretty: true,
            indent: 2,
            trailing_newline: false,
        }
    }
}

impl FilterOptions {
    /// Single-line output with no insignificant whitespace
    pub fn compact() -> Self {
        Self {
            pretty: false,
            ..Self::default()
        }
    }
}
