//! Error types for the trie crate.

use keytree_core::FormatError;
use thiserror::Error;

/// Trie error type.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TrieError {
    /// Audit-path depth at or beyond the digest width.
    #[error("Audit path depth {depth} out of range (max {max})")]
    DepthOutOfRange {
        /// Offending depth.
        depth: usize,
        /// Number of trie levels.
        max: usize,
    },

    /// Audit-path depth that is not a decimal integer.
    #[error("Invalid audit path depth: {0:?}")]
    InvalidDepth(String),

    /// Malformed digest token inside an audit path.
    #[error(transparent)]
    Format(#[from] FormatError),
}

/// Result type alias for TrieError.
pub type Result<T> = std::result::Result<T, TrieError>;
