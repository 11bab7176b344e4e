//! Sparse Merkle trie audit paths for keytree.
//!
//! This crate provides:
//! - [`AuditHashes`], the sparse depth-to-sibling map carried in a lookup
//! - [`TrieLookup::compute_root`], the fold that turns an audit path into
//!   the root it commits to, for both inclusion and absence proofs
//! - with `test_utils`, an in-memory [`ReferenceTrie`] that serves the same
//!   audit paths a keytree server would

#![warn(missing_docs)]

pub mod error;
pub mod proof;

#[cfg(any(test, feature = "test_utils"))]
mod node;
#[cfg(any(test, feature = "test_utils"))]
pub mod tree;

pub use error::{Result, TrieError};
pub use proof::{AuditHashes, TrieLookup};
#[cfg(any(test, feature = "test_utils"))]
pub use tree::ReferenceTrie;
