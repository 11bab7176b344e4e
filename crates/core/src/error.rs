//! Error types for the core crate.

use thiserror::Error;

/// Malformed token, wrapper or key material.
///
/// Decoding never yields a partial result: any inconsistency between the
/// expected type tag, the enclosing parentheses, the encoded token or the
/// decoded length is reported here.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormatError {
    /// A character outside the 32-symbol alphabet.
    #[error("Invalid token character {ch:?} at position {position}")]
    InvalidCharacter {
        /// Offending character.
        ch: char,
        /// Byte offset inside the token.
        position: usize,
    },

    /// Token length that no byte string encodes to.
    #[error("Invalid token length: {0}")]
    InvalidLength(usize),

    /// Unused trailing bits were not zero.
    #[error("Non-canonical token (trailing bits set)")]
    NonCanonical,

    /// Wrapper did not start with `<tag>(` or did not end with `)`.
    #[error("Expected a {expected}(...) wrapper")]
    BadWrapper {
        /// Expected type tag.
        expected: &'static str,
    },

    /// Decoded payload had the wrong size for its type.
    #[error("Wrong length for {what}: expected {expected} bytes, got {actual}")]
    WrongSize {
        /// What was being decoded.
        what: &'static str,
        /// Required size.
        expected: usize,
        /// Decoded size.
        actual: usize,
    },

    /// Bytes decoded but are not valid key material.
    #[error("Invalid {what}: {reason}")]
    InvalidKey {
        /// Key kind.
        what: &'static str,
        /// Underlying reason.
        reason: String,
    },
}

/// Core error type.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Malformed token or key material.
    #[error(transparent)]
    Format(#[from] FormatError),

    /// Password-based key derivation failed.
    #[error("Key derivation failed: {0}")]
    KeyDerivation(String),
}

/// Result type alias for CoreError.
pub type Result<T> = std::result::Result<T, CoreError>;
