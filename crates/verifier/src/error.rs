//! Error types for lookup verification.

use keytree_core::{FormatError, Hash};
use thiserror::Error;

/// Why a lookup response was rejected.
///
/// Every variant is terminal: one failing signer voids the whole response.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VerificationError {
    /// A key, signature or digest in the response did not decode.
    #[error(transparent)]
    Format(#[from] FormatError),

    /// The audit path does not fold to the signed root.
    #[error("Bad root hash from {key}: audit path folds to {computed}, signed root is {signed}")]
    BadRootHash {
        /// Signer's public key token.
        key: String,
        /// Root recomputed from the audit path.
        computed: Hash,
        /// Root named in the signed statement.
        signed: Hash,
    },

    /// The signed root is older than the freshness window.
    #[error("Stale signature from {key}: root timestamp {timestamp} is before cutoff {cutoff}")]
    StaleSignature {
        /// Signer's public key token.
        key: String,
        /// Timestamp in the signed root.
        timestamp: u64,
        /// Oldest acceptable timestamp.
        cutoff: u64,
    },

    /// The signature over the root does not verify.
    #[error("Bad signature from {key}")]
    BadSignature {
        /// Signer's public key token.
        key: String,
    },

    /// Fewer trusted signers than the threshold.
    #[error("Insufficient signatures: {valid} trusted signers, need {threshold}")]
    InsufficientSignatures {
        /// Trusted keys that signed.
        valid: usize,
        /// Required number of trusted keys.
        threshold: usize,
    },

    /// The trust configuration itself is unusable.
    #[error("Invalid trust configuration: {0}")]
    InvalidConfig(String),
}

/// Result type alias for VerificationError.
pub type Result<T> = std::result::Result<T, VerificationError>;
