//! The set of signers a client trusts.

use std::collections::BTreeSet;

use keytree_core::{PublicKey, MAX_SIGNATURE_AGE_SECS, WELL_KNOWN_KEYS, WELL_KNOWN_THRESHOLD};

use crate::error::{Result, VerificationError};

/// Trusted signing keys, how many must agree, and how fresh their roots
/// must be.
///
/// Passed into every verification call; nothing reads it from global state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrustConfig {
    keys: BTreeSet<PublicKey>,
    threshold: usize,
    max_signature_age_secs: u64,
}

impl TrustConfig {
    /// Build a config requiring `threshold` of `keys`.
    ///
    /// Fails if `threshold` is zero or larger than the number of distinct
    /// keys, since such a config accepts everything or nothing.
    pub fn new(keys: impl IntoIterator<Item = PublicKey>, threshold: usize) -> Result<Self> {
        let keys: BTreeSet<PublicKey> = keys.into_iter().collect();
        if threshold == 0 {
            return Err(VerificationError::InvalidConfig(
                "threshold must be at least 1".to_string(),
            ));
        }
        if threshold > keys.len() {
            return Err(VerificationError::InvalidConfig(format!(
                "threshold {} exceeds the {} configured keys",
                threshold,
                keys.len()
            )));
        }
        Ok(Self {
            keys,
            threshold,
            max_signature_age_secs: MAX_SIGNATURE_AGE_SECS,
        })
    }

    /// Build a config from `ed25519-pub(...)` tokens.
    pub fn from_tokens<S: AsRef<str>>(
        tokens: impl IntoIterator<Item = S>,
        threshold: usize,
    ) -> Result<Self> {
        let keys = tokens
            .into_iter()
            .map(|token| token.as_ref().parse::<PublicKey>())
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Self::new(keys, threshold)
    }

    /// The public keytree servers, two of three required.
    pub fn well_known() -> Result<Self> {
        Self::from_tokens(
            WELL_KNOWN_KEYS.iter().map(|(_, token)| *token),
            WELL_KNOWN_THRESHOLD,
        )
    }

    /// Override the freshness window.
    pub fn with_max_signature_age(mut self, secs: u64) -> Self {
        self.max_signature_age_secs = secs;
        self
    }

    /// Trusted keys.
    pub fn keys(&self) -> &BTreeSet<PublicKey> {
        &self.keys
    }

    /// Whether `key` is trusted.
    pub fn trusts(&self, key: &PublicKey) -> bool {
        self.keys.contains(key)
    }

    /// Number of trusted keys that must sign.
    pub fn threshold(&self) -> usize {
        self.threshold
    }

    /// Maximum root age in seconds.
    pub fn max_signature_age_secs(&self) -> u64 {
        self.max_signature_age_secs
    }
}
