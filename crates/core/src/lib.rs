//! # keytree core
//!
//! Token codec, canonical hashing, record digests and type-bound signatures
//! for the keytree name-to-key directory.
//!
//! Everything in this crate is a pure function of its inputs. Verification
//! of full lookup responses lives in `keytree-verifier`; audit-path folding
//! lives in `keytree-trie`.
//!
//! ## Features
//!
//! - **Codec**: `<tag>(<token>)` encoding of digests and key material
//! - **Hashing**: SHA-512 [`Hasher`] with length-prefixed framing
//! - **Records**: [`Entry`] and [`Root`] digests
//! - **Signing**: Ed25519 signatures bound to a record type tag

#![warn(missing_docs)]

pub mod codec;
pub mod constants;
pub mod error;
pub mod hashing;
pub mod keys;
pub mod records;
pub mod signing;

// Re-export commonly used items
pub use constants::*;
pub use error::{CoreError, FormatError, Result};
pub use hashing::{combine_hashes, hash_string, Hash, Hasher, HASH_BITS, HASH_LEN};
pub use keys::{PrivateKey, PublicKey, Signature};
pub use records::{entry_hash, Entry, Root, Signable};
pub use signing::{
    derive_signing_keypair, generate_signing_keypair, sign, verify, verify_token, Signer,
};
