//! Type-bound Ed25519 signatures over record digests.
//!
//! The signed message is always `digest || utf8(type_tag)`. Binding the tag
//! into the message means a signature over a [`Root`](crate::records::Root)
//! never verifies as a signature over an [`Entry`](crate::records::Entry),
//! even if their digests coincide.

use ed25519_dalek::Signer as _;
use rand_core::OsRng;
use scrypt::Params;
use zeroize::Zeroize;

use crate::error::{CoreError, FormatError, Result};
use crate::hashing::{Hash, HASH_LEN};
use crate::keys::{PrivateKey, PublicKey, Signature};
use crate::records::Signable;

// scrypt cost for password-derived keys: N = 2^14, r = 8, p = 1.
const KDF_LOG_N: u8 = 14;
const KDF_R: u32 = 8;
const KDF_P: u32 = 1;

fn message(digest: &Hash, type_tag: &str) -> Vec<u8> {
    let mut message = Vec::with_capacity(HASH_LEN + type_tag.len());
    message.extend_from_slice(digest.as_bytes());
    message.extend_from_slice(type_tag.as_bytes());
    message
}

/// Sign a digest under a type tag.
pub fn sign_digest(key: &PrivateKey, digest: &Hash, type_tag: &str) -> Signature {
    let signature = key.signing_key().sign(&message(digest, type_tag));
    Signature::from_bytes(signature.to_bytes())
}

/// Check a signature over a digest under a type tag.
///
/// Returns `false` for any cryptographically invalid signature, including
/// non-canonical encodings and small-order keys.
pub fn verify_digest(
    key: &PublicKey,
    digest: &Hash,
    type_tag: &str,
    signature: &Signature,
) -> bool {
    let signature = ed25519_dalek::Signature::from_bytes(&signature.to_bytes());
    key.verifying_key()
        .verify_strict(&message(digest, type_tag), &signature)
        .is_ok()
}

/// Sign a record under its own type tag.
pub fn sign<T: Signable>(key: &PrivateKey, record: &T) -> Signature {
    sign_digest(key, &record.hash(), T::TYPE_TAG)
}

/// Check a record signature under the record's own type tag.
pub fn verify<T: Signable>(key: &PublicKey, record: &T, signature: &Signature) -> bool {
    verify_digest(key, &record.hash(), T::TYPE_TAG, signature)
}

/// Token-level [`verify`]: malformed tokens are errors, bad signatures are
/// `Ok(false)`.
pub fn verify_token<T: Signable>(
    public_key: &str,
    record: &T,
    signature: &str,
) -> std::result::Result<bool, FormatError> {
    let key: PublicKey = public_key.parse()?;
    let signature: Signature = signature.parse()?;
    Ok(verify(&key, record, &signature))
}

/// Fresh keypair from the operating system RNG.
pub fn generate_signing_keypair() -> (PublicKey, PrivateKey) {
    let signing_key = ed25519_dalek::SigningKey::generate(&mut OsRng);
    let private = PrivateKey::from(signing_key);
    (private.public_key(), private)
}

/// Deterministic keypair derived from a secret and a salt with scrypt.
///
/// The 32 derived bytes are the Ed25519 seed, so the same `(secret, salt)`
/// always yields the same keypair. This is how recovery lock keys are
/// reproduced from a password, with the looked-up name as salt.
pub fn derive_signing_keypair(secret: &str, salt: &str) -> Result<(PublicKey, PrivateKey)> {
    let params = Params::new(KDF_LOG_N, KDF_R, KDF_P, 32)
        .map_err(|e| CoreError::KeyDerivation(e.to_string()))?;

    let mut seed = [0u8; 32];
    let derived = scrypt::scrypt(secret.as_bytes(), salt.as_bytes(), &params, &mut seed)
        .map_err(|e| CoreError::KeyDerivation(e.to_string()));
    if let Err(err) = derived {
        seed.zeroize();
        return Err(err);
    }

    let private = PrivateKey::from_seed(&seed);
    seed.zeroize();
    Ok((private.public_key(), private))
}

/// A validated private key that signs records.
#[derive(Clone, Debug)]
pub struct Signer {
    key: PrivateKey,
}

impl Signer {
    /// Parse a private key token and check it can produce a signature that
    /// its own public key accepts.
    pub fn new(private_key: &str) -> Result<Self> {
        let key: PrivateKey = private_key.parse()?;

        let self_check = Hash::EMPTY;
        let signature = sign_digest(&key, &self_check, "self-check");
        if !verify_digest(&key.public_key(), &self_check, "self-check", &signature) {
            return Err(FormatError::InvalidKey {
                what: "ed25519-priv",
                reason: "key does not verify its own signature".to_string(),
            }
            .into());
        }

        Ok(Self { key })
    }

    /// Public half of the signing key.
    pub fn public_key(&self) -> PublicKey {
        self.key.public_key()
    }

    /// Sign a record.
    pub fn sign<T: Signable>(&self, record: &T) -> Signature {
        sign(&self.key, record)
    }
}

impl From<PrivateKey> for Signer {
    fn from(key: PrivateKey) -> Self {
        Self { key }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hashing::hash_string;
    use crate::records::{Entry, Root};

    /// A record sharing its digest with another, for tag separation.
    struct Raw(Hash);

    impl Signable for Raw {
        const TYPE_TAG: &'static str = "raw";

        fn hash(&self) -> Hash {
            self.0
        }
    }

    fn test_key() -> PrivateKey {
        PrivateKey::from_seed(&[0x22u8; 32])
    }

    fn sample_root() -> Root {
        Root {
            root_hash: hash_string("root"),
            timestamp: 1_000,
        }
    }

    #[test]
    fn test_sign_and_verify_root() {
        let key = test_key();
        let root = sample_root();
        let signature = sign(&key, &root);
        assert!(verify(&key.public_key(), &root, &signature));

        let mut other = root;
        other.timestamp += 1;
        assert!(!verify(&key.public_key(), &other, &signature));
    }

    #[test]
    fn test_wrong_key_fails() {
        let root = sample_root();
        let signature = sign(&test_key(), &root);
        let other = PrivateKey::from_seed(&[0x33u8; 32]).public_key();
        assert!(!verify(&other, &root, &signature));
    }

    #[test]
    fn test_type_tag_separates_root_and_entry() {
        let key = test_key();
        let root = sample_root();
        let digest = root.hash();

        let root_signature = sign(&key, &root);
        assert!(verify_digest(
            &key.public_key(),
            &digest,
            Root::TYPE_TAG,
            &root_signature
        ));
        assert!(!verify_digest(
            &key.public_key(),
            &digest,
            Entry::TYPE_TAG,
            &root_signature
        ));

        let entry_signature = sign_digest(&key, &digest, Entry::TYPE_TAG);
        assert!(!verify(&key.public_key(), &root, &entry_signature));
    }

    #[test]
    fn test_same_digest_different_record_type() {
        let key = test_key();
        let root = sample_root();
        let raw = Raw(root.hash());

        let signature = sign(&key, &root);
        assert!(!verify(&key.public_key(), &raw, &signature));
    }

    #[test]
    fn test_signature_is_over_digest_and_tag() {
        let key = test_key();
        let root = sample_root();
        let signature = sign(&key, &root);

        let mut message = root.hash().as_bytes().to_vec();
        message.extend_from_slice(Root::TYPE_TAG.as_bytes());
        let expected = key.signing_key().sign(&message);
        assert_eq!(signature.to_bytes(), expected.to_bytes());
    }

    #[test]
    fn test_verify_token_reports_format_errors() {
        let key = test_key();
        let root = sample_root();
        let signature = sign(&key, &root).to_token();
        let public = key.public_key().to_token();

        assert_eq!(verify_token(&public, &root, &signature), Ok(true));

        let other = sign(&key, &Root { timestamp: 5, ..root }).to_token();
        assert_eq!(verify_token(&public, &root, &other), Ok(false));

        assert!(verify_token("ed25519-pub(zz)", &root, &signature).is_err());
        assert!(verify_token(&public, &root, &public).is_err());
        assert!(verify_token(&signature, &root, &signature).is_err());
    }

    #[test]
    fn test_generated_keypair_signs() {
        let (public, private) = generate_signing_keypair();
        assert_eq!(private.public_key(), public);
        let root = sample_root();
        assert!(verify(&public, &root, &sign(&private, &root)));
    }

    #[test]
    fn test_derive_signing_keypair_is_deterministic() {
        let (a_pub, a_priv) = derive_signing_keypair("hunter2", "email:alice@example.com").unwrap();
        let (b_pub, _) = derive_signing_keypair("hunter2", "email:alice@example.com").unwrap();
        let (c_pub, _) = derive_signing_keypair("hunter3", "email:alice@example.com").unwrap();

        assert_eq!(a_pub, b_pub);
        assert_ne!(a_pub, c_pub);
        assert_eq!(a_priv.public_key(), a_pub);
    }

    #[test]
    fn test_derive_signing_keypair_known_answer() {
        // scrypt(N = 2^14, r = 8, p = 1) seed, as existing lock keys use.
        let (public, _) = derive_signing_keypair("hunter2", "email:alice@example.com").unwrap();
        assert_eq!(
            public.to_token(),
            "ed25519-pub(kxmc58fddxsygdvm466vay0cfh9jhxs1evq0taz81k09qpzmgawg)"
        );
    }

    #[test]
    fn test_derive_accepts_short_and_empty_salt() {
        let (short, _) = derive_signing_keypair("secret", "a").unwrap();
        let (empty, _) = derive_signing_keypair("secret", "").unwrap();
        assert_ne!(short, empty);
    }

    #[test]
    fn test_signer_round_trip() {
        let signer = Signer::new(&test_key().to_token()).unwrap();
        let root = sample_root();
        let signature = signer.sign(&root);
        assert!(verify(&signer.public_key(), &root, &signature));
    }

    #[test]
    fn test_signer_rejects_bad_token() {
        assert!(Signer::new("ed25519-priv(00)").is_err());
        assert!(Signer::new(&test_key().public_key().to_token()).is_err());
    }
}
