//! Human-safe token encoding for digests and key material.
//!
//! Tokens use a 32-symbol lowercase alphabet that drops the visually
//! ambiguous letters `i`, `l`, `o` and `u`. Each symbol carries 5 bits, most
//! significant bit first, and there is no padding. Typed values are wrapped
//! as `<tag>(<token>)`.

use crate::error::FormatError;

/// The token alphabet.
pub const ALPHABET: &[u8; 32] = b"0123456789abcdefghjkmnpqrstvwxyz";

/// Type tag for Ed25519 public keys.
pub const TAG_ED25519_PUBLIC: &str = "ed25519-pub";
/// Type tag for Ed25519 private keys.
pub const TAG_ED25519_PRIVATE: &str = "ed25519-priv";
/// Type tag for detached Ed25519 signatures.
pub const TAG_ED25519_SIGNATURE: &str = "ed25519-sig";
/// Type tag for box (Curve25519) public keys.
pub const TAG_BOX_PUBLIC: &str = "box-pub";
/// Type tag for box (Curve25519) private keys.
pub const TAG_BOX_PRIVATE: &str = "box-priv";
/// Type tag for sealed boxes (nonce followed by ciphertext).
pub const TAG_BOX_SEALED: &str = "box-box";

fn symbol_value(ch: char) -> Option<u8> {
    if !ch.is_ascii() {
        return None;
    }
    ALPHABET
        .iter()
        .position(|&symbol| symbol == ch as u8)
        .map(|index| index as u8)
}

/// Encode raw bytes as a token.
///
/// # Example
///
/// ```
/// use keytree_core::codec::encode;
///
/// assert_eq!(encode(&[1, 2, 3]), "04106");
/// ```
pub fn encode(data: &[u8]) -> String {
    let mut out = String::with_capacity((data.len() * 8).div_ceil(5));
    let mut buffer: u16 = 0;
    let mut bits: u32 = 0;

    for &byte in data {
        buffer = (buffer << 8) | u16::from(byte);
        bits += 8;
        while bits >= 5 {
            bits -= 5;
            out.push(ALPHABET[usize::from((buffer >> bits) & 0x1f)] as char);
        }
        buffer &= (1u16 << bits) - 1;
    }

    if bits > 0 {
        out.push(ALPHABET[usize::from((buffer << (5 - bits)) & 0x1f)] as char);
    }

    out
}

/// Decode a token back into raw bytes.
///
/// Rejects unknown symbols, impossible lengths and tokens whose unused
/// trailing bits are set, so every byte string has exactly one token.
pub fn decode(token: &str) -> Result<Vec<u8>, FormatError> {
    let mut out = Vec::with_capacity(token.len() * 5 / 8);
    let mut buffer: u16 = 0;
    let mut bits: u32 = 0;

    for (position, ch) in token.char_indices() {
        let value = symbol_value(ch).ok_or(FormatError::InvalidCharacter { ch, position })?;
        buffer = (buffer << 5) | u16::from(value);
        bits += 5;
        if bits >= 8 {
            bits -= 8;
            out.push((buffer >> bits) as u8);
            buffer &= (1u16 << bits) - 1;
        }
    }

    if matches!(token.len() % 8, 1 | 3 | 6) {
        return Err(FormatError::InvalidLength(token.len()));
    }
    if buffer != 0 {
        return Err(FormatError::NonCanonical);
    }

    Ok(out)
}

/// Wrap raw bytes as `<tag>(<token>)`.
pub fn wrap(data: &[u8], tag: &str) -> String {
    format!("{}({})", tag, encode(data))
}

/// Strip a `<tag>(...)` wrapper and decode its token.
pub fn unwrap(wrapped: &str, tag: &'static str) -> Result<Vec<u8>, FormatError> {
    let token = wrapped
        .strip_prefix(tag)
        .and_then(|rest| rest.strip_prefix('('))
        .and_then(|rest| rest.strip_suffix(')'))
        .ok_or(FormatError::BadWrapper { expected: tag })?;
    decode(token)
}

/// Unwrap a token that must decode to exactly `N` bytes.
pub fn unwrap_fixed<const N: usize>(
    wrapped: &str,
    tag: &'static str,
) -> Result<[u8; N], FormatError> {
    let bytes = unwrap(wrapped, tag)?;
    <[u8; N]>::try_from(bytes.as_slice()).map_err(|_| FormatError::WrongSize {
        what: tag,
        expected: N,
        actual: bytes.len(),
    })
}
