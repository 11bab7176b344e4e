//! Canonical constants for keytree.
//!
//! The type tags are part of every signed message and MUST NOT change for a
//! given record layout; a new layout gets a new version suffix.

/// Type tag appended to an entry digest before signing.
pub const ENTRY_TYPE_TAG: &str = "github.com/jellevandenhooff/keytree.Entry-0.4";

/// Type tag appended to a root digest before signing.
pub const ROOT_TYPE_TAG: &str = "github.com/jellevandenhooff/keytree.Root-0.1";

/// Maximum age of a signed root accepted by a verifier, in seconds.
pub const MAX_SIGNATURE_AGE_SECS: u64 = 60;

/// Public keys of the well-known keytree servers.
///
/// (host, key token)
pub const WELL_KNOWN_KEYS: [(&str, &str); 3] = [
    (
        "keytree.io",
        "ed25519-pub(26wj522ncyprkc0t9yr1e1cz2szempbddkay02qqqxqkjnkbnygg)",
    ),
    (
        "mzero.org",
        "ed25519-pub(53y84fc8acd8z1t0ckwvtc1nc2srrgrkee5mwtxvtdqytpwrc36g)",
    ),
    (
        "thesquareplanet.com",
        "ed25519-pub(9rr08e8hf82xfkpx944xht4asksasfgnxj8fxkmf3tczeaj1v7q0)",
    ),
];

/// Number of well-known servers that must agree by default.
pub const WELL_KNOWN_THRESHOLD: usize = 2;
