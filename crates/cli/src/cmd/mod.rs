//! Subcommands.

pub mod keygen;
pub mod sign_root;
pub mod vectors;
pub mod verify;

/// Current wall-clock time in Unix seconds.
pub(crate) fn unix_now() -> anyhow::Result<u64> {
    u64::try_from(chrono::Utc::now().timestamp())
        .map_err(|_| anyhow::anyhow!("System clock is before the Unix epoch"))
}
