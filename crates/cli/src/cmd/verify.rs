use anyhow::Context;
use clap::Args;
use keytree_core::Entry;
use keytree_verifier::{verify_lookup, Lookup};
use std::path::PathBuf;
use tracing::info;

use crate::config::Config;

#[derive(Debug, Args)]
pub struct VerifyArgs {
    /// Path to a lookup response JSON
    #[arg(long)]
    pub lookup: PathBuf,
    /// Name that was looked up (e.g. "email:alice@example.com")
    #[arg(long)]
    pub name: String,
    /// Verification time in Unix seconds (defaults to now)
    #[arg(long)]
    pub now: Option<u64>,
}

fn read_json<T: for<'de> serde::Deserialize<'de>>(path: &PathBuf) -> anyhow::Result<T> {
    let bytes = std::fs::read(path).with_context(|| format!("read {}", path.display()))?;
    serde_json::from_slice(&bytes).with_context(|| format!("parse JSON {}", path.display()))
}

/// Verify a lookup response file against the configured trust set.
pub fn verify(args: &VerifyArgs, config: &Config) -> anyhow::Result<Option<Entry>> {
    let lookup: Lookup = read_json(&args.lookup)?;
    let trust = config.trust_config()?;
    let now = match args.now {
        Some(now) => now,
        None => super::unix_now()?,
    };

    info!(
        "Verifying {} against {} trusted keys (threshold {})",
        args.name,
        trust.keys().len(),
        trust.threshold()
    );

    verify_lookup(&lookup, &args.name, &trust, now)
        .with_context(|| format!("lookup for {} rejected", args.name))
}

pub fn run_verify(args: VerifyArgs, config: &Config) -> anyhow::Result<()> {
    match verify(&args, config)? {
        Some(entry) => println!("{}", serde_json::to_string_pretty(&entry)?),
        None => println!("absent"),
    }
    Ok(())
}
