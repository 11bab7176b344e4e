use anyhow::Context;
use clap::Args;
use keytree_core::{Hash, Root, Signer};
use keytree_verifier::SignedRoot;

#[derive(Debug, Args)]
pub struct SignRootArgs {
    /// Signing key, ed25519-priv(...)
    #[arg(long, env = "KEYTREE_SIGNING_KEY", hide_env_values = true)]
    pub key: String,
    /// Trie root hash token
    #[arg(long)]
    pub root_hash: String,
    /// Root timestamp in Unix seconds (defaults to now)
    #[arg(long)]
    pub timestamp: Option<u64>,
}

/// Sign a root statement.
pub fn sign_root(args: &SignRootArgs) -> anyhow::Result<SignedRoot> {
    let signer = Signer::new(&args.key).context("invalid --key")?;
    let root_hash: Hash = args.root_hash.parse().context("invalid --root-hash")?;
    let timestamp = match args.timestamp {
        Some(timestamp) => timestamp,
        None => super::unix_now()?,
    };

    let root = Root {
        root_hash,
        timestamp,
    };
    Ok(SignedRoot {
        signature: signer.sign(&root),
        root,
    })
}

pub fn run(args: SignRootArgs) -> anyhow::Result<()> {
    let signed = sign_root(&args)?;
    println!("{}", serde_json::to_string_pretty(&signed)?);
    Ok(())
}
