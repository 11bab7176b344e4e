use clap::Args;
use keytree_core::{derive_signing_keypair, generate_signing_keypair, PrivateKey, PublicKey};

#[derive(Debug, Args)]
pub struct KeygenArgs {
    /// Derive the key from this secret instead of generating one
    #[arg(long, requires = "salt", env = "KEYTREE_SECRET", hide_env_values = true)]
    pub secret: Option<String>,
    /// Salt for derivation (the name the key belongs to)
    #[arg(long, requires = "secret")]
    pub salt: Option<String>,
}

/// Fresh or derived signing keypair.
pub fn keygen(args: &KeygenArgs) -> anyhow::Result<(PublicKey, PrivateKey)> {
    match (&args.secret, &args.salt) {
        (Some(secret), Some(salt)) => Ok(derive_signing_keypair(secret, salt)?),
        _ => Ok(generate_signing_keypair()),
    }
}

pub fn run(args: KeygenArgs) -> anyhow::Result<()> {
    let (public, private) = keygen(&args)?;
    let out = serde_json::json!({
        "public": public.to_token(),
        "private": private.to_token(),
    });
    println!("{}", serde_json::to_string_pretty(&out)?);
    Ok(())
}
