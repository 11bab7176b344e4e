use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use keytree_cli::cmd;
use keytree_cli::config::{Config, LoggingConfig};

#[derive(Debug, Parser)]
#[command(name = "keytree")]
#[command(version, about = "Verify and sign keytree lookups")]
struct Cli {
    /// Path to a trust configuration file (defaults to the well-known servers)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Verify a lookup response for a name.
    Verify(cmd::verify::VerifyArgs),
    /// Generate or derive a signing keypair.
    Keygen(cmd::keygen::KeygenArgs),
    /// Sign a root statement.
    SignRoot(cmd::sign_root::SignRootArgs),
    /// Print deterministic hashing and signing vectors as JSON.
    Vectors,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::from_file(path).context("Failed to load configuration")?,
        None => Config::default(),
    };

    init_logging(&config.logging, cli.debug)?;

    match cli.command {
        Command::Verify(args) => cmd::verify::run_verify(args, &config)?,
        Command::Keygen(args) => cmd::keygen::run(args)?,
        Command::SignRoot(args) => cmd::sign_root::run(args)?,
        Command::Vectors => cmd::vectors::run()?,
    }

    Ok(())
}

/// Initialize tracing subscriber for logging
fn init_logging(logging: &LoggingConfig, debug: bool) -> Result<()> {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let env_filter = if debug {
        EnvFilter::new("keytree_cli=debug,keytree_verifier=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "keytree_cli={0},keytree_verifier={0}",
                logging.level
            ))
        })
    };

    let registry = tracing_subscriber::registry().with(env_filter);
    if logging.format == "json" {
        registry
            .with(
                fmt::layer()
                    .json()
                    .with_target(true)
                    .with_line_number(true)
                    .with_writer(std::io::stderr),
            )
            .try_init()?;
    } else {
        registry
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_line_number(true)
                    .with_writer(std::io::stderr),
            )
            .try_init()?;
    }

    Ok(())
}
