//! Configuration for the keytree CLI.
//!
//! A TOML file with two optional tables:
//!
//! ```toml
//! [trust]
//! keys = ["ed25519-pub(...)", "ed25519-pub(...)"]
//! threshold = 2
//! max_signature_age_secs = 60
//!
//! [logging]
//! level = "info"
//! format = "pretty"
//! ```
//!
//! `${VAR_NAME}` placeholders are replaced from the environment before
//! parsing. A missing `[trust]` table means the well-known servers.

use std::path::Path;

use anyhow::{Context, Result};
use keytree_core::{PublicKey, MAX_SIGNATURE_AGE_SECS, WELL_KNOWN_KEYS, WELL_KNOWN_THRESHOLD};
use keytree_verifier::TrustConfig;
use serde::{Deserialize, Serialize};

/// Main CLI configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Trusted servers
    #[serde(default)]
    pub trust: TrustSection,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Trusted server keys.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrustSection {
    /// `ed25519-pub(...)` tokens of trusted servers
    pub keys: Vec<String>,

    /// How many trusted servers must sign a lookup
    pub threshold: usize,

    /// Maximum age of a signed root in seconds
    #[serde(default = "default_max_signature_age_secs")]
    pub max_signature_age_secs: u64,
}

impl Default for TrustSection {
    fn default() -> Self {
        Self {
            keys: WELL_KNOWN_KEYS
                .iter()
                .map(|(_, token)| token.to_string())
                .collect(),
            threshold: WELL_KNOWN_THRESHOLD,
            max_signature_age_secs: default_max_signature_age_secs(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format: json or pretty
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_max_signature_age_secs() -> u64 {
    MAX_SIGNATURE_AGE_SECS
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Config {
    /// Load configuration from a TOML file.
    ///
    /// ```no_run
    /// # use keytree_cli::config::Config;
    /// let config = Config::from_file("trust.toml")?;
    /// # Ok::<(), anyhow::Error>(())
    /// ```
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let expanded = expand_env_vars(&contents)?;

        let config: Config = toml::from_str(&expanded)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        config.validate()?;

        Ok(config)
    }

    /// Load configuration from a TOML string.
    pub fn from_toml_str(toml: &str) -> Result<Self> {
        let expanded = expand_env_vars(toml)?;
        let config: Config =
            toml::from_str(&expanded).context("Failed to parse TOML configuration")?;

        config.validate()?;

        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.trust.keys.is_empty() {
            anyhow::bail!("Trust keys cannot be empty");
        }

        for (i, token) in self.trust.keys.iter().enumerate() {
            token
                .parse::<PublicKey>()
                .with_context(|| format!("Trust key #{} is not a valid public key: {}", i, token))?;
        }

        if self.trust.threshold == 0 {
            anyhow::bail!("Trust threshold must be at least 1");
        }

        if self.trust.threshold > self.trust.keys.len() {
            anyhow::bail!(
                "Trust threshold {} exceeds the number of keys ({})",
                self.trust.threshold,
                self.trust.keys.len()
            );
        }

        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.as_str()) {
            anyhow::bail!(
                "Logging level must be one of: {} (got '{}')",
                valid_levels.join(", "),
                self.logging.level
            );
        }

        let valid_formats = ["json", "pretty"];
        if !valid_formats.contains(&self.logging.format.as_str()) {
            anyhow::bail!(
                "Logging format must be one of: {} (got '{}')",
                valid_formats.join(", "),
                self.logging.format
            );
        }

        Ok(())
    }

    /// Build the verifier's trust configuration.
    pub fn trust_config(&self) -> Result<TrustConfig> {
        let config = TrustConfig::from_tokens(&self.trust.keys, self.trust.threshold)
            .context("Invalid trust configuration")?;
        Ok(config.with_max_signature_age(self.trust.max_signature_age_secs))
    }
}

/// Replace `${VAR_NAME}` placeholders with environment values.
///
/// Placeholders after a `#` outside a string are left alone, so commented
/// examples do not need their variables set. A placeholder naming an unset
/// variable is an error.
pub(crate) fn expand_env_vars(input: &str) -> Result<String> {
    let mut result = String::with_capacity(input.len());
    let mut quote: Option<char> = None;
    let mut in_comment = false;
    let mut escaped = false;
    let mut chars = input.char_indices().peekable();

    while let Some((pos, ch)) = chars.next() {
        if escaped {
            escaped = false;
            result.push(ch);
            continue;
        }

        match ch {
            '\n' => in_comment = false,
            '\\' if quote == Some('"') => escaped = true,
            '"' | '\'' if !in_comment => match quote {
                None => quote = Some(ch),
                Some(open) if open == ch => quote = None,
                Some(_) => {}
            },
            '#' if quote.is_none() => in_comment = true,
            '$' if !in_comment && matches!(chars.peek(), Some((_, '{'))) => {
                chars.next();
                let mut name = String::new();
                let mut closed = false;
                for (_, c) in chars.by_ref() {
                    if c == '}' {
                        closed = true;
                        break;
                    }
                    name.push(c);
                }

                if !closed {
                    anyhow::bail!(
                        "Unclosed environment variable placeholder at position {}",
                        pos
                    );
                }
                if name.is_empty() {
                    anyhow::bail!("Empty environment variable name at position {}", pos);
                }

                let value = std::env::var(&name).with_context(|| {
                    format!(
                        "Environment variable '{}' is not set (referenced at position {})",
                        name, pos
                    )
                })?;
                result.push_str(&value);
                continue;
            }
            _ => {}
        }

        result.push(ch);
    }

    Ok(result)
}
