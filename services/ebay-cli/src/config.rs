//! Configuration types and loading
//!
//! Config precedence: CLI args > env vars > config file > defaults.
//! The client secret may come from EBAY_CLIENT_SECRET, a `client_secret_file`,
//! or inline in the TOML, in that order.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use ebay_oauth::{OAuthOptions, Secret};
use serde::Deserialize;

/// Environment variable overriding the client secret
pub const CLIENT_SECRET_ENV: &str = "EBAY_CLIENT_SECRET";

/// Environment variable naming the config file
pub const CONFIG_PATH_ENV: &str = "EBAY_CONFIG";

/// Root configuration
#[derive(Debug, Deserialize)]
pub struct Config {
    pub ebay: EbayConfig,
}

/// `[ebay]` table: library options plus host-only secret sourcing.
#[derive(Debug, Deserialize)]
pub struct EbayConfig {
    #[serde(flatten)]
    pub options: OAuthOptions,
    /// Path to a file containing the client secret
    #[serde(default)]
    pub client_secret_file: Option<PathBuf>,
}

impl Config {
    /// Load configuration from a TOML file, resolve the client secret, then
    /// validate the options so a bad file fails before any request is made.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        let mut config: Config =
            toml::from_str(&contents).with_context(|| format!("parsing {}", path.display()))?;

        if let Ok(secret) = std::env::var(CLIENT_SECRET_ENV) {
            config.ebay.options.client_secret = Secret::new(secret);
        } else if let Some(ref secret_file) = config.ebay.client_secret_file {
            let secret = std::fs::read_to_string(secret_file).with_context(|| {
                format!("failed to read client_secret_file {}", secret_file.display())
            })?;
            let secret = secret.trim().to_owned();
            if secret.is_empty() {
                bail!("client_secret_file {} is empty", secret_file.display());
            }
            config.ebay.options.client_secret = Secret::new(secret);
        }

        config.ebay.options.validate()?;
        Ok(config)
    }

    /// Resolve config file path from CLI arg or EBAY_CONFIG env var.
    pub fn resolve_path(cli_path: Option<&str>) -> PathBuf {
        if let Some(p) = cli_path {
            return PathBuf::from(p);
        }
        if let Ok(p) = std::env::var(CONFIG_PATH_ENV) {
            return PathBuf::from(p);
        }
        PathBuf::from("ebay.toml")
    }
}
