//! Layered launch configuration

use crate::Result;
use config::{Config, Environment, File};
use dbx_client::ConfigLookup;
use std::path::Path;
use tracing::{debug, warn};

/// Environment variable prefix, e.g. `DBX_STORAGE__ACCESSTOKEN`
pub const ENV_PREFIX: &str = "DBX";

/// Configuration the application was launched with.
///
/// Sources, lowest precedence first: `config/default.*`, `config/local.*`
/// (both optional), then `DBX_`-prefixed environment variables with `__`
/// separating nested keys. A `.env` file next to `config/` is loaded into
/// the environment first when present; variables already set win.
#[derive(Debug, Clone)]
pub struct LaunchConfig {
    inner: Config,
}

impl LaunchConfig {
    /// Load from the working directory and the process environment
    pub fn load() -> Result<Self> {
        Self::load_from(".")
    }

    /// Load with `.env` and `config/` resolved relative to `base_dir`
    pub fn load_from(base_dir: impl AsRef<Path>) -> Result<Self> {
        let env_file = base_dir.as_ref().join(".env");
        match dotenvy::from_path(&env_file) {
            Ok(()) => debug!("Loaded environment from {}", env_file.display()),
            Err(e) if e.not_found() => {}
            Err(e) => warn!("Ignoring unreadable {}: {}", env_file.display(), e),
        }

        let config_dir = base_dir.as_ref().join("config");
        let inner = Config::builder()
            .add_source(File::from(config_dir.join("default")).required(false))
            .add_source(File::from(config_dir.join("local")).required(false))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?;

        Ok(Self { inner })
    }

    /// Wrap an already built configuration
    pub fn from_config(inner: Config) -> Self {
        Self { inner }
    }

    /// An empty configuration; every lookup yields its default
    pub fn empty() -> Self {
        Self {
            inner: Config::default(),
        }
    }

    /// String value at `key`, or `default` when the key is absent.
    ///
    /// Environment keys arrive lowercased, so a miss on the exact key is
    /// retried in lowercase.
    pub fn get_other(&self, key: &str, default: &str) -> String {
        self.get(key).unwrap_or_else(|| default.to_string())
    }

    /// String value at `key`, if present
    pub fn get(&self, key: &str) -> Option<String> {
        self.inner
            .get_string(key)
            .or_else(|_| self.inner.get_string(&key.to_lowercase()))
            .ok()
    }

    /// The underlying layered configuration
    pub fn inner(&self) -> &Config {
        &self.inner
    }
}

impl Default for LaunchConfig {
    fn default() -> Self {
        Self::empty()
    }
}

impl ConfigLookup for LaunchConfig {
    fn lookup(&self, key: &str, default: &str) -> String {
        self.get_other(key, default)
    }
}
