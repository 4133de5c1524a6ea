//! Layered configuration for catalog and package fetches.
//!
//! Settings are resolved in increasing precedence: built-in defaults, a
//! TOML file, the `ENVM_SOURCE_URL` environment variable, then explicit
//! overrides supplied by the caller (usually command-line flags).

use crate::catalog::collector::DEFAULT_SOURCE_URL;
use crate::dirs::{BaseDirs, default_config_path};
use crate::transport::FetchOptions;
use camino::{Utf8Path, Utf8PathBuf};
use log::debug;
use serde::Deserialize;
use std::time::Duration;

/// Environment variable overriding the listing location.
pub const SOURCE_URL_ENV: &str = "ENVM_SOURCE_URL";

/// Errors arising from loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// An explicitly requested configuration file does not exist.
    #[error("configuration file {path} not found")]
    NotFound {
        /// The requested path.
        path: Utf8PathBuf,
    },

    /// The configuration file could not be read.
    #[error("failed to read configuration file {path}")]
    Read {
        /// The file that was read.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The configuration file is not valid TOML for [`FetchConfig`].
    #[error("invalid configuration file {path}")]
    Parse {
        /// The file that was parsed.
        path: Utf8PathBuf,
        /// The TOML decoding error.
        #[source]
        source: toml::de::Error,
    },
}

/// Fetch settings.
///
/// # Examples
///
/// ```
/// use envm_fetch::config::FetchConfig;
///
/// let config: FetchConfig = toml::from_str("timeout_secs = 0").expect("valid TOML");
/// assert!(config.fetch_options().timeout.is_none());
/// assert!(config.progress);
/// ```
#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct FetchConfig {
    /// Listing location; blank selects the default listing.
    pub source_url: String,
    /// Request timeout in seconds. Zero disables the timeout. It bounds
    /// the whole listing fetch but not a package body in flight.
    pub timeout_secs: u64,
    /// Whether download progress is shown.
    pub progress: bool,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            source_url: DEFAULT_SOURCE_URL.to_owned(),
            timeout_secs: 30,
            progress: true,
        }
    }
}

/// Values supplied by the caller that beat every other layer.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ConfigOverrides {
    /// Explicit listing location.
    pub source_url: Option<String>,
    /// Explicit timeout in seconds.
    pub timeout_secs: Option<u64>,
    /// Force progress output off.
    pub no_progress: bool,
}

impl FetchConfig {
    /// Load the file layer only.
    ///
    /// With `explicit` set, that file must exist. Otherwise the default
    /// location from `dirs` is tried and silently skipped when absent.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when an explicit file is missing, or when a
    /// file that exists cannot be read or parsed.
    pub fn load_file(explicit: Option<&Utf8Path>, dirs: &dyn BaseDirs) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            if !path.exists() {
                return Err(ConfigError::NotFound {
                    path: path.to_owned(),
                });
            }
            return Self::load_from(path);
        }
        match default_config_path(dirs) {
            Some(path) if path.is_file() => Self::load_from(&path),
            _ => {
                debug!("no configuration file found; using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Read and parse the TOML file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Read`] or [`ConfigError::Parse`].
    pub fn load_from(path: &Utf8Path) -> Result<Self, ConfigError> {
        debug!("loading configuration from {path}");
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_owned(),
            source,
        })?;
        toml::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_owned(),
            source,
        })
    }

    /// Resolve every layer: file, environment, then `overrides`.
    ///
    /// # Errors
    ///
    /// Propagates [`ConfigError`] from [`Self::load_file`].
    pub fn resolve(
        explicit: Option<&Utf8Path>,
        dirs: &dyn BaseDirs,
        overrides: &ConfigOverrides,
    ) -> Result<Self, ConfigError> {
        let config = Self::load_file(explicit, dirs)?;
        Ok(config.with_env(|key| std::env::var(key).ok()).with_overrides(overrides))
    }

    /// Apply environment variables read through `lookup`. Blank values are
    /// ignored.
    #[must_use]
    pub fn with_env<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(SOURCE_URL_ENV).filter(|value| !value.trim().is_empty()) {
            self.source_url = url;
        }
        self
    }

    /// Apply caller overrides.
    #[must_use]
    pub fn with_overrides(mut self, overrides: &ConfigOverrides) -> Self {
        if let Some(url) = &overrides.source_url {
            self.source_url.clone_from(url);
        }
        if let Some(timeout) = overrides.timeout_secs {
            self.timeout_secs = timeout;
        }
        if overrides.no_progress {
            self.progress = false;
        }
        self
    }

    /// Transport options derived from these settings.
    #[must_use]
    pub fn fetch_options(&self) -> FetchOptions {
        let timeout = (self.timeout_secs > 0).then(|| Duration::from_secs(self.timeout_secs));
        FetchOptions::with_timeout(timeout)
    }
}
