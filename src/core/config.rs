//! Configuration system: TOML file + env var overrides + explicit overrides + defaults.
//!
//! Precedence, highest first: explicit [`ConfigOverrides`], `CUKE_CONVERTER_*`
//! environment variables, the TOML file, built-in defaults.

#![allow(missing_docs)]

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::core::errors::{CrcError, Result};

/// File consulted when no explicit config path is given.
pub const DEFAULT_CONFIG_FILE: &str = "cuke-report-converter.toml";

/// Env var overriding [`ConverterConfig::fail_on_error`].
pub const ENV_FAIL_ON_ERROR: &str = "CUKE_CONVERTER_FAIL_ON_ERROR";
/// Env var overriding [`ConverterConfig::merge_features`].
pub const ENV_MERGE_FEATURES: &str = "CUKE_CONVERTER_MERGE_FEATURES";

/// Full converter configuration model.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(default)]
pub struct Config {
    pub converter: ConverterConfig,
    /// Where this config was loaded from (not part of the file itself).
    #[serde(skip)]
    pub source_path: Option<PathBuf>,
}

/// Conversion policy knobs.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ConverterConfig {
    /// Abort the whole run on the first undecodable report or unnamed feature.
    pub fail_on_error: bool,
    /// Fold features with the same name, across reports, into one feature.
    pub merge_features: bool,
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            fail_on_error: false,
            merge_features: true,
        }
    }
}

/// Caller-supplied values that beat every other configuration layer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    pub fail_on_error: Option<bool>,
    pub merge_features: Option<bool>,
}

impl ConfigOverrides {
    /// True when no override is set.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.fail_on_error.is_none() && self.merge_features.is_none()
    }
}

impl Config {
    /// Default configuration path.
    #[must_use]
    pub fn default_path() -> PathBuf {
        PathBuf::from(DEFAULT_CONFIG_FILE)
    }

    /// Load config from default or explicit path, then apply env overrides.
    ///
    /// Missing config file is not an error when loading from default path; defaults are used.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path_buf = path.map_or_else(Self::default_path, Path::to_path_buf);
        let is_explicit_path = path.is_some();

        let mut cfg = if path_buf.exists() {
            let raw = fs::read_to_string(&path_buf).map_err(|source| CrcError::Io {
                path: path_buf.clone(),
                source,
            })?;
            let mut parsed: Self = toml::from_str(&raw)?;
            parsed.source_path = Some(path_buf);
            parsed
        } else if is_explicit_path {
            return Err(CrcError::MissingConfig { path: path_buf });
        } else {
            log::debug!(
                "{} file is missing, using defaults",
                path_buf.display()
            );
            Self::default()
        };

        cfg.apply_env_overrides()?;
        Ok(cfg)
    }

    /// Load, then layer explicit overrides on top.
    pub fn load_with_overrides(path: Option<&Path>, overrides: ConfigOverrides) -> Result<Self> {
        let mut cfg = Self::load(path)?;
        cfg.apply_overrides(overrides);
        Ok(cfg)
    }

    /// Apply explicit overrides; these win over file and environment values.
    pub fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(fail_on_error) = overrides.fail_on_error {
            self.converter.fail_on_error = fail_on_error;
        }
        if let Some(merge_features) = overrides.merge_features {
            self.converter.merge_features = merge_features;
        }
    }

    /// Deterministic hash of the effective config for logging.
    ///
    /// Uses FNV-1a so the value is stable across processes and Rust releases.
    pub fn stable_hash(&self) -> Result<String> {
        let canonical = serde_json::to_string(self)?;
        let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
        for byte in canonical.as_bytes() {
            hash ^= u64::from(*byte);
            hash = hash.wrapping_mul(0x0100_0000_01b3);
        }
        Ok(format!("{hash:016x}"))
    }

    /// Render the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    fn apply_env_overrides(&mut self) -> Result<()> {
        self.apply_env_overrides_from(env_var)
    }

    fn apply_env_overrides_from<F>(&mut self, mut lookup: F) -> Result<()>
    where
        F: FnMut(&str) -> Option<String>,
    {
        if let Some(raw) = lookup(ENV_FAIL_ON_ERROR) {
            self.converter.fail_on_error = parse_env_bool(ENV_FAIL_ON_ERROR, &raw)?;
        }

        if let Some(raw) = lookup(ENV_MERGE_FEATURES) {
            self.converter.merge_features = parse_env_bool(ENV_MERGE_FEATURES, &raw)?;
        }

        Ok(())
    }
}

fn env_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|raw| !raw.trim().is_empty())
}

fn parse_env_bool(name: &str, raw: &str) -> Result<bool> {
    raw.trim()
        .to_ascii_lowercase()
        .parse::<bool>()
        .map_err(|error| CrcError::ConfigParse {
            context: "env",
            details: format!("{name}={raw:?}: {error}"),
        })
}
