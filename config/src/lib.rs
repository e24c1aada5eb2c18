//! Configuration loading for Unveil.
//!
//! The config file is optional. When present it lives at `~/.unveil/config.toml`:
//!
//! ```toml
//! [app]
//! high_contrast = false
//! names = ["Edd Barrett", "Matt Mole", "${USER}"]
//!
//! [reveal]
//! min_width = 20
//! jumble_interval_ms = 100
//! resolve_interval_ms = 500
//! initial_delay_ms = 2000
//! stagger_period = 4
//! seed = 42
//! ```
//!
//! Every field is optional; the engine owns the defaults.

use serde::Deserialize;
use std::{
    env, fs,
    path::{Path, PathBuf},
};
use thiserror::Error;

/// Overrides `[reveal].seed` when set to a valid `u64`.
pub const SEED_ENV_VAR: &str = "UNVEIL_SEED";

#[derive(Debug, Default, Deserialize)]
pub struct UnveilConfig {
    pub app: Option<AppConfig>,
    pub reveal: Option<RevealConfig>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config at {}: {}", .path.display(), .source)]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config at {}: {}", .path.display(), .source)]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

impl ConfigError {
    pub fn path(&self) -> &PathBuf {
        match self {
            ConfigError::Read { path, .. } | ConfigError::Parse { path, .. } => path,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct AppConfig {
    /// Enable a high-contrast color palette.
    #[serde(default)]
    pub high_contrast: bool,
    /// Names revealed when none are given on the command line.
    #[serde(default)]
    pub names: Vec<String>,
}

/// Timing and layout knobs for the reveal animation.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct RevealConfig {
    pub min_width: Option<usize>,
    pub jumble_interval_ms: Option<u64>,
    pub resolve_interval_ms: Option<u64>,
    pub initial_delay_ms: Option<u64>,
    /// Resolve ticks between automatic activations.
    pub stagger_period: Option<u64>,
    /// Fixed RNG seed for a reproducible reveal.
    pub seed: Option<u64>,
}

/// Expand `${VAR}` references using the process environment.
///
/// Unknown variables expand to the empty string; an unterminated `${` is kept verbatim.
pub fn expand_env_vars(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut rest = value;

    while let Some(start) = rest.find("${") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        match after.find('}') {
            Some(end) => {
                let var = &after[..end];
                if !var.is_empty() {
                    out.push_str(&env::var(var).unwrap_or_default());
                }
                rest = &after[end + 1..];
            }
            None => {
                out.push_str(&rest[start..]);
                rest = "";
            }
        }
    }

    out.push_str(rest);
    out
}

impl UnveilConfig {
    /// Load the user config. A missing file is not an error.
    pub fn load() -> Result<Option<Self>, ConfigError> {
        let path = match config_path() {
            Some(path) => path,
            None => return Ok(None),
        };
        Self::load_from(&path)
    }

    pub fn load_from(path: &Path) -> Result<Option<Self>, ConfigError> {
        if !path.exists() {
            return Ok(None);
        }

        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(err) => {
                tracing::warn!("Failed to read config at {:?}: {}", path, err);
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source: err,
                });
            }
        };

        match toml::from_str(&content) {
            Ok(config) => Ok(Some(config)),
            Err(err) => {
                tracing::warn!("Failed to parse config at {:?}: {}", path, err);
                Err(ConfigError::Parse {
                    path: path.to_path_buf(),
                    source: err,
                })
            }
        }
    }

    #[must_use]
    pub fn path() -> Option<PathBuf> {
        config_path()
    }

    /// Configured names with `${VAR}` references expanded and blanks dropped.
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        self.app
            .as_ref()
            .map(|app| {
                app.names
                    .iter()
                    .map(|name| expand_env_vars(name))
                    .filter(|name| !name.trim().is_empty())
                    .collect()
            })
            .unwrap_or_default()
    }

    #[must_use]
    pub fn high_contrast(&self) -> bool {
        self.app.as_ref().is_some_and(|app| app.high_contrast)
    }

    /// The `[reveal]` table with the environment seed override applied.
    #[must_use]
    pub fn reveal(&self) -> RevealConfig {
        let mut reveal = self.reveal.clone().unwrap_or_default();
        if let Some(seed) = seed_from_env() {
            reveal.seed = Some(seed);
        }
        reveal
    }
}

/// Seed taken from [`SEED_ENV_VAR`], if set and parseable.
#[must_use]
pub fn seed_from_env() -> Option<u64> {
    let raw = env::var(SEED_ENV_VAR).ok()?;
    match raw.trim().parse() {
        Ok(seed) => Some(seed),
        Err(_) => {
            tracing::warn!("Ignoring non-numeric {}: {}", SEED_ENV_VAR, raw);
            None
        }
    }
}

#[must_use]
pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".unveil").join("config.toml"))
}
