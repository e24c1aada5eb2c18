use std::time::Duration;

use rand::SeedableRng;
use rand::rngs::StdRng;
use thiserror::Error;

use unveil_config::RevealConfig;

pub const DEFAULT_MIN_WIDTH: usize = 20;
pub const DEFAULT_JUMBLE_INTERVAL: Duration = Duration::from_millis(100);
pub const DEFAULT_RESOLVE_INTERVAL: Duration = Duration::from_millis(500);
pub const DEFAULT_INITIAL_DELAY: Duration = Duration::from_secs(2);
pub const DEFAULT_STAGGER_PERIOD: u64 = 4;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SettingsError {
    #[error("{field} must be greater than zero")]
    ZeroInterval { field: &'static str },
    #[error("stagger_period must be at least 1")]
    ZeroStaggerPeriod,
    #[error("min_width must be at least 1")]
    ZeroWidth,
}

/// Validated reveal timing and layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevealSettings {
    /// Lower bound on token width; the longest name widens every token past it.
    pub min_width: usize,
    pub jumble_interval: Duration,
    pub resolve_interval: Duration,
    /// Delay before the first automatic resolve tick.
    pub initial_delay: Duration,
    /// Resolve ticks between automatic activations.
    pub stagger_period: u64,
    pub seed: Option<u64>,
}

impl Default for RevealSettings {
    fn default() -> Self {
        Self {
            min_width: DEFAULT_MIN_WIDTH,
            jumble_interval: DEFAULT_JUMBLE_INTERVAL,
            resolve_interval: DEFAULT_RESOLVE_INTERVAL,
            initial_delay: DEFAULT_INITIAL_DELAY,
            stagger_period: DEFAULT_STAGGER_PERIOD,
            seed: None,
        }
    }
}

impl RevealSettings {
    /// Overlay a `[reveal]` config table on the defaults and validate the result.
    pub fn from_config(config: &RevealConfig) -> Result<Self, SettingsError> {
        let defaults = Self::default();
        let settings = Self {
            min_width: config.min_width.unwrap_or(defaults.min_width),
            jumble_interval: config
                .jumble_interval_ms
                .map_or(defaults.jumble_interval, Duration::from_millis),
            resolve_interval: config
                .resolve_interval_ms
                .map_or(defaults.resolve_interval, Duration::from_millis),
            initial_delay: config
                .initial_delay_ms
                .map_or(defaults.initial_delay, Duration::from_millis),
            stagger_period: config.stagger_period.unwrap_or(defaults.stagger_period),
            seed: config.seed,
        };
        settings.validate()?;
        Ok(settings)
    }

    /// Both tick intervals must be non-zero, otherwise a re-armed timer is due again
    /// immediately and the loop never yields.
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.jumble_interval.is_zero() {
            return Err(SettingsError::ZeroInterval {
                field: "jumble_interval_ms",
            });
        }
        if self.resolve_interval.is_zero() {
            return Err(SettingsError::ZeroInterval {
                field: "resolve_interval_ms",
            });
        }
        if self.stagger_period == 0 {
            return Err(SettingsError::ZeroStaggerPeriod);
        }
        if self.min_width == 0 {
            return Err(SettingsError::ZeroWidth);
        }
        Ok(())
    }

    /// The random source for a session: seeded when configured, OS entropy otherwise.
    #[must_use]
    pub fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        }
    }
}
