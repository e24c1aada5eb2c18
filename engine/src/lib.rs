//! Reveal engine for Unveil - session state and the cooperative scheduler.
//!
//! This crate has no terminal or async dependencies. The host owns the clock and the
//! input source; it feeds timer ticks and [`InputEvent`]s into a [`RevealScheduler`]
//! and stops looping when a handler returns [`TickOutcome::Terminate`].

// Pedantic lint configuration - these are intentional design choices
#![allow(clippy::missing_errors_doc)] // Result-returning functions are self-explanatory
#![allow(clippy::missing_panics_doc)] // Panics are documented in assertions

mod scheduler;
mod session;
mod settings;
mod timer;

pub use scheduler::{Phase, RevealRow, RevealScheduler, RevealView};
pub use session::{SelectionSession, SessionError};
pub use settings::{
    DEFAULT_INITIAL_DELAY, DEFAULT_JUMBLE_INTERVAL, DEFAULT_MIN_WIDTH, DEFAULT_RESOLVE_INTERVAL,
    DEFAULT_STAGGER_PERIOD, RevealSettings, SettingsError,
};
pub use timer::{Timer, TimerQueue};

pub use unveil_config::{ConfigError, RevealConfig, UnveilConfig};
pub use unveil_types::{InputEvent, RevealToken, TickKind, TickOutcome, TokenState};
