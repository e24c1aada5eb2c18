//! Core reveal types for Unveil.
//!
//! This crate contains pure domain types with no IO, no async, and minimal dependencies.
//! The only outside collaborator is the random source, which is always passed in by the
//! caller so tests can seed it.

// Pedantic lint configuration - these are intentional design choices
#![allow(clippy::missing_errors_doc)] // Result-returning functions are self-explanatory
#![allow(clippy::missing_panics_doc)] // Panics are documented in assertions

mod token;

pub use token::{MASK_GLYPHS, RevealToken, pad_center};

// ============================================================================
// Scheduler vocabulary
// ============================================================================

/// The two periodic activities of a reveal run.
///
/// Each kind owns exactly one logical timer; firing a timer delivers its kind back to
/// the scheduler, which decides whether to re-arm it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TickKind {
    /// Fast cosmetic refresh of unresolved characters.
    Jumble,
    /// Slower tick that advances reveal progress.
    Resolve,
}

impl TickKind {
    /// Every kind, in the order simultaneous timers fire.
    pub const ALL: [TickKind; 2] = [TickKind::Jumble, TickKind::Resolve];
}

/// Discrete input delivered to the scheduler by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    /// Start early, or dismiss a finished reveal.
    Acknowledge,
    /// Host-level abort (Esc, `q`, Ctrl+C). Never routed into the session.
    Cancel,
    /// Terminal geometry changed; only forces a redraw.
    Resize,
    /// Anything else. Ignored.
    Other,
}

/// What the driving loop should do after a tick or input was handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Keep looping; armed timers stay armed.
    Continue,
    /// The session just finished. Timers are no longer re-armed; wait for input.
    Finished,
    /// Leave the loop.
    Terminate,
}

/// Display state of one token, used by the render surface for styling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenState {
    /// Not yet activated; the whole mask is random.
    Pending,
    /// Activated and receiving one character per resolve tick.
    Active,
    /// Every character is shown.
    Resolved,
}
