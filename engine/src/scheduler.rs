//! Reveal scheduler: drives a [`SelectionSession`] from timer ticks and user input.
//!
//! # State machine
//!
//! ```text
//! Idle --launch--> Jumbling --first resolve tick / Enter--> Resolving
//!                                                              |
//!                                             session finished v
//!                  Dismissed <--Enter-- AwaitingAck
//!
//! any non-terminal phase --cancel--> Cancelled
//! ```
//!
//! Jumble ticks re-render masks and run from `launch` until the session finishes.
//! Resolve ticks advance the session; the first one activates token 0 after its (empty)
//! resolution step, while an early Enter activates token 0 at once. Both kinds are
//! one-shot timers re-armed by the handler, and both stop re-arming on the same
//! resolve tick that finishes the session.
//! The finished frame stays on screen until the user acknowledges it; there is no
//! timeout.

use std::mem;

use rand::Rng;
use rand::rngs::StdRng;
use tracing::{debug, info};

use unveil_types::{InputEvent, TickKind, TickOutcome, TokenState};

use crate::session::SelectionSession;
use crate::settings::RevealSettings;
use crate::timer::Timer;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Built, nothing armed.
    Idle,
    /// Masks flicker; waiting for the initial delay or an early start.
    Jumbling,
    /// Tokens are being activated and resolved.
    Resolving,
    /// Every name is legible; waiting for acknowledgement.
    AwaitingAck,
    /// Acknowledged after finishing. Terminal.
    Dismissed,
    /// Aborted by the host. Terminal.
    Cancelled,
}

impl Phase {
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Phase::Dismissed | Phase::Cancelled)
    }

    #[must_use]
    pub const fn is_running(self) -> bool {
        matches!(self, Phase::Jumbling | Phase::Resolving)
    }
}

/// One rendered row: the current mask of a token and its display state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevealRow {
    pub mask: String,
    pub state: TokenState,
}

/// Snapshot handed to the render surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevealView {
    pub rows: Vec<RevealRow>,
    pub phase: Phase,
}

#[derive(Debug)]
pub struct RevealScheduler<R = StdRng> {
    session: SelectionSession<R>,
    settings: RevealSettings,
    phase: Phase,
    tick: u64,
    frame: Vec<String>,
    redraw: bool,
}

impl RevealScheduler<StdRng> {
    /// Build a session for `names` using the settings' random source.
    pub fn from_names<I, S>(names: I, settings: RevealSettings) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let session = SelectionSession::with_settings(names, &settings, settings.rng());
        Self::new(session, settings)
    }
}

impl<R: Rng> RevealScheduler<R> {
    pub fn new(session: SelectionSession<R>, settings: RevealSettings) -> Self {
        Self {
            session,
            settings,
            phase: Phase::Idle,
            tick: 0,
            frame: Vec::new(),
            redraw: false,
        }
    }

    /// Render the first frame and arm both timers: jumble at its interval, the first
    /// resolve tick after the initial delay.
    pub fn launch(&mut self, timer: &mut impl Timer) {
        if self.phase != Phase::Idle {
            debug!(phase = ?self.phase, "launch ignored");
            return;
        }
        self.phase = Phase::Jumbling;
        self.render();
        timer.schedule_after(self.settings.jumble_interval, TickKind::Jumble);
        timer.schedule_after(self.settings.initial_delay, TickKind::Resolve);
        info!(
            tokens = self.session.len(),
            width = self.session.width(),
            stagger_period = self.session.stagger_period(),
            "reveal launched"
        );
    }

    pub fn on_tick(&mut self, kind: TickKind, timer: &mut impl Timer) -> TickOutcome {
        if self.phase.is_terminal() {
            return TickOutcome::Terminate;
        }
        if !self.phase.is_running() {
            // Stale tick after finishing, or before launch.
            return TickOutcome::Continue;
        }
        match kind {
            TickKind::Jumble => {
                self.render();
                timer.schedule_after(self.settings.jumble_interval, TickKind::Jumble);
                TickOutcome::Continue
            }
            TickKind::Resolve => self.resolve(timer),
        }
    }

    pub fn on_input(&mut self, event: InputEvent, timer: &mut impl Timer) -> TickOutcome {
        match event {
            InputEvent::Acknowledge => match self.phase {
                Phase::Jumbling => self.start_early(timer),
                Phase::AwaitingAck => {
                    self.phase = Phase::Dismissed;
                    timer.cancel(TickKind::Jumble);
                    timer.cancel(TickKind::Resolve);
                    info!("reveal dismissed");
                    TickOutcome::Terminate
                }
                Phase::Dismissed | Phase::Cancelled => TickOutcome::Terminate,
                Phase::Idle | Phase::Resolving => TickOutcome::Continue,
            },
            InputEvent::Cancel => self.cancel(timer),
            InputEvent::Resize => {
                self.redraw = true;
                if self.phase.is_terminal() {
                    TickOutcome::Terminate
                } else {
                    TickOutcome::Continue
                }
            }
            InputEvent::Other => {
                if self.phase.is_terminal() {
                    TickOutcome::Terminate
                } else {
                    TickOutcome::Continue
                }
            }
        }
    }

    /// Host-initiated stop. Disarms both timers.
    pub fn cancel(&mut self, timer: &mut impl Timer) -> TickOutcome {
        if !self.phase.is_terminal() {
            timer.cancel(TickKind::Jumble);
            timer.cancel(TickKind::Resolve);
            info!(phase = ?self.phase, "reveal cancelled");
            self.phase = Phase::Cancelled;
        }
        TickOutcome::Terminate
    }

    /// Enter before the initial delay: activate token 0 now and run resolve ticks from
    /// here on instead of waiting out the delay.
    fn start_early(&mut self, timer: &mut impl Timer) -> TickOutcome {
        debug!("early start");
        timer.cancel(TickKind::Resolve);
        self.phase = Phase::Resolving;
        let finished = self.session.begin();
        self.render();
        self.settle(finished, timer)
    }

    fn resolve(&mut self, timer: &mut impl Timer) -> TickOutcome {
        self.phase = Phase::Resolving;
        // Zero tokens: nothing for the stagger to activate, so start explicitly.
        let finished = if self.session.is_empty() {
            self.session.begin()
        } else {
            let finished = self.session.advance(self.tick);
            self.tick += 1;
            finished
        };
        self.render();
        self.settle(finished, timer)
    }

    fn settle(&mut self, finished: bool, timer: &mut impl Timer) -> TickOutcome {
        if finished {
            self.phase = Phase::AwaitingAck;
            timer.cancel(TickKind::Jumble);
            timer.cancel(TickKind::Resolve);
            TickOutcome::Finished
        } else {
            timer.schedule_after(self.settings.resolve_interval, TickKind::Resolve);
            TickOutcome::Continue
        }
    }

    fn render(&mut self) {
        self.frame = self.session.render_masks();
        self.redraw = true;
    }
}

impl<R> RevealScheduler<R> {
    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    #[must_use]
    pub fn session(&self) -> &SelectionSession<R> {
        &self.session
    }

    /// Resolve ticks run so far.
    #[must_use]
    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Masks from the most recent jumble or resolve tick.
    #[must_use]
    pub fn frame(&self) -> &[String] {
        &self.frame
    }

    /// Whether the frame changed since the last call.
    pub fn take_redraw(&mut self) -> bool {
        mem::take(&mut self.redraw)
    }

    #[must_use]
    pub fn view(&self) -> RevealView {
        let rows = self
            .frame
            .iter()
            .enumerate()
            .map(|(index, mask)| RevealRow {
                mask: mask.clone(),
                state: self
                    .session
                    .token_state(index)
                    .unwrap_or(TokenState::Pending),
            })
            .collect();
        RevealView {
            rows,
            phase: self.phase,
        }
    }
}
