//! Shared test utilities and fixtures
//!
//! A virtual-clock harness: the scheduler runs against a [`TimerQueue`] that only moves
//! when the test says so, so timelines are exact and tests never sleep.

#![allow(dead_code)]

use std::time::{Duration, Instant};

use unveil_engine::{
    InputEvent, Phase, RevealScheduler, RevealSettings, TickKind, TickOutcome, TimerQueue,
};

pub const MS: Duration = Duration::from_millis(1);

/// Settings with a fixed seed and the production cadence.
pub fn seeded_settings(seed: u64) -> RevealSettings {
    RevealSettings {
        seed: Some(seed),
        ..RevealSettings::default()
    }
}

/// A launched scheduler plus the virtual clock it runs on.
pub struct Harness {
    pub scheduler: RevealScheduler,
    pub timers: TimerQueue,
    pub start: Instant,
}

impl Harness {
    pub fn launch(names: &[&str], settings: RevealSettings) -> Self {
        let start = Instant::now();
        let mut timers = TimerQueue::new(start);
        let mut scheduler = RevealScheduler::from_names(names.iter().copied(), settings);
        scheduler.launch(&mut timers);
        Self {
            scheduler,
            timers,
            start,
        }
    }

    /// Milliseconds since launch on the virtual clock.
    pub fn elapsed_ms(&self) -> u128 {
        self.timers.now().duration_since(self.start).as_millis()
    }

    /// Fire the next armed timer. `None` when nothing is armed.
    pub fn fire_next(&mut self) -> Option<(TickKind, TickOutcome)> {
        let deadline = self.timers.next_deadline()?;
        let kind = self.timers.pop_due(deadline)?;
        let outcome = self.scheduler.on_tick(kind, &mut self.timers);
        Some((kind, outcome))
    }

    /// Fire timers until the next resolve tick has run, returning its outcome.
    pub fn next_resolve(&mut self) -> Option<TickOutcome> {
        loop {
            match self.fire_next()? {
                (TickKind::Resolve, outcome) => return Some(outcome),
                (TickKind::Jumble, _) => {}
            }
        }
    }

    /// Run until the session finishes or `max_ticks` resolve ticks have run.
    pub fn run_to_finish(&mut self, max_ticks: usize) -> Option<TickOutcome> {
        for _ in 0..max_ticks {
            let outcome = self.next_resolve()?;
            if outcome != TickOutcome::Continue {
                return Some(outcome);
            }
        }
        None
    }

    /// Deliver input at `at_ms` after launch, firing any timers due before it.
    pub fn input_at(&mut self, at_ms: u64, event: InputEvent) -> TickOutcome {
        let at = self.start + Duration::from_millis(at_ms);
        while let Some(kind) = self.timers.pop_due(at) {
            self.scheduler.on_tick(kind, &mut self.timers);
        }
        self.timers.advance_to(at);
        self.scheduler.on_input(event, &mut self.timers)
    }

    pub fn phase(&self) -> Phase {
        self.scheduler.phase()
    }

    /// Activated flags, one character per token: `#` activated, `.` not yet.
    pub fn activation_row(&self) -> String {
        let session = self.scheduler.session();
        (0..session.len())
            .map(|index| if session.is_activated(index) { '#' } else { '.' })
            .collect()
    }
}
