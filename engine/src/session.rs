//! Selection session: the set of tokens being revealed and their activation state.
//!
//! # Tick order
//!
//! Each call to [`SelectionSession::advance`] runs three steps, always in this order:
//!
//! 1. every active token resolves one character, then fully resolved tokens leave the
//!    active set
//! 2. on a stagger boundary the next token (by tick, floor division) is activated
//! 3. completion is checked
//!
//! A token that finishes in step 1 never frees the stagger to activate early: the next
//! activation still waits for its boundary.

use rand::Rng;
use rand::rngs::StdRng;
use thiserror::Error;
use tracing::{debug, info};

use unveil_types::{RevealToken, TokenState};

use crate::RevealSettings;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("activation index {index} is out of range for {len} tokens")]
    IndexOutOfRange { index: usize, len: usize },
}

#[derive(Debug)]
pub struct SelectionSession<R = StdRng> {
    tokens: Vec<RevealToken>,
    activated: Vec<bool>,
    /// Indices mid-reveal, in activation order.
    active: Vec<usize>,
    stagger_period: u64,
    started: bool,
    finished: bool,
    tick: u64,
    rng: R,
}

impl<R: Rng> SelectionSession<R> {
    /// Build a session with one token per name, in input order.
    ///
    /// Every token shares one width: `min_width` or the longest name, whichever is larger.
    pub fn new<I, S>(names: I, min_width: usize, stagger_period: u64, rng: R) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        assert!(stagger_period > 0, "stagger period must be at least 1");

        let names: Vec<String> = names.into_iter().map(Into::into).collect();
        let width = names
            .iter()
            .map(|name| name.chars().count())
            .max()
            .unwrap_or(0)
            .max(min_width);
        let tokens: Vec<RevealToken> = names
            .into_iter()
            .map(|name| RevealToken::new(name, width))
            .collect();

        Self {
            activated: vec![false; tokens.len()],
            tokens,
            active: Vec::new(),
            stagger_period,
            started: false,
            finished: false,
            tick: 0,
            rng,
        }
    }

    pub fn with_settings<I, S>(names: I, settings: &RevealSettings, rng: R) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(names, settings.min_width, settings.stagger_period, rng)
    }

    /// Activate `index` if it has never been activated.
    ///
    /// Returns `Ok(true)` when the index was newly activated and `Ok(false)` when it
    /// had been activated before.
    pub fn start(&mut self, index: usize) -> Result<bool, SessionError> {
        if index >= self.tokens.len() {
            return Err(SessionError::IndexOutOfRange {
                index,
                len: self.tokens.len(),
            });
        }
        Ok(self.activate(index))
    }

    /// Start the session explicitly by activating the first token.
    ///
    /// An empty session has nothing to reveal and finishes here. Returns `true` if the
    /// session just finished.
    pub fn begin(&mut self) -> bool {
        if self.started || self.finished {
            return false;
        }
        self.started = true;
        if !self.tokens.is_empty() {
            self.activate(0);
        }
        self.check_finished()
    }

    /// Run one resolve step at `tick`. Returns `true` exactly once: on the step that
    /// finishes the session.
    pub fn advance(&mut self, tick: u64) -> bool {
        if self.finished {
            return false;
        }
        debug_assert!(
            tick >= self.tick,
            "tick went backwards: {tick} < {}",
            self.tick
        );
        self.tick = tick;

        let snapshot = self.active.clone();
        for index in snapshot {
            if !self.tokens[index].is_fully_resolved() {
                self.tokens[index].resolve_one_char(&mut self.rng);
            }
        }
        let tokens = &self.tokens;
        self.active.retain(|&index| {
            let done = tokens[index].is_fully_resolved();
            if done {
                debug!(index, tick, "token resolved");
            }
            !done
        });

        if tick % self.stagger_period == 0
            && let Ok(index) = usize::try_from(tick / self.stagger_period)
            && index < self.tokens.len()
        {
            self.activate(index);
        }

        self.check_finished()
    }

    fn activate(&mut self, index: usize) -> bool {
        if self.activated[index] {
            return false;
        }
        self.activated[index] = true;
        self.started = true;
        // A zero-width token has nothing to resolve and never enters the active set.
        if !self.tokens[index].is_fully_resolved() {
            self.active.push(index);
        }
        debug!(index, tick = self.tick, "token activated");
        true
    }

    fn check_finished(&mut self) -> bool {
        if self.finished
            || !self.started
            || !self.active.is_empty()
            || !self.activated.iter().all(|&done| done)
        {
            return false;
        }
        self.finished = true;
        info!(tokens = self.tokens.len(), tick = self.tick, "reveal finished");
        true
    }

    /// Render every token's current mask, in input order.
    pub fn render_masks(&mut self) -> Vec<String> {
        self.tokens
            .iter()
            .map(|token| token.render_mask(&mut self.rng))
            .collect()
    }
}

impl<R> SelectionSession<R> {
    #[must_use]
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    #[must_use]
    pub fn tokens(&self) -> &[RevealToken] {
        &self.tokens
    }

    #[must_use]
    pub fn token(&self, index: usize) -> Option<&RevealToken> {
        self.tokens.get(index)
    }

    #[must_use]
    pub fn active_indices(&self) -> &[usize] {
        &self.active
    }

    #[must_use]
    pub fn is_activated(&self, index: usize) -> bool {
        self.activated.get(index).copied().unwrap_or(false)
    }

    #[must_use]
    pub fn is_started(&self) -> bool {
        self.started
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Last tick passed to [`advance`](SelectionSession::advance).
    #[must_use]
    pub fn tick(&self) -> u64 {
        self.tick
    }

    #[must_use]
    pub fn stagger_period(&self) -> u64 {
        self.stagger_period
    }

    /// Shared token width, or zero for an empty session.
    #[must_use]
    pub fn width(&self) -> usize {
        self.tokens.first().map_or(0, RevealToken::width)
    }

    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.tokens.iter().map(RevealToken::name).collect()
    }

    #[must_use]
    pub fn token_state(&self, index: usize) -> Option<TokenState> {
        let token = self.tokens.get(index)?;
        let state = if !self.activated[index] {
            TokenState::Pending
        } else if token.is_fully_resolved() {
            TokenState::Resolved
        } else {
            TokenState::Active
        };
        Some(state)
    }
}
