//! Per-name reveal state.
//!
//! A [`RevealToken`] holds a name padded to a fixed width and the set of character
//! positions whose true value is currently shown. Every other position is masked by a
//! random glyph each time the token is rendered.

use std::iter::repeat_n;
use std::ops::RangeInclusive;

use rand::Rng;

/// Printable ASCII used for masked positions: `!` through `y`.
pub const MASK_GLYPHS: RangeInclusive<u8> = 33..=121;

/// Center `text` in a field of `width` characters.
///
/// Odd padding goes on the right in an even field and on the left in an odd one, so
/// `"Ann"` in 6 is `" Ann  "` and `"Ab"` in 5 is `"  Ab "`. Text longer than `width`
/// is returned unchanged.
#[must_use]
pub fn pad_center(text: &str, width: usize) -> String {
    let len = text.chars().count();
    if len >= width {
        return text.to_string();
    }
    let pad = width - len;
    let left = pad / 2 + (pad & width & 1);
    let mut out = String::with_capacity(width);
    out.extend(repeat_n(' ', left));
    out.push_str(text);
    out.extend(repeat_n(' ', pad - left));
    out
}

#[derive(Debug, Clone)]
pub struct RevealToken {
    name: String,
    text: Vec<char>,
    resolved: Vec<bool>,
    unresolved: Vec<usize>,
}

impl RevealToken {
    /// Build a token for `name`, centred in a field of `width` characters.
    ///
    /// The effective width never drops below the name's own length.
    #[must_use]
    pub fn new(name: impl Into<String>, width: usize) -> Self {
        let name = name.into();
        let text: Vec<char> = pad_center(&name, width).chars().collect();
        let width = text.len();
        Self {
            name,
            text,
            resolved: vec![false; width],
            unresolved: (0..width).collect(),
        }
    }

    /// The original, unpadded name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The padded target text.
    #[must_use]
    pub fn text(&self) -> String {
        self.text.iter().collect()
    }

    #[must_use]
    pub fn width(&self) -> usize {
        self.text.len()
    }

    #[must_use]
    pub fn resolved_count(&self) -> usize {
        self.width() - self.unresolved.len()
    }

    #[must_use]
    pub fn is_resolved(&self, position: usize) -> bool {
        self.resolved.get(position).copied().unwrap_or(false)
    }

    /// Resolved positions in ascending order.
    pub fn resolved_positions(&self) -> impl Iterator<Item = usize> + '_ {
        self.resolved
            .iter()
            .enumerate()
            .filter_map(|(pos, &done)| done.then_some(pos))
    }

    #[must_use]
    pub fn is_fully_resolved(&self) -> bool {
        self.unresolved.is_empty()
    }

    /// Render the current mask: true characters at resolved positions, a fresh random
    /// glyph from [`MASK_GLYPHS`] everywhere else.
    pub fn render_mask<R: Rng + ?Sized>(&self, rng: &mut R) -> String {
        self.text
            .iter()
            .zip(&self.resolved)
            .map(|(&ch, &done)| {
                if done {
                    ch
                } else {
                    char::from(rng.random_range(MASK_GLYPHS))
                }
            })
            .collect()
    }

    /// Resolve one position chosen uniformly from the unresolved ones and return it.
    ///
    /// Callers must check [`is_fully_resolved`](Self::is_fully_resolved) first; there is
    /// nothing left to pick on a fully resolved token.
    pub fn resolve_one_char<R: Rng + ?Sized>(&mut self, rng: &mut R) -> usize {
        assert!(
            !self.is_fully_resolved(),
            "resolve_one_char called on fully resolved token {:?}",
            self.name
        );
        let pick = rng.random_range(0..self.unresolved.len());
        let position = self.unresolved.swap_remove(pick);
        self.resolved[position] = true;
        position
    }
}
