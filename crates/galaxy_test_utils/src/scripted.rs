//! Replayable randomness.
//!
//! [`ScriptedSource`] hands out a fixed list of unit values in order and
//! wraps around when it reaches the end. Index draws are derived from the
//! same values, so a script fully determines every roll.

use galaxy_core::random::RandomSource;

/// A [`RandomSource`] that replays fixed values.
#[derive(Debug, Clone, PartialEq)]
pub struct ScriptedSource {
    values: Vec<f64>,
    position: usize,
    draws: usize,
}

impl ScriptedSource {
    /// Replay `values`, each clamped to `[0, 1)`.
    #[must_use]
    pub fn new(values: impl IntoIterator<Item = f64>) -> Self {
        Self {
            values: values
                .into_iter()
                .map(|v| v.clamp(0.0, 1.0 - f64::EPSILON))
                .collect(),
            position: 0,
            draws: 0,
        }
    }

    /// Always return `value`.
    #[must_use]
    pub fn constant(value: f64) -> Self {
        Self::new([value])
    }

    /// Every chance roll fails and every index draw picks the last entry.
    #[must_use]
    pub fn never() -> Self {
        Self::constant(0.999)
    }

    /// Number of values consumed so far.
    #[must_use]
    pub const fn draws(&self) -> usize {
        self.draws
    }
}

impl RandomSource for ScriptedSource {
    fn next_unit(&mut self) -> f64 {
        self.draws += 1;
        if self.values.is_empty() {
            return 0.0;
        }
        let value = self.values[self.position % self.values.len()];
        self.position = (self.position + 1) % self.values.len();
        value
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
    fn next_index(&mut self, len: usize) -> usize {
        if len == 0 {
            return 0;
        }
        let scaled = (self.next_unit() * len as f64) as usize;
        scaled.min(len - 1)
    }
}
