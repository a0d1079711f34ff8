//! Replay checks.
//!
//! A game built from one seed and fed one command script must land on the
//! same state every time. These helpers run a script several times and
//! compare state hashes.
//!
//! Things that break replay:
//! - a random draw that bypasses the game's
//!   [`galaxy_core::random::RandomSource`];
//! - iterating a hash map while building state (board and player storage
//!   are `BTreeMap`s for this reason).

use std::collections::hash_map::DefaultHasher;
use std::collections::BTreeSet;
use std::hash::{Hash, Hasher};

use galaxy_core::game::GameState;

/// Final hashes of repeated runs of one script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplayReport {
    /// Hash after each run, in run order.
    pub hashes: Vec<u64>,
    /// Commands applied per run.
    pub steps: usize,
}

impl ReplayReport {
    /// Whether every run ended on the same hash.
    #[must_use]
    pub fn is_deterministic(&self) -> bool {
        self.distinct().len() <= 1
    }

    /// The different hashes seen.
    #[must_use]
    pub fn distinct(&self) -> BTreeSet<u64> {
        self.hashes.iter().copied().collect()
    }

    /// # Panics
    ///
    /// Panics when the runs diverged, listing every hash.
    pub fn assert_deterministic(&self) {
        assert!(
            self.is_deterministic(),
            "game is non-deterministic: {} runs of {} steps ended on {} different states {:?}",
            self.hashes.len(),
            self.steps,
            self.distinct().len(),
            self.hashes
        );
    }
}

/// Hash of a game state, taken over its RON text.
///
/// # Panics
///
/// Panics if the state cannot be serialized.
#[must_use]
pub fn state_hash(state: &GameState) -> u64 {
    let text = ron::to_string(state).expect("game state must serialize");
    let mut hasher = DefaultHasher::new();
    text.hash(&mut hasher);
    hasher.finish()
}

/// Build a fresh state `runs` times, apply `step` `steps` times to each
/// and hash the result.
pub fn replay<S>(
    runs: usize,
    steps: usize,
    setup: impl Fn() -> S,
    step: impl Fn(&mut S),
    hash: impl Fn(&S) -> u64,
) -> ReplayReport {
    let hashes = (0..runs)
        .map(|_| {
            let mut state = setup();
            (0..steps).for_each(|_| step(&mut state));
            hash(&state)
        })
        .collect();
    ReplayReport { hashes, steps }
}
