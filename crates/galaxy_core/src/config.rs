//! Game configuration.
//!
//! Generation odds and starting values are plain data with defaults
//! matching the board game. Either can be overridden from RON.

use serde::{Deserialize, Serialize};

use crate::economy::Resources;
use crate::error::{GameError, Result};

/// Inclusive count range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountRange {
    /// Smallest value.
    pub min: u32,
    /// Largest value.
    pub max: u32,
}

impl CountRange {
    /// Create a range; bounds are swapped if reversed.
    #[must_use]
    pub const fn new(min: u32, max: u32) -> Self {
        if min <= max {
            Self { min, max }
        } else {
            Self { min: max, max: min }
        }
    }
}

/// Odds and counts used when generating explored sectors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// Ring 0-1: chance that one edge is closed.
    pub inner_close_edge_chance: f64,
    /// Ring 0-1: chance of a single guardian.
    pub inner_guardian_chance: f64,
    /// Ring 0-1: population slots.
    pub inner_slots: CountRange,
    /// Ring 2: independent edge draws.
    pub middle_edge_draws: CountRange,
    /// Ring 2: guardian chance.
    pub middle_guardian_chance: f64,
    /// Ring 2: discovery tile chance.
    pub middle_discovery_chance: f64,
    /// Ring 2: population slots.
    pub middle_slots: CountRange,
    /// Ring 3+: independent edge draws.
    pub outer_edge_draws: CountRange,
    /// Ring 3+: guardian chance.
    pub outer_guardian_chance: f64,
    /// Ring 3+: population slots.
    pub outer_slots: CountRange,
    /// Guardians placed when the guardian roll succeeds (ring 2+).
    pub guardian_count: CountRange,
    /// Per-slot advanced chance for rings 0-2.
    pub inner_advanced_chance: f64,
    /// Per-slot advanced chance for ring 3+.
    pub outer_advanced_chance: f64,
    /// Draws below this produce money slots.
    pub money_threshold: f64,
    /// Draws below this (and not money) produce science slots.
    pub science_threshold: f64,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            inner_close_edge_chance: 0.2,
            inner_guardian_chance: 0.1,
            inner_slots: CountRange::new(1, 2),
            middle_edge_draws: CountRange::new(2, 4),
            middle_guardian_chance: 0.3,
            middle_discovery_chance: 0.2,
            middle_slots: CountRange::new(2, 3),
            outer_edge_draws: CountRange::new(1, 3),
            outer_guardian_chance: 0.5,
            outer_slots: CountRange::new(2, 4),
            guardian_count: CountRange::new(1, 2),
            inner_advanced_chance: 0.1,
            outer_advanced_chance: 0.3,
            money_threshold: 0.4,
            science_threshold: 0.7,
        }
    }
}

impl GenerationConfig {
    /// Set guardian chances for every tier.
    #[must_use]
    pub fn with_guardian_chances(mut self, inner: f64, middle: f64, outer: f64) -> Self {
        self.inner_guardian_chance = inner.clamp(0.0, 1.0);
        self.middle_guardian_chance = middle.clamp(0.0, 1.0);
        self.outer_guardian_chance = outer.clamp(0.0, 1.0);
        self
    }

    /// Set per-slot advanced chances.
    #[must_use]
    pub fn with_advanced_chances(mut self, inner: f64, outer: f64) -> Self {
        self.inner_advanced_chance = inner.clamp(0.0, 1.0);
        self.outer_advanced_chance = outer.clamp(0.0, 1.0);
        self
    }

    /// Set slot resource thresholds. `science` is raised to at least `money`.
    #[must_use]
    pub fn with_resource_thresholds(mut self, money: f64, science: f64) -> Self {
        self.money_threshold = money.clamp(0.0, 1.0);
        self.science_threshold = science.clamp(self.money_threshold, 1.0);
        self
    }
}

/// What discarding an explored sector does to the Explore action disc.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DiscardPolicy {
    /// The action is spent.
    #[default]
    ConsumeAction,
    /// The disc returns to the supply.
    RefundAction,
}

/// Starting values and rule switches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RulesConfig {
    /// Starting stockpile.
    pub starting_resources: Resources,
    /// Colony ships per player.
    pub colony_ships: u32,
    /// Influence discs per player.
    pub action_discs: u32,
    /// Discs already on the map (the home sector).
    pub initial_map_discs: u32,
    /// Cubes removed from each track at setup beyond the start sector's.
    pub extra_start_cubes_removed: u32,
    /// Part changes allowed per Upgrade action.
    pub upgrade_activations: u32,
    /// Tech tiles drawn per category.
    pub tray_draw_per_category: usize,
    /// Largest stockpile value shown by displays.
    pub resource_display_cap: i32,
    /// Hex size for pixel layout.
    pub hex_size: u32,
    /// Explore discard handling.
    pub discard_policy: DiscardPolicy,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            starting_resources: Resources::splat(30),
            colony_ships: 3,
            action_discs: 13,
            initial_map_discs: 1,
            extra_start_cubes_removed: 1,
            upgrade_activations: 2,
            tray_draw_per_category: 4,
            resource_display_cap: 99,
            hex_size: 60,
            discard_policy: DiscardPolicy::ConsumeAction,
        }
    }
}

impl RulesConfig {
    /// Set the discard policy.
    #[must_use]
    pub const fn with_discard_policy(mut self, policy: DiscardPolicy) -> Self {
        self.discard_policy = policy;
        self
    }

    /// Set the number of upgrade activations.
    #[must_use]
    pub const fn with_upgrade_activations(mut self, activations: u32) -> Self {
        self.upgrade_activations = activations;
        self
    }

    /// Stockpile value clamped for display.
    #[must_use]
    pub fn display_amount(&self, amount: i32) -> i32 {
        amount.clamp(0, self.resource_display_cap.max(0))
    }
}

/// Full game configuration.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Rule values.
    pub rules: RulesConfig,
    /// Sector generation odds.
    pub generation: GenerationConfig,
    /// Seed for reproducible games.
    pub seed: Option<u64>,
}

impl GameConfig {
    /// Parse a RON document. Missing fields take their defaults.
    pub fn from_ron_str(text: &str) -> Result<Self> {
        ron::from_str(text).map_err(|e| GameError::DataParseError {
            path: "game config".to_string(),
            message: e.to_string(),
        })
    }

    /// Set the seed.
    #[must_use]
    pub const fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}
