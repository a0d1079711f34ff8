//! Ship blueprints and stat aggregation.
//!
//! A blueprint is a hull with a fixed number of part slots. Stats are
//! summed from the equipped parts on demand and never cached, so a draft
//! and its committed original can be compared freely.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::catalog::{Part, PartCategory};
use crate::error::{GameError, Result};
use crate::research::ResearchedTechs;

/// Hull types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ShipClass {
    /// Small, fast ship.
    Interceptor,
    /// Medium ship.
    Cruiser,
    /// Large ship.
    Dreadnought,
    /// Immobile defensive platform.
    Starbase,
}

impl ShipClass {
    /// Every class, in display order.
    pub const ALL: [Self; 4] = [
        Self::Interceptor,
        Self::Cruiser,
        Self::Dreadnought,
        Self::Starbase,
    ];

    /// Number of part slots on this hull.
    #[must_use]
    pub const fn slot_count(self) -> usize {
        match self {
            Self::Interceptor | Self::Starbase => 4,
            Self::Cruiser => 6,
            Self::Dreadnought => 8,
        }
    }
}

impl fmt::Display for ShipClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Interceptor => "Interceptor",
            Self::Cruiser => "Cruiser",
            Self::Dreadnought => "Dreadnought",
            Self::Starbase => "Starbase",
        };
        f.write_str(name)
    }
}

/// A ship design: hull base values plus equipped parts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Blueprint {
    /// Hull type.
    pub class: ShipClass,
    /// Materials cost of the bare hull.
    pub base_cost: i32,
    /// Initiative of the bare hull.
    pub base_initiative: i32,
    /// Built-in power (starbases only).
    pub base_power_generation: Option<i32>,
    /// One entry per slot.
    pub equipped: Vec<Option<Part>>,
}

impl Blueprint {
    /// Hull with every slot empty.
    #[must_use]
    pub fn empty(class: ShipClass, base_cost: i32, base_initiative: i32) -> Self {
        Self {
            class,
            base_cost,
            base_initiative,
            base_power_generation: None,
            equipped: vec![None; class.slot_count()],
        }
    }

    /// Set built-in power generation.
    #[must_use]
    pub const fn with_base_power(mut self, power: i32) -> Self {
        self.base_power_generation = Some(power);
        self
    }

    /// Part in a slot; `None` for an out-of-range slot.
    #[must_use]
    pub fn slot(&self, slot: usize) -> Option<Option<&Part>> {
        self.equipped.get(slot).map(Option::as_ref)
    }

    /// Replace the contents of a slot.
    pub fn set_slot(&mut self, slot: usize, part: Option<Part>) -> Result<()> {
        let class = self.class;
        let entry = self
            .equipped
            .get_mut(slot)
            .ok_or(GameError::InvalidBlueprintSlot { class, slot })?;
        *entry = part;
        Ok(())
    }

    /// Equipped parts, skipping empty slots.
    pub fn parts(&self) -> impl Iterator<Item = &Part> {
        self.equipped.iter().flatten()
    }
}

/// One blueprint per ship class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Blueprints {
    /// Interceptor design.
    pub interceptor: Blueprint,
    /// Cruiser design.
    pub cruiser: Blueprint,
    /// Dreadnought design.
    pub dreadnought: Blueprint,
    /// Starbase design.
    pub starbase: Blueprint,
}

impl Blueprints {
    /// Design for a class.
    #[must_use]
    pub const fn get(&self, class: ShipClass) -> &Blueprint {
        match class {
            ShipClass::Interceptor => &self.interceptor,
            ShipClass::Cruiser => &self.cruiser,
            ShipClass::Dreadnought => &self.dreadnought,
            ShipClass::Starbase => &self.starbase,
        }
    }

    /// Mutable design for a class.
    pub fn get_mut(&mut self, class: ShipClass) -> &mut Blueprint {
        match class {
            ShipClass::Interceptor => &mut self.interceptor,
            ShipClass::Cruiser => &mut self.cruiser,
            ShipClass::Dreadnought => &mut self.dreadnought,
            ShipClass::Starbase => &mut self.starbase,
        }
    }

    /// All designs in class order.
    pub fn iter(&self) -> impl Iterator<Item = &Blueprint> {
        ShipClass::ALL.into_iter().map(|class| self.get(class))
    }
}

/// A legality rule a blueprint breaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatViolation {
    /// Parts draw more power than the hull produces.
    PowerDeficit,
    /// A drive is mounted on a starbase.
    StarbaseDrive,
}

impl fmt::Display for StatViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PowerDeficit => f.write_str("power consumption exceeds production."),
            Self::StarbaseDrive => f.write_str("starbases cannot equip drives."),
        }
    }
}

/// Aggregated values for a blueprint.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ShipStats {
    /// Total materials cost.
    pub cost: i32,
    /// Total damage.
    pub damage: i32,
    /// Hit bonus.
    pub computer: i32,
    /// Hit penalty to enemies.
    pub shield: i32,
    /// Damage the ship absorbs (always at least the implicit 1).
    pub hull: i32,
    /// Combat initiative.
    pub initiative: i32,
    /// Movement from drives.
    pub movement: i32,
    /// Power produced.
    pub power_generation: i32,
    /// Power drawn.
    pub power_usage: i32,
    /// Production minus usage.
    pub power_balance: i32,
    /// Every rule the design breaks.
    pub violations: Vec<StatViolation>,
}

impl ShipStats {
    /// True when the design breaks no rule.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.violations.is_empty()
    }
}

/// Sum a blueprint's parts into its stats and collect every violation.
#[must_use]
pub fn compute_stats(blueprint: &Blueprint) -> ShipStats {
    let mut stats = ShipStats {
        cost: blueprint.base_cost,
        hull: 1,
        initiative: blueprint.base_initiative,
        power_generation: blueprint.base_power_generation.unwrap_or(0),
        ..ShipStats::default()
    };

    for part in blueprint.parts() {
        stats.cost += part.cost;
        stats.damage += part.damage;
        stats.computer += part.computer;
        stats.shield += part.shield;
        stats.hull += part.hull;
        stats.initiative += part.initiative;
        stats.power_generation += part.power_generation;
        stats.power_usage += part.power_usage;
        if part.category == PartCategory::Drive {
            stats.movement += part.initiative;
        }
    }
    stats.power_balance = stats.power_generation - stats.power_usage;

    if stats.power_balance < 0 {
        stats.violations.push(StatViolation::PowerDeficit);
    }
    if blueprint.class == ShipClass::Starbase
        && blueprint.parts().any(|part| part.category == PartCategory::Drive)
    {
        stats.violations.push(StatViolation::StarbaseDrive);
    }
    stats
}

/// Whether the player may use a part given their researched techs.
///
/// Rare parts and parts without a tech requirement are always allowed.
#[must_use]
pub fn has_required_tech(part: &Part, researched: &ResearchedTechs) -> bool {
    if part.is_rare {
        return true;
    }
    part.required_tech
        .as_deref()
        .map_or(true, |tech| researched.contains(tech))
}

/// Whether a part may be mounted on a hull at all.
#[must_use]
pub fn can_equip_part_on_ship(part: &Part, class: ShipClass) -> bool {
    !(class == ShipClass::Starbase && part.category == PartCategory::Drive)
}
