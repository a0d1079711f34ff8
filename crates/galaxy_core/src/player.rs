//! Player colors, action discs and per-player state.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::config::RulesConfig;
use crate::economy::{self, ColonyShips, EconomyEvent, PopulationTrack, ResourceType, Resources};
use crate::error::{GameError, Result};
use crate::galaxy::{Galaxy, SectorId};
use crate::research::ResearchedTechs;
use crate::ships::Blueprints;

/// Player colors, in turn order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PlayerColor {
    /// White.
    White,
    /// Black.
    Black,
    /// Green.
    Green,
    /// Blue.
    Blue,
    /// Yellow.
    Yellow,
    /// Red.
    Red,
}

impl PlayerColor {
    /// Fixed turn order.
    pub const TURN_ORDER: [Self; 6] = [
        Self::White,
        Self::Black,
        Self::Green,
        Self::Blue,
        Self::Yellow,
        Self::Red,
    ];

    /// Lowercase name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::White => "white",
            Self::Black => "black",
            Self::Green => "green",
            Self::Blue => "blue",
            Self::Yellow => "yellow",
            Self::Red => "red",
        }
    }

    /// The next active color after `self` in turn order.
    ///
    /// Returns `self` when it is the only active color, and the first
    /// active color when `self` is not active at all.
    #[must_use]
    pub fn next_among(self, active: &[Self]) -> Option<Self> {
        let start = Self::TURN_ORDER.iter().position(|&c| c == self).unwrap_or(0);
        (1..=Self::TURN_ORDER.len())
            .map(|step| Self::TURN_ORDER[(start + step) % Self::TURN_ORDER.len()])
            .find(|color| active.contains(color))
    }
}

impl fmt::Display for PlayerColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PlayerColor {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let lower = s.to_ascii_lowercase();
        Self::TURN_ORDER
            .into_iter()
            .find(|color| color.name() == lower)
            .ok_or_else(|| format!("unknown player color '{s}'"))
    }
}

/// Action spaces on the player board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PlayerAction {
    /// Explore a new sector.
    Explore,
    /// Buy a tech.
    Research,
    /// Redesign ships.
    Upgrade,
    /// Build ships or structures.
    Build,
    /// Move ships.
    Move,
    /// Reposition influence discs.
    Influence,
}

impl PlayerAction {
    /// Every action.
    pub const ALL: [Self; 6] = [
        Self::Explore,
        Self::Research,
        Self::Upgrade,
        Self::Build,
        Self::Move,
        Self::Influence,
    ];
}

/// Influence disc bookkeeping.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ActionDiscs {
    /// Discs owned.
    pub total: u32,
    /// Discs sitting on sectors.
    pub map_used: u32,
    per_action: BTreeMap<PlayerAction, u32>,
}

impl ActionDiscs {
    /// A supply of `total` discs with `map_used` already on the board.
    #[must_use]
    pub fn new(total: u32, map_used: u32) -> Self {
        Self {
            total,
            map_used,
            per_action: BTreeMap::new(),
        }
    }

    /// Discs on one action space.
    #[must_use]
    pub fn on_action(&self, action: PlayerAction) -> u32 {
        self.per_action.get(&action).copied().unwrap_or(0)
    }

    /// Discs on all action spaces.
    #[must_use]
    pub fn on_actions(&self) -> u32 {
        self.per_action.values().sum()
    }

    /// Discs still in the supply, never negative.
    #[must_use]
    pub fn available(&self) -> u32 {
        self.total
            .saturating_sub(self.map_used)
            .saturating_sub(self.on_actions())
    }

    /// Put a disc on an action space.
    pub fn place(&mut self, action: PlayerAction) -> Result<()> {
        if self.available() == 0 {
            return Err(GameError::NoDiscsAvailable);
        }
        *self.per_action.entry(action).or_insert(0) += 1;
        Ok(())
    }

    /// Take a disc back off an action space. Floored at zero.
    pub fn refund(&mut self, action: PlayerAction) {
        if let Some(count) = self.per_action.get_mut(&action) {
            *count = count.saturating_sub(1);
            if *count == 0 {
                self.per_action.remove(&action);
            }
        }
    }

    /// Put a disc on a sector.
    pub fn place_on_map(&mut self) -> Result<()> {
        if self.available() == 0 {
            return Err(GameError::NoDiscsAvailable);
        }
        self.map_used += 1;
        Ok(())
    }

    /// Return every action disc to the supply.
    pub fn clear_actions(&mut self) {
        self.per_action.clear();
    }
}

/// Everything tracked on one player's board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerState {
    color: PlayerColor,
    /// Resource stockpile.
    pub resources: Resources,
    population: PopulationTrack,
    /// Colony ships.
    pub colony_ships: ColonyShips,
    /// Ship designs.
    pub blueprints: Blueprints,
    /// Owned techs.
    pub researched: ResearchedTechs,
    /// Influence discs.
    pub discs: ActionDiscs,
}

impl PlayerState {
    /// Fresh player with full population tracks.
    #[must_use]
    pub fn new(color: PlayerColor, rules: &RulesConfig, blueprints: Blueprints) -> Self {
        Self {
            color,
            resources: rules.starting_resources,
            population: PopulationTrack::new(),
            colony_ships: ColonyShips::new(rules.colony_ships),
            blueprints,
            researched: ResearchedTechs::default(),
            discs: ActionDiscs::new(rules.action_discs, rules.initial_map_discs),
        }
    }

    /// Player color.
    #[must_use]
    pub const fn color(&self) -> PlayerColor {
        self.color
    }

    /// Population tracks.
    #[must_use]
    pub const fn population(&self) -> &PopulationTrack {
        &self.population
    }

    /// Income per round, derived from the population tracks.
    #[must_use]
    pub fn income(&self) -> Resources {
        self.population.incomes()
    }

    /// Set cubes on a track, clamped to the track length.
    pub fn set_population(&mut self, resource: ResourceType, count: i64) -> u32 {
        self.population.set(resource, count)
    }

    /// Set a stockpile amount, floored at zero.
    pub fn set_resource(&mut self, resource: ResourceType, amount: i32) -> i32 {
        let value = amount.max(0);
        *self.resources.get_mut(resource) = value;
        value
    }

    /// Credit resources.
    pub fn add_resource(&mut self, resource: ResourceType, amount: i32) {
        let stock = self.resources.get_mut(resource);
        *stock = stock.saturating_add(amount).max(0);
    }

    /// Discs still in the supply.
    #[must_use]
    pub fn available_discs(&self) -> u32 {
        self.discs.available()
    }

    /// Remove cubes for the start sector's occupied slots.
    ///
    /// Each type loses one cube per occupied slot plus `extra` more.
    pub fn apply_starting_population(&mut self, occupied: &[ResourceType], extra: u32) {
        for resource in ResourceType::ALL {
            let placed = occupied.iter().filter(|&&ty| ty == resource).count() as i64;
            let remaining = i64::from(economy::TRACK_LENGTH) - placed - i64::from(extra);
            self.population.set(resource, remaining);
        }
    }

    /// Colonize one slot on a sector this player owns.
    pub fn colonize(&mut self, galaxy: &mut Galaxy, sector: SectorId, slot: u8) -> Result<EconomyEvent> {
        let owner = galaxy
            .sector_by_id(sector)
            .ok_or(GameError::UnknownSector(sector))?
            .owner;
        if owner != Some(self.color) {
            return Err(GameError::NotSectorOwner(sector));
        }
        economy::colonize(
            galaxy,
            &mut self.population,
            &mut self.colony_ships,
            sector,
            slot,
        )
    }
}
