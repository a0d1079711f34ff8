//! # Galaxy Core
//!
//! Game-state core for the hex galaxy companion.
//!
//! This crate computes and validates state transitions only:
//! - No rendering
//! - No IO
//! - No global randomness (every draw goes through [`random::RandomSource`])
//!
//! Given the same seed and the same commands, a game always reaches the
//! same state, which keeps tests and replays reproducible.
//!
//! ## Crate Structure
//!
//! - [`hex`] - Axial coordinates, rings and edge directions
//! - [`sector`] - Sector tiles, wormholes and population slots
//! - [`galaxy`] - The committed board and explorable zones
//! - [`generation`] - Random sector generation by ring
//! - [`layout`] - Starting board for 1 to 6 players
//! - [`exploration`] - The Explore action state machine
//! - [`economy`] - Resources, population tracks and colonization
//! - [`ships`] - Blueprints and ship statistics
//! - [`research`] - Tech tray and research purchases
//! - [`upgrade`] - Draft blueprint editing
//! - [`game`] - The [`game::Game`] controller

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]

pub mod catalog;
pub mod config;
pub mod discovery;
pub mod economy;
pub mod error;
pub mod exploration;
pub mod galaxy;
pub mod game;
pub mod generation;
pub mod hex;
pub mod layout;
pub mod math;
pub mod player;
pub mod random;
pub mod research;
pub mod sector;
pub mod ships;
pub mod upgrade;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::catalog::{Catalog, DiscoveryReward, Part, PartCategory, RewardKind, TechCategory, TechTile};
    pub use crate::config::{DiscardPolicy, GameConfig, GenerationConfig, RulesConfig};
    pub use crate::economy::{EconomyEvent, PopulationTrack, ResourceType, Resources};
    pub use crate::error::{GameError, Result};
    pub use crate::exploration::{
        DiscoveryChoice, ExplorationMachine, ExploreOutcome, ExplorePhase, ExplorePhaseKind, ExploreStep,
    };
    pub use crate::galaxy::{EmptyZone, Galaxy, SectorId};
    pub use crate::game::{Game, GameEvent, GameState};
    pub use crate::generation::SectorGenerator;
    pub use crate::hex::Axial;
    pub use crate::math::{Fixed, Vec2Fixed};
    pub use crate::player::{PlayerAction, PlayerColor, PlayerState};
    pub use crate::random::{RandomSource, RngSource};
    pub use crate::research::{ResearchTray, TechTrack};
    pub use crate::sector::{Sector, SectorKind, SlotStatus, Wormholes};
    pub use crate::ships::{Blueprint, Blueprints, ShipClass, ShipStats};
    pub use crate::upgrade::UpgradeSession;
}
