//! Error types for game-state transitions.
//!
//! Every variant describes a rejected action. A rejected action never
//! leaves partial state behind; callers can surface the message and carry on.

use thiserror::Error;

use crate::economy::ResourceType;
use crate::exploration::ExplorePhaseKind;
use crate::galaxy::SectorId;
use crate::hex::Axial;
use crate::player::PlayerColor;
use crate::ships::{ShipClass, StatViolation};

/// Result type alias using [`GameError`].
pub type Result<T> = std::result::Result<T, GameError>;

/// Top-level error type for all game-state errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    /// A game needs between one and six distinct player colors.
    #[error("Invalid player count: {0} (expected 1 to 6)")]
    InvalidPlayerCount(usize),

    /// The same color was listed twice.
    #[error("Duplicate player color: {0}")]
    DuplicatePlayerColor(PlayerColor),

    /// No player state exists for this color.
    #[error("Unknown player: {0}")]
    UnknownPlayer(PlayerColor),

    /// Every action disc is already on the board.
    #[error("No action discs available")]
    NoDiscsAvailable,

    /// Another workflow (exploration, research or upgrade) is still open.
    #[error("Another action is still in progress")]
    ActionInProgress,

    /// A committed sector already occupies the coordinate.
    #[error("Coordinate {0} is already occupied")]
    CoordinateOccupied(Axial),

    /// A sector with this id is already on the board.
    #[error("Sector {0} is already on the board")]
    DuplicateSectorId(SectorId),

    /// None of the player's sectors has an open wormhole toward the target.
    #[error("No owned sector has a wormhole toward {0}")]
    NoWormholeToTarget(Axial),

    /// The candidate has no wormhole facing back toward its source.
    #[error("Sector placement is invalid: no wormhole faces the source sector")]
    InvalidPlacement,

    /// The operation does not apply to the current exploration phase.
    #[error("Operation not allowed during exploration phase {0:?}")]
    WrongPhase(ExplorePhaseKind),

    /// Influence needs a connected sector and a free disc.
    #[error("Influence is not allowed: sector is disconnected or no discs remain")]
    InfluenceNotAllowed,

    /// Every colony ship has been used this round.
    #[error("No colony ships available")]
    NoColonyShips,

    /// The population slot is occupied or destroyed.
    #[error("Population slot {slot} on sector {sector} is not empty")]
    SlotNotEmpty {
        /// Sector holding the slot.
        sector: SectorId,
        /// Slot index.
        slot: u8,
    },

    /// No cubes of this type remain on the population track.
    #[error("No {0} population cubes left on the track")]
    NoPopulationCubes(ResourceType),

    /// Sector id does not exist on the committed board.
    #[error("Unknown sector: {0}")]
    UnknownSector(SectorId),

    /// Slot index does not exist on the sector.
    #[error("Unknown population slot {slot} on sector {sector}")]
    UnknownSlot {
        /// Sector that was searched.
        sector: SectorId,
        /// Requested slot index.
        slot: u8,
    },

    /// Only the sector's owner may colonize it.
    #[error("Sector {0} is not owned by the active player")]
    NotSectorOwner(SectorId),

    /// Colonization mode is not active.
    #[error("Colonization mode is not active")]
    NotColonizing,

    /// The tech track for this category holds the maximum number of tiles.
    #[error("Track full: cannot research more technologies in this category")]
    TrackFull,

    /// Not enough science to pay the discounted cost.
    #[error("Not enough science: need {required}, have {available}")]
    InsufficientScience {
        /// Cost after discounts.
        required: i32,
        /// Science on hand.
        available: i32,
    },

    /// The tech is not on the research tray.
    #[error("Tech '{0}' is not available on the research tray")]
    TechNotAvailable(String),

    /// A non-rare tech must go on its own category track.
    #[error("Tech '{0}' cannot be placed on that track")]
    WrongTechCategory(String),

    /// Research was requested outside a Research action.
    #[error("No research action in progress")]
    NotResearching,

    /// Upgrade operation without an open upgrade workflow.
    #[error("No upgrade in progress")]
    NoUpgradeInProgress,

    /// Not enough upgrade activations left for this change.
    #[error("Not enough upgrade activations remaining")]
    NoActivationsRemaining,

    /// The part's technology has not been researched.
    #[error("Part '{0}' requires a technology that has not been researched")]
    PartLocked(String),

    /// The part cannot be mounted on this ship class.
    #[error("Part '{part}' cannot be equipped on a {class}")]
    PartNotAllowed {
        /// Part id.
        part: String,
        /// Ship class being edited.
        class: ShipClass,
    },

    /// Slot index beyond the blueprint's fixed slot count.
    #[error("Slot {slot} does not exist on a {class}")]
    InvalidBlueprintSlot {
        /// Ship class being edited.
        class: ShipClass,
        /// Requested slot.
        slot: usize,
    },

    /// At least one draft blueprint breaks a legality rule.
    #[error("Invalid ship configuration: {class} has {} violation(s)", violations.len())]
    InvalidBlueprint {
        /// The first invalid class found.
        class: ShipClass,
        /// Everything wrong with it.
        violations: Vec<StatViolation>,
    },

    /// Part id not present in the catalog.
    #[error("Unknown part: {0}")]
    UnknownPart(String),

    /// Tech id not present in the catalog.
    #[error("Unknown tech: {0}")]
    UnknownTech(String),

    /// A resource reward id is not of the form `<type>_<amount>`.
    #[error("Malformed resource reward id: {0}")]
    MalformedReward(String),

    /// Data file parsing error.
    #[error("Failed to parse data file '{path}': {message}")]
    DataParseError {
        /// Path to the file that failed to parse.
        path: String,
        /// Error message.
        message: String,
    },

    /// Catalog contents are inconsistent.
    #[error("Invalid catalog: {0}")]
    InvalidCatalog(String),
}
