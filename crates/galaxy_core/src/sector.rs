//! Sector tiles and their contents.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::economy::ResourceType;
use crate::galaxy::SectorId;
use crate::hex::{opposite_edge, ring_distance, Axial, EDGE_COUNT};
use crate::player::PlayerColor;
use crate::ships::ShipClass;

/// What kind of tile a sector is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SectorKind {
    /// The galactic center.
    Center,
    /// A player's home sector.
    Start,
    /// Ring-2 sector held by a guardian at setup.
    Guardian,
    /// Explored sector.
    Neutral,
    /// Virtual placeholder for an unexplored coordinate. Never committed.
    EmptyZone,
}

impl fmt::Display for SectorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Center => "center",
            Self::Start => "start",
            Self::Guardian => "guardian",
            Self::Neutral => "neutral",
            Self::EmptyZone => "empty",
        };
        f.write_str(name)
    }
}

/// Six wormhole flags indexed by edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Wormholes(pub [bool; EDGE_COUNT]);

impl Wormholes {
    /// Every edge open.
    pub const ALL_OPEN: Self = Self([true; EDGE_COUNT]);

    /// Every edge closed.
    pub const CLOSED: Self = Self([false; EDGE_COUNT]);

    /// Pattern with exactly the listed edges open (indices taken mod 6).
    #[must_use]
    pub fn from_edges(edges: &[usize]) -> Self {
        let mut pattern = Self::CLOSED;
        for &edge in edges {
            pattern.open(edge);
        }
        pattern
    }

    /// Whether `edge` (mod 6) is open.
    #[must_use]
    pub const fn is_open(&self, edge: usize) -> bool {
        self.0[edge % EDGE_COUNT]
    }

    /// Open an edge.
    pub fn open(&mut self, edge: usize) {
        self.0[edge % EDGE_COUNT] = true;
    }

    /// Close an edge.
    pub fn close(&mut self, edge: usize) {
        self.0[edge % EDGE_COUNT] = false;
    }

    /// Number of open edges.
    #[must_use]
    pub fn open_count(&self) -> usize {
        self.0.iter().filter(|&&open| open).count()
    }

    /// Indices of open edges, ascending.
    pub fn open_edges(&self) -> impl Iterator<Item = usize> + '_ {
        (0..EDGE_COUNT).filter(|&edge| self.0[edge])
    }

    /// Pattern shifted left: edge `i` takes the value formerly at `i + n`.
    #[must_use]
    pub fn rotated_left(self, n: u8) -> Self {
        let mut edges = self.0;
        edges.rotate_left(usize::from(n) % EDGE_COUNT);
        Self(edges)
    }
}

/// Whether sector A connects to sector B, where B lies across A's `edge`.
///
/// Both patterns must be effective (rotation already applied).
#[must_use]
pub const fn edges_connect(a: &Wormholes, b: &Wormholes, edge: usize) -> bool {
    a.is_open(edge) && b.is_open(opposite_edge(edge))
}

/// State of a population slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SlotStatus {
    /// Free for colonization.
    Empty,
    /// Holds a population cube.
    Occupied,
    /// Lost (e.g. after combat) and unusable.
    Destroyed,
}

/// A population square on a sector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PopulationSlot {
    /// Index within the sector.
    pub id: u8,
    /// Resource produced when occupied.
    pub resource: ResourceType,
    /// Current state.
    pub status: SlotStatus,
    /// Advanced slots need the matching advanced tech to use.
    pub is_advanced: bool,
}

impl PopulationSlot {
    /// Empty basic slot.
    #[must_use]
    pub const fn new(id: u8, resource: ResourceType) -> Self {
        Self {
            id,
            resource,
            status: SlotStatus::Empty,
            is_advanced: false,
        }
    }

    /// Mark as advanced.
    #[must_use]
    pub const fn advanced(mut self) -> Self {
        self.is_advanced = true;
        self
    }
}

/// A ship token sitting on a sector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShipOnMap {
    /// Token id, unique within the sector.
    pub id: u32,
    /// Hull type.
    pub class: ShipClass,
    /// Owning player.
    pub owner: PlayerColor,
}

/// A hex tile on the board, committed or pending.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sector {
    id: SectorId,
    coordinate: Axial,
    ring: u32,
    rotation: u8,
    /// Tile kind.
    pub kind: SectorKind,
    /// Controlling player, if influenced.
    pub owner: Option<PlayerColor>,
    /// Raw wormhole pattern before rotation.
    pub wormholes: Wormholes,
    /// Hostile guardians on the tile.
    pub guardian_count: u32,
    /// Whether the tile carries a discovery tile.
    pub has_discovery_tile: bool,
    /// Whether the discovery tile has been claimed.
    pub discovery_claimed: bool,
    /// Population squares.
    pub population_slots: Vec<PopulationSlot>,
    /// Ships present.
    pub ships: Vec<ShipOnMap>,
}

impl Sector {
    /// Blank sector with every wormhole closed.
    #[must_use]
    pub fn new(id: SectorId, coordinate: Axial, kind: SectorKind) -> Self {
        Self {
            id,
            coordinate,
            ring: ring_distance(coordinate),
            rotation: 0,
            kind,
            owner: None,
            wormholes: Wormholes::CLOSED,
            guardian_count: 0,
            has_discovery_tile: false,
            discovery_claimed: false,
            population_slots: Vec::new(),
            ships: Vec::new(),
        }
    }

    /// Stable id. [`SectorId::UNASSIGNED`] until the sector is kept.
    #[must_use]
    pub const fn id(&self) -> SectorId {
        self.id
    }

    pub(crate) fn assign_id(&mut self, id: SectorId) {
        self.id = id;
    }

    /// Board coordinate.
    #[must_use]
    pub const fn coordinate(&self) -> Axial {
        self.coordinate
    }

    /// Ring distance from the center.
    #[must_use]
    pub const fn ring(&self) -> u32 {
        self.ring
    }

    /// Current rotation, 0..5.
    #[must_use]
    pub const fn rotation(&self) -> u8 {
        self.rotation
    }

    /// Turn the tile one step.
    pub fn rotate(&mut self) {
        self.rotation = (self.rotation + 1) % 6;
    }

    /// Wormholes after rotation.
    #[must_use]
    pub fn effective_wormholes(&self) -> Wormholes {
        self.wormholes.rotated_left(self.rotation)
    }

    /// Population slot by id.
    #[must_use]
    pub fn slot(&self, id: u8) -> Option<&PopulationSlot> {
        self.population_slots.iter().find(|slot| slot.id == id)
    }

    pub(crate) fn slot_mut(&mut self, id: u8) -> Option<&mut PopulationSlot> {
        self.population_slots.iter_mut().find(|slot| slot.id == id)
    }

    /// Ids of slots still free for colonization.
    pub fn empty_slots(&self) -> impl Iterator<Item = u8> + '_ {
        self.population_slots
            .iter()
            .filter(|slot| slot.status == SlotStatus::Empty)
            .map(|slot| slot.id)
    }

    /// Whether an unclaimed discovery tile remains.
    #[must_use]
    pub const fn has_unclaimed_discovery(&self) -> bool {
        self.has_discovery_tile && !self.discovery_claimed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_edges_wraps_indices() {
        let pattern = Wormholes::from_edges(&[0, 8]);
        assert!(pattern.is_open(0));
        assert!(pattern.is_open(2));
        assert_eq!(pattern.open_count(), 2);
    }

    #[test]
    fn test_rotate_left_moves_values_down() {
        let raw = Wormholes::from_edges(&[1]);
        let rotated = raw.rotated_left(1);
        assert_eq!(rotated, Wormholes::from_edges(&[0]));
        // Edge 0 wraps around to edge 5.
        assert_eq!(Wormholes::from_edges(&[0]).rotated_left(1), Wormholes::from_edges(&[5]));
    }

    #[test]
    fn test_six_rotations_restore_pattern() {
        let mut sector = Sector::new(SectorId(1), Axial::new(1, 0), SectorKind::Neutral);
        sector.wormholes = Wormholes::from_edges(&[0, 2, 3]);
        let original = sector.effective_wormholes();
        for _ in 0..6 {
            sector.rotate();
        }
        assert_eq!(sector.rotation(), 0);
        assert_eq!(sector.effective_wormholes(), original);
        assert_eq!(sector.wormholes, Wormholes::from_edges(&[0, 2, 3]));
    }

    #[test]
    fn test_ring_is_derived_from_coordinate() {
        let sector = Sector::new(SectorId(2), Axial::new(-2, 3), SectorKind::Neutral);
        assert_eq!(sector.ring(), 3);
    }

    #[test]
    fn test_edges_connect_requires_both_sides() {
        let a = Wormholes::from_edges(&[2]);
        let b = Wormholes::from_edges(&[5]);
        assert!(edges_connect(&a, &b, 2));
        assert!(edges_connect(&b, &a, 5));
        assert!(!edges_connect(&a, &Wormholes::CLOSED, 2));
    }

    #[test]
    fn test_empty_slots_skip_occupied_and_destroyed() {
        let mut sector = Sector::new(SectorId(3), Axial::ORIGIN, SectorKind::Center);
        sector.population_slots = vec![
            PopulationSlot::new(0, ResourceType::Money),
            PopulationSlot::new(1, ResourceType::Science),
            PopulationSlot::new(2, ResourceType::Materials),
        ];
        sector.population_slots[0].status = SlotStatus::Occupied;
        sector.population_slots[2].status = SlotStatus::Destroyed;
        assert_eq!(sector.empty_slots().collect::<Vec<_>>(), vec![1]);
    }
}
