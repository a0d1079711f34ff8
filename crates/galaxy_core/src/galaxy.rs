//! The committed board.
//!
//! [`Galaxy`] holds every sector that has been placed. Unexplored
//! coordinates are never stored: [`Galaxy::explorable_zones`] derives them
//! from the committed sectors on every call.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{GameError, Result};
use crate::hex::{neighbor, opposite_edge, ring_distance, Axial, EDGE_COUNT};
use crate::player::PlayerColor;
use crate::sector::{edges_connect, Sector, SectorKind, SlotStatus, Wormholes};

/// Stable sector identifier.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub struct SectorId(pub u32);

impl SectorId {
    /// Id carried by virtual placeholders.
    pub const UNASSIGNED: Self = Self(0);
}

impl fmt::Display for SectorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// An unexplored coordinate reachable from the player's sectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EmptyZone {
    /// Target coordinate.
    pub coordinate: Axial,
    /// Ring of the target.
    pub ring: u32,
}

impl EmptyZone {
    /// Placeholder sector for display. Rejected by [`Galaxy::commit`].
    #[must_use]
    pub fn placeholder(&self) -> Sector {
        Sector::new(SectorId::UNASSIGNED, self.coordinate, SectorKind::EmptyZone)
    }
}

/// The owned sector and edge that justify exploring a target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExploreSource {
    /// Source sector.
    pub sector: SectorId,
    /// Source coordinate.
    pub coordinate: Axial,
    /// Edge of the source facing the target.
    pub edge: usize,
}

/// Set of committed sectors, one per coordinate.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Galaxy {
    sectors: BTreeMap<Axial, Sector>,
    index: BTreeMap<SectorId, Axial>,
    next_id: u32,
}

impl Galaxy {
    /// Empty board.
    #[must_use]
    pub fn new() -> Self {
        Self {
            sectors: BTreeMap::new(),
            index: BTreeMap::new(),
            next_id: 1,
        }
    }

    /// Reserve a fresh sector id.
    pub fn allocate_id(&mut self) -> SectorId {
        let id = SectorId(self.next_id.max(1));
        self.next_id = id.0 + 1;
        id
    }

    /// Add a sector to the board.
    ///
    /// Rejects virtual zones, coordinates that already hold a sector and
    /// ids already in use.
    pub fn commit(&mut self, sector: Sector) -> Result<SectorId> {
        if sector.kind == SectorKind::EmptyZone || sector.id() == SectorId::UNASSIGNED {
            return Err(GameError::InvalidPlacement);
        }
        let coordinate = sector.coordinate();
        if self.sectors.contains_key(&coordinate) {
            return Err(GameError::CoordinateOccupied(coordinate));
        }
        let id = sector.id();
        if self.index.contains_key(&id) {
            return Err(GameError::DuplicateSectorId(id));
        }
        if id.0 >= self.next_id {
            self.next_id = id.0 + 1;
        }
        info!(%id, %coordinate, kind = %sector.kind, "sector committed");
        self.index.insert(id, coordinate);
        self.sectors.insert(coordinate, sector);
        self.check_invariants();
        Ok(id)
    }

    /// Sector at a coordinate.
    #[must_use]
    pub fn get(&self, coordinate: Axial) -> Option<&Sector> {
        self.sectors.get(&coordinate)
    }

    /// Sector by id.
    #[must_use]
    pub fn sector_by_id(&self, id: SectorId) -> Option<&Sector> {
        self.index.get(&id).and_then(|coord| self.sectors.get(coord))
    }

    fn sector_by_id_mut(&mut self, id: SectorId) -> Result<&mut Sector> {
        let coord = self.index.get(&id).ok_or(GameError::UnknownSector(id))?;
        self.sectors
            .get_mut(coord)
            .ok_or(GameError::UnknownSector(id))
    }

    /// Whether a sector sits at the coordinate.
    #[must_use]
    pub fn is_occupied(&self, coordinate: Axial) -> bool {
        self.sectors.contains_key(&coordinate)
    }

    /// All committed sectors in coordinate order.
    pub fn sectors(&self) -> impl Iterator<Item = &Sector> {
        self.sectors.values()
    }

    /// Sectors owned by a player.
    pub fn owned_by(&self, owner: PlayerColor) -> impl Iterator<Item = &Sector> {
        self.sectors
            .values()
            .filter(move |sector| sector.owner == Some(owner))
    }

    /// Number of committed sectors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sectors.len()
    }

    /// Whether nothing is committed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sectors.is_empty()
    }

    /// Set or clear a sector's owner.
    pub fn set_owner(&mut self, id: SectorId, owner: Option<PlayerColor>) -> Result<()> {
        self.sector_by_id_mut(id)?.owner = owner;
        Ok(())
    }

    /// Change a population slot's status.
    pub fn set_slot_status(&mut self, id: SectorId, slot: u8, status: SlotStatus) -> Result<()> {
        let sector = self.sector_by_id_mut(id)?;
        let entry = sector
            .slot_mut(slot)
            .ok_or(GameError::UnknownSlot { sector: id, slot })?;
        entry.status = status;
        Ok(())
    }

    /// Flag a sector's discovery tile as taken.
    pub fn mark_discovery_claimed(&mut self, id: SectorId) -> Result<()> {
        self.sector_by_id_mut(id)?.discovery_claimed = true;
        Ok(())
    }

    /// Coordinates the player can explore into.
    ///
    /// For every owned sector and every open effective edge, the neighbor
    /// across that edge if nothing is committed there. Sorted, no duplicates.
    #[must_use]
    pub fn explorable_zones(&self, owner: PlayerColor) -> Vec<EmptyZone> {
        let mut zones: Vec<EmptyZone> = self
            .owned_by(owner)
            .flat_map(|sector| {
                let coord = sector.coordinate();
                let effective = sector.effective_wormholes();
                (0..EDGE_COUNT)
                    .filter(move |&edge| effective.is_open(edge))
                    .map(move |edge| neighbor(coord, edge))
            })
            .filter(|target| !self.is_occupied(*target))
            .map(|coordinate| EmptyZone {
                coordinate,
                ring: ring_distance(coordinate),
            })
            .collect();
        zones.sort_unstable();
        zones.dedup();
        zones
    }

    /// First owned sector (in coordinate order) with an open edge toward
    /// `target`.
    #[must_use]
    pub fn find_explore_source(&self, owner: PlayerColor, target: Axial) -> Option<ExploreSource> {
        self.owned_by(owner).find_map(|sector| {
            let effective = sector.effective_wormholes();
            (0..EDGE_COUNT)
                .find(|&edge| effective.is_open(edge) && neighbor(sector.coordinate(), edge) == target)
                .map(|edge| ExploreSource {
                    sector: sector.id(),
                    coordinate: sector.coordinate(),
                    edge,
                })
        })
    }

    /// Whether a sector at `coordinate` with the given effective wormholes
    /// links to any committed neighbor.
    #[must_use]
    pub fn is_connected(&self, coordinate: Axial, effective: &Wormholes) -> bool {
        (0..EDGE_COUNT).any(|edge| {
            self.get(neighbor(coordinate, edge)).is_some_and(|other| {
                edges_connect(&other.effective_wormholes(), effective, opposite_edge(edge))
            })
        })
    }

    #[cfg(feature = "debug-validation")]
    fn check_invariants(&self) {
        debug!(sectors = self.sectors.len(), "validating galaxy invariants");
        assert_eq!(self.index.len(), self.sectors.len(), "sector index out of sync");
        for (id, coord) in &self.index {
            let sector = &self.sectors[coord];
            assert_eq!(sector.id(), *id, "index points at the wrong sector");
            assert_eq!(sector.coordinate(), *coord, "sector stored under wrong key");
            assert_ne!(sector.kind, SectorKind::EmptyZone, "virtual zone committed");
        }
    }

    #[cfg(not(feature = "debug-validation"))]
    fn check_invariants(&self) {
        debug!(sectors = self.sectors.len(), "galaxy updated");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn owned_sector(galaxy: &mut Galaxy, coord: Axial, edges: &[usize]) -> SectorId {
        let id = galaxy.allocate_id();
        let mut sector = Sector::new(id, coord, SectorKind::Start);
        sector.wormholes = Wormholes::from_edges(edges);
        sector.owner = Some(PlayerColor::White);
        galaxy.commit(sector).unwrap()
    }

    #[test]
    fn test_commit_rejects_collision() {
        let mut galaxy = Galaxy::new();
        owned_sector(&mut galaxy, Axial::ORIGIN, &[0]);
        let id = galaxy.allocate_id();
        let duplicate = Sector::new(id, Axial::ORIGIN, SectorKind::Neutral);
        assert_eq!(
            galaxy.commit(duplicate),
            Err(GameError::CoordinateOccupied(Axial::ORIGIN))
        );
        assert_eq!(galaxy.len(), 1);
    }

    #[test]
    fn test_commit_rejects_reused_id() {
        let mut galaxy = Galaxy::new();
        let first = owned_sector(&mut galaxy, Axial::ORIGIN, &[0]);
        let reused = Sector::new(first, Axial::new(1, 0), SectorKind::Neutral);
        assert_eq!(galaxy.commit(reused), Err(GameError::DuplicateSectorId(first)));
        assert_eq!(galaxy.len(), 1);
        assert_eq!(galaxy.sector_by_id(first).unwrap().coordinate(), Axial::ORIGIN);
    }

    #[test]
    fn test_commit_rejects_placeholder() {
        let mut galaxy = Galaxy::new();
        let zone = EmptyZone {
            coordinate: Axial::new(1, 0),
            ring: 1,
        };
        assert_eq!(galaxy.commit(zone.placeholder()), Err(GameError::InvalidPlacement));
        assert!(galaxy.is_empty());
    }

    #[test]
    fn test_allocated_ids_are_unique() {
        let mut galaxy = Galaxy::new();
        let a = galaxy.allocate_id();
        let b = galaxy.allocate_id();
        assert_ne!(a, b);
        assert_ne!(a, SectorId::UNASSIGNED);
    }

    #[test]
    fn test_explorable_zones_follow_open_edges() {
        let mut galaxy = Galaxy::new();
        owned_sector(&mut galaxy, Axial::ORIGIN, &[0, 2]);
        let zones = galaxy.explorable_zones(PlayerColor::White);
        let coords: Vec<Axial> = zones.iter().map(|zone| zone.coordinate).collect();
        assert_eq!(coords, vec![Axial::new(0, -1), Axial::new(1, 0)]);
        assert!(zones.iter().all(|zone| zone.ring == 1));
        assert!(galaxy.explorable_zones(PlayerColor::Red).is_empty());
    }

    #[test]
    fn test_explorable_zones_exclude_committed_and_dedupe() {
        let mut galaxy = Galaxy::new();
        owned_sector(&mut galaxy, Axial::ORIGIN, &[1, 2]);
        // (1, 0) is adjacent to both owned sectors.
        owned_sector(&mut galaxy, Axial::new(1, -1), &[3]);
        let coords: Vec<Axial> = galaxy
            .explorable_zones(PlayerColor::White)
            .iter()
            .map(|zone| zone.coordinate)
            .collect();
        assert_eq!(coords, vec![Axial::new(1, 0)]);
    }

    #[test]
    fn test_find_explore_source_rederives_edge() {
        let mut galaxy = Galaxy::new();
        let id = owned_sector(&mut galaxy, Axial::ORIGIN, &[2]);
        let source = galaxy
            .find_explore_source(PlayerColor::White, Axial::new(1, 0))
            .unwrap();
        assert_eq!(source.sector, id);
        assert_eq!(source.edge, 2);
        assert!(galaxy
            .find_explore_source(PlayerColor::White, Axial::new(0, -1))
            .is_none());
    }

    #[test]
    fn test_is_connected_checks_every_neighbor() {
        let mut galaxy = Galaxy::new();
        // Neighbor to the top has its bottom edge (3) open.
        owned_sector(&mut galaxy, Axial::new(0, -1), &[3]);
        let candidate = Wormholes::from_edges(&[0]);
        assert!(galaxy.is_connected(Axial::ORIGIN, &candidate));
        assert!(!galaxy.is_connected(Axial::ORIGIN, &Wormholes::from_edges(&[1])));
    }

    #[test]
    fn test_set_slot_status_unknown_slot() {
        let mut galaxy = Galaxy::new();
        let id = owned_sector(&mut galaxy, Axial::ORIGIN, &[0]);
        assert_eq!(
            galaxy.set_slot_status(id, 4, SlotStatus::Occupied),
            Err(GameError::UnknownSlot { sector: id, slot: 4 })
        );
        assert_eq!(
            galaxy.set_owner(SectorId(99), None),
            Err(GameError::UnknownSector(SectorId(99)))
        );
    }
}
