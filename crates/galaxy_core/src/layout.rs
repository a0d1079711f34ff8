//! Initial board setup.
//!
//! The board starts with the center, one home sector per player on ring 2,
//! and guardian sectors on the unused ring-2 positions.

use std::collections::BTreeSet;

use tracing::info;

use crate::economy::ResourceType;
use crate::error::{GameError, Result};
use crate::galaxy::{Galaxy, SectorId};
use crate::hex::{neighbor, ring_distance, Axial, EDGE_COUNT};
use crate::player::PlayerColor;
use crate::sector::{PopulationSlot, Sector, SectorKind, ShipOnMap, Wormholes};
use crate::ships::ShipClass;

/// Ring-2 home positions, 60 degrees apart, clockwise from the top.
pub const RING2_SLOTS: [Axial; 6] = [
    Axial::new(0, -2),
    Axial::new(2, -2),
    Axial::new(2, 0),
    Axial::new(0, 2),
    Axial::new(-2, 2),
    Axial::new(-2, 0),
];

/// Ring-2 positions used as home sectors for a player count.
#[must_use]
pub const fn start_positions(player_count: usize) -> Option<&'static [usize]> {
    match player_count {
        1 => Some(&[0]),
        2 => Some(&[0, 3]),
        3 => Some(&[0, 2, 4]),
        4 => Some(&[0, 1, 3, 4]),
        5 => Some(&[0, 1, 2, 3, 4]),
        6 => Some(&[0, 1, 2, 3, 4, 5]),
        _ => None,
    }
}

/// Edge of `coord` that steps closer to the center.
#[must_use]
pub fn edge_to_center(coord: Axial) -> Option<usize> {
    let ring = ring_distance(coord);
    (0..EDGE_COUNT).find(|&edge| ring_distance(neighbor(coord, edge)) < ring)
}

/// Home sector wormholes: the edge to the center, its clockwise neighbor,
/// and the mirror pair across the hex.
#[must_use]
pub fn start_wormholes(coord: Axial) -> Wormholes {
    match edge_to_center(coord) {
        Some(t) => Wormholes::from_edges(&[t, t + 1, t + 3, t + 4]),
        None => Wormholes::ALL_OPEN,
    }
}

fn center_sector(id: SectorId) -> Sector {
    let mut sector = Sector::new(id, Axial::ORIGIN, SectorKind::Center);
    sector.wormholes = Wormholes::ALL_OPEN;
    sector.guardian_count = 1;
    sector.has_discovery_tile = true;
    sector.population_slots = [
        ResourceType::Money,
        ResourceType::Science,
        ResourceType::Materials,
        ResourceType::Money,
    ]
    .into_iter()
    .zip(0u8..)
    .map(|(resource, slot)| PopulationSlot::new(slot, resource).advanced())
    .collect();
    sector
}

fn start_sector(id: SectorId, coord: Axial, owner: PlayerColor) -> Sector {
    let mut sector = Sector::new(id, coord, SectorKind::Start);
    sector.wormholes = start_wormholes(coord);
    sector.owner = Some(owner);
    sector.population_slots = vec![
        PopulationSlot::new(0, ResourceType::Money),
        PopulationSlot::new(1, ResourceType::Science),
        PopulationSlot::new(2, ResourceType::Materials),
    ];
    sector.ships = vec![ShipOnMap {
        id: 1,
        class: ShipClass::Interceptor,
        owner,
    }];
    sector
}

fn guardian_sector(id: SectorId, coord: Axial) -> Sector {
    let mut sector = Sector::new(id, coord, SectorKind::Guardian);
    sector.wormholes = Wormholes::from_edges(&[0, 1, 2]);
    sector.guardian_count = 1;
    sector.has_discovery_tile = true;
    sector.population_slots = vec![
        PopulationSlot::new(0, ResourceType::Money),
        PopulationSlot::new(1, ResourceType::Materials),
    ];
    sector
}

/// Build the starting sectors for the given players, in seating order.
///
/// Sector ids are reserved from `ids`; nothing is committed to it.
pub fn build_layout(colors: &[PlayerColor], ids: &mut Galaxy) -> Result<Vec<Sector>> {
    let positions = start_positions(colors.len()).ok_or(GameError::InvalidPlayerCount(colors.len()))?;
    let mut seen = BTreeSet::new();
    for &color in colors {
        if !seen.insert(color) {
            return Err(GameError::DuplicatePlayerColor(color));
        }
    }

    let mut allocate = || ids.allocate_id();

    let mut sectors = vec![center_sector(allocate())];
    for (index, &coord) in RING2_SLOTS.iter().enumerate() {
        let seat = positions.iter().position(|&p| p == index);
        let sector = match seat {
            Some(seat) => start_sector(allocate(), coord, colors[seat]),
            None => guardian_sector(allocate(), coord),
        };
        sectors.push(sector);
    }

    info!(players = colors.len(), sectors = sectors.len(), "layout built");
    Ok(sectors)
}
