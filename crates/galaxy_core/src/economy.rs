//! Resource economy: stockpiles, population tracks and colonization.
//!
//! Income is never stored. It is read off the population track every
//! time it is asked for, so it cannot drift from the cube count.
//!
//! All calculations use integer math.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{GameError, Result};
use crate::galaxy::{Galaxy, SectorId};
use crate::sector::SlotStatus;

/// Income revealed by the population track, lowest first.
pub const POPULATION_TRACK: [i32; 12] = [2, 3, 4, 6, 8, 10, 12, 15, 18, 21, 24, 28];

/// Number of cube spaces on each population track.
pub const TRACK_LENGTH: u32 = POPULATION_TRACK.len() as u32;

/// The three economy resources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceType {
    /// Money (orange).
    Money,
    /// Science (pink).
    Science,
    /// Materials (brown).
    Materials,
}

impl ResourceType {
    /// All resource types in track order.
    pub const ALL: [Self; 3] = [Self::Money, Self::Science, Self::Materials];

    /// Lowercase name, as used in reward ids.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Money => "money",
            Self::Science => "science",
            Self::Materials => "materials",
        }
    }

    const fn index(self) -> usize {
        match self {
            Self::Money => 0,
            Self::Science => 1,
            Self::Materials => 2,
        }
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ResourceType {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|ty| ty.name() == s)
            .ok_or_else(|| GameError::MalformedReward(s.to_string()))
    }
}

/// An amount of each resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Resources {
    /// Money.
    pub money: i32,
    /// Science.
    pub science: i32,
    /// Materials.
    pub materials: i32,
}

impl Resources {
    /// Create a resource bundle.
    #[must_use]
    pub const fn new(money: i32, science: i32, materials: i32) -> Self {
        Self {
            money,
            science,
            materials,
        }
    }

    /// Same amount of every resource.
    #[must_use]
    pub const fn splat(amount: i32) -> Self {
        Self::new(amount, amount, amount)
    }

    /// Amount of one resource.
    #[must_use]
    pub const fn get(&self, ty: ResourceType) -> i32 {
        match ty {
            ResourceType::Money => self.money,
            ResourceType::Science => self.science,
            ResourceType::Materials => self.materials,
        }
    }

    /// Mutable amount of one resource.
    pub fn get_mut(&mut self, ty: ResourceType) -> &mut i32 {
        match ty {
            ResourceType::Money => &mut self.money,
            ResourceType::Science => &mut self.science,
            ResourceType::Materials => &mut self.materials,
        }
    }

    /// Spend if available.
    ///
    /// Returns true if the transaction succeeded.
    pub fn spend(&mut self, ty: ResourceType, amount: i32) -> bool {
        let stock = self.get_mut(ty);
        if *stock >= amount {
            *stock -= amount;
            true
        } else {
            false
        }
    }
}

/// Income revealed by a track holding `cubes_on_track` cubes.
///
/// A full track reveals nothing. Removing cubes (colonizing) reveals
/// larger values.
#[must_use]
pub fn income(cubes_on_track: u32) -> i32 {
    if cubes_on_track >= TRACK_LENGTH {
        return 0;
    }
    let revealed = (TRACK_LENGTH - cubes_on_track) as usize;
    POPULATION_TRACK[revealed - 1]
}

/// Cubes still sitting on each population track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PopulationTrack {
    cubes: [u32; 3],
}

impl Default for PopulationTrack {
    fn default() -> Self {
        Self {
            cubes: [TRACK_LENGTH; 3],
        }
    }
}

impl PopulationTrack {
    /// Full tracks.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Cubes left on one track.
    #[must_use]
    pub const fn cubes(&self, ty: ResourceType) -> u32 {
        self.cubes[ty.index()]
    }

    /// Set a track's cube count, clamped to `[0, TRACK_LENGTH]`.
    ///
    /// Returns the stored count.
    pub fn set(&mut self, ty: ResourceType, count: i64) -> u32 {
        let clamped = u32::try_from(count.clamp(0, i64::from(TRACK_LENGTH))).unwrap_or(0);
        self.cubes[ty.index()] = clamped;
        clamped
    }

    /// Take one cube off a track.
    ///
    /// Returns false (no change) when the track is empty.
    pub fn remove_cube(&mut self, ty: ResourceType) -> bool {
        let slot = &mut self.cubes[ty.index()];
        if *slot == 0 {
            return false;
        }
        *slot -= 1;
        true
    }

    /// Income revealed on one track.
    #[must_use]
    pub fn income(&self, ty: ResourceType) -> i32 {
        income(self.cubes(ty))
    }

    /// Income revealed on every track.
    #[must_use]
    pub fn incomes(&self) -> Resources {
        Resources::new(
            self.income(ResourceType::Money),
            self.income(ResourceType::Science),
            self.income(ResourceType::Materials),
        )
    }
}

/// Colony ships available this round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ColonyShips {
    /// Ships owned.
    pub total: u32,
    /// Ships already flipped.
    pub used: u32,
}

impl ColonyShips {
    /// A fresh set of ships.
    #[must_use]
    pub const fn new(total: u32) -> Self {
        Self { total, used: 0 }
    }

    /// Ships not yet used.
    #[must_use]
    pub const fn available(&self) -> u32 {
        self.total.saturating_sub(self.used)
    }
}

/// Events generated by the economy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EconomyEvent {
    /// A population cube moved from a track onto a sector.
    Colonized {
        /// Sector receiving the cube.
        sector: SectorId,
        /// Slot index on the sector.
        slot: u8,
        /// Track the cube came from.
        resource: ResourceType,
        /// Income on that track after the move.
        income: i32,
    },
}

/// Move one population cube onto an empty slot, spending a colony ship.
///
/// Preconditions: the slot exists and is empty, the matching track has a
/// cube, and a colony ship is available. Any failure leaves every input
/// untouched.
pub fn colonize(
    galaxy: &mut Galaxy,
    track: &mut PopulationTrack,
    ships: &mut ColonyShips,
    sector_id: SectorId,
    slot_index: u8,
) -> Result<EconomyEvent> {
    let sector = galaxy
        .sector_by_id(sector_id)
        .ok_or(GameError::UnknownSector(sector_id))?;
    let slot = sector
        .slot(slot_index)
        .ok_or(GameError::UnknownSlot {
            sector: sector_id,
            slot: slot_index,
        })?;

    if slot.status != SlotStatus::Empty {
        return Err(GameError::SlotNotEmpty {
            sector: sector_id,
            slot: slot_index,
        });
    }
    let resource = slot.resource;
    if track.cubes(resource) == 0 {
        return Err(GameError::NoPopulationCubes(resource));
    }
    if ships.available() == 0 {
        return Err(GameError::NoColonyShips);
    }

    galaxy.set_slot_status(sector_id, slot_index, SlotStatus::Occupied)?;
    ships.used += 1;
    track.remove_cube(resource);

    Ok(EconomyEvent::Colonized {
        sector: sector_id,
        slot: slot_index,
        resource,
        income: track.income(resource),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hex::Axial;
    use crate::sector::{PopulationSlot, Sector, SectorKind};

    fn galaxy_with_slots() -> (Galaxy, SectorId) {
        let mut galaxy = Galaxy::new();
        let id = galaxy.allocate_id();
        let mut sector = Sector::new(id, Axial::new(1, 0), SectorKind::Neutral);
        sector.population_slots = vec![
            PopulationSlot::new(0, ResourceType::Money),
            PopulationSlot::new(1, ResourceType::Science),
        ];
        galaxy.commit(sector).unwrap();
        (galaxy, id)
    }

    #[test]
    fn test_income_table_endpoints() {
        assert_eq!(income(TRACK_LENGTH), 0);
        assert_eq!(income(TRACK_LENGTH + 5), 0);
        assert_eq!(income(TRACK_LENGTH - 1), 2);
        assert_eq!(income(TRACK_LENGTH - 2), 3);
        assert_eq!(income(0), 28);
    }

    #[test]
    fn test_income_never_decreases_as_cubes_leave() {
        let mut previous = income(TRACK_LENGTH);
        for cubes in (0..TRACK_LENGTH).rev() {
            let current = income(cubes);
            assert!(current >= previous, "income dropped at {cubes} cubes");
            previous = current;
        }
    }

    #[test]
    fn test_track_set_clamps() {
        let mut track = PopulationTrack::new();
        assert_eq!(track.set(ResourceType::Money, -3), 0);
        assert_eq!(track.set(ResourceType::Money, 40), TRACK_LENGTH);
        assert_eq!(track.set(ResourceType::Science, 7), 7);
        assert_eq!(track.income(ResourceType::Science), income(7));
    }

    #[test]
    fn test_resources_spend() {
        let mut stock = Resources::splat(5);
        assert!(stock.spend(ResourceType::Science, 5));
        assert_eq!(stock.science, 0);
        assert!(!stock.spend(ResourceType::Science, 1));
        assert_eq!(stock.science, 0);
    }

    #[test]
    fn test_resource_type_parse() {
        assert_eq!("materials".parse::<ResourceType>(), Ok(ResourceType::Materials));
        assert!("gold".parse::<ResourceType>().is_err());
    }

    #[test]
    fn test_colonize_moves_cube_and_spends_ship() {
        let (mut galaxy, id) = galaxy_with_slots();
        let mut track = PopulationTrack::new();
        let mut ships = ColonyShips::new(3);

        let event = colonize(&mut galaxy, &mut track, &mut ships, id, 1).unwrap();

        assert_eq!(
            event,
            EconomyEvent::Colonized {
                sector: id,
                slot: 1,
                resource: ResourceType::Science,
                income: 2,
            }
        );
        assert_eq!(ships.used, 1);
        assert_eq!(track.cubes(ResourceType::Science), TRACK_LENGTH - 1);
        let slot = galaxy.sector_by_id(id).unwrap().slot(1).unwrap();
        assert_eq!(slot.status, SlotStatus::Occupied);
    }

    #[test]
    fn test_colonize_occupied_slot_is_rejected_without_change() {
        let (mut galaxy, id) = galaxy_with_slots();
        let mut track = PopulationTrack::new();
        let mut ships = ColonyShips::new(3);
        colonize(&mut galaxy, &mut track, &mut ships, id, 0).unwrap();

        let before = (galaxy.clone(), track, ships);
        let result = colonize(&mut galaxy, &mut track, &mut ships, id, 0);

        assert_eq!(result, Err(GameError::SlotNotEmpty { sector: id, slot: 0 }));
        assert_eq!((galaxy, track, ships), before);
    }

    #[test]
    fn test_colonize_requires_ship_and_cube() {
        let (mut galaxy, id) = galaxy_with_slots();
        let mut track = PopulationTrack::new();
        let mut ships = ColonyShips::new(0);
        assert_eq!(
            colonize(&mut galaxy, &mut track, &mut ships, id, 0),
            Err(GameError::NoColonyShips)
        );

        let mut ships = ColonyShips::new(2);
        track.set(ResourceType::Money, 0);
        assert_eq!(
            colonize(&mut galaxy, &mut track, &mut ships, id, 0),
            Err(GameError::NoPopulationCubes(ResourceType::Money))
        );
        assert_eq!(ships.used, 0);
    }

    #[test]
    fn test_colonize_unknown_slot() {
        let (mut galaxy, id) = galaxy_with_slots();
        let mut track = PopulationTrack::new();
        let mut ships = ColonyShips::new(1);
        assert_eq!(
            colonize(&mut galaxy, &mut track, &mut ships, id, 9),
            Err(GameError::UnknownSlot { sector: id, slot: 9 })
        );
    }
}
