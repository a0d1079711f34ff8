//! Procedural generation of explored sectors.
//!
//! Generated sectors always have:
//! - At least one open wormhole
//! - A discovery tile whenever guardians are present
//!
//! Odds come from [`GenerationConfig`]; every draw goes through the
//! injected [`RandomSource`].

use tracing::debug;

use crate::config::{CountRange, GenerationConfig};
use crate::economy::ResourceType;
use crate::galaxy::SectorId;
use crate::hex::{ring_distance, Axial, EDGE_COUNT};
use crate::random::RandomSource;
use crate::sector::{PopulationSlot, Sector, SectorKind, Wormholes};

/// Distance band that selects generation odds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RingTier {
    /// Rings 0 and 1.
    Inner,
    /// Ring 2.
    Middle,
    /// Ring 3 and beyond.
    Outer,
}

impl RingTier {
    /// Tier for a ring distance.
    #[must_use]
    pub const fn for_ring(ring: u32) -> Self {
        match ring {
            0 | 1 => Self::Inner,
            2 => Self::Middle,
            _ => Self::Outer,
        }
    }
}

/// Creates candidate sectors for exploration.
#[derive(Debug, Clone, Default)]
pub struct SectorGenerator {
    config: GenerationConfig,
}

impl SectorGenerator {
    /// Generator with the given odds.
    #[must_use]
    pub const fn new(config: GenerationConfig) -> Self {
        Self { config }
    }

    /// Odds in use.
    #[must_use]
    pub const fn config(&self) -> &GenerationConfig {
        &self.config
    }

    /// Generate a sector for `coordinate`.
    ///
    /// The result is Neutral, or Guardian when it rolled guardians.
    pub fn generate<R: RandomSource>(&self, id: SectorId, coordinate: Axial, rng: &mut R) -> Sector {
        let config = &self.config;
        let tier = RingTier::for_ring(ring_distance(coordinate));

        let (wormholes, guardians, discovery, slot_range, advanced_chance) = match tier {
            RingTier::Inner => {
                let mut wormholes = Wormholes::ALL_OPEN;
                if rng.chance(config.inner_close_edge_chance) {
                    wormholes.close(rng.next_index(EDGE_COUNT));
                }
                let guardians = u32::from(rng.chance(config.inner_guardian_chance));
                (
                    wormholes,
                    guardians,
                    false,
                    config.inner_slots,
                    config.inner_advanced_chance,
                )
            }
            RingTier::Middle => {
                let wormholes = random_edges(rng, config.middle_edge_draws);
                let guardians = roll_guardians(rng, config.middle_guardian_chance, config.guardian_count);
                let discovery = rng.chance(config.middle_discovery_chance);
                (
                    wormholes,
                    guardians,
                    discovery,
                    config.middle_slots,
                    config.inner_advanced_chance,
                )
            }
            RingTier::Outer => {
                let wormholes = random_edges(rng, config.outer_edge_draws);
                let guardians = roll_guardians(rng, config.outer_guardian_chance, config.guardian_count);
                (
                    wormholes,
                    guardians,
                    true,
                    config.outer_slots,
                    config.outer_advanced_chance,
                )
            }
        };

        let kind = if guardians > 0 {
            SectorKind::Guardian
        } else {
            SectorKind::Neutral
        };
        let mut sector = Sector::new(id, coordinate, kind);
        sector.wormholes = wormholes;
        sector.guardian_count = guardians;
        sector.has_discovery_tile = discovery;

        let slot_count = rng.range_inclusive(slot_range.min, slot_range.max);
        sector.population_slots = (0..slot_count)
            .map(|index| {
                let resource = self.slot_resource(rng.next_unit());
                let slot = PopulationSlot::new(u8::try_from(index).unwrap_or(u8::MAX), resource);
                if rng.chance(advanced_chance) {
                    slot.advanced()
                } else {
                    slot
                }
            })
            .collect();

        if sector.wormholes.open_count() == 0 {
            sector.wormholes.open(0);
        }
        if sector.guardian_count > 0 {
            sector.has_discovery_tile = true;
        }

        debug!(
            %id,
            %coordinate,
            ?tier,
            wormholes = sector.wormholes.open_count(),
            guardians = sector.guardian_count,
            slots = sector.population_slots.len(),
            "sector generated"
        );
        sector
    }

    /// Resource for a slot given a uniform draw in `[0, 1)`.
    #[must_use]
    pub fn slot_resource(&self, draw: f64) -> ResourceType {
        if draw < self.config.money_threshold {
            ResourceType::Money
        } else if draw < self.config.science_threshold {
            ResourceType::Science
        } else {
            ResourceType::Materials
        }
    }
}

fn random_edges<R: RandomSource>(rng: &mut R, draws: CountRange) -> Wormholes {
    let mut wormholes = Wormholes::CLOSED;
    for _ in 0..rng.range_inclusive(draws.min, draws.max) {
        wormholes.open(rng.next_index(EDGE_COUNT));
    }
    wormholes
}

fn roll_guardians<R: RandomSource>(rng: &mut R, chance: f64, count: CountRange) -> u32 {
    if rng.chance(chance) {
        rng.range_inclusive(count.min, count.max)
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::RngSource;

    #[test]
    fn test_ring_tiers() {
        assert_eq!(RingTier::for_ring(0), RingTier::Inner);
        assert_eq!(RingTier::for_ring(1), RingTier::Inner);
        assert_eq!(RingTier::for_ring(2), RingTier::Middle);
        assert_eq!(RingTier::for_ring(7), RingTier::Outer);
    }

    #[test]
    fn test_generated_sectors_keep_structural_rules() {
        let generator = SectorGenerator::default();
        let mut rng = RngSource::seeded(2024);
        let coords = [Axial::new(1, 0), Axial::new(0, 2), Axial::new(-3, 1), Axial::new(4, -4)];
        for i in 0..400u32 {
            let coord = coords[(i % 4) as usize];
            let sector = generator.generate(SectorId(i + 1), coord, &mut rng);
            assert!(sector.wormholes.open_count() >= 1);
            if sector.guardian_count > 0 {
                assert!(sector.has_discovery_tile);
                assert_eq!(sector.kind, SectorKind::Guardian);
            } else {
                assert_eq!(sector.kind, SectorKind::Neutral);
            }
            assert_eq!(sector.coordinate(), coord);
            assert_eq!(sector.rotation(), 0);
        }
    }

    #[test]
    fn test_inner_ring_has_at_most_one_closed_edge() {
        let generator = SectorGenerator::default();
        let mut rng = RngSource::seeded(77);
        for i in 0..200 {
            let sector = generator.generate(SectorId(i + 1), Axial::new(0, 1), &mut rng);
            assert!(sector.wormholes.open_count() >= 5);
            assert!(sector.guardian_count <= 1);
            assert!((1..=2).contains(&sector.population_slots.len()));
        }
    }

    #[test]
    fn test_outer_ring_always_has_discovery() {
        let generator = SectorGenerator::default();
        let mut rng = RngSource::seeded(8);
        for i in 0..200 {
            let sector = generator.generate(SectorId(i + 1), Axial::new(3, 0), &mut rng);
            assert!(sector.has_discovery_tile);
            assert!(sector.wormholes.open_count() <= 3);
            assert!((2..=4).contains(&sector.population_slots.len()));
            assert!(sector.guardian_count <= 2);
        }
    }

    #[test]
    fn test_slot_resource_thresholds() {
        let generator = SectorGenerator::default();
        assert_eq!(generator.slot_resource(0.0), ResourceType::Money);
        assert_eq!(generator.slot_resource(0.39), ResourceType::Money);
        assert_eq!(generator.slot_resource(0.4), ResourceType::Science);
        assert_eq!(generator.slot_resource(0.69), ResourceType::Science);
        assert_eq!(generator.slot_resource(0.7), ResourceType::Materials);
    }

    #[test]
    fn test_slot_mix_is_roughly_balanced() {
        let generator = SectorGenerator::default();
        let mut rng = RngSource::seeded(99);
        let mut counts = [0u32; 3];
        for i in 0..300 {
            let sector = generator.generate(SectorId(i + 1), Axial::new(0, -3), &mut rng);
            for slot in &sector.population_slots {
                let index = ResourceType::ALL.iter().position(|&ty| ty == slot.resource).unwrap();
                counts[index] += 1;
            }
        }
        assert!(counts.iter().all(|&count| count > 100), "{counts:?}");
    }
}
