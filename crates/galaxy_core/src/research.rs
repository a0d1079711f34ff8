//! Technology research: the shared tray and per-player tech tracks.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::catalog::{Catalog, TechCategory, TechTile};
use crate::error::{GameError, Result};
use crate::random::RandomSource;

/// Discount granted by the number of techs already on a track.
///
/// A track holding as many techs as this table has entries is full.
pub const DISCOUNT_TABLE: [i32; 7] = [0, 1, 2, 3, 4, 6, 8];

/// Most techs a single track can hold.
pub const MAX_TECHS_PER_TRACK: usize = DISCOUNT_TABLE.len();

/// A tech track on the player board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TechTrack {
    /// Military track.
    Military,
    /// Grid track.
    Grid,
    /// Nano track.
    Nano,
}

impl TechTrack {
    /// Every track.
    pub const ALL: [Self; 3] = [Self::Military, Self::Grid, Self::Nano];
}

impl fmt::Display for TechTrack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Military => "military",
            Self::Grid => "grid",
            Self::Nano => "nano",
        };
        f.write_str(name)
    }
}

/// Techs a player owns, per track, in acquisition order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ResearchedTechs {
    military: Vec<TechTile>,
    grid: Vec<TechTile>,
    nano: Vec<TechTile>,
}

impl ResearchedTechs {
    /// Techs on one track.
    #[must_use]
    pub fn track(&self, track: TechTrack) -> &[TechTile] {
        match track {
            TechTrack::Military => &self.military,
            TechTrack::Grid => &self.grid,
            TechTrack::Nano => &self.nano,
        }
    }

    /// Number of techs on one track.
    #[must_use]
    pub fn count(&self, track: TechTrack) -> usize {
        self.track(track).len()
    }

    /// Whether any track holds the tech.
    #[must_use]
    pub fn contains(&self, tech_id: &str) -> bool {
        TechTrack::ALL
            .into_iter()
            .any(|track| self.track(track).iter().any(|tech| tech.id == tech_id))
    }

    /// Append a tech to a track.
    pub fn push(&mut self, track: TechTrack, tech: TechTile) {
        match track {
            TechTrack::Military => self.military.push(tech),
            TechTrack::Grid => self.grid.push(tech),
            TechTrack::Nano => self.nano.push(tech),
        }
    }
}

/// Cost of a tech placed on a track that already holds `count` techs.
///
/// `None` when the track is full.
#[must_use]
pub fn research_cost(tech: &TechTile, count: usize) -> Option<i32> {
    DISCOUNT_TABLE
        .get(count)
        .map(|discount| tech.min_cost.max(tech.base_cost - discount))
}

/// Techs on offer this round.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ResearchTray {
    military: Vec<TechTile>,
    grid: Vec<TechTile>,
    nano: Vec<TechTile>,
    rare: Vec<TechTile>,
}

impl ResearchTray {
    /// Draw `per_category` tiles of each category.
    ///
    /// Each category's pool holds `copies` tiles per tech. The pool is
    /// shuffled, the first tiles kept, and the result sorted by base cost.
    pub fn draw<R: RandomSource>(catalog: &Catalog, per_category: usize, rng: &mut R) -> Self {
        let mut pick = |category: TechCategory| {
            let mut pool: Vec<TechTile> = catalog
                .techs()
                .iter()
                .filter(|tech| tech.category == category)
                .flat_map(|tech| std::iter::repeat(tech.clone()).take(tech.copies as usize))
                .collect();
            rng.shuffle(&mut pool);
            pool.truncate(per_category);
            pool.sort_by_key(|tech| tech.base_cost);
            pool
        };
        let tray = Self {
            military: pick(TechCategory::Military),
            grid: pick(TechCategory::Grid),
            nano: pick(TechCategory::Nano),
            rare: pick(TechCategory::Rare),
        };
        debug!(tiles = tray.len(), "research tray drawn");
        tray
    }

    /// Tray with explicit contents.
    #[must_use]
    pub fn from_tiles(tiles: impl IntoIterator<Item = TechTile>) -> Self {
        let mut tray = Self::default();
        for tile in tiles {
            tray.category_mut(tile.category).push(tile);
        }
        tray
    }

    /// Tiles of one category.
    #[must_use]
    pub fn category(&self, category: TechCategory) -> &[TechTile] {
        match category {
            TechCategory::Military => &self.military,
            TechCategory::Grid => &self.grid,
            TechCategory::Nano => &self.nano,
            TechCategory::Rare => &self.rare,
        }
    }

    fn category_mut(&mut self, category: TechCategory) -> &mut Vec<TechTile> {
        match category {
            TechCategory::Military => &mut self.military,
            TechCategory::Grid => &mut self.grid,
            TechCategory::Nano => &mut self.nano,
            TechCategory::Rare => &mut self.rare,
        }
    }

    /// Total tiles on the tray.
    #[must_use]
    pub fn len(&self) -> usize {
        TechCategory::ALL
            .into_iter()
            .map(|category| self.category(category).len())
            .sum()
    }

    /// Whether the tray is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// First tile with this id.
    #[must_use]
    pub fn find(&self, tech_id: &str) -> Option<&TechTile> {
        TechCategory::ALL
            .into_iter()
            .flat_map(|category| self.category(category))
            .find(|tech| tech.id == tech_id)
    }

    /// Remove one copy of a tech.
    pub fn take(&mut self, tech_id: &str) -> Option<TechTile> {
        TechCategory::ALL.into_iter().find_map(|category| {
            let tiles = self.category_mut(category);
            let index = tiles.iter().position(|tech| tech.id == tech_id)?;
            Some(tiles.remove(index))
        })
    }
}

/// A successful research purchase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResearchOutcome {
    /// Tech acquired.
    pub tech: TechTile,
    /// Track it went on.
    pub track: TechTrack,
    /// Science paid.
    pub cost: i32,
}

/// Buy a tech from the tray and place it on a track.
///
/// Checks in order: track full, tray membership, track color, science.
/// On failure nothing changes.
pub fn commit_research(
    tray: &mut ResearchTray,
    researched: &mut ResearchedTechs,
    science: &mut i32,
    tech_id: &str,
    track: TechTrack,
) -> Result<ResearchOutcome> {
    let count = researched.count(track);
    if count >= MAX_TECHS_PER_TRACK {
        debug!(%track, "research rejected: track full");
        return Err(GameError::TrackFull);
    }
    let tech = tray
        .find(tech_id)
        .ok_or_else(|| GameError::TechNotAvailable(tech_id.to_string()))?;
    if tech.category.track().is_some_and(|own| own != track) {
        return Err(GameError::WrongTechCategory(tech_id.to_string()));
    }
    let cost = research_cost(tech, count).ok_or(GameError::TrackFull)?;
    if *science < cost {
        return Err(GameError::InsufficientScience {
            required: cost,
            available: *science,
        });
    }

    let tech = tray
        .take(tech_id)
        .ok_or_else(|| GameError::TechNotAvailable(tech_id.to_string()))?;
    *science -= cost;
    info!(tech = %tech.id, %track, cost, "tech researched");
    researched.push(track, tech.clone());
    Ok(ResearchOutcome { tech, track, cost })
}
