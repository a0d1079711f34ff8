//! Board previews for tuning layout and generation data.

use std::fmt;

use galaxy_core::config::GameConfig;
use galaxy_core::galaxy::SectorId;
use galaxy_core::game::Game;
use galaxy_core::generation::SectorGenerator;
use galaxy_core::hex::Axial;
use galaxy_core::player::PlayerColor;
use galaxy_core::random::{RandomSource, RngSource};
use galaxy_core::research::ResearchTray;
use galaxy_core::sector::Sector;
use serde::Serialize;
use tracing::info;

use crate::error::{Result, ToolError};

/// Starting board and research tray of a fresh game.
#[derive(Debug, Clone, Serialize)]
pub struct LayoutReport {
    /// Seed the game was built with.
    pub seed: u64,
    /// Seating order as given.
    pub players: Vec<PlayerColor>,
    /// Committed sectors in coordinate order.
    pub sectors: Vec<Sector>,
    /// Techs on offer in the first round.
    pub tray: ResearchTray,
}

impl LayoutReport {
    /// Pretty JSON.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| ToolError::Serialize(e.to_string()))
    }

    /// Pretty RON.
    pub fn to_ron(&self) -> Result<String> {
        ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
            .map_err(|e| ToolError::Serialize(e.to_string()))
    }
}

/// Set up a game and capture its opening state.
///
/// # Errors
///
/// Returns an error for an unsupported player count or repeated colors.
pub fn layout_report(players: &[PlayerColor], seed: u64) -> Result<LayoutReport> {
    let game = Game::new(players, GameConfig::default().with_seed(seed), RngSource::seeded(seed))?;
    info!(players = players.len(), seed, "layout built");
    Ok(LayoutReport {
        seed,
        players: players.to_vec(),
        sectors: game.galaxy().sectors().cloned().collect(),
        tray: game.state().tray.clone(),
    })
}

/// One generated sector, reduced to what matters when tuning odds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SectorSummary {
    /// Ring the sector was generated for.
    pub ring: u32,
    /// Open raw edges.
    pub open_edges: Vec<usize>,
    /// Guardians rolled.
    pub guardians: u32,
    /// Discovery tile present.
    pub discovery: bool,
    /// Slot resources, advanced slots suffixed with `*`.
    pub slots: Vec<String>,
}

impl From<&Sector> for SectorSummary {
    fn from(sector: &Sector) -> Self {
        Self {
            ring: sector.ring(),
            open_edges: sector.wormholes.open_edges().collect(),
            guardians: sector.guardian_count,
            discovery: sector.has_discovery_tile,
            slots: sector
                .population_slots
                .iter()
                .map(|slot| {
                    if slot.is_advanced {
                        format!("{}*", slot.resource)
                    } else {
                        slot.resource.to_string()
                    }
                })
                .collect(),
        }
    }
}

impl fmt::Display for SectorSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ring {} edges {:?} guardians {} discovery {} slots [{}]",
            self.ring,
            self.open_edges,
            self.guardians,
            if self.discovery { "yes" } else { "no" },
            self.slots.join(", ")
        )
    }
}

/// Generate `count` sectors on `ring` with the default odds.
pub fn sample_sectors<R: RandomSource>(ring: u32, count: usize, rng: &mut R) -> Vec<SectorSummary> {
    let generator = SectorGenerator::default();
    let coordinate = Axial::new(i32::try_from(ring).unwrap_or(i32::MAX), 0);
    (0..count)
        .map(|index| {
            let id = SectorId(u32::try_from(index).unwrap_or(u32::MAX).saturating_add(1));
            SectorSummary::from(&generator.generate(id, coordinate, rng))
        })
        .collect()
}
