//! Test fixtures and helpers.
//!
//! Pre-built boards, players and games for consistent testing.

use galaxy_core::catalog::{Catalog, DiscoveryReward, RewardKind};
use galaxy_core::config::{GameConfig, GenerationConfig, RulesConfig};
use galaxy_core::error::{GameError, Result};
use galaxy_core::exploration::{DiscoveryChoice, ExploreOutcome, ExplorePhaseKind, ExploreStep};
use galaxy_core::galaxy::{Galaxy, SectorId};
use galaxy_core::game::Game;
use galaxy_core::hex::{Axial, EDGE_COUNT};
use galaxy_core::player::{PlayerAction, PlayerColor, PlayerState};
use galaxy_core::random::{RandomSource, RngSource};
use galaxy_core::sector::{Sector, SectorKind, Wormholes};
use rand::rngs::StdRng;

/// Seeded game type used by most fixtures.
pub type SeededGame = Game<RngSource<StdRng>>;

/// Sector with the given raw wormhole edges open.
#[must_use]
pub fn sector(id: u32, coordinate: Axial, kind: SectorKind, open_edges: &[usize]) -> Sector {
    let mut sector = Sector::new(SectorId(id), coordinate, kind);
    sector.wormholes = Wormholes::from_edges(open_edges);
    sector
}

/// Sector owned by `owner`.
#[must_use]
pub fn owned_sector(id: u32, coordinate: Axial, owner: PlayerColor, open_edges: &[usize]) -> Sector {
    let mut sector = sector(id, coordinate, SectorKind::Start, open_edges);
    sector.owner = Some(owner);
    sector
}

/// Board holding the given sectors.
///
/// # Panics
///
/// Panics if two sectors share an id or coordinate.
#[must_use]
pub fn galaxy_with(sectors: impl IntoIterator<Item = Sector>) -> Galaxy {
    let mut galaxy = Galaxy::new();
    for sector in sectors {
        galaxy.commit(sector).expect("fixture sectors must not collide");
    }
    galaxy
}

/// Fresh player with the standard blueprints.
///
/// # Panics
///
/// Panics if the built-in catalog is broken.
#[must_use]
pub fn player(color: PlayerColor) -> PlayerState {
    let blueprints = Catalog::standard()
        .and_then(|catalog| catalog.default_blueprints())
        .expect("built-in catalog must load");
    PlayerState::new(color, &RulesConfig::default(), blueprints)
}

/// Generation settings that never roll guardians.
#[must_use]
pub fn quiet_generation() -> GenerationConfig {
    GenerationConfig::default().with_guardian_chances(0.0, 0.0, 0.0)
}

/// White against Red with default rules.
///
/// # Panics
///
/// Panics if setup fails.
#[must_use]
pub fn two_player_game(seed: u64) -> SeededGame {
    game_with(&[PlayerColor::White, PlayerColor::Red], GameConfig::default(), seed)
}

/// Game for the given colors and config.
///
/// # Panics
///
/// Panics if setup fails.
#[must_use]
pub fn game_with(colors: &[PlayerColor], config: GameConfig, seed: u64) -> SeededGame {
    Game::new(colors, config, RngSource::seeded(seed)).expect("fixture game must set up")
}

/// Resource reward such as `money_8`.
#[must_use]
pub fn resource_reward(id: &str) -> DiscoveryReward {
    DiscoveryReward {
        id: id.to_string(),
        label: id.to_string(),
        kind: RewardKind::Resource,
        amount: None,
    }
}

/// Play one whole Explore action for the active player.
///
/// Explores the first zone, turns the sector until it fits, keeps it and
/// declines every optional step. Discoveries are taken as victory
/// points. Cancels the action when there is nowhere to explore.
pub fn auto_explore<R: RandomSource>(game: &mut Game<R>) -> Result<ExploreOutcome> {
    game.take_action(PlayerAction::Explore)?;
    let Some(zone) = game.explorable_zones().first().copied() else {
        game.cancel_explore()?;
        return Ok(ExploreOutcome::default());
    };
    game.select_zone(zone.coordinate)?;
    for _ in 0..EDGE_COUNT {
        if game.is_placement_valid() {
            break;
        }
        game.rotate_candidate()?;
    }

    let mut step = if game.is_placement_valid() {
        game.keep_sector()?
    } else {
        game.discard_sector()?
    };
    loop {
        step = match step {
            ExploreStep::Complete(outcome) => return Ok(outcome),
            ExploreStep::Continue(ExplorePhaseKind::InfluenceDecision) => game.decide_influence(false)?,
            ExploreStep::Continue(ExplorePhaseKind::ColonizeDecision) => game.decide_colonize(false)?,
            ExploreStep::Continue(ExplorePhaseKind::DiscoveryReward) => {
                game.decide_discovery(DiscoveryChoice::TakeVictoryPoints)?
            }
            ExploreStep::Continue(kind) => return Err(GameError::WrongPhase(kind)),
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auto_explore_grows_board() {
        let mut game = two_player_game(5);
        let outcome = auto_explore(&mut game).unwrap();
        assert!(outcome.sector.is_some());
        assert_eq!(game.galaxy().len(), 8);
        assert_eq!(game.active_color(), PlayerColor::Red);
        assert!(game.exploration().is_idle());
    }

    #[test]
    fn test_galaxy_with_indexes_sectors() {
        let galaxy = galaxy_with([
            owned_sector(1, Axial::ORIGIN, PlayerColor::Blue, &[0]),
            sector(2, Axial::new(0, -1), SectorKind::Neutral, &[3]),
        ]);
        assert_eq!(galaxy.len(), 2);
        assert_eq!(galaxy.owned_by(PlayerColor::Blue).count(), 1);
    }
}
