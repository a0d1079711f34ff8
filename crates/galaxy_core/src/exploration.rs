//! The Explore action as a state machine.
//!
//! ```text
//! Idle -> ZoneSelection -> Placement --keep--> InfluenceDecision -> ColonizeDecision
//!                              |                                      |        |
//!                           discard                            ActiveColonization
//!                              |                                      |        |
//!                            Idle   <-- Complete <-- DiscoveryReward <- DiscoveryCheck
//! ```
//!
//! Every operation checks the current phase first and returns
//! [`GameError::WrongPhase`] without touching anything if it does not
//! apply. A rejected operation never changes the phase.
//!
//! The pending candidate lives only inside the [`ExplorePhase::Placement`]
//! phase; the galaxy never sees it until it is kept.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::catalog::DiscoveryReward;
use crate::discovery::{draw_discovery, DISCOVERY_VICTORY_POINTS};
use crate::economy::EconomyEvent;
use crate::error::{GameError, Result};
use crate::galaxy::{ExploreSource, Galaxy, SectorId};
use crate::generation::SectorGenerator;
use crate::hex::{opposite_edge, Axial};
use crate::player::PlayerState;
use crate::random::RandomSource;
use crate::sector::Sector;

/// Current step of an Explore action.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ExplorePhase {
    /// No action in progress.
    #[default]
    Idle,
    /// Waiting for a target coordinate.
    ZoneSelection,
    /// A candidate is being oriented.
    Placement {
        /// The pending sector.
        candidate: Sector,
        /// Where the exploration came from.
        source: ExploreSource,
    },
    /// The kept sector may be influenced.
    InfluenceDecision {
        /// The kept sector.
        sector: SectorId,
        /// Whether it links to the board.
        connected: bool,
    },
    /// The player may start colonizing.
    ColonizeDecision {
        /// The kept sector.
        sector: SectorId,
    },
    /// Colony ships are being placed.
    ActiveColonization {
        /// The kept sector.
        sector: SectorId,
    },
    /// A discovery tile was drawn.
    DiscoveryReward {
        /// The kept sector.
        sector: SectorId,
        /// The drawn tile.
        tile: DiscoveryReward,
    },
}

/// Data-free tag for [`ExplorePhase`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExplorePhaseKind {
    /// See [`ExplorePhase::Idle`].
    Idle,
    /// See [`ExplorePhase::ZoneSelection`].
    ZoneSelection,
    /// See [`ExplorePhase::Placement`].
    Placement,
    /// See [`ExplorePhase::InfluenceDecision`].
    InfluenceDecision,
    /// See [`ExplorePhase::ColonizeDecision`].
    ColonizeDecision,
    /// See [`ExplorePhase::ActiveColonization`].
    ActiveColonization,
    /// See [`ExplorePhase::DiscoveryReward`].
    DiscoveryReward,
}

impl ExplorePhase {
    /// Tag for this phase.
    #[must_use]
    pub const fn kind(&self) -> ExplorePhaseKind {
        match self {
            Self::Idle => ExplorePhaseKind::Idle,
            Self::ZoneSelection => ExplorePhaseKind::ZoneSelection,
            Self::Placement { .. } => ExplorePhaseKind::Placement,
            Self::InfluenceDecision { .. } => ExplorePhaseKind::InfluenceDecision,
            Self::ColonizeDecision { .. } => ExplorePhaseKind::ColonizeDecision,
            Self::ActiveColonization { .. } => ExplorePhaseKind::ActiveColonization,
            Self::DiscoveryReward { .. } => ExplorePhaseKind::DiscoveryReward,
        }
    }
}

/// Player's answer to a drawn discovery tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DiscoveryChoice {
    /// Take the tile's reward.
    TakeReward,
    /// Keep the tile face down for victory points.
    TakeVictoryPoints,
}

/// How a finished Explore action ended.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ExploreOutcome {
    /// Sector kept, if any.
    pub sector: Option<SectorId>,
    /// Reward to deliver.
    pub reward: Option<DiscoveryReward>,
    /// Victory points from a face-down discovery.
    pub victory_points: i32,
    /// The candidate was thrown away.
    pub discarded: bool,
}

/// Result of a successful transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExploreStep {
    /// The action continues in a new phase.
    Continue(ExplorePhaseKind),
    /// The action is over and the machine is idle again.
    Complete(ExploreOutcome),
}

/// Drives a single Explore action.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExplorationMachine {
    phase: ExplorePhase,
}

impl ExplorationMachine {
    /// Idle machine.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current phase.
    #[must_use]
    pub const fn phase(&self) -> &ExplorePhase {
        &self.phase
    }

    /// Whether no action is in progress.
    #[must_use]
    pub const fn is_idle(&self) -> bool {
        matches!(self.phase, ExplorePhase::Idle)
    }

    /// The pending candidate during placement.
    #[must_use]
    pub const fn candidate(&self) -> Option<&Sector> {
        match &self.phase {
            ExplorePhase::Placement { candidate, .. } => Some(candidate),
            _ => None,
        }
    }

    /// Source of the pending candidate during placement.
    #[must_use]
    pub const fn source(&self) -> Option<&ExploreSource> {
        match &self.phase {
            ExplorePhase::Placement { source, .. } => Some(source),
            _ => None,
        }
    }

    fn set_phase(&mut self, phase: ExplorePhase) -> ExploreStep {
        let kind = phase.kind();
        debug!(from = ?self.phase.kind(), to = ?kind, "explore phase change");
        self.phase = phase;
        ExploreStep::Continue(kind)
    }

    fn complete(&mut self, outcome: ExploreOutcome) -> ExploreStep {
        debug!(?outcome, "explore complete");
        self.phase = ExplorePhase::Idle;
        ExploreStep::Complete(outcome)
    }

    fn wrong_phase(&self) -> GameError {
        debug!(phase = ?self.phase.kind(), "explore operation rejected");
        GameError::WrongPhase(self.phase.kind())
    }

    /// Start an Explore action.
    pub fn begin(&mut self) -> Result<ExploreStep> {
        if !self.is_idle() {
            return Err(self.wrong_phase());
        }
        Ok(self.set_phase(ExplorePhase::ZoneSelection))
    }

    /// Abandon the action before any candidate exists.
    pub fn cancel(&mut self) -> Result<()> {
        if self.phase != ExplorePhase::ZoneSelection {
            return Err(self.wrong_phase());
        }
        self.set_phase(ExplorePhase::Idle);
        Ok(())
    }

    /// Pick a target coordinate and generate a candidate for it.
    ///
    /// The source sector is re-derived from the board, not taken from any
    /// cached zone list. The candidate has no id until it is kept.
    pub fn select_zone<R: RandomSource>(
        &mut self,
        galaxy: &mut Galaxy,
        player: &PlayerState,
        target: Axial,
        generator: &SectorGenerator,
        rng: &mut R,
    ) -> Result<ExploreStep> {
        if self.phase != ExplorePhase::ZoneSelection {
            return Err(self.wrong_phase());
        }
        if galaxy.is_occupied(target) {
            debug!(%target, "zone rejected: occupied");
            return Err(GameError::CoordinateOccupied(target));
        }
        let source = galaxy
            .find_explore_source(player.color(), target)
            .ok_or_else(|| {
                debug!(%target, "zone rejected: no wormhole");
                GameError::NoWormholeToTarget(target)
            })?;

        let candidate = generator.generate(SectorId::UNASSIGNED, target, rng);
        Ok(self.set_phase(ExplorePhase::Placement { candidate, source }))
    }

    /// Turn the candidate one step. Returns the new rotation.
    pub fn rotate(&mut self) -> Result<u8> {
        if let ExplorePhase::Placement { candidate, .. } = &mut self.phase {
            candidate.rotate();
            return Ok(candidate.rotation());
        }
        Err(self.wrong_phase())
    }

    /// Whether the candidate has a wormhole facing its source.
    #[must_use]
    pub fn is_placement_valid(&self) -> bool {
        match &self.phase {
            ExplorePhase::Placement { candidate, source } => candidate
                .effective_wormholes()
                .is_open(opposite_edge(source.edge)),
            _ => false,
        }
    }

    /// Throw the candidate away and end the action.
    pub fn discard(&mut self) -> Result<ExploreStep> {
        if self.phase.kind() != ExplorePhaseKind::Placement {
            return Err(self.wrong_phase());
        }
        Ok(self.complete(ExploreOutcome {
            discarded: true,
            ..ExploreOutcome::default()
        }))
    }

    /// Commit the candidate to the board.
    pub fn keep<R: RandomSource>(
        &mut self,
        galaxy: &mut Galaxy,
        player: &PlayerState,
        pool: &[DiscoveryReward],
        rng: &mut R,
    ) -> Result<ExploreStep> {
        let ExplorePhase::Placement { candidate, .. } = &self.phase else {
            return Err(self.wrong_phase());
        };
        if !self.is_placement_valid() {
            debug!(rotation = candidate.rotation(), "keep rejected: no wormhole faces source");
            return Err(GameError::InvalidPlacement);
        }

        let mut candidate = candidate.clone();
        candidate.assign_id(galaxy.allocate_id());
        let coordinate = candidate.coordinate();
        let guardians = candidate.guardian_count;
        let connected = galaxy.is_connected(coordinate, &candidate.effective_wormholes());
        let sector = galaxy.commit(candidate)?;
        info!(%sector, %coordinate, connected, guardians, "explored sector kept");

        if guardians > 0 {
            return Ok(self.discovery_check(sector, galaxy, pool, rng));
        }
        if connected && player.available_discs() > 0 {
            Ok(self.set_phase(ExplorePhase::InfluenceDecision { sector, connected }))
        } else {
            Ok(self.set_phase(ExplorePhase::ColonizeDecision { sector }))
        }
    }

    /// Place an influence disc on the kept sector, or leave it neutral.
    pub fn decide_influence(
        &mut self,
        influence: bool,
        galaxy: &mut Galaxy,
        player: &mut PlayerState,
    ) -> Result<ExploreStep> {
        let ExplorePhase::InfluenceDecision { sector, connected } = self.phase else {
            return Err(self.wrong_phase());
        };
        if influence {
            if !connected || player.available_discs() == 0 {
                return Err(GameError::InfluenceNotAllowed);
            }
            galaxy.set_owner(sector, Some(player.color()))?;
            player.discs.place_on_map()?;
            info!(%sector, player = %player.color(), "sector influenced");
        }
        Ok(self.set_phase(ExplorePhase::ColonizeDecision { sector }))
    }

    /// Start colonizing, or skip to the discovery check.
    pub fn decide_colonize<R: RandomSource>(
        &mut self,
        colonize: bool,
        galaxy: &mut Galaxy,
        player: &PlayerState,
        pool: &[DiscoveryReward],
        rng: &mut R,
    ) -> Result<ExploreStep> {
        let ExplorePhase::ColonizeDecision { sector } = self.phase else {
            return Err(self.wrong_phase());
        };
        if !colonize {
            return Ok(self.discovery_check(sector, galaxy, pool, rng));
        }
        if player.colony_ships.available() == 0 {
            return Err(GameError::NoColonyShips);
        }
        Ok(self.set_phase(ExplorePhase::ActiveColonization { sector }))
    }

    /// Colonize one slot on any sector the player owns.
    pub fn colonize(
        &self,
        galaxy: &mut Galaxy,
        player: &mut PlayerState,
        sector: SectorId,
        slot: u8,
    ) -> Result<EconomyEvent> {
        if self.phase.kind() != ExplorePhaseKind::ActiveColonization {
            return Err(self.wrong_phase());
        }
        player.colonize(galaxy, sector, slot)
    }

    /// Stop colonizing and move on to the discovery check.
    pub fn finish_colonizing<R: RandomSource>(
        &mut self,
        galaxy: &mut Galaxy,
        pool: &[DiscoveryReward],
        rng: &mut R,
    ) -> Result<ExploreStep> {
        let ExplorePhase::ActiveColonization { sector } = self.phase else {
            return Err(self.wrong_phase());
        };
        Ok(self.discovery_check(sector, galaxy, pool, rng))
    }

    /// Resolve the drawn discovery tile.
    pub fn decide_discovery(&mut self, choice: DiscoveryChoice, galaxy: &mut Galaxy) -> Result<ExploreStep> {
        let ExplorePhase::DiscoveryReward { sector, tile } = &self.phase else {
            return Err(self.wrong_phase());
        };
        let sector = *sector;
        let tile = tile.clone();
        galaxy.mark_discovery_claimed(sector)?;

        let outcome = match choice {
            DiscoveryChoice::TakeReward => ExploreOutcome {
                sector: Some(sector),
                reward: Some(tile),
                ..ExploreOutcome::default()
            },
            DiscoveryChoice::TakeVictoryPoints => ExploreOutcome {
                sector: Some(sector),
                victory_points: DISCOVERY_VICTORY_POINTS,
                ..ExploreOutcome::default()
            },
        };
        Ok(self.complete(outcome))
    }

    fn discovery_check<R: RandomSource>(
        &mut self,
        sector: SectorId,
        galaxy: &Galaxy,
        pool: &[DiscoveryReward],
        rng: &mut R,
    ) -> ExploreStep {
        let unclaimed = galaxy
            .sector_by_id(sector)
            .is_some_and(Sector::has_unclaimed_discovery);
        if unclaimed {
            if let Some(tile) = draw_discovery(pool, rng) {
                debug!(%sector, tile = %tile.id, "discovery drawn");
                return self.set_phase(ExplorePhase::DiscoveryReward { sector, tile });
            }
        }
        self.complete(ExploreOutcome {
            sector: Some(sector),
            ..ExploreOutcome::default()
        })
    }
}
