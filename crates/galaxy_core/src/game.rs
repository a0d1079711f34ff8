//! The game controller.
//!
//! [`Game`] owns the whole [`GameState`] and is the only way to change it.
//! Each command either succeeds completely or returns an error and leaves
//! the state untouched. Notable changes are queued as [`GameEvent`]s for
//! the caller to drain.
//!
//! # Turn flow
//!
//! The active player places an action disc with [`Game::take_action`].
//! Explore, Research and Upgrade open a workflow that the player finishes
//! through the matching commands; the turn passes to the next color when
//! the workflow ends. Cancelling a workflow before it does anything
//! returns the disc and keeps the turn.
//!
//! # Example
//!
//! ```
//! use galaxy_core::config::GameConfig;
//! use galaxy_core::game::Game;
//! use galaxy_core::player::{PlayerAction, PlayerColor};
//! use galaxy_core::random::RngSource;
//!
//! let mut game = Game::new(
//!     &[PlayerColor::White, PlayerColor::Red],
//!     GameConfig::default(),
//!     RngSource::seeded(7),
//! )
//! .unwrap();
//!
//! game.take_action(PlayerAction::Explore).unwrap();
//! let target = game.explorable_zones()[0].coordinate;
//! game.select_zone(target).unwrap();
//! game.discard_sector().unwrap();
//! assert_eq!(game.active_color(), PlayerColor::Red);
//! ```

use std::collections::BTreeMap;

use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::catalog::{Catalog, DiscoveryReward, RewardKind};
use crate::config::{DiscardPolicy, GameConfig};
use crate::discovery::{parse_resource_reward, DISCOVERY_VICTORY_POINTS};
use crate::economy::{EconomyEvent, ResourceType};
use crate::error::{GameError, Result};
use crate::exploration::{DiscoveryChoice, ExplorationMachine, ExploreOutcome, ExplorePhase, ExplorePhaseKind, ExploreStep};
use crate::galaxy::{EmptyZone, Galaxy, SectorId};
use crate::generation::SectorGenerator;
use crate::hex::Axial;
use crate::layout::build_layout;
use crate::player::{PlayerAction, PlayerColor, PlayerState};
use crate::random::{RandomSource, RngSource};
use crate::research::{self, ResearchOutcome, ResearchTray, TechTrack};
use crate::sector::{Sector, SectorKind, SlotStatus};
use crate::ships::{Blueprints, ShipClass};
use crate::upgrade::UpgradeSession;

/// Something the caller may want to react to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// A disc went onto an action space.
    ActionTaken {
        /// Acting player.
        player: PlayerColor,
        /// Action chosen.
        action: PlayerAction,
    },
    /// A disc came back off an action space.
    ActionRefunded {
        /// Player refunded.
        player: PlayerColor,
        /// Action space.
        action: PlayerAction,
    },
    /// The active color changed.
    TurnAdvanced {
        /// Previous active color.
        from: PlayerColor,
        /// New active color.
        to: PlayerColor,
    },
    /// An explored sector joined the board.
    SectorKept {
        /// Exploring player.
        player: PlayerColor,
        /// New sector.
        sector: SectorId,
        /// Where it was placed.
        coordinate: Axial,
    },
    /// An explored sector was thrown away.
    SectorDiscarded {
        /// Exploring player.
        player: PlayerColor,
        /// Whether the Explore disc went back to the supply.
        refunded: bool,
    },
    /// An influence disc was placed on a sector.
    SectorInfluenced {
        /// New owner.
        player: PlayerColor,
        /// Influenced sector.
        sector: SectorId,
    },
    /// A population cube was placed.
    Colonized {
        /// Colonizing player.
        player: PlayerColor,
        /// Economy details.
        event: EconomyEvent,
    },
    /// A resource reward was credited.
    ResourceGained {
        /// Receiving player.
        player: PlayerColor,
        /// Resource credited.
        resource: ResourceType,
        /// Amount credited.
        amount: i32,
    },
    /// A discovery part is waiting in an upgrade session.
    PartAwarded {
        /// Receiving player.
        player: PlayerColor,
        /// Part id.
        part: String,
    },
    /// A structure reward for the caller to place.
    StructureAwarded {
        /// Receiving player.
        player: PlayerColor,
        /// Reward id.
        reward: String,
    },
    /// Victory points from a discovery.
    VictoryPointsAwarded {
        /// Receiving player.
        player: PlayerColor,
        /// Points.
        points: i32,
    },
    /// A tech was bought.
    TechResearched {
        /// Buying player.
        player: PlayerColor,
        /// Tech id.
        tech: String,
        /// Track it went on.
        track: TechTrack,
        /// Science paid.
        cost: i32,
    },
    /// Draft blueprints replaced the committed ones.
    BlueprintsUpgraded {
        /// Upgrading player.
        player: PlayerColor,
    },
    /// An upgrade session closed without changes.
    UpgradeCancelled {
        /// Upgrading player.
        player: PlayerColor,
    },
}

/// What opened the current upgrade session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UpgradeOrigin {
    /// The Upgrade action.
    Action,
    /// A part reward from a discovery tile.
    Discovery,
}

/// Board, players and market.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    /// Committed sectors.
    pub galaxy: Galaxy,
    /// Players by color.
    pub players: BTreeMap<PlayerColor, PlayerState>,
    /// Whose turn it is.
    pub active: PlayerColor,
    /// Techs on offer.
    pub tray: ResearchTray,
}

impl GameState {
    /// Colors in the game, in turn order.
    #[must_use]
    pub fn colors(&self) -> Vec<PlayerColor> {
        self.players.keys().copied().collect()
    }
}

/// The game aggregate.
#[derive(Debug)]
pub struct Game<R: RandomSource = RngSource<StdRng>> {
    state: GameState,
    catalog: Catalog,
    config: GameConfig,
    generator: SectorGenerator,
    defaults: Blueprints,
    rng: R,
    exploration: ExplorationMachine,
    upgrade: Option<(UpgradeSession, UpgradeOrigin)>,
    researching: bool,
    colonizing: bool,
    events: Vec<GameEvent>,
}

impl Game<RngSource<StdRng>> {
    /// Game seeded from `config.seed`, or from entropy when unset.
    pub fn from_config(colors: &[PlayerColor], config: GameConfig) -> Result<Self> {
        let rng = config
            .seed
            .map_or_else(RngSource::from_entropy, RngSource::seeded);
        Self::new(colors, config, rng)
    }
}

impl<R: RandomSource> Game<R> {
    /// Set up a game with the built-in catalog.
    pub fn new(colors: &[PlayerColor], config: GameConfig, rng: R) -> Result<Self> {
        Self::with_catalog(colors, config, Catalog::standard()?, rng)
    }

    /// Set up a game.
    ///
    /// Builds the starting board, fills each home sector's population
    /// slots, removes the matching cubes from every player's tracks and
    /// draws the first research tray. White, or the first color after it
    /// in turn order, starts.
    pub fn with_catalog(colors: &[PlayerColor], config: GameConfig, catalog: Catalog, mut rng: R) -> Result<Self> {
        let defaults = catalog.default_blueprints()?;
        let rules = &config.rules;
        let mut galaxy = Galaxy::new();
        let mut players = BTreeMap::new();

        for mut sector in build_layout(colors, &mut galaxy)? {
            if let (SectorKind::Start, Some(color)) = (sector.kind, sector.owner) {
                let mut occupied = Vec::with_capacity(sector.population_slots.len());
                for slot in &mut sector.population_slots {
                    slot.status = SlotStatus::Occupied;
                    occupied.push(slot.resource);
                }
                let mut player = PlayerState::new(color, rules, defaults.clone());
                player.apply_starting_population(&occupied, rules.extra_start_cubes_removed);
                players.insert(color, player);
            }
            galaxy.commit(sector)?;
        }

        let active = PlayerColor::TURN_ORDER
            .into_iter()
            .find(|color| players.contains_key(color))
            .ok_or(GameError::InvalidPlayerCount(colors.len()))?;
        let tray = ResearchTray::draw(&catalog, rules.tray_draw_per_category, &mut rng);
        info!(players = players.len(), %active, "game started");

        Ok(Self {
            state: GameState {
                galaxy,
                players,
                active,
                tray,
            },
            generator: SectorGenerator::new(config.generation.clone()),
            catalog,
            config,
            defaults,
            rng,
            exploration: ExplorationMachine::new(),
            upgrade: None,
            researching: false,
            colonizing: false,
            events: Vec::new(),
        })
    }

    /// Full state.
    #[must_use]
    pub const fn state(&self) -> &GameState {
        &self.state
    }

    /// Committed board.
    #[must_use]
    pub const fn galaxy(&self) -> &Galaxy {
        &self.state.galaxy
    }

    /// Part, tech and discovery data.
    #[must_use]
    pub const fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Configuration in use.
    #[must_use]
    pub const fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Whose turn it is.
    #[must_use]
    pub const fn active_color(&self) -> PlayerColor {
        self.state.active
    }

    /// One player's board.
    #[must_use]
    pub fn player(&self, color: PlayerColor) -> Option<&PlayerState> {
        self.state.players.get(&color)
    }

    /// Explore state machine.
    #[must_use]
    pub const fn exploration(&self) -> &ExplorationMachine {
        &self.exploration
    }

    /// Open upgrade session, if any.
    #[must_use]
    pub fn upgrade_session(&self) -> Option<&UpgradeSession> {
        self.upgrade.as_ref().map(|(session, _)| session)
    }

    /// Whether a Research action is waiting for a purchase.
    #[must_use]
    pub const fn is_researching(&self) -> bool {
        self.researching
    }

    /// Whether standalone colonization mode is on.
    #[must_use]
    pub const fn is_colonizing(&self) -> bool {
        self.colonizing
    }

    /// Coordinates the active player could explore.
    #[must_use]
    pub fn explorable_zones(&self) -> Vec<EmptyZone> {
        self.state.galaxy.explorable_zones(self.state.active)
    }

    /// Take every queued event.
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    fn busy(&self) -> bool {
        !self.exploration.is_idle() || self.upgrade.is_some() || self.researching || self.colonizing
    }

    fn active_player_mut(&mut self) -> Result<&mut PlayerState> {
        let active = self.state.active;
        self.state
            .players
            .get_mut(&active)
            .ok_or(GameError::UnknownPlayer(active))
    }

    fn refund_disc(&mut self, action: PlayerAction) {
        let player = self.state.active;
        if let Ok(state) = self.active_player_mut() {
            state.discs.refund(action);
            self.events.push(GameEvent::ActionRefunded { player, action });
        }
    }

    fn rotate_turn(&mut self) -> PlayerColor {
        let from = self.state.active;
        let to = from.next_among(&self.state.colors()).unwrap_or(from);
        self.state.active = to;
        info!(%from, %to, "turn advanced");
        self.events.push(GameEvent::TurnAdvanced { from, to });
        to
    }

    // --- Actions ---

    /// Place an action disc for the active player.
    ///
    /// Explore, Research and Upgrade open their workflow. The other
    /// actions are only tracked and end the turn at once.
    pub fn take_action(&mut self, action: PlayerAction) -> Result<()> {
        if self.busy() {
            return Err(GameError::ActionInProgress);
        }
        let active = self.state.active;
        let player = self
            .state
            .players
            .get_mut(&active)
            .ok_or(GameError::UnknownPlayer(active))?;
        player.discs.place(action)?;
        let session = (action == PlayerAction::Upgrade).then(|| {
            UpgradeSession::new(
                &player.blueprints,
                self.defaults.clone(),
                self.config.rules.upgrade_activations,
            )
        });
        info!(player = %active, ?action, "action taken");
        self.events.push(GameEvent::ActionTaken {
            player: active,
            action,
        });

        match action {
            PlayerAction::Explore => {
                self.exploration.begin()?;
            }
            PlayerAction::Research => self.researching = true,
            PlayerAction::Upgrade => {
                self.upgrade = session.map(|session| (session, UpgradeOrigin::Action));
            }
            PlayerAction::Build | PlayerAction::Move | PlayerAction::Influence => {
                self.rotate_turn();
            }
        }
        Ok(())
    }

    /// Take a disc back off an action space. Never goes below zero.
    ///
    /// Rejected while a workflow is open; cancel it instead.
    pub fn refund_action(&mut self, action: PlayerAction) -> Result<()> {
        if self.busy() {
            return Err(GameError::ActionInProgress);
        }
        self.active_player_mut()?;
        self.refund_disc(action);
        Ok(())
    }

    /// Pass the turn to the next active color.
    pub fn advance_turn(&mut self) -> Result<PlayerColor> {
        if self.busy() {
            return Err(GameError::ActionInProgress);
        }
        Ok(self.rotate_turn())
    }

    // --- Explore ---

    /// Pick the coordinate to explore.
    pub fn select_zone(&mut self, target: Axial) -> Result<ExploreStep> {
        let active = self.state.active;
        let player = self
            .state
            .players
            .get(&active)
            .ok_or(GameError::UnknownPlayer(active))?;
        self.exploration.select_zone(
            &mut self.state.galaxy,
            player,
            target,
            &self.generator,
            &mut self.rng,
        )
    }

    /// Turn the pending sector one step.
    pub fn rotate_candidate(&mut self) -> Result<u8> {
        self.exploration.rotate()
    }

    /// Whether the pending sector may be kept as oriented.
    #[must_use]
    pub fn is_placement_valid(&self) -> bool {
        self.exploration.is_placement_valid()
    }

    /// Abandon the Explore action before a sector is drawn.
    ///
    /// The disc goes back to the supply and the turn does not pass.
    pub fn cancel_explore(&mut self) -> Result<()> {
        self.exploration.cancel()?;
        self.refund_disc(PlayerAction::Explore);
        Ok(())
    }

    /// Throw the pending sector away.
    ///
    /// Under [`DiscardPolicy::ConsumeAction`] the action is spent and the
    /// turn passes. Under [`DiscardPolicy::RefundAction`] the disc returns
    /// and the player keeps the turn.
    pub fn discard_sector(&mut self) -> Result<ExploreStep> {
        let step = self.exploration.discard()?;
        let player = self.state.active;
        let refunded = self.config.rules.discard_policy == DiscardPolicy::RefundAction;
        if refunded {
            self.refund_disc(PlayerAction::Explore);
        }
        self.events.push(GameEvent::SectorDiscarded { player, refunded });
        if !refunded {
            self.rotate_turn();
        }
        Ok(step)
    }

    /// Place the pending sector on the board.
    pub fn keep_sector(&mut self) -> Result<ExploreStep> {
        let coordinate = self
            .exploration
            .candidate()
            .map(Sector::coordinate)
            .ok_or_else(|| GameError::WrongPhase(self.exploration.phase().kind()))?;
        let active = self.state.active;
        let player = self
            .state
            .players
            .get(&active)
            .ok_or(GameError::UnknownPlayer(active))?;
        let step = self.exploration.keep(
            &mut self.state.galaxy,
            player,
            self.catalog.discoveries(),
            &mut self.rng,
        )?;
        if let Some(sector) = self.state.galaxy.get(coordinate).map(Sector::id) {
            self.events.push(GameEvent::SectorKept {
                player: active,
                sector,
                coordinate,
            });
        }
        Ok(self.after_explore_step(step))
    }

    /// Influence the kept sector, or leave it alone.
    pub fn decide_influence(&mut self, influence: bool) -> Result<ExploreStep> {
        let sector = match self.exploration.phase() {
            ExplorePhase::InfluenceDecision { sector, .. } => Some(*sector),
            _ => None,
        };
        let active = self.state.active;
        let player = self
            .state
            .players
            .get_mut(&active)
            .ok_or(GameError::UnknownPlayer(active))?;
        let step = self
            .exploration
            .decide_influence(influence, &mut self.state.galaxy, player)?;
        if let (true, Some(sector)) = (influence, sector) {
            self.events.push(GameEvent::SectorInfluenced {
                player: active,
                sector,
            });
        }
        Ok(step)
    }

    /// Start colonizing, or skip to the discovery check.
    pub fn decide_colonize(&mut self, colonize: bool) -> Result<ExploreStep> {
        let active = self.state.active;
        let player = self
            .state
            .players
            .get(&active)
            .ok_or(GameError::UnknownPlayer(active))?;
        let step = self.exploration.decide_colonize(
            colonize,
            &mut self.state.galaxy,
            player,
            self.catalog.discoveries(),
            &mut self.rng,
        )?;
        Ok(self.after_explore_step(step))
    }

    /// Stop colonizing during an Explore action.
    pub fn finish_colonizing(&mut self) -> Result<ExploreStep> {
        let step = self.exploration.finish_colonizing(
            &mut self.state.galaxy,
            self.catalog.discoveries(),
            &mut self.rng,
        )?;
        Ok(self.after_explore_step(step))
    }

    /// Answer the drawn discovery tile.
    pub fn decide_discovery(&mut self, choice: DiscoveryChoice) -> Result<ExploreStep> {
        let step = self
            .exploration
            .decide_discovery(choice, &mut self.state.galaxy)?;
        Ok(self.after_explore_step(step))
    }

    fn after_explore_step(&mut self, step: ExploreStep) -> ExploreStep {
        if let ExploreStep::Complete(outcome) = &step {
            self.finish_explore(outcome);
        }
        step
    }

    fn finish_explore(&mut self, outcome: &ExploreOutcome) {
        let player = self.state.active;
        if outcome.victory_points > 0 {
            self.events.push(GameEvent::VictoryPointsAwarded {
                player,
                points: outcome.victory_points,
            });
        }
        let deferred = match &outcome.reward {
            Some(reward) => self.deliver_reward(reward).unwrap_or_else(|err| {
                warn!(reward = %reward.id, %err, "discovery reward not delivered");
                false
            }),
            None => false,
        };
        if !deferred {
            self.rotate_turn();
        }
    }

    // --- Discoveries ---

    /// Give a discovery reward to the active player.
    ///
    /// Resources are credited at once. A part opens an upgrade session
    /// with no activations where that part is free; closing the session
    /// passes the turn. Structures and victory points only raise events.
    /// Rejected while any workflow is open.
    pub fn claim_discovery(&mut self, reward: &DiscoveryReward) -> Result<()> {
        if self.busy() {
            return Err(GameError::ActionInProgress);
        }
        self.deliver_reward(reward).map(|_| ())
    }

    /// Returns true when an upgrade session was opened.
    fn deliver_reward(&mut self, reward: &DiscoveryReward) -> Result<bool> {
        let player = self.state.active;
        match reward.kind {
            RewardKind::Resource => {
                let (resource, amount) = parse_resource_reward(&reward.id)?;
                self.active_player_mut()?.add_resource(resource, amount);
                debug!(%player, %resource, amount, "resource reward credited");
                self.events.push(GameEvent::ResourceGained {
                    player,
                    resource,
                    amount,
                });
                Ok(false)
            }
            RewardKind::Part => {
                if self.upgrade.is_some() {
                    return Err(GameError::ActionInProgress);
                }
                let part = self
                    .catalog
                    .part(&reward.id)
                    .ok_or_else(|| GameError::UnknownPart(reward.id.clone()))?
                    .clone();
                let state = self
                    .state
                    .players
                    .get(&player)
                    .ok_or(GameError::UnknownPlayer(player))?;
                let session =
                    UpgradeSession::new(&state.blueprints, self.defaults.clone(), 0).with_free_part(part);
                self.upgrade = Some((session, UpgradeOrigin::Discovery));
                self.events.push(GameEvent::PartAwarded {
                    player,
                    part: reward.id.clone(),
                });
                Ok(true)
            }
            RewardKind::Structure => {
                self.events.push(GameEvent::StructureAwarded {
                    player,
                    reward: reward.id.clone(),
                });
                Ok(false)
            }
            RewardKind::Vp => {
                self.events.push(GameEvent::VictoryPointsAwarded {
                    player,
                    points: reward.amount.unwrap_or(DISCOVERY_VICTORY_POINTS),
                });
                Ok(false)
            }
        }
    }

    // --- Colonization ---

    /// Turn on standalone colonization outside an Explore action.
    pub fn begin_colonization(&mut self) -> Result<()> {
        if self.busy() {
            return Err(GameError::ActionInProgress);
        }
        self.colonizing = true;
        debug!(player = %self.state.active, "colonization mode on");
        Ok(())
    }

    /// Turn standalone colonization off.
    pub fn finish_colonization(&mut self) -> Result<()> {
        if !self.colonizing {
            return Err(GameError::NotColonizing);
        }
        self.colonizing = false;
        Ok(())
    }

    /// Place a population cube on an owned sector's empty slot.
    ///
    /// Allowed while an Explore action is colonizing or in standalone
    /// colonization mode.
    pub fn colonize(&mut self, sector: SectorId, slot: u8) -> Result<EconomyEvent> {
        let active = self.state.active;
        let player = self
            .state
            .players
            .get_mut(&active)
            .ok_or(GameError::UnknownPlayer(active))?;
        let event = if self.exploration.phase().kind() == ExplorePhaseKind::ActiveColonization {
            self.exploration
                .colonize(&mut self.state.galaxy, player, sector, slot)?
        } else if self.colonizing {
            player.colonize(&mut self.state.galaxy, sector, slot)?
        } else {
            return Err(GameError::NotColonizing);
        };
        self.events.push(GameEvent::Colonized {
            player: active,
            event,
        });
        Ok(event)
    }

    // --- Research ---

    /// Buy a tech from the tray for the open Research action.
    pub fn commit_research(&mut self, tech_id: &str, track: TechTrack) -> Result<ResearchOutcome> {
        if !self.researching {
            return Err(GameError::NotResearching);
        }
        let active = self.state.active;
        let player = self
            .state
            .players
            .get_mut(&active)
            .ok_or(GameError::UnknownPlayer(active))?;
        let outcome = research::commit_research(
            &mut self.state.tray,
            &mut player.researched,
            &mut player.resources.science,
            tech_id,
            track,
        )?;
        self.researching = false;
        self.events.push(GameEvent::TechResearched {
            player: active,
            tech: outcome.tech.id.clone(),
            track,
            cost: outcome.cost,
        });
        self.rotate_turn();
        Ok(outcome)
    }

    /// Close the Research action without buying. The disc is refunded.
    pub fn cancel_research(&mut self) -> Result<()> {
        if !self.researching {
            return Err(GameError::NotResearching);
        }
        self.researching = false;
        self.refund_disc(PlayerAction::Research);
        Ok(())
    }

    // --- Upgrade ---

    /// Change one draft slot. `None` restores the slot's starting part.
    pub fn equip_part(&mut self, class: ShipClass, slot: usize, part_id: Option<&str>) -> Result<()> {
        let active = self.state.active;
        let (session, _) = self
            .upgrade
            .as_mut()
            .ok_or(GameError::NoUpgradeInProgress)?;
        let player = self
            .state
            .players
            .get(&active)
            .ok_or(GameError::UnknownPlayer(active))?;
        let part = part_id
            .map(|id| {
                self.catalog
                    .part(id)
                    .ok_or_else(|| GameError::UnknownPart(id.to_string()))
            })
            .transpose()?;
        session.equip(class, slot, part, &player.researched)
    }

    /// Replace the player's blueprints with the drafts and end the turn.
    pub fn commit_upgrade(&mut self) -> Result<()> {
        let (session, _) = self
            .upgrade
            .as_ref()
            .ok_or(GameError::NoUpgradeInProgress)?;
        let blueprints = session.commit()?;
        let player = self.state.active;
        self.active_player_mut()?.blueprints = blueprints;
        self.upgrade = None;
        info!(%player, "blueprints upgraded");
        self.events.push(GameEvent::BlueprintsUpgraded { player });
        self.rotate_turn();
        Ok(())
    }

    /// Drop the drafts.
    ///
    /// An Upgrade action gets its disc back and keeps the turn. A session
    /// opened by a discovery part ends the Explore action, so the turn
    /// passes.
    pub fn cancel_upgrade(&mut self) -> Result<()> {
        let (_, origin) = self.upgrade.take().ok_or(GameError::NoUpgradeInProgress)?;
        let player = self.state.active;
        self.events.push(GameEvent::UpgradeCancelled { player });
        match origin {
            UpgradeOrigin::Action => self.refund_disc(PlayerAction::Upgrade),
            UpgradeOrigin::Discovery => {
                self.rotate_turn();
            }
        }
        Ok(())
    }

    // --- Control board ---

    /// Set a population track directly. Clamped to the track.
    pub fn set_population(&mut self, color: PlayerColor, resource: ResourceType, count: i64) -> Result<u32> {
        let player = self
            .state
            .players
            .get_mut(&color)
            .ok_or(GameError::UnknownPlayer(color))?;
        Ok(player.set_population(resource, count))
    }

    /// Set a stockpile directly. Floored at zero.
    pub fn set_resource(&mut self, color: PlayerColor, resource: ResourceType, amount: i32) -> Result<i32> {
        let player = self
            .state
            .players
            .get_mut(&color)
            .ok_or(GameError::UnknownPlayer(color))?;
        Ok(player.set_resource(resource, amount))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RulesConfig;
    use crate::catalog::TechCategory;
    use crate::economy::Resources;

    fn game_with(rules: RulesConfig) -> Game<RngSource<StdRng>> {
        let config = GameConfig {
            rules,
            ..GameConfig::default()
        };
        Game::new(&[PlayerColor::White, PlayerColor::Red], config, RngSource::seeded(11)).unwrap()
    }

    fn game() -> Game<RngSource<StdRng>> {
        game_with(RulesConfig::default())
    }

    fn reward(id: &str, kind: RewardKind) -> DiscoveryReward {
        DiscoveryReward {
            id: id.to_string(),
            label: id.to_string(),
            kind,
            amount: None,
        }
    }

    fn explore_to_placement(game: &mut Game<RngSource<StdRng>>) {
        game.take_action(PlayerAction::Explore).unwrap();
        let target = game.explorable_zones()[0].coordinate;
        game.select_zone(target).unwrap();
    }

    #[test]
    fn test_new_game_setup() {
        let game = game();
        assert_eq!(game.galaxy().len(), 7);
        assert_eq!(game.active_color(), PlayerColor::White);
        assert!(!game.state().tray.is_empty());

        for color in [PlayerColor::White, PlayerColor::Red] {
            let player = game.player(color).unwrap();
            assert_eq!(player.income(), Resources::splat(3));
            let home = game.galaxy().owned_by(color).next().unwrap();
            assert!(home
                .population_slots
                .iter()
                .all(|slot| slot.status == SlotStatus::Occupied));
        }
    }

    #[test]
    fn test_new_game_rejects_bad_players() {
        let config = GameConfig::default();
        assert!(matches!(
            Game::new(&[], config.clone(), RngSource::seeded(1)),
            Err(GameError::InvalidPlayerCount(0))
        ));
        assert!(matches!(
            Game::new(&[PlayerColor::Red, PlayerColor::Red], config, RngSource::seeded(1)),
            Err(GameError::DuplicatePlayerColor(PlayerColor::Red))
        ));
    }

    #[test]
    fn test_tracked_action_ends_turn() {
        let mut game = game();
        game.take_action(PlayerAction::Build).unwrap();
        assert_eq!(game.active_color(), PlayerColor::Red);
        let white = game.player(PlayerColor::White).unwrap();
        assert_eq!(white.discs.on_action(PlayerAction::Build), 1);

        let events = game.drain_events();
        assert_eq!(
            events,
            vec![
                GameEvent::ActionTaken {
                    player: PlayerColor::White,
                    action: PlayerAction::Build
                },
                GameEvent::TurnAdvanced {
                    from: PlayerColor::White,
                    to: PlayerColor::Red
                },
            ]
        );
        assert!(game.drain_events().is_empty());
    }

    #[test]
    fn test_take_action_without_discs() {
        let mut game = game();
        let white = game.state.players.get_mut(&PlayerColor::White).unwrap();
        white.discs.map_used = white.discs.total;
        assert_eq!(
            game.take_action(PlayerAction::Explore),
            Err(GameError::NoDiscsAvailable)
        );
        assert!(game.exploration().is_idle());
    }

    #[test]
    fn test_second_action_rejected_while_busy() {
        let mut game = game();
        game.take_action(PlayerAction::Explore).unwrap();
        assert_eq!(
            game.take_action(PlayerAction::Research),
            Err(GameError::ActionInProgress)
        );
        assert_eq!(game.advance_turn(), Err(GameError::ActionInProgress));
    }

    #[test]
    fn test_cancel_explore_refunds_and_keeps_turn() {
        let mut game = game();
        game.take_action(PlayerAction::Explore).unwrap();
        game.cancel_explore().unwrap();
        assert!(game.exploration().is_idle());
        assert_eq!(game.active_color(), PlayerColor::White);
        let white = game.player(PlayerColor::White).unwrap();
        assert_eq!(white.discs.on_action(PlayerAction::Explore), 0);
    }

    #[test]
    fn test_discard_consumes_action_by_default() {
        let mut game = game();
        explore_to_placement(&mut game);
        let step = game.discard_sector().unwrap();
        assert!(matches!(step, ExploreStep::Complete(ExploreOutcome { discarded: true, .. })));
        assert_eq!(game.galaxy().len(), 7);
        assert_eq!(game.active_color(), PlayerColor::Red);
        let white = game.player(PlayerColor::White).unwrap();
        assert_eq!(white.discs.on_action(PlayerAction::Explore), 1);
    }

    #[test]
    fn test_discard_refund_policy() {
        let mut game = game_with(RulesConfig::default().with_discard_policy(DiscardPolicy::RefundAction));
        explore_to_placement(&mut game);
        game.discard_sector().unwrap();
        assert_eq!(game.active_color(), PlayerColor::White);
        let white = game.player(PlayerColor::White).unwrap();
        assert_eq!(white.discs.on_action(PlayerAction::Explore), 0);
        assert!(game.drain_events().contains(&GameEvent::SectorDiscarded {
            player: PlayerColor::White,
            refunded: true
        }));
    }

    #[test]
    fn test_research_flow() {
        let mut game = game();
        assert!(matches!(
            game.commit_research("anything", TechTrack::Military),
            Err(GameError::NotResearching)
        ));

        game.set_resource(PlayerColor::White, ResourceType::Science, 50)
            .unwrap();
        game.take_action(PlayerAction::Research).unwrap();
        let tech = game.state().tray.category(TechCategory::Military)[0].clone();
        let outcome = game.commit_research(&tech.id, TechTrack::Military).unwrap();

        assert_eq!(outcome.cost, tech.base_cost);
        let white = game.player(PlayerColor::White).unwrap();
        assert_eq!(white.resources.science, 50 - tech.base_cost);
        assert!(white.researched.contains(&tech.id));
        assert!(!game.is_researching());
        assert_eq!(game.active_color(), PlayerColor::Red);
    }

    #[test]
    fn test_cancel_research_refunds() {
        let mut game = game();
        game.take_action(PlayerAction::Research).unwrap();
        game.cancel_research().unwrap();
        assert_eq!(game.active_color(), PlayerColor::White);
        assert_eq!(
            game.player(PlayerColor::White)
                .unwrap()
                .discs
                .on_action(PlayerAction::Research),
            0
        );
    }

    #[test]
    fn test_upgrade_commit_replaces_blueprints() {
        let mut game = game();
        assert_eq!(
            game.equip_part(ShipClass::Interceptor, 1, Some("hull")),
            Err(GameError::NoUpgradeInProgress)
        );
        game.take_action(PlayerAction::Upgrade).unwrap();
        assert_eq!(game.upgrade_session().unwrap().activations(), 2);
        game.equip_part(ShipClass::Interceptor, 1, Some("hull"))
            .unwrap();
        assert_eq!(
            game.equip_part(ShipClass::Interceptor, 2, Some("no_such_part")),
            Err(GameError::UnknownPart("no_such_part".to_string()))
        );
        // Nothing reaches the player before commit.
        let white = game.player(PlayerColor::White).unwrap();
        assert!(white.blueprints.interceptor.slot(1).unwrap().is_none());

        game.commit_upgrade().unwrap();
        let white = game.player(PlayerColor::White).unwrap();
        assert_eq!(
            white.blueprints.interceptor.slot(1).unwrap().map(|p| p.id.as_str()),
            Some("hull")
        );
        assert!(game.upgrade_session().is_none());
        assert_eq!(game.active_color(), PlayerColor::Red);
    }

    #[test]
    fn test_cancel_upgrade_action_refunds() {
        let mut game = game();
        game.take_action(PlayerAction::Upgrade).unwrap();
        game.equip_part(ShipClass::Interceptor, 1, Some("hull"))
            .unwrap();
        game.cancel_upgrade().unwrap();
        let white = game.player(PlayerColor::White).unwrap();
        assert!(white.blueprints.interceptor.slot(1).unwrap().is_none());
        assert_eq!(white.discs.on_action(PlayerAction::Upgrade), 0);
        assert_eq!(game.active_color(), PlayerColor::White);
    }

    #[test]
    fn test_claim_resource_reward() {
        let mut game = game();
        game.claim_discovery(&reward("money_8", RewardKind::Resource))
            .unwrap();
        assert_eq!(game.player(PlayerColor::White).unwrap().resources.money, 38);
        assert_eq!(
            game.claim_discovery(&reward("money", RewardKind::Resource)),
            Err(GameError::MalformedReward("money".to_string()))
        );
    }

    #[test]
    fn test_claim_part_reward_opens_free_session() {
        let mut game = game();
        assert_eq!(
            game.claim_discovery(&reward("warp_core", RewardKind::Part)),
            Err(GameError::UnknownPart("warp_core".to_string()))
        );
        assert!(game.upgrade_session().is_none());

        game.claim_discovery(&reward("shard_hull", RewardKind::Part))
            .unwrap();
        let session = game.upgrade_session().unwrap();
        assert_eq!(session.activations(), 0);
        let free = session.free_part().unwrap();
        assert_eq!(free.id, "shard_hull");
        assert!(free.is_rare);

        game.cancel_upgrade().unwrap();
        assert_eq!(game.active_color(), PlayerColor::Red);
    }

    #[test]
    fn test_structure_and_vp_rewards_only_raise_events() {
        let mut game = game();
        let before = game.player(PlayerColor::White).unwrap().clone();
        game.claim_discovery(&reward("ancient_orbital", RewardKind::Structure))
            .unwrap();
        let mut vp = reward("ancient_artifact", RewardKind::Vp);
        vp.amount = Some(3);
        game.claim_discovery(&vp).unwrap();

        assert_eq!(game.player(PlayerColor::White).unwrap(), &before);
        assert_eq!(
            game.drain_events(),
            vec![
                GameEvent::StructureAwarded {
                    player: PlayerColor::White,
                    reward: "ancient_orbital".to_string()
                },
                GameEvent::VictoryPointsAwarded {
                    player: PlayerColor::White,
                    points: 3
                },
            ]
        );
    }

    #[test]
    fn test_standalone_colonization() {
        let mut game = game();
        let home = game.galaxy().owned_by(PlayerColor::White).next().unwrap().id();
        assert_eq!(game.colonize(home, 0), Err(GameError::NotColonizing));

        game.state
            .galaxy
            .set_slot_status(home, 0, SlotStatus::Empty)
            .unwrap();
        game.begin_colonization().unwrap();
        assert_eq!(
            game.take_action(PlayerAction::Explore),
            Err(GameError::ActionInProgress)
        );
        let event = game.colonize(home, 0).unwrap();
        assert!(matches!(event, EconomyEvent::Colonized { slot: 0, .. }));
        assert_eq!(game.player(PlayerColor::White).unwrap().colony_ships.used, 1);

        game.finish_colonization().unwrap();
        assert_eq!(game.finish_colonization(), Err(GameError::NotColonizing));
    }

    #[test]
    fn test_control_board_adjustments() {
        let mut game = game();
        assert_eq!(
            game.set_population(PlayerColor::Red, ResourceType::Science, 20),
            Ok(12)
        );
        assert_eq!(
            game.set_resource(PlayerColor::Red, ResourceType::Money, -3),
            Ok(0)
        );
        assert_eq!(
            game.set_resource(PlayerColor::Blue, ResourceType::Money, 3),
            Err(GameError::UnknownPlayer(PlayerColor::Blue))
        );
    }

    #[test]
    fn test_refund_action_floors_at_zero() {
        let mut game = game();
        game.refund_action(PlayerAction::Move).unwrap();
        let white = game.player(PlayerColor::White).unwrap();
        assert_eq!(white.discs.on_action(PlayerAction::Move), 0);
    }

    #[test]
    fn test_refund_rejected_while_workflow_open() {
        let mut game = game();
        game.take_action(PlayerAction::Explore).unwrap();
        assert_eq!(
            game.refund_action(PlayerAction::Explore),
            Err(GameError::ActionInProgress)
        );
        let white = game.player(PlayerColor::White).unwrap();
        assert_eq!(white.discs.on_action(PlayerAction::Explore), 1);
        game.cancel_explore().unwrap();

        game.take_action(PlayerAction::Research).unwrap();
        assert_eq!(
            game.refund_action(PlayerAction::Research),
            Err(GameError::ActionInProgress)
        );
        game.cancel_research().unwrap();

        game.take_action(PlayerAction::Upgrade).unwrap();
        assert_eq!(
            game.refund_action(PlayerAction::Upgrade),
            Err(GameError::ActionInProgress)
        );
    }

    #[test]
    fn test_claim_rejected_while_workflow_open() {
        let mut game = game();
        game.take_action(PlayerAction::Explore).unwrap();
        assert_eq!(
            game.claim_discovery(&reward("money_8", RewardKind::Resource)),
            Err(GameError::ActionInProgress)
        );
        assert_eq!(
            game.claim_discovery(&reward("shard_hull", RewardKind::Part)),
            Err(GameError::ActionInProgress)
        );
        assert!(game.upgrade_session().is_none());
        assert_eq!(game.player(PlayerColor::White).unwrap().resources.money, 30);
        assert!(!game.exploration().is_idle());
    }
}
