//! Data-driven catalogs: ship parts, tech tiles, starting blueprints and
//! discovery tiles.
//!
//! The built-in catalog is embedded from `data/*.ron`. The core does no
//! file IO; tools that load catalogs from disk pass the text to
//! [`Catalog::from_ron`].

use std::collections::BTreeSet;
use std::fmt;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::discovery::parse_resource_reward;
use crate::error::{GameError, Result};
use crate::research::TechTrack;
use crate::ships::{Blueprint, Blueprints, ShipClass};

/// File name of the parts catalog.
pub const PARTS_FILE: &str = "parts.ron";
/// File name of the tech catalog.
pub const TECHS_FILE: &str = "techs.ron";
/// File name of the starting blueprints.
pub const BLUEPRINTS_FILE: &str = "blueprints.ron";
/// File name of the discovery tile pool.
pub const DISCOVERIES_FILE: &str = "discoveries.ron";

const STANDARD_PARTS: &str = include_str!("../data/parts.ron");
const STANDARD_TECHS: &str = include_str!("../data/techs.ron");
const STANDARD_BLUEPRINTS: &str = include_str!("../data/blueprints.ron");
const STANDARD_DISCOVERIES: &str = include_str!("../data/discoveries.ron");

/// Ship part families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PartCategory {
    /// Direct-fire weapon.
    Cannon,
    /// First-strike weapon.
    Missile,
    /// Targeting bonus.
    Computer,
    /// Defensive penalty to enemy hits.
    Shield,
    /// Extra structure.
    Hull,
    /// Movement and initiative.
    Drive,
    /// Power production.
    Source,
}

/// A ship part.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Part {
    /// Unique id.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Part family.
    pub category: PartCategory,
    /// Materials cost.
    #[serde(default)]
    pub cost: i32,
    /// Damage per shot.
    #[serde(default)]
    pub damage: i32,
    /// Hit bonus.
    #[serde(default)]
    pub computer: i32,
    /// Hit penalty to enemies.
    #[serde(default)]
    pub shield: i32,
    /// Extra hull points.
    #[serde(default)]
    pub hull: i32,
    /// Initiative bonus (movement for drives).
    #[serde(default)]
    pub initiative: i32,
    /// Power drawn.
    #[serde(default)]
    pub power_usage: i32,
    /// Power produced.
    #[serde(default)]
    pub power_generation: i32,
    /// Tech needed before the part can be equipped.
    #[serde(default)]
    pub required_tech: Option<String>,
    /// Discovery parts bypass tech requirements.
    #[serde(default)]
    pub is_rare: bool,
}

impl Part {
    /// Part with every stat at zero.
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>, category: PartCategory) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            category,
            cost: 0,
            damage: 0,
            computer: 0,
            shield: 0,
            hull: 0,
            initiative: 0,
            power_usage: 0,
            power_generation: 0,
            required_tech: None,
            is_rare: false,
        }
    }

    /// Copy flagged as rare.
    #[must_use]
    pub fn marked_rare(mut self) -> Self {
        self.is_rare = true;
        self
    }
}

/// Tech tile colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TechCategory {
    /// Pink track.
    Military,
    /// Green track.
    Grid,
    /// Yellow track.
    Nano,
    /// Purple tiles, placeable on any track.
    Rare,
}

impl TechCategory {
    /// Every category.
    pub const ALL: [Self; 4] = [Self::Military, Self::Grid, Self::Nano, Self::Rare];

    /// The player-board track this category belongs to, if fixed.
    #[must_use]
    pub const fn track(self) -> Option<TechTrack> {
        match self {
            Self::Military => Some(TechTrack::Military),
            Self::Grid => Some(TechTrack::Grid),
            Self::Nano => Some(TechTrack::Nano),
            Self::Rare => None,
        }
    }
}

impl fmt::Display for TechCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Military => "military",
            Self::Grid => "grid",
            Self::Nano => "nano",
            Self::Rare => "rare",
        };
        f.write_str(name)
    }
}

/// A technology tile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TechTile {
    /// Unique id.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Color.
    pub category: TechCategory,
    /// Cost before track discounts.
    pub base_cost: i32,
    /// Floor after discounts.
    pub min_cost: i32,
    /// Copies in the box.
    #[serde(default = "default_copies")]
    pub copies: u32,
}

const fn default_copies() -> u32 {
    1
}

impl TechTile {
    /// Single-copy tile.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        category: TechCategory,
        base_cost: i32,
        min_cost: i32,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            category,
            base_cost,
            min_cost,
            copies: 1,
        }
    }
}

/// Kind of payoff on a discovery tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RewardKind {
    /// Resources credited immediately. Id encodes `<type>_<amount>`.
    Resource,
    /// A rare ship part, equipped for free.
    Part,
    /// A structure placed by the players.
    Structure,
    /// Victory points.
    Vp,
}

/// A discovery tile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscoveryReward {
    /// Reward id (part id for part rewards).
    pub id: String,
    /// Display label.
    pub label: String,
    /// Payoff kind.
    pub kind: RewardKind,
    /// Optional amount (victory points).
    #[serde(default)]
    pub amount: Option<i32>,
}

/// Starting blueprint as stored in data files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlueprintData {
    /// Hull type.
    pub class: ShipClass,
    /// Hull cost.
    pub base_cost: i32,
    /// Hull initiative.
    pub base_initiative: i32,
    /// Built-in power.
    #[serde(default)]
    pub base_power_generation: Option<i32>,
    /// Part id per slot.
    pub slots: Vec<Option<String>>,
}

/// Raw catalog file contents.
#[derive(Debug, Clone, Copy)]
pub struct CatalogSources<'a> {
    /// `parts.ron`.
    pub parts: &'a str,
    /// `techs.ron`.
    pub techs: &'a str,
    /// `blueprints.ron`.
    pub blueprints: &'a str,
    /// `discoveries.ron`.
    pub discoveries: &'a str,
}

impl CatalogSources<'static> {
    /// The embedded data files.
    #[must_use]
    pub const fn standard() -> Self {
        Self {
            parts: STANDARD_PARTS,
            techs: STANDARD_TECHS,
            blueprints: STANDARD_BLUEPRINTS,
            discoveries: STANDARD_DISCOVERIES,
        }
    }
}

/// All static game data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    parts: Vec<Part>,
    techs: Vec<TechTile>,
    blueprints: Vec<BlueprintData>,
    discoveries: Vec<DiscoveryReward>,
}

fn parse<T: DeserializeOwned>(path: &str, text: &str) -> Result<T> {
    ron::from_str(text).map_err(|e| GameError::DataParseError {
        path: path.to_string(),
        message: e.to_string(),
    })
}

impl Catalog {
    /// The built-in catalog.
    pub fn standard() -> Result<Self> {
        Self::from_ron(CatalogSources::standard())
    }

    /// Parse the four catalog files.
    pub fn from_ron(sources: CatalogSources<'_>) -> Result<Self> {
        Ok(Self {
            parts: parse(PARTS_FILE, sources.parts)?,
            techs: parse(TECHS_FILE, sources.techs)?,
            blueprints: parse(BLUEPRINTS_FILE, sources.blueprints)?,
            discoveries: parse(DISCOVERIES_FILE, sources.discoveries)?,
        })
    }

    /// Build a catalog from already-parsed values.
    #[must_use]
    pub fn from_parts(
        parts: Vec<Part>,
        techs: Vec<TechTile>,
        blueprints: Vec<BlueprintData>,
        discoveries: Vec<DiscoveryReward>,
    ) -> Self {
        Self {
            parts,
            techs,
            blueprints,
            discoveries,
        }
    }

    /// Every part.
    #[must_use]
    pub fn parts(&self) -> &[Part] {
        &self.parts
    }

    /// Every tech tile.
    #[must_use]
    pub fn techs(&self) -> &[TechTile] {
        &self.techs
    }

    /// The discovery tile pool.
    #[must_use]
    pub fn discoveries(&self) -> &[DiscoveryReward] {
        &self.discoveries
    }

    /// Starting blueprint data.
    #[must_use]
    pub fn blueprint_data(&self) -> &[BlueprintData] {
        &self.blueprints
    }

    /// Part by id.
    #[must_use]
    pub fn part(&self, id: &str) -> Option<&Part> {
        self.parts.iter().find(|part| part.id == id)
    }

    /// Tech by id.
    #[must_use]
    pub fn tech(&self, id: &str) -> Option<&TechTile> {
        self.techs.iter().find(|tech| tech.id == id)
    }

    /// Resolve the starting blueprint for one class.
    pub fn default_blueprint(&self, class: ShipClass) -> Result<Blueprint> {
        let data = self
            .blueprints
            .iter()
            .find(|data| data.class == class)
            .ok_or_else(|| GameError::InvalidCatalog(format!("no default blueprint for {class}")))?;
        if data.slots.len() != class.slot_count() {
            return Err(GameError::InvalidCatalog(format!(
                "{class} blueprint has {} slots, expected {}",
                data.slots.len(),
                class.slot_count()
            )));
        }

        let mut blueprint = Blueprint::empty(class, data.base_cost, data.base_initiative);
        blueprint.base_power_generation = data.base_power_generation;
        for (slot, id) in data.slots.iter().enumerate() {
            let part = match id {
                Some(id) => Some(
                    self.part(id)
                        .cloned()
                        .ok_or_else(|| GameError::UnknownPart(id.clone()))?,
                ),
                None => None,
            };
            blueprint.set_slot(slot, part)?;
        }
        Ok(blueprint)
    }

    /// Starting blueprints for every class.
    pub fn default_blueprints(&self) -> Result<Blueprints> {
        Ok(Blueprints {
            interceptor: self.default_blueprint(ShipClass::Interceptor)?,
            cruiser: self.default_blueprint(ShipClass::Cruiser)?,
            dreadnought: self.default_blueprint(ShipClass::Dreadnought)?,
            starbase: self.default_blueprint(ShipClass::Starbase)?,
        })
    }

    /// Check cross references and id uniqueness.
    ///
    /// Reports every problem found, joined into one message.
    pub fn validate(&self) -> Result<()> {
        let mut problems = Vec::new();

        let mut seen = BTreeSet::new();
        for part in &self.parts {
            if !seen.insert(part.id.as_str()) {
                problems.push(format!("duplicate part id '{}'", part.id));
            }
            if let Some(tech) = &part.required_tech {
                if self.tech(tech).is_none() {
                    problems.push(format!("part '{}' requires unknown tech '{tech}'", part.id));
                }
            }
        }

        let mut seen = BTreeSet::new();
        for tech in &self.techs {
            if !seen.insert(tech.id.as_str()) {
                problems.push(format!("duplicate tech id '{}'", tech.id));
            }
            if tech.min_cost > tech.base_cost {
                problems.push(format!("tech '{}' has min cost above base cost", tech.id));
            }
            if tech.copies == 0 {
                problems.push(format!("tech '{}' has no copies", tech.id));
            }
        }

        let mut seen = BTreeSet::new();
        for reward in &self.discoveries {
            if !seen.insert(reward.id.as_str()) {
                problems.push(format!("duplicate discovery id '{}'", reward.id));
            }
            match reward.kind {
                RewardKind::Resource => {
                    if parse_resource_reward(&reward.id).is_err() {
                        problems.push(format!("malformed resource reward '{}'", reward.id));
                    }
                }
                RewardKind::Part => {
                    if self.part(&reward.id).is_none() {
                        problems.push(format!("discovery names unknown part '{}'", reward.id));
                    }
                }
                RewardKind::Structure | RewardKind::Vp => {}
            }
        }

        for class in ShipClass::ALL {
            if let Err(e) = self.default_blueprint(class) {
                problems.push(e.to_string());
            }
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(GameError::InvalidCatalog(problems.join("; ")))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ships::compute_stats;

    #[test]
    fn test_standard_catalog_loads_and_validates() {
        let catalog = Catalog::standard().unwrap();
        catalog.validate().unwrap();
        assert!(catalog.part("ion_cannon").is_some());
        assert_eq!(catalog.tech("starbase").map(|t| t.copies), Some(4));
        assert!(!catalog.discoveries().is_empty());
    }

    #[test]
    fn test_default_blueprints_are_valid() {
        let blueprints = Catalog::standard().unwrap().default_blueprints().unwrap();
        for blueprint in blueprints.iter() {
            assert_eq!(blueprint.equipped.len(), blueprint.class.slot_count());
            assert!(compute_stats(blueprint).is_valid(), "{:?}", blueprint.class);
        }
        assert_eq!(blueprints.starbase.base_power_generation, Some(3));
        assert!(blueprints.interceptor.slot(1).unwrap().is_none());
    }

    #[test]
    fn test_part_rewards_are_rare_parts() {
        let catalog = Catalog::standard().unwrap();
        for reward in catalog.discoveries() {
            if reward.kind == RewardKind::Part {
                assert!(catalog.part(&reward.id).unwrap().is_rare);
            }
        }
    }

    #[test]
    fn test_parse_error_names_file() {
        let sources = CatalogSources {
            parts: "[ not ron",
            ..CatalogSources::standard()
        };
        match Catalog::from_ron(sources) {
            Err(GameError::DataParseError { path, .. }) => assert_eq!(path, PARTS_FILE),
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn test_validate_reports_all_problems() {
        let mut locked = Part::new("laser", "Laser", PartCategory::Cannon);
        locked.required_tech = Some("missing".to_string());
        let catalog = Catalog::from_parts(
            vec![locked.clone(), locked],
            Vec::new(),
            Vec::new(),
            vec![DiscoveryReward {
                id: "gold_3".to_string(),
                label: "Gold".to_string(),
                kind: RewardKind::Resource,
                amount: None,
            }],
        );
        let Err(GameError::InvalidCatalog(message)) = catalog.validate() else {
            panic!("catalog should be invalid");
        };
        assert!(message.contains("duplicate part id 'laser'"));
        assert!(message.contains("unknown tech 'missing'"));
        assert!(message.contains("malformed resource reward 'gold_3'"));
        assert!(message.contains("no default blueprint"));
    }

    #[test]
    fn test_category_tracks() {
        assert_eq!(TechCategory::Grid.track(), Some(TechTrack::Grid));
        assert_eq!(TechCategory::Rare.track(), None);
    }
}
