//! Upgrade workflow: editing draft copies of a player's blueprints.
//!
//! The session owns clones of every blueprint. Nothing reaches the
//! player until [`UpgradeSession::commit`] succeeds; dropping the session
//! discards all changes.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::catalog::Part;
use crate::error::{GameError, Result};
use crate::research::ResearchedTechs;
use crate::ships::{can_equip_part_on_ship, compute_stats, has_required_tech, Blueprints, ShipClass, ShipStats};

/// An open upgrade workflow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpgradeSession {
    draft: Blueprints,
    defaults: Blueprints,
    activations: u32,
    free_part: Option<Part>,
}

impl UpgradeSession {
    /// Start editing copies of `committed`.
    ///
    /// `defaults` are the starting blueprints, used to restore slots.
    #[must_use]
    pub fn new(committed: &Blueprints, defaults: Blueprints, activations: u32) -> Self {
        Self {
            draft: committed.clone(),
            defaults,
            activations,
            free_part: None,
        }
    }

    /// Offer one part that costs no activation and needs no tech.
    #[must_use]
    pub fn with_free_part(mut self, part: Part) -> Self {
        self.free_part = Some(part.marked_rare());
        self
    }

    /// Draft blueprints.
    #[must_use]
    pub const fn draft(&self) -> &Blueprints {
        &self.draft
    }

    /// Activations left.
    #[must_use]
    pub const fn activations(&self) -> u32 {
        self.activations
    }

    /// The free discovery part, until it is equipped.
    #[must_use]
    pub const fn free_part(&self) -> Option<&Part> {
        self.free_part.as_ref()
    }

    /// Stats of a draft blueprint.
    #[must_use]
    pub fn stats(&self, class: ShipClass) -> ShipStats {
        compute_stats(self.draft.get(class))
    }

    /// Put `part` in a slot, or restore the slot's starting part with `None`.
    ///
    /// A new part costs one activation unless it is the free discovery
    /// part. Restoring costs one activation unless the starting slot is
    /// empty, and does nothing if the slot already matches.
    pub fn equip(
        &mut self,
        class: ShipClass,
        slot: usize,
        part: Option<&Part>,
        researched: &ResearchedTechs,
    ) -> Result<()> {
        let current = self
            .draft
            .get(class)
            .slot(slot)
            .ok_or(GameError::InvalidBlueprintSlot { class, slot })?;

        let (new_part, cost, uses_free) = match part {
            Some(part) => {
                let free = self
                    .free_part
                    .as_ref()
                    .filter(|free| free.id == part.id)
                    .cloned();
                let uses_free = free.is_some();
                let part = free.unwrap_or_else(|| part.clone());
                if !has_required_tech(&part, researched) {
                    return Err(GameError::PartLocked(part.id));
                }
                if !can_equip_part_on_ship(&part, class) {
                    return Err(GameError::PartNotAllowed { part: part.id, class });
                }
                (Some(part), u32::from(!uses_free), uses_free)
            }
            None => {
                let default = self.defaults.get(class).slot(slot).flatten().cloned();
                if current == default.as_ref() {
                    return Ok(());
                }
                let cost = u32::from(default.is_some());
                (default, cost, false)
            }
        };

        if cost > self.activations {
            return Err(GameError::NoActivationsRemaining);
        }
        self.draft.get_mut(class).set_slot(slot, new_part)?;
        self.activations -= cost;
        if uses_free {
            self.free_part = None;
        }
        debug!(%class, slot, cost, remaining = self.activations, "draft slot changed");
        Ok(())
    }

    /// Fail with the first invalid draft, if any.
    pub fn validate(&self) -> Result<()> {
        for blueprint in self.draft.iter() {
            let stats = compute_stats(blueprint);
            if !stats.is_valid() {
                return Err(GameError::InvalidBlueprint {
                    class: blueprint.class,
                    violations: stats.violations,
                });
            }
        }
        Ok(())
    }

    /// Validated drafts, ready to replace the player's blueprints.
    pub fn commit(&self) -> Result<Blueprints> {
        self.validate()?;
        Ok(self.draft.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Catalog, TechCategory, TechTile};
    use crate::research::TechTrack;
    use crate::ships::StatViolation;

    fn session(activations: u32) -> (UpgradeSession, Catalog) {
        let catalog = Catalog::standard().unwrap();
        let defaults = catalog.default_blueprints().unwrap();
        (UpgradeSession::new(&defaults, defaults.clone(), activations), catalog)
    }

    #[test]
    fn test_equip_spends_activation() {
        let (mut session, catalog) = session(2);
        let hull = catalog.part("hull").unwrap();
        session
            .equip(ShipClass::Interceptor, 1, Some(hull), &ResearchedTechs::default())
            .unwrap();
        assert_eq!(session.activations(), 1);
        assert_eq!(session.stats(ShipClass::Interceptor).hull, 2);
    }

    #[test]
    fn test_no_activations_left() {
        let (mut session, catalog) = session(0);
        let hull = catalog.part("hull").unwrap();
        assert_eq!(
            session.equip(ShipClass::Interceptor, 1, Some(hull), &ResearchedTechs::default()),
            Err(GameError::NoActivationsRemaining)
        );
        assert!(session.draft().interceptor.slot(1).unwrap().is_none());
    }

    #[test]
    fn test_locked_part_needs_tech() {
        let (mut session, catalog) = session(2);
        let plasma = catalog.part("plasma_cannon").unwrap();
        assert_eq!(
            session.equip(ShipClass::Cruiser, 2, Some(plasma), &ResearchedTechs::default()),
            Err(GameError::PartLocked("plasma_cannon".to_string()))
        );

        let mut researched = ResearchedTechs::default();
        researched.push(
            TechTrack::Military,
            TechTile::new("plasma_cannon", "Plasma Cannon", TechCategory::Military, 6, 4),
        );
        // Plasma draws 2 power; swap out the ion cannon to stay balanced.
        session
            .equip(ShipClass::Cruiser, 1, Some(plasma), &researched)
            .unwrap();
        assert_eq!(session.stats(ShipClass::Cruiser).damage, 2);
    }

    #[test]
    fn test_drive_not_allowed_on_starbase() {
        let (mut session, catalog) = session(2);
        let drive = catalog.part("nuclear_drive").unwrap();
        assert_eq!(
            session.equip(ShipClass::Starbase, 0, Some(drive), &ResearchedTechs::default()),
            Err(GameError::PartNotAllowed {
                part: "nuclear_drive".to_string(),
                class: ShipClass::Starbase
            })
        );
    }

    #[test]
    fn test_free_part_costs_nothing_once() {
        let (session, catalog) = session(0);
        let shard = catalog.part("shard_hull").unwrap().clone();
        let mut session = session.with_free_part(shard.clone());
        session
            .equip(ShipClass::Dreadnought, 3, Some(&shard), &ResearchedTechs::default())
            .unwrap();
        assert_eq!(session.activations(), 0);
        assert!(session.free_part().is_none());
        assert_eq!(
            session.equip(ShipClass::Cruiser, 2, Some(&shard), &ResearchedTechs::default()),
            Err(GameError::NoActivationsRemaining)
        );
    }

    #[test]
    fn test_restore_default_rules() {
        let (mut session, catalog) = session(3);
        let researched = ResearchedTechs::default();
        // Already default: free no-op.
        session.equip(ShipClass::Cruiser, 0, None, &researched).unwrap();
        assert_eq!(session.activations(), 3);

        // Clearing a slot whose default is empty is free.
        let hull = catalog.part("hull").unwrap();
        session
            .equip(ShipClass::Interceptor, 1, Some(hull), &researched)
            .unwrap();
        session.equip(ShipClass::Interceptor, 1, None, &researched).unwrap();
        assert_eq!(session.activations(), 2);
        assert!(session.draft().interceptor.slot(1).unwrap().is_none());

        // Restoring a removed default part costs one.
        session
            .equip(ShipClass::Cruiser, 0, Some(hull), &researched)
            .unwrap();
        session.equip(ShipClass::Cruiser, 0, None, &researched).unwrap();
        assert_eq!(session.activations(), 0);
        assert_eq!(
            session.draft().cruiser.slot(0).unwrap().map(|p| p.id.as_str()),
            Some("electron_comp")
        );
    }

    #[test]
    fn test_commit_rejects_invalid_draft() {
        let (mut session, catalog) = session(2);
        let ion = catalog.part("ion_cannon").unwrap();
        let researched = ResearchedTechs::default();
        // Replacing the only source leaves the interceptor without power.
        session
            .equip(ShipClass::Interceptor, 1, Some(ion), &researched)
            .unwrap();
        session.commit().unwrap();
        session
            .equip(ShipClass::Interceptor, 2, Some(ion), &researched)
            .unwrap();
        assert_eq!(
            session.commit(),
            Err(GameError::InvalidBlueprint {
                class: ShipClass::Interceptor,
                violations: vec![StatViolation::PowerDeficit],
            })
        );
    }

    #[test]
    fn test_invalid_slot() {
        let (mut session, _) = session(2);
        assert_eq!(
            session.equip(ShipClass::Interceptor, 4, None, &ResearchedTechs::default()),
            Err(GameError::InvalidBlueprintSlot {
                class: ShipClass::Interceptor,
                slot: 4
            })
        );
    }
}
