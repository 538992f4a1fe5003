//! Autopilot for headless encounters
//!
//! Plays the player character from the outside, the same way input would:
//! every frame it looks at the session and emits `PlayerIntent`s. It targets
//! the nearest hostile, closes to casting range, fires the first ready ability
//! in its rotation, swings in melee range, and loots corpses.

use bevy::prelude::*;

use crate::abilities::AbilityId;
use crate::session::CombatSession;
use crate::systems::PlayerIntent;

/// Distance at which the autopilot can loot a corpse
const LOOT_RANGE: f32 = 3.0;

/// Fraction of an ability's range the autopilot closes to before casting
const RANGE_MARGIN: f32 = 0.8;

/// Self-buffs are only used below this health fraction
const SELF_BUFF_HEALTH: f32 = 0.8;

#[derive(Resource, Clone, Debug)]
pub struct Autopilot {
    /// Action bar slots in priority order
    rotation: Vec<usize>,
    /// Distance to hold from the target
    engage_range: f32,
}

impl Autopilot {
    /// Put `rotation` on the action bar, slot 0 first.
    pub fn new(session: &mut CombatSession, rotation: &[AbilityId]) -> Result<Self, String> {
        let mut slots = Vec::with_capacity(rotation.len());
        for (slot, ability) in rotation.iter().enumerate() {
            session
                .assign_slot(slot, *ability)
                .map_err(|e| format!("Can't slot {}: {}", ability, e))?;
            slots.push(slot);
        }
        for slot in rotation.len()..crate::constants::SLOT_COUNT {
            session.clear_slot(slot);
        }

        let engage_range = rotation
            .iter()
            .filter_map(|ability| session.catalog().get(ability))
            .filter(|def| def.is_damage())
            .map(|def| def.range * RANGE_MARGIN)
            .fold(None, |closest: Option<f32>, range| {
                Some(closest.map_or(range, |c| c.min(range)))
            })
            .unwrap_or(session.tuning().player_attack_range * RANGE_MARGIN);

        Ok(Self {
            rotation: slots,
            engage_range,
        })
    }

    pub fn engage_range(&self) -> f32 {
        self.engage_range
    }

    /// Decide this frame's intents
    pub fn plan(&self, session: &CombatSession) -> Vec<PlayerIntent> {
        let player = session.player();
        let mut intents = Vec::new();
        if !player.actor.is_alive() {
            return intents;
        }
        let origin = player.actor.position;

        if let Some(corpse) = session.creatures().find(|c| {
            !c.is_alive() && !c.loot.is_empty() && c.actor.position.distance(origin) <= LOOT_RANGE
        }) {
            intents.push(PlayerIntent::TakeAllLoot(corpse.id));
        }

        let current = player
            .target
            .and_then(|id| session.creature(id))
            .filter(|c| c.is_alive());
        let target = match current {
            Some(target) => target,
            None => match session.hostiles_by_distance().first() {
                Some((id, _)) => {
                    intents.push(PlayerIntent::SetTarget(*id));
                    match session.creature(*id) {
                        Some(target) => target,
                        None => return intents,
                    }
                }
                None => {
                    // Nothing left to fight, go collect the loot
                    if let Some(corpse) = session
                        .creatures()
                        .filter(|c| !c.is_alive() && !c.loot.is_empty())
                        .min_by(|a, b| {
                            a.actor
                                .position
                                .distance(origin)
                                .total_cmp(&b.actor.position.distance(origin))
                        })
                    {
                        intents.push(PlayerIntent::Move(corpse.actor.position - origin));
                    }
                    return intents;
                }
            },
        };

        let offset = target.actor.position - origin;
        let distance = offset.length();
        if distance > self.engage_range {
            intents.push(PlayerIntent::Move(offset));
        } else {
            intents.push(PlayerIntent::Face(offset));
        }

        if !player.is_casting() && player.cooldowns.global_remaining(session.now()) <= 0.0 {
            let ready = self.rotation.iter().copied().find(|&slot| {
                let Some(def) = player.slots[slot].and_then(|a| session.catalog().get(&a)) else {
                    return false;
                };
                if def.targets_self() && player.actor.health_pct() > SELF_BUFF_HEALTH {
                    return false;
                }
                session.slot_cooldown_fraction(slot) <= 0.0
                    && player.actor.mana >= def.cost
                    && (def.targets_self() || distance <= def.range)
            });
            if let Some(slot) = ready {
                intents.push(PlayerIntent::CastSlot(slot));
            }
        }

        if distance <= session.tuning().player_attack_range {
            intents.push(PlayerIntent::AutoAttack);
        }

        intents
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classes::ClassId;
    use crate::creatures::CreatureSpawn;
    use crate::rng::GameRng;

    #[test]
    fn test_engage_range_follows_rotation() {
        let mut session = CombatSession::new(ClassId::Mage, GameRng::from_seed(1));
        let autopilot = Autopilot::new(&mut session, &[AbilityId::Firebolt, AbilityId::ArcaneBolt]).unwrap();
        assert!((autopilot.engage_range() - 9.6).abs() < 1e-4);

        let mut session = CombatSession::new(ClassId::Warrior, GameRng::from_seed(1));
        let autopilot = Autopilot::new(&mut session, &[AbilityId::ShieldBlock, AbilityId::HeroicStrike]).unwrap();
        assert!((autopilot.engage_range() - 2.8).abs() < 1e-4);
    }

    #[test]
    fn test_foreign_rotation_is_an_error() {
        let mut session = CombatSession::new(ClassId::Rogue, GameRng::from_seed(1));
        assert!(Autopilot::new(&mut session, &[AbilityId::Charge]).is_err());
    }

    #[test]
    fn test_targets_and_approaches() {
        let mut session = CombatSession::new(ClassId::Rogue, GameRng::from_seed(1));
        let zombie = session
            .spawn_creature(&CreatureSpawn::new("z", "zombie", Vec3::new(0.0, 0.0, -20.0), true))
            .unwrap();
        let autopilot = Autopilot::new(&mut session, &[AbilityId::SinisterStrike]).unwrap();

        let intents = autopilot.plan(&session);
        assert_eq!(intents[0], PlayerIntent::SetTarget(zombie));
        assert!(matches!(intents[1], PlayerIntent::Move(_)));
        // Out of range, so no cast
        assert!(!intents.iter().any(|i| matches!(i, PlayerIntent::CastSlot(_))));
    }
}
