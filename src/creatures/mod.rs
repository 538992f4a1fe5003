//! Creatures
//!
//! Spawned world creatures and the AI that drives the hostile ones. The
//! generic loop lives in `ai`; bespoke logic per template is plugged in
//! through `behaviors`.

pub mod ai;
pub mod behaviors;
pub mod templates;

use bevy::prelude::*;
use std::collections::HashMap;

use crate::abilities::AbilityId;
use crate::actor::{Actor, CreatureId};
use crate::combat::CastState;
use crate::constants::DEFAULT_CREATURE_DAMAGE;
use crate::loot::{LootDrop, LootTable};
use crate::tuning::CombatTuning;

pub use ai::{tick_creature, AiContext};
pub use behaviors::{BehaviorRegistry, CreatureBehavior};
pub use templates::{default_spawns, CreatureSpawn, CreatureTemplate, CreatureTemplates};

/// Flat AI state. Exactly one per creature.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CreatureState {
    #[default]
    Idle,
    Chase,
    Attack,
    Casting,
    LeashReturn,
}

/// A spawned creature
#[derive(Clone, Debug)]
pub struct Creature {
    pub id: CreatureId,
    /// Spawn name, e.g. `bandit-1`
    pub spawn_name: String,
    pub template_id: String,
    pub name: String,
    pub actor: Actor,
    pub hostile: bool,
    pub spawn_position: Vec3,
    pub leash_radius: f32,
    pub melee_range: f32,
    pub melee_cooldown: f32,
    pub last_melee_at: Option<f32>,
    /// Units per second
    pub speed: f32,
    pub behavior: Option<String>,
    /// Last cast time of creature-side abilities
    pub ability_timestamps: HashMap<AbilityId, f32>,
    pub cast: Option<CastState>,
    pub state: CreatureState,
    pub experience: u32,
    pub loot_table: Option<LootTable>,
    /// Set once the kill has been paid out
    pub reward_granted: bool,
    /// Resolved corpse loot, consumed as it is taken
    pub loot: Vec<LootDrop>,
}

impl Creature {
    pub fn from_template(
        id: CreatureId,
        spawn: &CreatureSpawn,
        template: &CreatureTemplate,
        tuning: &CombatTuning,
    ) -> Self {
        Self {
            id,
            spawn_name: spawn.name.clone(),
            template_id: template.id.clone(),
            name: template.name.clone(),
            actor: Actor::new(
                template.max_health,
                template.max_mana,
                template.damage.unwrap_or(DEFAULT_CREATURE_DAMAGE),
                spawn.position,
            ),
            hostile: spawn.hostile,
            spawn_position: spawn.position,
            leash_radius: tuning.leash_radius,
            melee_range: tuning.creature_melee_range,
            melee_cooldown: tuning.creature_melee_cooldown,
            last_melee_at: None,
            speed: template.speed,
            behavior: template.script_id.clone(),
            ability_timestamps: HashMap::new(),
            cast: None,
            state: CreatureState::Idle,
            experience: template.experience,
            loot_table: template.loot.clone(),
            reward_granted: false,
            loot: Vec::new(),
        }
    }

    pub fn is_alive(&self) -> bool {
        self.actor.is_alive()
    }

    /// Whether a creature-side ability is off cooldown
    pub fn ability_ready(&self, ability: AbilityId, cooldown: f32, now: f32) -> bool {
        self.ability_timestamps
            .get(&ability)
            .map_or(true, |used| now - used >= cooldown)
    }

    pub fn record_ability(&mut self, ability: AbilityId, now: f32) {
        let stamp = self.ability_timestamps.entry(ability).or_insert(now);
        *stamp = stamp.max(now);
    }

    pub fn melee_ready(&self, now: f32) -> bool {
        self.last_melee_at
            .map_or(true, |hit| now - hit > self.melee_cooldown)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn zombie() -> Creature {
        let templates = CreatureTemplates::builtin();
        let spawn = CreatureSpawn::new("zombie-1", "zombie", Vec3::new(1.0, 0.0, 2.0), true);
        Creature::from_template(
            CreatureId(1),
            &spawn,
            templates.get("zombie").unwrap(),
            &CombatTuning::default(),
        )
    }

    #[test]
    fn test_from_template() {
        let zombie = zombie();
        assert_eq!(zombie.actor.max_health, 100.0);
        assert_eq!(zombie.actor.base_damage, 6.0);
        assert_eq!(zombie.spawn_position, zombie.actor.position);
        assert_eq!(zombie.state, CreatureState::Idle);
        assert!(zombie.loot_table.is_some());
    }

    #[test]
    fn test_ability_timestamps() {
        let mut zombie = zombie();
        assert!(zombie.ability_ready(AbilityId::FireBlast, 2.5, 0.0));
        zombie.record_ability(AbilityId::FireBlast, 1.0);
        assert!(!zombie.ability_ready(AbilityId::FireBlast, 2.5, 3.0));
        assert!(zombie.ability_ready(AbilityId::FireBlast, 2.5, 3.5));
    }

    #[test]
    fn test_melee_timer_is_strict() {
        let mut zombie = zombie();
        assert!(zombie.melee_ready(0.0));
        zombie.last_melee_at = Some(1.0);
        assert!(!zombie.melee_ready(2.0));
        assert!(zombie.melee_ready(2.01));
    }
}
