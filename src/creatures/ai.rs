//! Creature AI Controller
//!
//! Per-frame decision loop for one creature. The generic part is a flat state
//! machine driven by the distance to the player:
//!
//! 1. Dead or friendly creatures are skipped entirely
//! 2. A live cast is advanced and pins the creature in place
//! 3. Within the leash radius the creature chases, then attacks in melee range
//! 4. Outside it, the creature runs home and resets
//! 5. A registered behavior script runs last and may add actions
//!
//! Scripts never undo the movement the generic loop already applied.

use bevy::prelude::*;

use super::behaviors::BehaviorRegistry;
use super::{Creature, CreatureState};
use crate::abilities::AbilityCatalog;
use crate::actor::{Actor, ActorRef};
use crate::combat::events::{CombatEvent, CombatEventSink};
use crate::combat::{advance_cast, apply_damage, resolve, AbilityInvocation};
use crate::rng::GameRng;
use crate::tuning::CombatTuning;

/// Rounding allowance when checking whether the player is in melee reach
const MELEE_REACH_SLACK: f32 = 1e-3;

/// Everything a creature tick may read or mutate besides the two actors.
pub struct AiContext<'a> {
    pub catalog: &'a AbilityCatalog,
    pub tuning: &'a CombatTuning,
    pub rng: &'a mut GameRng,
    pub events: &'a mut dyn CombatEventSink,
    pub now: f32,
    pub dt: f32,
}

/// Run one AI tick for `creature` against the player.
pub fn tick_creature(
    creature: &mut Creature,
    player: &mut Actor,
    behaviors: &BehaviorRegistry,
    ctx: &mut AiContext,
) {
    if !creature.is_alive() || !creature.hostile {
        return;
    }

    advance_creature_cast(creature, player, ctx);

    if creature.cast.is_some() {
        creature.state = CreatureState::Casting;
    } else {
        let distance = creature.actor.position.distance(player.position);
        if player.is_alive() && distance <= creature.leash_radius {
            engage(creature, player, distance, ctx);
        } else {
            return_to_spawn(creature, ctx);
        }
    }

    // Unknown script ids fall back to the generic loop alone
    let behavior = creature
        .behavior
        .as_deref()
        .and_then(|script| behaviors.get(script));
    if let Some(behavior) = behavior {
        behavior.tick(creature, player, ctx);
    }
}

/// Resolve the creature's cast if it finished, otherwise report progress.
fn advance_creature_cast(creature: &mut Creature, player: &mut Actor, ctx: &mut AiContext) {
    let caster = ActorRef::Creature(creature.id);

    if let Some(cast) = advance_cast(&mut creature.cast, ctx.now) {
        let Some(definition) = ctx.catalog.get(&cast.ability) else {
            return;
        };
        let magnitude = resolve(
            definition,
            AbilityInvocation {
                caster,
                actor: &mut creature.actor,
                target_ref: ActorRef::Player,
                target: Some(player),
                now: ctx.now,
            },
            ctx.rng,
            ctx.events,
        );
        ctx.events.emit(CombatEvent::CastCompleted {
            caster,
            ability: cast.ability,
            target: cast.target,
            magnitude,
        });
    } else if let Some(cast) = &creature.cast {
        ctx.events.emit(CombatEvent::CastProgressed {
            caster,
            ability: cast.ability,
            progress: cast.progress(ctx.now),
            remaining: cast.remaining(ctx.now),
        });
    }
}

fn engage(creature: &mut Creature, player: &mut Actor, distance: f32, ctx: &mut AiContext) {
    let to_player = player.position - creature.actor.position;

    if distance <= creature.melee_range + MELEE_REACH_SLACK {
        creature.state = CreatureState::Attack;
        creature.actor.face(to_player);
        if creature.melee_ready(ctx.now) {
            creature.last_melee_at = Some(ctx.now);
            apply_damage(
                ActorRef::Creature(creature.id),
                ActorRef::Player,
                player,
                creature.actor.base_damage,
                None,
                false,
                ctx.events,
            );
        }
        return;
    }

    creature.state = CreatureState::Chase;
    let direction = to_player.normalize_or_zero();
    let step = creature.speed * ctx.dt;
    if step >= distance - creature.melee_range {
        // Arrive straight at melee range
        creature.actor.position = player.position - direction * creature.melee_range;
        creature.actor.face(direction);
        return;
    }

    // Sideways weave so pursuit paths don't look robotic
    let lateral = Vec3::new(-direction.z, 0.0, direction.x);
    let weave = (ctx.now * ctx.tuning.zigzag_frequency).sin() * ctx.tuning.zigzag_amplitude;
    let heading = (direction + lateral * weave).normalize_or_zero();
    creature.actor.position += heading * step;
    creature.actor.face(heading);
}

fn return_to_spawn(creature: &mut Creature, ctx: &mut AiContext) {
    let step = creature.speed * ctx.tuning.leash_speed_multiplier * ctx.dt;
    let remaining = creature.actor.step_toward(creature.spawn_position, step);

    if remaining > ctx.tuning.spawn_epsilon {
        creature.state = CreatureState::LeashReturn;
        return;
    }

    creature.actor.position = creature.spawn_position;
    if creature.state != CreatureState::Idle {
        creature.actor.health = creature.actor.max_health;
        creature.state = CreatureState::Idle;
        debug!("{} reset at its spawn", creature.spawn_name);
        ctx.events.emit(CombatEvent::CreatureReset {
            creature: creature.id,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor::CreatureId;
    use crate::creatures::templates::{CreatureSpawn, CreatureTemplates};

    fn bandit_at(position: Vec3) -> Creature {
        let templates = CreatureTemplates::builtin();
        let spawn = CreatureSpawn::new("bandit-1", "pirate_bandit", Vec3::ZERO, true);
        let mut creature = Creature::from_template(
            CreatureId(1),
            &spawn,
            templates.get("pirate_bandit").unwrap(),
            &CombatTuning::default(),
        );
        creature.actor.position = position;
        creature
    }

    fn tick(creature: &mut Creature, player: &mut Actor, now: f32, events: &mut Vec<CombatEvent>) {
        let catalog = AbilityCatalog::builtin();
        let tuning = CombatTuning::default();
        let mut rng = GameRng::from_seed(1);
        let mut ctx = AiContext {
            catalog: &catalog,
            tuning: &tuning,
            rng: &mut rng,
            events,
            now,
            dt: 1.0 / 60.0,
        };
        tick_creature(creature, player, &BehaviorRegistry::builtin(), &mut ctx);
    }

    #[test]
    fn test_chase_moves_toward_player() {
        let mut creature = bandit_at(Vec3::ZERO);
        let mut player = Actor::new(100.0, 0.0, 10.0, Vec3::new(5.0, 0.0, 0.0));
        let mut events = Vec::new();

        tick(&mut creature, &mut player, 0.0, &mut events);
        assert_eq!(creature.state, CreatureState::Chase);
        assert!(creature.actor.position.x > 0.0);
    }

    #[test]
    fn test_melee_respects_cooldown() {
        let mut creature = bandit_at(Vec3::ZERO);
        let mut player = Actor::new(100.0, 0.0, 10.0, Vec3::new(1.0, 0.0, 0.0));
        let mut events = Vec::new();

        tick(&mut creature, &mut player, 0.0, &mut events);
        assert_eq!(creature.state, CreatureState::Attack);
        assert_eq!(player.health, 93.0);

        tick(&mut creature, &mut player, 0.5, &mut events);
        assert_eq!(player.health, 93.0);

        tick(&mut creature, &mut player, 1.1, &mut events);
        assert_eq!(player.health, 86.0);
    }

    #[test]
    fn test_friendly_creature_is_inert() {
        let mut creature = bandit_at(Vec3::new(1.0, 0.0, 0.0));
        creature.hostile = false;
        let mut player = Actor::new(100.0, 0.0, 10.0, Vec3::ZERO);
        let mut events = Vec::new();

        tick(&mut creature, &mut player, 0.0, &mut events);
        assert_eq!(creature.actor.position, Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(player.health, 100.0);
        assert!(events.is_empty());
    }

    #[test]
    fn test_dead_player_sends_creatures_home() {
        let mut creature = bandit_at(Vec3::new(1.0, 0.0, 0.0));
        let mut player = Actor::new(100.0, 0.0, 10.0, Vec3::ZERO);
        player.take_damage(100.0);
        let mut events = Vec::new();

        tick(&mut creature, &mut player, 0.0, &mut events);
        assert_eq!(creature.state, CreatureState::LeashReturn);
    }
}
