//! Combat Resolver
//!
//! Applies a validated, completed ability use. Each effect kind has its own
//! statically typed path; the caller never special-cases abilities.

use bevy::prelude::*;

use super::events::{CombatEvent, CombatEventSink};
use crate::abilities::{AbilityDefinition, AbilityEffect, AbilityId, GapCloser, InstantEffect};
use crate::actor::{Actor, ActorRef};
use crate::rng::GameRng;

/// One ability use: who casts, on whom, and when.
pub struct AbilityInvocation<'a> {
    pub caster: ActorRef,
    pub actor: &'a mut Actor,
    pub target_ref: ActorRef,
    /// None for self-targeted abilities or a target that no longer exists
    pub target: Option<&'a mut Actor>,
    pub now: f32,
}

/// Resolve an ability and return the applied magnitude (0 if nothing landed).
pub fn resolve(
    definition: &AbilityDefinition,
    invocation: AbilityInvocation<'_>,
    rng: &mut GameRng,
    events: &mut dyn CombatEventSink,
) -> f32 {
    let AbilityInvocation {
        caster,
        actor,
        target_ref,
        target,
        now: _,
    } = invocation;

    match definition.effect {
        AbilityEffect::Instant(InstantEffect::Fortify {
            max_health_bonus,
            heal,
        }) => {
            if !actor.is_alive() {
                return 0.0;
            }
            actor.max_health += max_health_bonus;
            let healed = actor.heal(heal);
            if healed > 0.0 {
                events.emit(CombatEvent::Healed {
                    source: caster,
                    target: caster,
                    ability: Some(definition.id),
                    amount: healed,
                });
            }
            0.0
        }
        AbilityEffect::Melee {
            crit_multiplier,
            gap_closer,
        } => {
            let Some(target) = target.filter(|t| t.is_alive()) else {
                return 0.0;
            };
            if let Some(gap_closer) = gap_closer {
                close_gap(actor, target, gap_closer);
            }
            let (amount, critical) = roll_damage(
                actor.base_damage,
                definition.damage_multiplier,
                definition.crit_chance,
                crit_multiplier,
                rng,
            );
            apply_damage(caster, target_ref, target, amount, Some(definition.id), critical, events)
        }
        AbilityEffect::Ranged {
            projectile_speed,
            projectile_color,
        } => {
            let Some(target) = target.filter(|t| t.is_alive()) else {
                return 0.0;
            };
            events.emit(CombatEvent::ProjectileLaunched {
                caster,
                target: target_ref,
                ability: definition.id,
                from: actor.position,
                to: target.position,
                speed: projectile_speed,
                color: projectile_color,
            });
            let (amount, critical) = roll_damage(
                actor.base_damage,
                definition.damage_multiplier,
                definition.crit_chance,
                definition.effect.crit_multiplier(),
                rng,
            );
            apply_damage(caster, target_ref, target, amount, Some(definition.id), critical, events)
        }
    }
}

/// Roll for a crit and return the rounded damage and whether it crit.
pub fn roll_damage(
    base_damage: f32,
    multiplier: f32,
    crit_chance: f32,
    crit_multiplier: f32,
    rng: &mut GameRng,
) -> (f32, bool) {
    let critical = rng.random_f32() < crit_chance;
    let scale = if critical { crit_multiplier } else { 1.0 };
    ((base_damage * multiplier * scale).round().max(0.0), critical)
}

/// Run damage through the target's intake and report it.
///
/// Returns the applied amount. Emits `Died` when this hit was the killing blow.
pub fn apply_damage(
    source: ActorRef,
    target_ref: ActorRef,
    target: &mut Actor,
    amount: f32,
    ability: Option<AbilityId>,
    critical: bool,
    events: &mut dyn CombatEventSink,
) -> f32 {
    if !target.is_alive() {
        return 0.0;
    }
    let applied = target.take_damage(amount);
    events.emit(CombatEvent::DamageApplied {
        source,
        target: target_ref,
        ability,
        amount: applied,
        critical,
        remaining_health: target.health,
    });
    if !target.is_alive() {
        debug!("{} killed {}", source, target_ref);
        events.emit(CombatEvent::Died {
            victim: target_ref,
            killer: Some(source),
        });
    }
    applied
}

/// Move the actor to `stop_distance` in front of the target, along the line
/// it approached on. Does nothing if already that close.
fn close_gap(actor: &mut Actor, target: &Actor, gap_closer: GapCloser) {
    let offset = actor.position - target.position;
    let distance = offset.length();
    if distance <= gap_closer.stop_distance {
        return;
    }
    let direction = if distance > f32::EPSILON {
        offset / distance
    } else {
        Vec3::Z
    };
    actor.position = target.position + direction * gap_closer.stop_distance;
    actor.face(-direction);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::abilities::AbilityCatalog;
    use crate::actor::CreatureId;

    const TARGET: ActorRef = ActorRef::Creature(CreatureId(7));

    fn invoke(
        def: &AbilityDefinition,
        actor: &mut Actor,
        target: &mut Actor,
        rng: &mut GameRng,
        events: &mut Vec<CombatEvent>,
    ) -> f32 {
        resolve(
            def,
            AbilityInvocation {
                caster: ActorRef::Player,
                actor,
                target_ref: TARGET,
                target: Some(target),
                now: 0.0,
            },
            rng,
            events,
        )
    }

    #[test]
    fn test_zero_crit_chance_never_crits() {
        let mut rng = GameRng::from_seed(1);
        for _ in 0..1000 {
            let (amount, critical) = roll_damage(15.0, 1.2, 0.0, 2.0, &mut rng);
            assert_eq!(amount, 18.0);
            assert!(!critical);
        }
    }

    #[test]
    fn test_certain_crit_uses_multiplier() {
        let mut rng = GameRng::from_seed(1);
        let (amount, critical) = roll_damage(20.0, 1.1, 1.0, 2.2, &mut rng);
        assert!(critical);
        assert_eq!(amount, 48.0);
    }

    #[test]
    fn test_damage_clamps_and_kills() {
        let catalog = AbilityCatalog::builtin();
        let def = catalog.get(&AbilityId::HeroicStrike).unwrap();
        let mut actor = Actor::new(140.0, 60.0, 22.0, Vec3::ZERO);
        let mut target = Actor::new(10.0, 0.0, 5.0, Vec3::X);
        let mut events = Vec::new();

        let applied = invoke(def, &mut actor, &mut target, &mut GameRng::from_seed(3), &mut events);
        assert!(applied >= 22.0);
        assert_eq!(target.health, 0.0);
        assert!(!target.is_alive());
        assert!(events.iter().any(|e| matches!(e, CombatEvent::Died { victim, .. } if *victim == TARGET)));
    }

    #[test]
    fn test_dead_target_is_noop() {
        let catalog = AbilityCatalog::builtin();
        let def = catalog.get(&AbilityId::ArcaneBolt).unwrap();
        let mut actor = Actor::new(90.0, 160.0, 15.0, Vec3::ZERO);
        let mut target = Actor::new(10.0, 0.0, 5.0, Vec3::X);
        target.take_damage(10.0);
        let mut events = Vec::new();

        let applied = invoke(def, &mut actor, &mut target, &mut GameRng::from_seed(3), &mut events);
        assert_eq!(applied, 0.0);
        assert!(events.is_empty());
    }

    #[test]
    fn test_ranged_launches_projectile() {
        let catalog = AbilityCatalog::builtin();
        let def = catalog.get(&AbilityId::FireBlast).unwrap();
        let mut actor = Actor::new(90.0, 160.0, 15.0, Vec3::ZERO);
        let mut target = Actor::new(100.0, 0.0, 5.0, Vec3::new(0.0, 0.0, -8.0));
        let mut events = Vec::new();

        invoke(def, &mut actor, &mut target, &mut GameRng::from_seed(9), &mut events);
        assert!(matches!(
            events.first(),
            Some(CombatEvent::ProjectileLaunched { color: 0xff7a2a, .. })
        ));
    }

    #[test]
    fn test_charge_closes_distance() {
        let catalog = AbilityCatalog::builtin();
        let def = catalog.get(&AbilityId::Charge).unwrap();
        let mut actor = Actor::new(140.0, 60.0, 22.0, Vec3::ZERO);
        let mut target = Actor::new(500.0, 0.0, 5.0, Vec3::new(15.0, 0.0, 0.0));
        let mut events = Vec::new();

        invoke(def, &mut actor, &mut target, &mut GameRng::from_seed(2), &mut events);
        assert!((actor.distance_to(&target) - 2.8).abs() < 1e-4);
        assert!(actor.facing.x > 0.99);
    }

    #[test]
    fn test_shield_block_fortifies() {
        let catalog = AbilityCatalog::builtin();
        let def = catalog.get(&AbilityId::ShieldBlock).unwrap();
        let mut actor = Actor::new(140.0, 60.0, 22.0, Vec3::ZERO);
        actor.health = 100.0;
        let mut events = Vec::new();

        let magnitude = resolve(
            def,
            AbilityInvocation {
                caster: ActorRef::Player,
                actor: &mut actor,
                target_ref: ActorRef::Player,
                target: None,
                now: 0.0,
            },
            &mut GameRng::from_seed(1),
            &mut events,
        );
        assert_eq!(magnitude, 0.0);
        assert_eq!(actor.max_health, 145.0);
        assert_eq!(actor.health, 110.0);
    }
}
