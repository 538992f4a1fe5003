//! Evil Wizard
//!
//! Healthy: snipes with Fire Blast whenever it is off cooldown and the player
//! is in range. Below half health it panics and chain-casts Firebolt with no
//! cooldown gate, standing still while it casts.

use bevy::prelude::*;

use super::CreatureBehavior;
use crate::abilities::AbilityId;
use crate::actor::{Actor, ActorRef};
use crate::combat::events::CombatEvent;
use crate::combat::{resolve, AbilityInvocation, CastState};
use crate::creatures::ai::AiContext;
use crate::creatures::{Creature, CreatureState};

/// Health fraction below which the wizard switches to Firebolt
const PANIC_THRESHOLD: f32 = 0.5;

pub struct EvilWizardBehavior;

impl CreatureBehavior for EvilWizardBehavior {
    fn script_id(&self) -> &'static str {
        "evil_wizard_ai"
    }

    fn tick(&self, creature: &mut Creature, player: &mut Actor, ctx: &mut AiContext) {
        if !player.is_alive() {
            return;
        }

        if creature.actor.health_pct() < PANIC_THRESHOLD {
            if creature.cast.is_none() {
                start_firebolt(creature, ctx);
            }
            return;
        }

        let Some(fire_blast) = ctx.catalog.get(&AbilityId::FireBlast) else {
            return;
        };
        let distance = creature.actor.distance_to(player);
        if distance > fire_blast.range
            || !creature.ability_ready(AbilityId::FireBlast, fire_blast.cooldown, ctx.now)
        {
            return;
        }

        creature.record_ability(AbilityId::FireBlast, ctx.now);
        let caster = ActorRef::Creature(creature.id);
        let magnitude = resolve(
            fire_blast,
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
            ability: AbilityId::FireBlast,
            target: ActorRef::Player,
            magnitude,
        });
    }
}

fn start_firebolt(creature: &mut Creature, ctx: &mut AiContext) {
    let Some(cast_time) = ctx
        .catalog
        .get(&AbilityId::Firebolt)
        .and_then(|def| def.timed_cast())
    else {
        return;
    };

    let cast = CastState::new(AbilityId::Firebolt, ActorRef::Player, ctx.now, cast_time);
    debug!("{} panics and casts firebolt", creature.spawn_name);
    ctx.events.emit(CombatEvent::CastStarted {
        caster: ActorRef::Creature(creature.id),
        ability: cast.ability,
        target: cast.target,
        started_at: cast.started_at,
        ends_at: cast.ends_at,
    });
    creature.record_ability(AbilityId::Firebolt, ctx.now);
    creature.cast = Some(cast);
    creature.state = CreatureState::Casting;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::abilities::AbilityCatalog;
    use crate::actor::CreatureId;
    use crate::creatures::ai::tick_creature;
    use crate::creatures::templates::{CreatureSpawn, CreatureTemplates};
    use crate::creatures::BehaviorRegistry;
    use crate::rng::GameRng;
    use crate::tuning::CombatTuning;

    fn wizard() -> Creature {
        let templates = CreatureTemplates::builtin();
        let spawn = CreatureSpawn::new("evil-wizard-1", "evil_wizard", Vec3::ZERO, true);
        Creature::from_template(
            CreatureId(9),
            &spawn,
            templates.get("evil_wizard").unwrap(),
            &CombatTuning::default(),
        )
    }

    fn run(creature: &mut Creature, player: &mut Actor, now: f32) -> Vec<CombatEvent> {
        let catalog = AbilityCatalog::builtin();
        let tuning = CombatTuning::default();
        let mut rng = GameRng::from_seed(4);
        let mut events = Vec::new();
        let mut ctx = AiContext {
            catalog: &catalog,
            tuning: &tuning,
            rng: &mut rng,
            events: &mut events,
            now,
            dt: 1.0 / 60.0,
        };
        tick_creature(creature, player, &BehaviorRegistry::builtin(), &mut ctx);
        events
    }

    #[test]
    fn test_fire_blast_at_range() {
        let mut wizard = wizard();
        let mut player = Actor::new(500.0, 0.0, 10.0, Vec3::new(10.0, 0.0, 0.0));

        let events = run(&mut wizard, &mut player, 0.0);
        assert!(player.health < 500.0);
        assert!(events.iter().any(|e| matches!(
            e,
            CombatEvent::CastCompleted { ability: AbilityId::FireBlast, .. }
        )));

        // Still on cooldown half a second later
        let before = player.health;
        run(&mut wizard, &mut player, 0.5);
        assert_eq!(player.health, before);
    }

    #[test]
    fn test_panic_chain_casts_firebolt() {
        let mut wizard = wizard();
        wizard.actor.health = 80.0;
        let mut player = Actor::new(500.0, 0.0, 10.0, Vec3::new(5.0, 0.0, 0.0));

        let events = run(&mut wizard, &mut player, 0.0);
        assert_eq!(wizard.state, CreatureState::Casting);
        assert!(events.iter().any(|e| matches!(e, CombatEvent::CastStarted { .. })));
        let position = wizard.actor.position;

        run(&mut wizard, &mut player, 1.0);
        assert_eq!(wizard.actor.position, position);
        assert_eq!(player.health, 500.0);

        // Resolves at 1.5s, then immediately starts the next one
        let events = run(&mut wizard, &mut player, 1.5);
        assert!(player.health < 500.0);
        assert!(events.iter().any(|e| matches!(e, CombatEvent::CastStarted { .. })));
        assert!(wizard.cast.is_some());
    }
}
