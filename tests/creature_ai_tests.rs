//! Integration tests for the creature AI controller
//!
//! These tests verify that:
//! - Creatures leashed past their radius run home and reset exactly once
//! - Dead creatures are never touched by the AI tick
//! - Creatures chase into melee range and hit on their own cooldown

use bevy::prelude::*;

use emberfall::actor::{Actor, CreatureId};
use emberfall::creatures::{
    tick_creature, AiContext, BehaviorRegistry, Creature, CreatureSpawn, CreatureState,
    CreatureTemplates,
};
use emberfall::tuning::CombatTuning;
use emberfall::{AbilityCatalog, CombatEvent, GameRng};

const FRAME: f32 = 1.0 / 60.0;

struct Harness {
    catalog: AbilityCatalog,
    tuning: CombatTuning,
    behaviors: BehaviorRegistry,
    rng: GameRng,
    events: Vec<CombatEvent>,
    now: f32,
}

impl Harness {
    fn new(tuning: CombatTuning) -> Self {
        Self {
            catalog: AbilityCatalog::builtin(),
            tuning,
            behaviors: BehaviorRegistry::builtin(),
            rng: GameRng::from_seed(7),
            events: Vec::new(),
            now: 0.0,
        }
    }

    fn creature(&self, template: &str, spawn_at: Vec3) -> Creature {
        let templates = CreatureTemplates::builtin();
        let spawn = CreatureSpawn::new("subject", template, spawn_at, true);
        Creature::from_template(
            CreatureId(1),
            &spawn,
            templates.get(template).unwrap(),
            &self.tuning,
        )
    }

    fn tick(&mut self, creature: &mut Creature, player: &mut Actor) {
        self.now += FRAME;
        let mut ctx = AiContext {
            catalog: &self.catalog,
            tuning: &self.tuning,
            rng: &mut self.rng,
            events: &mut self.events,
            now: self.now,
            dt: FRAME,
        };
        tick_creature(creature, player, &self.behaviors, &mut ctx);
    }

    fn resets(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, CombatEvent::CreatureReset { .. }))
            .count()
    }
}

#[test]
fn test_leashed_creature_returns_and_resets_once() {
    let tuning = CombatTuning {
        leash_radius: 25.0,
        creature_melee_range: 1.5,
        ..CombatTuning::default()
    };
    let mut harness = Harness::new(tuning);
    let mut creature = harness.creature("pirate_bandit", Vec3::ZERO);

    // Dragged 10 units from home mid-chase, player now 30 away
    creature.actor.position = Vec3::new(10.0, 0.0, 0.0);
    creature.actor.health = 40.0;
    creature.state = CreatureState::Chase;
    let mut player = Actor::new(100.0, 0.0, 10.0, Vec3::new(40.0, 0.0, 0.0));

    harness.tick(&mut creature, &mut player);
    assert_eq!(creature.state, CreatureState::LeashReturn);
    assert!(creature.actor.position.x < 10.0);
    assert_eq!(creature.actor.health, 40.0);

    for _ in 0..600 {
        harness.tick(&mut creature, &mut player);
    }

    assert!(creature.actor.position.distance(Vec3::ZERO) <= 0.05);
    assert_eq!(creature.actor.health, creature.actor.max_health);
    assert_eq!(creature.state, CreatureState::Idle);
    assert_eq!(harness.resets(), 1);
}

#[test]
fn test_dead_creature_is_never_mutated() {
    let mut harness = Harness::new(CombatTuning::default());
    let mut creature = harness.creature("zombie", Vec3::ZERO);
    creature.actor.position = Vec3::new(3.0, 0.0, 0.0);
    creature.actor.health = 0.0;
    creature.actor.alive = false;
    let mut player = Actor::new(100.0, 0.0, 10.0, Vec3::new(4.0, 0.0, 0.0));

    for _ in 0..120 {
        harness.tick(&mut creature, &mut player);
    }

    assert_eq!(creature.actor.position, Vec3::new(3.0, 0.0, 0.0));
    assert_eq!(creature.actor.health, 0.0);
    assert_eq!(creature.last_melee_at, None);
    assert!(creature.ability_timestamps.is_empty());
    assert_eq!(player.health, 100.0);
    assert!(harness.events.is_empty());
}

#[test]
fn test_creature_chases_then_attacks() {
    let mut harness = Harness::new(CombatTuning::default());
    let mut creature = harness.creature("zombie", Vec3::ZERO);
    let mut player = Actor::new(100.0, 0.0, 10.0, Vec3::new(0.0, 0.0, 6.0));

    harness.tick(&mut creature, &mut player);
    assert_eq!(creature.state, CreatureState::Chase);

    // 4.2 units/s closes 4.5 units in a little over a second
    for _ in 0..150 {
        harness.tick(&mut creature, &mut player);
    }
    assert_eq!(creature.state, CreatureState::Attack);
    assert!(creature.actor.position.distance(player.position) <= 1.5 + 1e-3);
    assert!(player.health < 100.0);

    // One swing per second at most
    let swings = harness
        .events
        .iter()
        .filter(|e| matches!(e, CombatEvent::DamageApplied { .. }))
        .count();
    assert!(swings <= 2, "{} swings", swings);
}

#[test]
fn test_friendly_creature_ignores_player() {
    let mut harness = Harness::new(CombatTuning::default());
    let mut creature = harness.creature("villager_woman", Vec3::ZERO);
    creature.hostile = false;
    let mut player = Actor::new(100.0, 0.0, 10.0, Vec3::new(1.0, 0.0, 0.0));

    for _ in 0..60 {
        harness.tick(&mut creature, &mut player);
    }
    assert_eq!(creature.state, CreatureState::Idle);
    assert_eq!(player.health, 100.0);
}
