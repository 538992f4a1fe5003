//! Combat events
//!
//! Notifications the combat core produces for the presentation layer
//! (floating numbers, cast bars, projectile visuals, loot windows). The core
//! never publishes them globally; callers hand in a `CombatEventSink`.

use bevy::prelude::*;

use crate::abilities::AbilityId;
use crate::actor::{ActorRef, CreatureId};
use crate::loot::LootDrop;
use crate::talents::TalentId;

/// Everything observable that happens during combat
#[derive(Event, Debug, Clone, PartialEq)]
pub enum CombatEvent {
    /// Damage landed on a living actor
    DamageApplied {
        source: ActorRef,
        target: ActorRef,
        /// None for melee swings and creature auto-hits
        ability: Option<AbilityId>,
        amount: f32,
        critical: bool,
        /// Target health after the hit
        remaining_health: f32,
    },
    /// A timed cast began
    CastStarted {
        caster: ActorRef,
        ability: AbilityId,
        target: ActorRef,
        started_at: f32,
        ends_at: f32,
    },
    /// Cast bar update, emitted every tick while a cast is live
    CastProgressed {
        caster: ActorRef,
        ability: AbilityId,
        /// Elapsed fraction in [0, 1]
        progress: f32,
        remaining: f32,
    },
    /// An ability resolved, instant or at the end of its cast
    CastCompleted {
        caster: ActorRef,
        ability: AbilityId,
        target: ActorRef,
        magnitude: f32,
    },
    /// Cosmetic travel animation. The damage is already applied.
    ProjectileLaunched {
        caster: ActorRef,
        target: ActorRef,
        ability: AbilityId,
        from: Vec3,
        to: Vec3,
        speed: f32,
        color: u32,
    },
    Healed {
        source: ActorRef,
        target: ActorRef,
        ability: Option<AbilityId>,
        amount: f32,
    },
    Died {
        victim: ActorRef,
        killer: Option<ActorRef>,
    },
    /// Corpse loot was resolved
    LootGenerated {
        creature: CreatureId,
        drops: Vec<LootDrop>,
    },
    /// A leashed creature got home and healed up
    CreatureReset { creature: CreatureId },
    ExperienceGained { amount: u32, total: u32 },
    LootTaken { creature: CreatureId, drop: LootDrop },
    TalentLearned { talent: TalentId },
}

/// Receiver for combat notifications.
pub trait CombatEventSink {
    fn emit(&mut self, event: CombatEvent);
}

impl CombatEventSink for Vec<CombatEvent> {
    fn emit(&mut self, event: CombatEvent) {
        self.push(event);
    }
}
