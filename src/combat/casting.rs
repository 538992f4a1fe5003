//! Cast State Machine
//!
//! An actor is idle when it holds no `CastState`. A cast attempt is validated
//! in one synchronous step, then either resolves immediately or attaches a
//! `CastState` that is polled every tick until `now >= ends_at`.
//!
//! There is no cancellation: movement, damage and target death never abort a
//! cast. A cast whose target died in flight resolves as a no-op.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::cooldowns::CooldownTracker;
use crate::abilities::{AbilityDefinition, AbilityId};
use crate::actor::{Actor, ActorRef};

/// In-flight timed cast. At most one per actor.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CastState {
    pub ability: AbilityId,
    pub target: ActorRef,
    pub started_at: f32,
    pub ends_at: f32,
}

impl CastState {
    pub fn new(ability: AbilityId, target: ActorRef, now: f32, cast_time: f32) -> Self {
        Self {
            ability,
            target,
            started_at: now,
            ends_at: now + cast_time.max(0.0),
        }
    }

    /// Elapsed fraction, clamped to [0, 1]
    pub fn progress(&self, now: f32) -> f32 {
        let duration = self.ends_at - self.started_at;
        if duration <= 0.0 {
            return 1.0;
        }
        ((now - self.started_at) / duration).clamp(0.0, 1.0)
    }

    pub fn remaining(&self, now: f32) -> f32 {
        (self.ends_at - now).max(0.0)
    }

    pub fn is_complete(&self, now: f32) -> bool {
        now >= self.ends_at
    }
}

/// Why a cast attempt was refused. A refused attempt mutates nothing.
#[derive(Clone, Debug, PartialEq)]
pub enum CastRejection {
    /// Dead actors can't act until revived
    CasterDead,
    /// A timed cast is already in flight
    Busy,
    EmptySlot { slot: usize },
    UnknownAbility(AbilityId),
    /// The ability isn't usable by the caster's class
    NotUsable(AbilityId),
    InsufficientResource { needed: f32, available: f32 },
    NoTarget,
    OutOfRange { distance: f32, range: f32 },
    GlobalCooldown { remaining: f32 },
    AbilityCooldown { remaining: f32 },
}

impl fmt::Display for CastRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CastRejection::CasterDead => write!(f, "You are dead"),
            CastRejection::Busy => write!(f, "Already casting"),
            CastRejection::EmptySlot { slot } => write!(f, "No ability in slot {}", slot + 1),
            CastRejection::UnknownAbility(id) => write!(f, "Unknown ability: {}", id),
            CastRejection::NotUsable(id) => write!(f, "You can't use {}", id),
            CastRejection::InsufficientResource { .. } => write!(f, "Not enough mana"),
            CastRejection::NoTarget => write!(f, "No enemy selected"),
            CastRejection::OutOfRange { .. } => write!(f, "Too far away"),
            CastRejection::GlobalCooldown { .. } => write!(f, "On global cooldown"),
            CastRejection::AbilityCooldown { .. } => write!(f, "Spell not ready"),
        }
    }
}

impl std::error::Error for CastRejection {}

/// Result of an accepted cast attempt
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum CastOutcome {
    /// Resolved this tick with the given magnitude
    Resolved { magnitude: f32 },
    /// A timed cast began and resolves at `ends_at`
    Started { ends_at: f32 },
}

/// What to do once a validated cast has been paid for
#[derive(Clone, Debug, PartialEq)]
pub enum CastStart {
    Instant,
    Timed(CastState),
}

/// Validate a cast the caster is not yet busy with.
///
/// Checks run in a fixed order so the first failing one is reported: mana,
/// target, range, global cooldown, ability cooldown. Self-targeted abilities
/// skip the target and range checks.
pub fn validate_cast(
    caster: &Actor,
    definition: &AbilityDefinition,
    target: Option<&Actor>,
    cooldowns: &CooldownTracker,
    slot: usize,
    now: f32,
) -> Result<(), CastRejection> {
    if definition.cost > caster.mana {
        return Err(CastRejection::InsufficientResource {
            needed: definition.cost,
            available: caster.mana,
        });
    }

    if !definition.targets_self() {
        let target = target
            .filter(|t| t.is_alive())
            .ok_or(CastRejection::NoTarget)?;
        let distance = caster.distance_to(target);
        if distance > definition.range {
            return Err(CastRejection::OutOfRange {
                distance,
                range: definition.range,
            });
        }
    }

    cooldowns.check(slot, definition.cooldown, now)
}

/// Pay for a validated cast: deduct mana and record cooldowns, whether or not
/// the ability has a cast time.
pub fn commit_cast(
    definition: &AbilityDefinition,
    caster: &mut Actor,
    cooldowns: &mut CooldownTracker,
    slot: usize,
    target: ActorRef,
    now: f32,
) -> CastStart {
    caster.spend_mana(definition.cost);
    cooldowns.record(slot, now);

    match definition.timed_cast() {
        Some(cast_time) => {
            debug!("{} begins casting ({:.2}s)", definition.id, cast_time);
            CastStart::Timed(CastState::new(definition.id, target, now, cast_time))
        }
        None => CastStart::Instant,
    }
}

/// Take the cast out of `cast` if it has finished.
///
/// The slot is cleared on completion, so a cast completes exactly once no
/// matter how often this is polled afterwards.
pub fn advance_cast(cast: &mut Option<CastState>, now: f32) -> Option<CastState> {
    if cast.as_ref().is_some_and(|c| c.is_complete(now)) {
        cast.take()
    } else {
        None
    }
}
