//! Combat system
//!
//! Implements the ability execution pipeline:
//! - Cooldown bookkeeping (per slot and global)
//! - The cast state machine
//! - Damage and effect resolution
//! - Combat events and logging

pub mod casting;
pub mod cooldowns;
pub mod events;
pub mod log;
pub mod resolver;

pub use casting::{advance_cast, commit_cast, validate_cast, CastOutcome, CastRejection, CastStart, CastState};
pub use cooldowns::{CooldownSnapshot, CooldownTracker};
pub use events::{CombatEvent, CombatEventSink};
pub use resolver::{apply_damage, resolve, roll_damage, AbilityInvocation};
