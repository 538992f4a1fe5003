//! Emberfall - combat core for a third-person action RPG
//!
//! Ability definitions, cooldowns, cast timing, damage resolution, creature
//! AI and loot, driven by a single `CombatSession` clock. The Bevy plugin in
//! [`systems`] hosts a session inside an app; [`headless`] runs scripted
//! encounters without a window.

pub mod abilities;
pub mod actor;
pub mod classes;
pub mod cli;
pub mod combat;
pub mod constants;
pub mod creatures;
pub mod headless;
pub mod items;
pub mod loot;
pub mod persistence;
pub mod rng;
pub mod session;
pub mod systems;
pub mod talents;
pub mod tuning;

// Re-export commonly used types
pub use abilities::{AbilityCatalog, AbilityDefinition, AbilityId};
pub use actor::{Actor, ActorRef, CreatureId};
pub use classes::ClassId;
pub use combat::log::{CombatLog, CombatLogEventType};
pub use combat::{CastRejection, CombatEvent, CooldownTracker};
pub use headless::HeadlessEncounterConfig;
pub use loot::{resolve_loot, LootDrop, LootTable};
pub use rng::GameRng;
pub use session::CombatSession;
pub use systems::{CombatCorePlugin, PlayerIntent};
pub use talents::{TalentId, TalentRejection};
