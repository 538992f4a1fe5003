//! Creature behavior scripts
//!
//! Bespoke per-template logic lives here rather than in the generic AI loop.
//! Each script implements `CreatureBehavior` and is registered under the
//! script id templates refer to.
//!
//! Scripts run after the generic state machine every tick. They may issue
//! extra actions (start casts, fire abilities) but never undo movement the
//! generic loop already applied.

pub mod evil_wizard;

use std::collections::HashMap;

use super::ai::AiContext;
use super::Creature;
use crate::actor::Actor;

/// A pluggable per-template AI hook.
pub trait CreatureBehavior: Send + Sync {
    /// Script id this behavior is registered under
    fn script_id(&self) -> &'static str;

    fn tick(&self, creature: &mut Creature, player: &mut Actor, ctx: &mut AiContext);
}

/// Script id -> behavior lookup
#[derive(Default)]
pub struct BehaviorRegistry {
    behaviors: HashMap<String, Box<dyn CreatureBehavior>>,
}

impl BehaviorRegistry {
    /// Registry with every shipped script
    pub fn builtin() -> Self {
        let mut registry = Self::default();
        registry.register(Box::new(evil_wizard::EvilWizardBehavior));
        registry
    }

    /// Add a behavior, replacing any previous one with the same id
    pub fn register(&mut self, behavior: Box<dyn CreatureBehavior>) {
        self.behaviors
            .insert(behavior.script_id().to_string(), behavior);
    }

    pub fn get(&self, script_id: &str) -> Option<&dyn CreatureBehavior> {
        self.behaviors.get(script_id).map(|b| b.as_ref())
    }

    pub fn contains(&self, script_id: &str) -> bool {
        self.behaviors.contains_key(script_id)
    }
}
