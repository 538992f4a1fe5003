//! Ability Catalog
//!
//! Static registry of ability definitions. The builtin catalog carries the
//! game's shipped numbers; `assets/config/abilities.ron` can override them so
//! balance changes don't require recompilation.
//!
//! ## Usage
//! ```ignore
//! let catalog = AbilityCatalog::builtin();
//! let def = catalog.get(&AbilityId::Firebolt).unwrap();
//! println!("Firebolt cast time: {:?}", def.cast_time);
//! ```

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use smallvec::smallvec;
use std::collections::HashMap;
use std::path::Path;

use super::{AbilityDefinition, AbilityEffect, AbilityId, GapCloser, InstantEffect, SpellSchool};
use crate::classes::ClassId;

/// Default location of the ability config
pub const ABILITIES_PATH: &str = "assets/config/abilities.ron";

/// Root structure for the abilities.ron file
#[derive(Debug, Serialize, Deserialize)]
pub struct AbilitiesConfig {
    pub abilities: Vec<AbilityDefinition>,
}

/// All ability definitions, keyed by id.
#[derive(Resource, Clone, Debug)]
pub struct AbilityCatalog {
    definitions: HashMap<AbilityId, AbilityDefinition>,
}

impl Default for AbilityCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl AbilityCatalog {
    /// Create from a loaded config
    pub fn new(config: AbilitiesConfig) -> Self {
        Self {
            definitions: config
                .abilities
                .into_iter()
                .map(|def| (def.id, def))
                .collect(),
        }
    }

    /// The shipped ability set
    pub fn builtin() -> Self {
        Self::new(AbilitiesConfig {
            abilities: builtin_definitions(),
        })
    }

    /// Look up an ability. A missing id is a no-op for callers, never a fault.
    pub fn get(&self, ability: &AbilityId) -> Option<&AbilityDefinition> {
        self.definitions.get(ability)
    }

    /// Abilities a class may slot, in id order
    pub fn abilities_for_class(&self, class: ClassId) -> Vec<&AbilityDefinition> {
        let mut defs: Vec<&AbilityDefinition> = self
            .definitions
            .values()
            .filter(|def| def.usable_by(class))
            .collect();
        defs.sort_by_key(|def| def.id);
        defs
    }

    /// Check that every known ability id is defined
    pub fn validate(&self) -> Result<(), Vec<AbilityId>> {
        let missing: Vec<AbilityId> = AbilityId::ALL
            .into_iter()
            .filter(|ability| !self.definitions.contains_key(ability))
            .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(missing)
        }
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &AbilityDefinition> {
        self.definitions.values()
    }
}

/// Load and validate the catalog from a RON file
pub fn load_ability_catalog(path: &Path) -> Result<AbilityCatalog, String> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;

    let config: AbilitiesConfig = ron::from_str(&contents)
        .map_err(|e| format!("Failed to parse {}: {}", path.display(), e))?;

    let catalog = AbilityCatalog::new(config);

    catalog
        .validate()
        .map_err(|missing| format!("Missing ability definitions: {:?}", missing))?;

    info!("Loaded {} ability definitions from {}", catalog.len(), path.display());

    Ok(catalog)
}

fn melee(crit_multiplier: f32) -> AbilityEffect {
    AbilityEffect::Melee {
        crit_multiplier,
        gap_closer: None,
    }
}

fn builtin_definitions() -> Vec<AbilityDefinition> {
    vec![
        AbilityDefinition {
            id: AbilityId::HeroicStrike,
            name: "Heroic Strike".to_string(),
            description: "A solid melee swing with a chance to crit.".to_string(),
            class_tags: smallvec![ClassId::Warrior],
            school: SpellSchool::Physical,
            effect: melee(2.0),
            cost: 0.0,
            cooldown: 1.0,
            range: 3.5,
            cast_time: None,
            damage_multiplier: 1.0,
            crit_chance: 0.1,
        },
        AbilityDefinition {
            id: AbilityId::ShieldBlock,
            name: "Shield Block".to_string(),
            description: "Raise your shield to mitigate the next hit.".to_string(),
            class_tags: smallvec![ClassId::Warrior],
            school: SpellSchool::Physical,
            effect: AbilityEffect::Instant(InstantEffect::Fortify {
                max_health_bonus: 5.0,
                heal: 10.0,
            }),
            cost: 0.0,
            cooldown: 8.0,
            range: 0.0,
            cast_time: None,
            damage_multiplier: 0.0,
            crit_chance: 0.0,
        },
        AbilityDefinition {
            id: AbilityId::Charge,
            name: "Charge".to_string(),
            description: "Rush toward the target, closing distance instantly and striking."
                .to_string(),
            class_tags: smallvec![ClassId::Warrior],
            school: SpellSchool::Physical,
            effect: AbilityEffect::Melee {
                crit_multiplier: 2.0,
                gap_closer: Some(GapCloser { stop_distance: 2.8 }),
            },
            cost: 0.0,
            cooldown: 8.0,
            range: 20.0,
            cast_time: None,
            damage_multiplier: 1.2,
            crit_chance: 0.1,
        },
        AbilityDefinition {
            id: AbilityId::ArcaneBolt,
            name: "Arcane Bolt".to_string(),
            description: "Fire a shard of arcane energy.".to_string(),
            class_tags: smallvec![ClassId::Mage],
            school: SpellSchool::Arcane,
            effect: AbilityEffect::Ranged {
                projectile_speed: 18.0,
                projectile_color: 0x6ec3ff,
            },
            cost: 25.0,
            cooldown: 2.0,
            range: 12.0,
            cast_time: None,
            damage_multiplier: 1.1,
            crit_chance: 0.15,
        },
        AbilityDefinition {
            id: AbilityId::FireBlast,
            name: "Fire Blast".to_string(),
            description: "Short cast fiery blast.".to_string(),
            class_tags: smallvec![ClassId::Mage],
            school: SpellSchool::Fire,
            effect: AbilityEffect::Ranged {
                projectile_speed: 18.0,
                projectile_color: 0xff7a2a,
            },
            cost: 30.0,
            cooldown: 2.5,
            range: 12.0,
            cast_time: None,
            damage_multiplier: 1.2,
            crit_chance: 0.15,
        },
        AbilityDefinition {
            id: AbilityId::Firebolt,
            name: "Firebolt".to_string(),
            description: "Hurl a bolt of fire after a short cast.".to_string(),
            class_tags: smallvec![ClassId::Mage],
            school: SpellSchool::Fire,
            effect: AbilityEffect::Ranged {
                projectile_speed: 18.0,
                projectile_color: 0xff3c1b,
            },
            cost: 35.0,
            cooldown: 2.0,
            range: 14.0,
            cast_time: Some(1.5),
            damage_multiplier: 1.35,
            crit_chance: 0.18,
        },
        AbilityDefinition {
            id: AbilityId::SinisterStrike,
            name: "Sinister Strike".to_string(),
            description: "Quick strike that can crit often.".to_string(),
            class_tags: smallvec![ClassId::Rogue],
            school: SpellSchool::Physical,
            effect: melee(2.0),
            cost: 0.0,
            cooldown: 0.9,
            range: 3.5,
            cast_time: None,
            damage_multiplier: 0.9,
            crit_chance: 0.2,
        },
        AbilityDefinition {
            id: AbilityId::Backstab,
            name: "Backstab".to_string(),
            description: "A vicious strike with higher crits.".to_string(),
            class_tags: smallvec![ClassId::Rogue],
            school: SpellSchool::Physical,
            effect: melee(2.2),
            cost: 0.0,
            cooldown: 1.2,
            range: 3.5,
            cast_time: None,
            damage_multiplier: 1.1,
            crit_chance: 0.25,
        },
    ]
}
