//! Ability System - Types and Enums
//!
//! This module contains ability-related types. Definitions live in the
//! `catalog` module, either built in or loaded from
//! `assets/config/abilities.ron`.

pub mod catalog;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::classes::ClassId;

pub use catalog::{load_ability_catalog, AbilitiesConfig, AbilityCatalog, ABILITIES_PATH};

/// Identifier of every ability in the game.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AbilityId {
    HeroicStrike,
    ShieldBlock,
    Charge,      // Warrior gap closer
    ArcaneBolt,
    FireBlast,
    Firebolt,    // 1.5s cast
    SinisterStrike,
    Backstab,
}

impl AbilityId {
    pub const ALL: [AbilityId; 8] = [
        AbilityId::HeroicStrike,
        AbilityId::ShieldBlock,
        AbilityId::Charge,
        AbilityId::ArcaneBolt,
        AbilityId::FireBlast,
        AbilityId::Firebolt,
        AbilityId::SinisterStrike,
        AbilityId::Backstab,
    ];

    /// Stable snake_case identifier, as used in saves and configs
    pub fn as_str(&self) -> &'static str {
        match self {
            AbilityId::HeroicStrike => "heroic_strike",
            AbilityId::ShieldBlock => "shield_block",
            AbilityId::Charge => "charge",
            AbilityId::ArcaneBolt => "arcane_bolt",
            AbilityId::FireBlast => "fire_blast",
            AbilityId::Firebolt => "firebolt",
            AbilityId::SinisterStrike => "sinister_strike",
            AbilityId::Backstab => "backstab",
        }
    }

    pub fn parse(id: &str) -> Option<AbilityId> {
        Self::ALL.into_iter().find(|a| a.as_str() == id)
    }
}

impl std::fmt::Display for AbilityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Spell schools, for presentation and future resistances.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpellSchool {
    Physical,
    Arcane,
    Fire,
    Frost,
    Shadow,
    Nature,
    Holy,
}

/// How an ability reaches its target.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryKind {
    Melee,
    Ranged,
    Instant,
}

/// Moves the caster next to the target before the strike lands.
#[derive(Clone, Copy, PartialEq, Debug, Serialize, Deserialize)]
pub struct GapCloser {
    /// Distance from the target the caster stops at
    pub stop_distance: f32,
}

/// Self-applied instant effects.
#[derive(Clone, Copy, PartialEq, Debug, Serialize, Deserialize)]
pub enum InstantEffect {
    /// Raise max health permanently and heal (Shield Block)
    Fortify { max_health_bonus: f32, heal: f32 },
}

/// What an ability does when it resolves, tagged by delivery kind.
#[derive(Clone, Copy, PartialEq, Debug, Serialize, Deserialize)]
pub enum AbilityEffect {
    /// Direct weapon damage
    Melee {
        #[serde(default = "default_crit_multiplier")]
        crit_multiplier: f32,
        #[serde(default)]
        gap_closer: Option<GapCloser>,
    },
    /// Damage plus a cosmetic projectile travelling to the target
    Ranged {
        /// Projectile travel speed in units/second
        projectile_speed: f32,
        /// 0xRRGGBB
        projectile_color: u32,
    },
    Instant(InstantEffect),
}

fn default_crit_multiplier() -> f32 {
    2.0
}

impl AbilityEffect {
    pub fn kind(&self) -> DeliveryKind {
        match self {
            AbilityEffect::Melee { .. } => DeliveryKind::Melee,
            AbilityEffect::Ranged { .. } => DeliveryKind::Ranged,
            AbilityEffect::Instant(_) => DeliveryKind::Instant,
        }
    }

    /// Multiplier applied to a critical hit
    pub fn crit_multiplier(&self) -> f32 {
        match self {
            AbilityEffect::Melee { crit_multiplier, .. } => *crit_multiplier,
            _ => default_crit_multiplier(),
        }
    }
}

/// Immutable definition of one ability.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AbilityDefinition {
    pub id: AbilityId,
    /// Display name of the ability
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Classes allowed to slot this ability
    pub class_tags: SmallVec<[ClassId; 2]>,
    pub school: SpellSchool,
    pub effect: AbilityEffect,

    // === Casting ===
    /// Mana cost
    #[serde(default)]
    pub cost: f32,
    /// Cooldown after use, in seconds
    #[serde(default)]
    pub cooldown: f32,
    /// Maximum range in units
    #[serde(default)]
    pub range: f32,
    /// Cast time in seconds (None = resolves instantly)
    #[serde(default)]
    pub cast_time: Option<f32>,

    // === Damage ===
    /// Scales the caster's base damage
    #[serde(default)]
    pub damage_multiplier: f32,
    /// Chance in [0, 1] that the hit is critical
    #[serde(default)]
    pub crit_chance: f32,
}

impl AbilityDefinition {
    pub fn kind(&self) -> DeliveryKind {
        self.effect.kind()
    }

    /// Instant self-buffs need neither a target nor range
    pub fn targets_self(&self) -> bool {
        matches!(self.effect, AbilityEffect::Instant(_))
    }

    /// Cast time if the ability is cast rather than instant
    pub fn timed_cast(&self) -> Option<f32> {
        self.cast_time.filter(|t| *t > 0.0)
    }

    pub fn usable_by(&self, class: ClassId) -> bool {
        self.class_tags.contains(&class)
    }

    pub fn is_damage(&self) -> bool {
        self.damage_multiplier > 0.0 && !self.targets_self()
    }
}
