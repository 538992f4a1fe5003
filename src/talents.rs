//! Talents: one-time, class-restricted upgrades to the player's combat stats.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::actor::Actor;
use crate::classes::ClassId;

/// Identifier of every talent in the game.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TalentId {
    ArcaneFocus,
    WarriorToughness,
    RoguePrecision,
}

/// What learning a talent does to the character
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TalentEffect {
    /// Scale base damage, rounded to a whole number
    AttackDamageMultiplier(f32),
    /// Raise max health and top health up to it
    MaxHealthBonus(f32),
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TalentDefinition {
    pub id: TalentId,
    pub name: &'static str,
    pub description: &'static str,
    pub class: ClassId,
    pub effect: TalentEffect,
}

impl TalentId {
    pub const ALL: [TalentId; 3] = [
        TalentId::ArcaneFocus,
        TalentId::WarriorToughness,
        TalentId::RoguePrecision,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TalentId::ArcaneFocus => "arcane_focus",
            TalentId::WarriorToughness => "warrior_toughness",
            TalentId::RoguePrecision => "rogue_precision",
        }
    }

    pub fn parse(id: &str) -> Option<TalentId> {
        Self::ALL.into_iter().find(|t| t.as_str() == id)
    }

    pub fn definition(&self) -> TalentDefinition {
        match self {
            TalentId::ArcaneFocus => TalentDefinition {
                id: *self,
                name: "Arcane Focus",
                description: "Increases Arcane Bolt damage by 10%.",
                class: ClassId::Mage,
                effect: TalentEffect::AttackDamageMultiplier(1.1),
            },
            TalentId::WarriorToughness => TalentDefinition {
                id: *self,
                name: "Toughness",
                description: "Increase max HP by 15.",
                class: ClassId::Warrior,
                effect: TalentEffect::MaxHealthBonus(15.0),
            },
            TalentId::RoguePrecision => TalentDefinition {
                id: *self,
                name: "Precision",
                description: "Sharpen every rogue attack by 5%.",
                class: ClassId::Rogue,
                effect: TalentEffect::AttackDamageMultiplier(1.05),
            },
        }
    }
}

impl fmt::Display for TalentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TalentEffect {
    pub fn apply(&self, actor: &mut Actor) {
        match *self {
            TalentEffect::AttackDamageMultiplier(multiplier) => {
                actor.base_damage = (actor.base_damage * multiplier).round();
            }
            TalentEffect::MaxHealthBonus(bonus) => {
                actor.max_health += bonus;
                // Death stays terminal
                if actor.is_alive() {
                    actor.health = actor.max_health;
                }
            }
        }
    }
}

/// Talents a class may learn
pub fn talents_for_class(class: ClassId) -> Vec<TalentDefinition> {
    TalentId::ALL
        .iter()
        .map(TalentId::definition)
        .filter(|def| def.class == class)
        .collect()
}

/// Base damage of `class` after the damage talents in `learned`, applied in
/// id order.
pub fn attack_damage_with<'a>(
    class: ClassId,
    learned: impl IntoIterator<Item = &'a TalentId>,
) -> f32 {
    let mut damage = class.base_stats().attack_damage;
    let mut learned: Vec<TalentId> = learned.into_iter().copied().collect();
    learned.sort();
    for talent in learned {
        if let TalentEffect::AttackDamageMultiplier(multiplier) = talent.definition().effect {
            damage = (damage * multiplier).round();
        }
    }
    damage
}

/// Why a talent couldn't be learned
#[derive(Clone, Debug, PartialEq)]
pub enum TalentRejection {
    AlreadyLearned(TalentId),
    WrongClass { talent: TalentId, class: ClassId },
}

impl fmt::Display for TalentRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TalentRejection::AlreadyLearned(talent) => {
                write!(f, "{} is already learned", talent.definition().name)
            }
            TalentRejection::WrongClass { talent, class } => write!(
                f,
                "{} can't learn {}",
                class.name(),
                talent.definition().name
            ),
        }
    }
}

impl std::error::Error for TalentRejection {}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::prelude::*;

    #[test]
    fn test_each_class_has_one_talent() {
        for class in ClassId::ALL {
            let talents = talents_for_class(class);
            assert_eq!(talents.len(), 1, "{:?}", class);
            assert_eq!(talents[0].class, class);
        }
    }

    #[test]
    fn test_ids_parse_back() {
        for talent in TalentId::ALL {
            assert_eq!(TalentId::parse(talent.as_str()), Some(talent));
        }
        assert_eq!(TalentId::parse("fireball"), None);
    }

    #[test]
    fn test_toughness_raises_and_fills_health() {
        let mut actor = Actor::new(140.0, 60.0, 22.0, Vec3::ZERO);
        actor.health = 50.0;
        TalentId::WarriorToughness.definition().effect.apply(&mut actor);
        assert_eq!(actor.max_health, 155.0);
        assert_eq!(actor.health, 155.0);
    }

    #[test]
    fn test_damage_talents_round() {
        let mut actor = Actor::new(90.0, 160.0, 15.0, Vec3::ZERO);
        TalentId::ArcaneFocus.definition().effect.apply(&mut actor);
        // 16.5 rounds away from zero
        assert_eq!(actor.base_damage, 17.0);

        assert_eq!(attack_damage_with(ClassId::Mage, &[TalentId::ArcaneFocus]), 17.0);
        assert_eq!(attack_damage_with(ClassId::Rogue, &[TalentId::RoguePrecision]), 21.0);
        assert_eq!(attack_damage_with(ClassId::Warrior, &[TalentId::WarriorToughness]), 22.0);
        assert_eq!(attack_damage_with(ClassId::Warrior, &[] as &[TalentId]), 22.0);
    }
}
