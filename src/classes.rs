//! Playable classes: base stats, starter abilities and starter loadouts.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::abilities::AbilityId;

/// Playable character class.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassId {
    Warrior,
    Mage,
    Rogue,
}

/// Base stats of a fresh level 1 character
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BaseStats {
    pub health: f32,
    pub mana: f32,
    pub attack_damage: f32,
}

/// Starting purse, bags and worn gear
#[derive(Clone, Debug, PartialEq)]
pub struct StarterLoadout {
    pub gold: u32,
    pub inventory: Vec<String>,
    pub equipment: BTreeMap<String, String>,
}

impl ClassId {
    pub const ALL: [ClassId; 3] = [ClassId::Warrior, ClassId::Mage, ClassId::Rogue];

    pub fn name(&self) -> &'static str {
        match self {
            ClassId::Warrior => "Warrior",
            ClassId::Mage => "Mage",
            ClassId::Rogue => "Rogue",
        }
    }

    /// Parse a class name, case-insensitively
    pub fn parse(name: &str) -> Result<ClassId, String> {
        match name.to_ascii_lowercase().as_str() {
            "warrior" => Ok(ClassId::Warrior),
            "mage" => Ok(ClassId::Mage),
            "rogue" => Ok(ClassId::Rogue),
            _ => Err(format!(
                "Unknown class: '{}'. Valid classes: Warrior, Mage, Rogue",
                name
            )),
        }
    }

    pub fn base_stats(&self) -> BaseStats {
        let (health, mana, attack_damage) = match self {
            ClassId::Warrior => (140.0, 60.0, 22.0),
            ClassId::Mage => (90.0, 160.0, 15.0),
            ClassId::Rogue => (110.0, 80.0, 20.0),
        };
        BaseStats {
            health,
            mana,
            attack_damage,
        }
    }

    /// Abilities placed on the action bar of a new character, slot order
    pub fn starter_abilities(&self) -> &'static [AbilityId] {
        match self {
            ClassId::Warrior => &[AbilityId::HeroicStrike, AbilityId::ShieldBlock, AbilityId::Charge],
            ClassId::Mage => &[AbilityId::ArcaneBolt, AbilityId::FireBlast, AbilityId::Firebolt],
            ClassId::Rogue => &[AbilityId::SinisterStrike, AbilityId::Backstab],
        }
    }

    pub fn starter_loadout(&self) -> StarterLoadout {
        let (inventory, equipment): (&[&str], &[(&str, &str)]) = match self {
            ClassId::Mage => (
                &["apprentice_staff", "cloth_gloves"],
                &[("weapon", "apprentice_staff"), ("hands", "cloth_gloves")],
            ),
            ClassId::Rogue => (&["rogue_daggers"], &[("weapon", "rogue_daggers")]),
            ClassId::Warrior => (
                &["rusty_sword", "training_shield"],
                &[("weapon", "rusty_sword"), ("offhand", "training_shield")],
            ),
        };
        StarterLoadout {
            gold: 10,
            inventory: inventory.iter().map(|s| s.to_string()).collect(),
            equipment: equipment
                .iter()
                .map(|(slot, item)| (slot.to_string(), item.to_string()))
                .collect(),
        }
    }
}
