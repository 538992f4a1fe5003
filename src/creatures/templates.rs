//! Creature templates and the default spawn list.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::loot::LootTable;

/// Static description of a creature kind
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CreatureTemplate {
    pub id: String,
    pub name: String,
    pub max_health: f32,
    #[serde(default)]
    pub max_mana: f32,
    /// Experience awarded for the kill
    #[serde(default)]
    pub experience: u32,
    /// Melee damage; None uses the creature default
    #[serde(default)]
    pub damage: Option<f32>,
    /// Movement speed in units per second
    pub speed: f32,
    /// Behavior script run after the generic AI
    #[serde(default)]
    pub script_id: Option<String>,
    #[serde(default)]
    pub loot: Option<LootTable>,
}

/// One placed creature in the world
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CreatureSpawn {
    /// Stable spawn name, e.g. `bandit-1`
    pub name: String,
    pub template: String,
    pub position: Vec3,
    pub hostile: bool,
}

impl CreatureSpawn {
    pub fn new(name: &str, template: &str, position: Vec3, hostile: bool) -> Self {
        Self {
            name: name.to_string(),
            template: template.to_string(),
            position,
            hostile,
        }
    }
}

/// Registry of creature templates, keyed by template id
#[derive(Clone, Debug)]
pub struct CreatureTemplates {
    templates: HashMap<String, CreatureTemplate>,
}

impl Default for CreatureTemplates {
    fn default() -> Self {
        Self::builtin()
    }
}

// Speeds are expressed per second; the world runs at 60 frames per second.
const FRAMES_PER_SECOND: f32 = 60.0;

impl CreatureTemplates {
    pub fn new(templates: Vec<CreatureTemplate>) -> Self {
        Self {
            templates: templates.into_iter().map(|t| (t.id.clone(), t)).collect(),
        }
    }

    pub fn builtin() -> Self {
        let template = |id: &str,
                        name: &str,
                        max_health: f32,
                        max_mana: f32,
                        experience: u32,
                        damage: Option<f32>,
                        speed_per_frame: f32| CreatureTemplate {
            id: id.to_string(),
            name: name.to_string(),
            max_health,
            max_mana,
            experience,
            damage,
            speed: speed_per_frame * FRAMES_PER_SECOND,
            script_id: None,
            loot: None,
        };

        let mut evil_wizard = template("evil_wizard", "Evil Wizard", 180.0, 200.0, 85, Some(12.0), 0.07);
        evil_wizard.script_id = Some("evil_wizard_ai".to_string());
        evil_wizard.loot = Some(
            LootTable::new(1.8)
                .with_entry("apprentice_staff", 0.2)
                .with_entry("cloth_gloves", 0.25)
                .with_entry("minor_health_potion", 0.4),
        );

        let mut pirate_bandit = template("pirate_bandit", "Pirate Bandit", 120.0, 30.0, 45, Some(7.0), 0.08);
        pirate_bandit.loot = Some(
            LootTable::new(1.4)
                .with_entry("rusty_sword", 0.25)
                .with_entry("training_shield", 0.15)
                .with_entry("minor_health_potion", 0.35),
        );

        let mut skeleton_raider = template("skeleton_raider", "Skeleton Raider", 140.0, 0.0, 55, Some(9.0), 0.075);
        skeleton_raider.loot = Some(
            LootTable::new(1.2)
                .with_entry("rusty_sword", 0.22)
                .with_entry("rogue_daggers", 0.14)
                .with_entry("minor_health_potion", 0.28),
        );

        let mut guard_robot = template("guard_robot", "Guard Robot", 200.0, 0.0, 65, Some(10.0), 0.07);
        guard_robot.loot = Some(
            LootTable::new(1.5)
                .with_entry("training_shield", 0.2)
                .with_entry("rusty_sword", 0.2),
        );

        let mut giant_wanderer = template("giant_wanderer", "Wandering Giant", 260.0, 0.0, 0, None, 0.05);
        giant_wanderer.loot = Some(
            LootTable::new(2.0)
                .with_entry("training_shield", 0.25)
                .with_entry("rusty_sword", 0.2),
        );

        let mut colossus = template("colossus", "Colossus", 400.0, 0.0, 150, Some(14.0), 0.045);
        colossus.loot = Some(
            LootTable::new(3.0)
                .with_entry("training_shield", 0.3)
                .with_entry("rusty_sword", 0.3)
                .with_entry("minor_health_potion", 0.4),
        );

        let mut zombie = template("zombie", "Zombie", 100.0, 0.0, 35, Some(6.0), 0.07);
        zombie.loot = Some(
            LootTable::new(1.0)
                .with_entry("minor_health_potion", 0.3)
                .with_entry("rusty_sword", 0.1),
        );

        Self::new(vec![
            template("villager_woman", "Villager", 60.0, 0.0, 0, None, 0.06),
            template("town_wizard", "Town Wizard", 150.0, 250.0, 0, None, 0.065),
            pirate_bandit,
            skeleton_raider,
            evil_wizard,
            guard_robot,
            giant_wanderer,
            colossus,
            zombie,
        ])
    }

    pub fn get(&self, id: &str) -> Option<&CreatureTemplate> {
        self.templates.get(id)
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

/// The shipped world population: the friendly village and the hostile camps.
pub fn default_spawns() -> Vec<CreatureSpawn> {
    vec![
        CreatureSpawn::new("village-anne", "villager_woman", Vec3::new(12.0, 0.0, 14.0), false),
        CreatureSpawn::new("village-wizard", "town_wizard", Vec3::new(8.0, 0.0, 18.0), false),
        CreatureSpawn::new("village-giant", "giant_wanderer", Vec3::new(18.0, 0.0, 22.0), false),
        CreatureSpawn::new("village-robot-guard", "guard_robot", Vec3::new(6.0, 0.0, 10.0), false),
        CreatureSpawn::new("village-questgiver", "villager_woman", Vec3::new(10.0, 0.0, 12.0), false),
        CreatureSpawn::new("bandit-1", "pirate_bandit", Vec3::new(-180.0, 0.0, 30.0), true),
        CreatureSpawn::new("bandit-2", "pirate_bandit", Vec3::new(-195.0, 0.0, -20.0), true),
        CreatureSpawn::new("skeleton-1", "skeleton_raider", Vec3::new(210.0, 0.0, 60.0), true),
        CreatureSpawn::new("evil-wizard-1", "evil_wizard", Vec3::new(230.0, 0.0, -40.0), true),
        CreatureSpawn::new("colossus-1", "colossus", Vec3::new(-220.0, 0.0, 90.0), true),
        CreatureSpawn::new("zombie-1", "zombie", Vec3::new(160.0, 0.0, -120.0), true),
        CreatureSpawn::new("zombie-2", "zombie", Vec3::new(150.0, 0.0, -140.0), true),
        CreatureSpawn::new("zombie-3", "zombie", Vec3::new(180.0, 0.0, -100.0), true),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_spawn_has_a_template() {
        let templates = CreatureTemplates::builtin();
        for spawn in default_spawns() {
            assert!(templates.get(&spawn.template).is_some(), "missing {}", spawn.template);
        }
    }

    #[test]
    fn test_loot_tables_reference_known_items() {
        let templates = CreatureTemplates::builtin();
        let items = crate::items::ItemCatalog::builtin();
        for spawn in default_spawns() {
            let template = templates.get(&spawn.template).unwrap();
            if let Some(table) = &template.loot {
                for entry in &table.entries {
                    assert!(items.get(&entry.item_id).is_some(), "unknown item {}", entry.item_id);
                }
            }
        }
    }

    #[test]
    fn test_evil_wizard_is_scripted() {
        let templates = CreatureTemplates::builtin();
        let wizard = templates.get("evil_wizard").unwrap();
        assert_eq!(wizard.script_id.as_deref(), Some("evil_wizard_ai"));
        assert!((wizard.speed - 4.2).abs() < 1e-4);
    }
}
