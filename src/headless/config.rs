//! JSON configuration parsing for headless mode
//!
//! Describes one scripted encounter: the player's class, the creatures to
//! fight, and the ability priority the autopilot follows.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::abilities::{AbilityCatalog, AbilityId};
use crate::classes::ClassId;
use crate::creatures::{default_spawns, CreatureSpawn, CreatureTemplates};
use crate::talents::TalentId;

/// One creature placement in an encounter file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpawnConfig {
    pub template: String,
    /// World position as [x, y, z]
    pub position: [f32; 3],
    #[serde(default = "default_hostile")]
    pub hostile: bool,
    /// Spawn name; defaults to `<template>-<index>`
    #[serde(default)]
    pub name: Option<String>,
}

fn default_hostile() -> bool {
    true
}

/// Headless encounter configuration loaded from JSON
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeadlessEncounterConfig {
    /// Player class name ("Warrior", "Mage" or "Rogue")
    pub class: String,
    /// Creatures to spawn. Empty uses the shipped world population.
    #[serde(default)]
    pub spawns: Vec<SpawnConfig>,
    /// Ability priority for the autopilot. Empty uses the class's starter bar.
    #[serde(default)]
    pub rotation: Vec<String>,
    /// Talents learned before the fight starts
    #[serde(default)]
    pub talents: Vec<TalentId>,
    /// Player start position as [x, y, z]
    #[serde(default)]
    pub player_position: Option<[f32; 3]>,
    /// Custom output path for the combat log (optional)
    #[serde(default)]
    pub output_path: Option<String>,
    /// Maximum encounter duration in seconds (default: 120)
    #[serde(default = "default_max_duration")]
    pub max_duration_secs: f32,
    /// Random seed for deterministic reproduction
    #[serde(default)]
    pub random_seed: Option<u64>,
}

fn default_max_duration() -> f32 {
    120.0
}

impl HeadlessEncounterConfig {
    /// Load configuration from a JSON file
    pub fn load_from_file(path: &Path) -> Result<Self, String> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file: {}", e))?;

        Self::from_json(&contents)
    }

    pub fn from_json(json: &str) -> Result<Self, String> {
        let config: HeadlessEncounterConfig =
            serde_json::from_str(json).map_err(|e| format!("Failed to parse JSON: {}", e))?;

        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        let class = self.class_id()?;

        if self.max_duration_secs <= 0.0 {
            return Err("max_duration_secs must be positive".to_string());
        }

        let catalog = AbilityCatalog::builtin();
        for ability in self.rotation_abilities()? {
            let usable = catalog.get(&ability).is_some_and(|def| def.usable_by(class));
            if !usable {
                return Err(format!("{} can't use {}", class.name(), ability));
            }
        }

        for talent in &self.talents {
            if talent.definition().class != class {
                return Err(format!("{} can't learn {}", class.name(), talent));
            }
        }

        let templates = CreatureTemplates::builtin();
        for spawn in &self.spawns {
            if templates.get(&spawn.template).is_none() {
                return Err(format!("Unknown creature template: '{}'", spawn.template));
            }
        }

        Ok(())
    }

    pub fn class_id(&self) -> Result<ClassId, String> {
        ClassId::parse(&self.class)
    }

    /// Rotation as ability ids, in priority order
    pub fn rotation_abilities(&self) -> Result<Vec<AbilityId>, String> {
        if self.rotation.is_empty() {
            return Ok(self.class_id()?.starter_abilities().to_vec());
        }
        self.rotation
            .iter()
            .map(|name| {
                AbilityId::parse(name).ok_or_else(|| format!("Unknown ability: '{}'", name))
            })
            .collect()
    }

    /// Creature placements, falling back to the shipped world
    pub fn creature_spawns(&self) -> Vec<CreatureSpawn> {
        if self.spawns.is_empty() {
            return default_spawns();
        }
        self.spawns
            .iter()
            .enumerate()
            .map(|(i, spawn)| CreatureSpawn {
                name: spawn
                    .name
                    .clone()
                    .unwrap_or_else(|| format!("{}-{}", spawn.template, i + 1)),
                template: spawn.template.clone(),
                position: Vec3::from_array(spawn.position),
                hostile: spawn.hostile,
            })
            .collect()
    }

    pub fn player_start(&self) -> Vec3 {
        self.player_position.map_or(Vec3::ZERO, Vec3::from_array)
    }
}
