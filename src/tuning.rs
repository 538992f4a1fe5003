//! Combat tuning
//!
//! Balance knobs for the combat core, loaded from `assets/config/tuning.ron`.
//! Every field falls back to the value in `constants` when omitted, and a
//! missing or broken file falls back to the defaults entirely.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::constants::*;

/// Default location of the tuning file
pub const TUNING_PATH: &str = "assets/config/tuning.ron";

/// Tunable combat parameters.
#[derive(Resource, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CombatTuning {
    /// Shared throttle between any two ability activations
    pub global_cooldown: f32,

    // === Player ===
    pub player_attack_range: f32,
    pub player_attack_cooldown: f32,
    pub player_move_speed: f32,

    // === Creatures ===
    pub leash_radius: f32,
    pub creature_melee_range: f32,
    pub creature_melee_cooldown: f32,
    pub leash_speed_multiplier: f32,
    pub spawn_epsilon: f32,
    pub zigzag_frequency: f32,
    pub zigzag_amplitude: f32,

    // === Regeneration ===
    pub out_of_combat_delay: f32,
    pub health_regen_interval: f32,
    pub health_regen_fraction: f32,
    pub mana_regen_out_of_combat: f32,
    pub mana_regen_in_combat: f32,
}

impl Default for CombatTuning {
    fn default() -> Self {
        Self {
            global_cooldown: GLOBAL_COOLDOWN,
            player_attack_range: PLAYER_ATTACK_RANGE,
            player_attack_cooldown: PLAYER_ATTACK_COOLDOWN,
            player_move_speed: PLAYER_MOVE_SPEED,
            leash_radius: LEASH_RADIUS,
            creature_melee_range: CREATURE_MELEE_RANGE,
            creature_melee_cooldown: CREATURE_MELEE_COOLDOWN,
            leash_speed_multiplier: LEASH_SPEED_MULTIPLIER,
            spawn_epsilon: SPAWN_EPSILON,
            zigzag_frequency: ZIGZAG_FREQUENCY,
            zigzag_amplitude: ZIGZAG_AMPLITUDE,
            out_of_combat_delay: OUT_OF_COMBAT_DELAY,
            health_regen_interval: HEALTH_REGEN_INTERVAL,
            health_regen_fraction: HEALTH_REGEN_FRACTION,
            mana_regen_out_of_combat: MANA_REGEN_OUT_OF_COMBAT,
            mana_regen_in_combat: MANA_REGEN_IN_COMBAT,
        }
    }
}

impl CombatTuning {
    /// Parse tuning from a RON string
    pub fn from_ron_str(contents: &str) -> Result<Self, String> {
        ron::from_str(contents).map_err(|e| format!("Failed to parse tuning: {}", e))
    }

    /// Load tuning from a file, or return defaults if it can't be used
    pub fn load(path: &Path) -> Self {
        if !path.exists() {
            info!("No tuning file at {:?}, using defaults", path);
            return Self::default();
        }
        match fs::read_to_string(path) {
            Ok(contents) => match Self::from_ron_str(&contents) {
                Ok(tuning) => {
                    info!("Loaded combat tuning from {:?}", path);
                    tuning
                }
                Err(e) => {
                    warn!("{} ({:?})", e, path);
                    Self::default()
                }
            },
            Err(e) => {
                warn!("Failed to read tuning file {:?}: {}", path, e);
                Self::default()
            }
        }
    }
}
