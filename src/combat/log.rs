//! Combat logging
//!
//! Records combat events for display and post-encounter analysis.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::events::CombatEvent;
use crate::actor::ActorRef;

/// A single entry in the combat log
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CombatLogEntry {
    /// Timestamp in session time (seconds since the session started)
    pub timestamp: f32,
    /// The type of event
    pub event_type: CombatLogEventType,
    /// Human-readable description of the event
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ability: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<f32>,
}

/// Types of combat log events for filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CombatLogEventType {
    /// Damage dealt
    Damage,
    /// Healing done
    Healing,
    /// Ability used or cast started
    AbilityUsed,
    /// Actor died
    Death,
    /// Loot generated or taken
    Loot,
    /// Creature leashed home
    Reset,
    /// Experience gained
    Progression,
    /// Encounter event (start, end, etc.)
    MatchEvent,
}

/// Header written alongside the entries when the log is saved
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncounterMetadata {
    pub class_name: String,
    pub duration_secs: f32,
    pub creatures_killed: usize,
    pub player_survived: bool,
    pub random_seed: Option<u64>,
}

#[derive(Serialize)]
struct SavedLog<'a> {
    metadata: &'a EncounterMetadata,
    entries: &'a [CombatLogEntry],
}

/// The combat log resource storing all events
#[derive(Resource, Default)]
pub struct CombatLog {
    /// All log entries in chronological order
    pub entries: Vec<CombatLogEntry>,
    /// Current session time
    pub match_time: f32,
}

impl CombatLog {
    /// Clear the log for a new encounter
    pub fn clear(&mut self) {
        self.entries.clear();
        self.match_time = 0.0;
    }

    /// Add a plain entry to the log
    pub fn log(&mut self, event_type: CombatLogEventType, message: String) {
        self.entries.push(CombatLogEntry {
            timestamp: self.match_time,
            event_type,
            message,
            source: None,
            target: None,
            ability: None,
            amount: None,
        });
    }

    /// Translate a combat event into a log entry.
    ///
    /// Returns false for events that aren't worth logging (cast bar ticks,
    /// cosmetic projectiles).
    pub fn record(&mut self, event: &CombatEvent, now: f32) -> bool {
        self.match_time = self.match_time.max(now);
        let mut entry = CombatLogEntry {
            timestamp: now,
            event_type: CombatLogEventType::MatchEvent,
            message: String::new(),
            source: None,
            target: None,
            ability: None,
            amount: None,
        };

        match event {
            CombatEvent::DamageApplied {
                source,
                target,
                ability,
                amount,
                critical,
                ..
            } => {
                let ability_name = ability.map_or("Melee".to_string(), |a| a.to_string());
                entry.event_type = CombatLogEventType::Damage;
                entry.message = format!(
                    "{}'s {} hits {} for {:.0}{}",
                    source,
                    ability_name,
                    target,
                    amount,
                    if *critical { " (critical)" } else { "" }
                );
                entry.source = Some(source.to_string());
                entry.target = Some(target.to_string());
                entry.ability = Some(ability_name);
                entry.amount = Some(*amount);
            }
            CombatEvent::Healed {
                source,
                target,
                ability,
                amount,
            } => {
                entry.event_type = CombatLogEventType::Healing;
                entry.message = format!("{} heals {} for {:.0}", source, target, amount);
                entry.source = Some(source.to_string());
                entry.target = Some(target.to_string());
                entry.ability = ability.map(|a| a.to_string());
                entry.amount = Some(*amount);
            }
            CombatEvent::CastStarted {
                caster, ability, ..
            } => {
                entry.event_type = CombatLogEventType::AbilityUsed;
                entry.message = format!("{} begins casting {}", caster, ability);
                entry.source = Some(caster.to_string());
                entry.ability = Some(ability.to_string());
            }
            CombatEvent::CastCompleted {
                caster,
                ability,
                target,
                ..
            } => {
                entry.event_type = CombatLogEventType::AbilityUsed;
                entry.message = format!("{} uses {}", caster, ability);
                entry.source = Some(caster.to_string());
                entry.target = Some(target.to_string());
                entry.ability = Some(ability.to_string());
            }
            CombatEvent::Died { victim, killer } => {
                entry.event_type = CombatLogEventType::Death;
                entry.message = match killer {
                    Some(killer) => format!("{} was slain by {}", victim, killer),
                    None => format!("{} died", victim),
                };
                entry.source = killer.map(|k| k.to_string());
                entry.target = Some(victim.to_string());
            }
            CombatEvent::LootGenerated { creature, drops } => {
                let drops: Vec<String> = drops.iter().map(|d| d.to_string()).collect();
                entry.event_type = CombatLogEventType::Loot;
                entry.message = format!("{} dropped [{}]", creature, drops.join(", "));
                entry.target = Some(creature.to_string());
            }
            CombatEvent::LootTaken { creature, drop } => {
                entry.event_type = CombatLogEventType::Loot;
                entry.message = format!("Looted {} from {}", drop, creature);
                entry.target = Some(creature.to_string());
            }
            CombatEvent::CreatureReset { creature } => {
                entry.event_type = CombatLogEventType::Reset;
                entry.message = format!("{} returned to its spawn", creature);
                entry.target = Some(creature.to_string());
            }
            CombatEvent::ExperienceGained { amount, total } => {
                entry.event_type = CombatLogEventType::Progression;
                entry.message = format!("Gained {} experience ({} total)", amount, total);
                entry.amount = Some(*amount as f32);
            }
            CombatEvent::TalentLearned { talent } => {
                entry.event_type = CombatLogEventType::Progression;
                entry.message = format!("Learned {}", talent.definition().name);
                entry.source = Some(ActorRef::Player.to_string());
            }
            CombatEvent::CastProgressed { .. } | CombatEvent::ProjectileLaunched { .. } => {
                return false;
            }
        }

        self.entries.push(entry);
        true
    }

    /// Get entries filtered by event type
    pub fn filter_by_type(&self, event_type: CombatLogEventType) -> Vec<&CombatLogEntry> {
        self.entries
            .iter()
            .filter(|e| e.event_type == event_type)
            .collect()
    }

    /// Get only HP-changing events (damage and healing)
    pub fn hp_changes_only(&self) -> Vec<&CombatLogEntry> {
        self.entries
            .iter()
            .filter(|e| {
                matches!(
                    e.event_type,
                    CombatLogEventType::Damage | CombatLogEventType::Healing
                )
            })
            .collect()
    }

    /// Get the last N entries
    pub fn recent(&self, count: usize) -> Vec<&CombatLogEntry> {
        self.entries.iter().rev().take(count).rev().collect()
    }

    /// Total damage per ability dealt by `source`
    pub fn damage_by_ability(&self, source: &str) -> HashMap<String, f32> {
        let mut totals = HashMap::new();
        for entry in self.filter_by_type(CombatLogEventType::Damage) {
            if entry.source.as_deref() != Some(source) {
                continue;
            }
            if let (Some(ability), Some(amount)) = (&entry.ability, entry.amount) {
                *totals.entry(ability.clone()).or_insert(0.0) += amount;
            }
        }
        totals
    }

    pub fn total_damage_dealt(&self, source: &str) -> f32 {
        self.damage_by_ability(source).values().sum()
    }

    pub fn total_damage_taken(&self, target: &str) -> f32 {
        self.filter_by_type(CombatLogEventType::Damage)
            .iter()
            .filter(|e| e.target.as_deref() == Some(target))
            .filter_map(|e| e.amount)
            .sum()
    }

    /// Number of deaths credited to `killer`
    pub fn killing_blows(&self, killer: &str) -> usize {
        self.filter_by_type(CombatLogEventType::Death)
            .iter()
            .filter(|e| e.source.as_deref() == Some(killer))
            .count()
    }

    /// Write the log as JSON. Without a path a timestamped file name is used.
    /// Returns the file name written.
    pub fn save_to_file(
        &self,
        metadata: &EncounterMetadata,
        path: Option<&str>,
    ) -> Result<String, String> {
        let filename = match path {
            Some(path) => path.to_string(),
            None => {
                let secs = std::time::SystemTime::now()
                    .duration_since(std::time::UNIX_EPOCH)
                    .map(|d| d.as_secs())
                    .unwrap_or(0);
                format!("combat_log_{}.json", secs)
            }
        };

        let json = serde_json::to_string_pretty(&SavedLog {
            metadata,
            entries: &self.entries,
        })
        .map_err(|e| format!("Failed to serialize combat log: {}", e))?;

        std::fs::write(&filename, json)
            .map_err(|e| format!("Failed to write {}: {}", filename, e))?;

        Ok(filename)
    }
}
