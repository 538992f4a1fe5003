//! Flat player record for save/load.
//!
//! The combat core never decides when to persist; callers snapshot and
//! restore on demand. Cooldowns are stored as ages so they carry over to a
//! new session clock.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::abilities::{AbilityCatalog, AbilityId};
use crate::classes::ClassId;
use crate::combat::CooldownSnapshot;
use crate::constants::SLOT_COUNT;
use crate::session::{CombatSession, PlayerCharacter};
use crate::talents::{self, TalentId};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlayerRecord {
    pub name: String,
    pub class: ClassId,
    pub health: f32,
    pub max_health: f32,
    pub mana: f32,
    pub max_mana: f32,
    pub position: Vec3,
    pub slots: Vec<Option<AbilityId>>,
    #[serde(default)]
    pub cooldowns: CooldownSnapshot,
    pub gold: u32,
    #[serde(default)]
    pub inventory: Vec<String>,
    #[serde(default)]
    pub equipment: BTreeMap<String, String>,
    #[serde(default)]
    pub experience: u32,
    #[serde(default)]
    pub talents: Vec<TalentId>,
}

impl PlayerRecord {
    pub fn snapshot(player: &PlayerCharacter, now: f32) -> Self {
        Self {
            name: player.name.clone(),
            class: player.class,
            health: player.actor.health,
            max_health: player.actor.max_health,
            mana: player.actor.mana,
            max_mana: player.actor.max_mana,
            position: player.actor.position,
            slots: player.slots.to_vec(),
            cooldowns: player.cooldowns.snapshot(now),
            gold: player.gold,
            inventory: player.inventory.clone(),
            equipment: player.equipment.clone(),
            experience: player.experience,
            talents: player.talents.iter().copied().collect(),
        }
    }

    /// Overwrite `player` with this record. Base damage is rebuilt from the
    /// record's class and talents. Extra slots beyond the action bar, and
    /// abilities the class can't use, are dropped.
    pub fn apply_to(&self, player: &mut PlayerCharacter, catalog: &AbilityCatalog, now: f32) {
        player.name = self.name.clone();
        player.class = self.class;
        player.talents = self
            .talents
            .iter()
            .copied()
            .filter(|t| t.definition().class == self.class)
            .collect();
        player.actor.base_damage = talents::attack_damage_with(self.class, &player.talents);
        player.actor.max_health = self.max_health.max(0.0);
        player.actor.health = self.health.clamp(0.0, player.actor.max_health);
        player.actor.alive = player.actor.health > 0.0;
        player.actor.max_mana = self.max_mana.max(0.0);
        player.actor.mana = self.mana.clamp(0.0, player.actor.max_mana);
        player.actor.position = self.position;

        player.slots = [None; SLOT_COUNT];
        for (slot, ability) in player.slots.iter_mut().zip(&self.slots) {
            *slot = ability.filter(|id| {
                let usable = catalog.get(id).is_some_and(|def| def.usable_by(self.class));
                if !usable {
                    warn!("Dropping {} from {}'s action bar", id, self.name);
                }
                usable
            });
        }
        player.cooldowns.restore(&self.cooldowns, now);
        player.cast = None;
        player.gold = self.gold;
        player.inventory = self.inventory.clone();
        player.equipment = self.equipment.clone();
        player.experience = self.experience;
    }

    pub fn to_json(&self) -> Result<String, String> {
        serde_json::to_string_pretty(self).map_err(|e| format!("Failed to serialize player: {}", e))
    }

    pub fn from_json(json: &str) -> Result<Self, String> {
        serde_json::from_str(json).map_err(|e| format!("Failed to parse player record: {}", e))
    }

    pub fn save(&self, path: &Path) -> Result<(), String> {
        let json = self.to_json()?;
        std::fs::write(path, json).map_err(|e| format!("Failed to write {}: {}", path.display(), e))?;
        info!("Saved {} to {}", self.name, path.display());
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self, String> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;
        Self::from_json(&contents)
    }
}

impl CombatSession {
    pub fn snapshot_player(&self) -> PlayerRecord {
        PlayerRecord::snapshot(self.player(), self.now())
    }

    pub fn restore_player(&mut self, record: &PlayerRecord) {
        let now = self.now();
        let (player, catalog) = self.player_with_catalog();
        record.apply_to(player, catalog, now);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::GameRng;

    #[test]
    fn test_restore_clamps_health() {
        let mut session = CombatSession::new(ClassId::Rogue, GameRng::from_seed(1));
        let mut record = session.snapshot_player();
        record.health = 500.0;
        session.restore_player(&record);
        assert_eq!(session.player().actor.health, 110.0);

        record.health = 0.0;
        session.restore_player(&record);
        assert!(!session.player().actor.is_alive());
    }

    #[test]
    fn test_json_keeps_loadout() {
        let session = CombatSession::new(ClassId::Warrior, GameRng::from_seed(1));
        let json = session.snapshot_player().to_json().unwrap();
        assert!(json.contains("\"class\": \"warrior\""));
        assert!(json.contains("\"heroic_strike\""));
        let record = PlayerRecord::from_json(&json).unwrap();
        assert_eq!(record.equipment.get("offhand").map(String::as_str), Some("training_shield"));
    }

    #[test]
    fn test_restore_other_class_takes_its_damage() {
        let mage = CombatSession::new(ClassId::Mage, GameRng::from_seed(1));
        let mut record = mage.snapshot_player();
        record.slots[1] = Some(AbilityId::HeroicStrike);

        let mut session = CombatSession::new(ClassId::Warrior, GameRng::from_seed(1));
        assert_eq!(session.player().actor.base_damage, 22.0);
        session.restore_player(&record);

        let player = session.player();
        assert_eq!(player.class, ClassId::Mage);
        assert_eq!(player.actor.base_damage, 15.0);
        assert_eq!(player.slots[0], Some(AbilityId::ArcaneBolt));
        // Warrior-only ability doesn't survive on a mage bar
        assert_eq!(player.slots[1], None);
    }

    #[test]
    fn test_talents_survive_restore() {
        let mut session = CombatSession::new(ClassId::Mage, GameRng::from_seed(1));
        session.learn_talent(TalentId::ArcaneFocus).unwrap();
        let json = session.snapshot_player().to_json().unwrap();
        assert!(json.contains("\"arcane_focus\""));

        let record = PlayerRecord::from_json(&json).unwrap();
        let mut restored = CombatSession::new(ClassId::Rogue, GameRng::from_seed(2));
        restored.restore_player(&record);
        assert!(restored.player().talents.contains(&TalentId::ArcaneFocus));
        assert_eq!(restored.player().actor.base_damage, 17.0);
        assert_eq!(
            restored.learn_talent(TalentId::ArcaneFocus),
            Err(talents::TalentRejection::AlreadyLearned(TalentId::ArcaneFocus))
        );
    }
}
