//! Integration tests for headless encounter execution
//!
//! These tests verify that:
//! - Headless encounters run to completion
//! - Encounter results are accessible programmatically
//! - Seeded RNG produces deterministic results
//! - Configured talents are learned before the fight

use emberfall::headless::{
    simulate_encounter, EncounterOutcome, HeadlessEncounterConfig, SpawnConfig,
};

/// Helper to create an encounter config
fn create_config(class: &str, spawns: Vec<SpawnConfig>, seed: Option<u64>) -> HeadlessEncounterConfig {
    HeadlessEncounterConfig {
        class: class.to_string(),
        spawns,
        rotation: vec![],
        talents: vec![],
        player_position: None,
        output_path: None,
        max_duration_secs: 60.0, // Short duration for tests
        random_seed: seed,
    }
}

fn spawn(template: &str, position: [f32; 3], hostile: bool) -> SpawnConfig {
    SpawnConfig {
        template: template.to_string(),
        position,
        hostile,
        name: None,
    }
}

#[test]
fn test_rogue_kills_and_loots_a_zombie() {
    let config = create_config("Rogue", vec![spawn("zombie", [0.0, 0.0, -12.0], true)], Some(42));
    let (result, log) = simulate_encounter(&config).unwrap();

    assert_eq!(result.outcome, EncounterOutcome::Victory);
    assert_eq!(result.creatures_killed, 1);
    assert_eq!(result.experience, 35);
    assert!(result.gold > 10, "starting purse plus zombie gold");
    assert!(result.player_final_health > 0.0);
    assert_eq!(result.random_seed, Some(42));
    assert_eq!(log.killing_blows("player"), 1);
}

#[test]
fn test_same_seed_same_encounter() {
    let config = create_config("Rogue", vec![spawn("zombie", [0.0, 0.0, -12.0], true)], Some(12345));

    let (first, first_log) = simulate_encounter(&config).unwrap();
    let (second, second_log) = simulate_encounter(&config).unwrap();

    assert_eq!(first.outcome, second.outcome);
    assert_eq!(first.duration_secs, second.duration_secs);
    assert_eq!(first.gold, second.gold);
    assert_eq!(first.inventory, second.inventory);
    assert_eq!(first.player_final_health, second.player_final_health);
    assert_eq!(first_log.entries.len(), second_log.entries.len());
}

#[test]
fn test_friendly_only_world_is_an_instant_victory() {
    let config = create_config(
        "Mage",
        vec![spawn("villager_woman", [2.0, 0.0, 2.0], false)],
        Some(1),
    );
    let (result, _) = simulate_encounter(&config).unwrap();
    assert_eq!(result.outcome, EncounterOutcome::Victory);
    assert_eq!(result.creatures_killed, 0);
}

#[test]
fn test_unreachable_creature_times_out() {
    let mut config = create_config("Warrior", vec![spawn("zombie", [0.0, 0.0, -500.0], true)], Some(9));
    config.max_duration_secs = 2.0;
    let (result, log) = simulate_encounter(&config).unwrap();

    assert_eq!(result.outcome, EncounterOutcome::Timeout);
    assert!(result.duration_secs >= 2.0);
    assert_eq!(result.player_final_health, result.player_max_health);
    assert!(log.filter_by_type(emberfall::CombatLogEventType::Damage).is_empty());
}

#[test]
fn test_config_from_json() {
    let json = r#"{
        "class": "Mage",
        "rotation": ["firebolt", "arcane_bolt"],
        "spawns": [{ "template": "zombie", "position": [0, 0, -12] }],
        "random_seed": 42
    }"#;
    let config = HeadlessEncounterConfig::from_json(json).unwrap();
    assert_eq!(config.class_id().unwrap(), emberfall::ClassId::Mage);
    assert_eq!(config.rotation_abilities().unwrap().len(), 2);
    assert_eq!(config.max_duration_secs, 120.0);
    assert_eq!(config.random_seed, Some(42));
}

#[test]
fn test_unknown_class_is_rejected() {
    let err = HeadlessEncounterConfig::from_json(r#"{ "class": "Paladin" }"#).unwrap_err();
    assert!(err.contains("Paladin"), "{}", err);
}

#[test]
fn test_configured_talent_is_learned() {
    let mut config = create_config("Warrior", vec![spawn("zombie", [0.0, 0.0, -12.0], false)], Some(5));
    config.talents = vec![emberfall::TalentId::WarriorToughness];
    let (result, _) = simulate_encounter(&config).unwrap();

    assert_eq!(result.outcome, EncounterOutcome::Victory);
    assert_eq!(result.player_max_health, 155.0);
    assert_eq!(result.player_final_health, 155.0);
}
