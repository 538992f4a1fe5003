//! Integration tests for the shipped ability catalog
//!
//! These tests verify that:
//! - The RON catalog loads and agrees with the builtin one
//! - Every class has a usable starter bar
//! - Cast-time and self-targeted abilities are described correctly

use std::path::Path;

use emberfall::abilities::{load_ability_catalog, AbilityCatalog, AbilityId, ABILITIES_PATH};
use emberfall::ClassId;

#[test]
fn test_shipped_catalog_matches_builtin() {
    let loaded = load_ability_catalog(Path::new(ABILITIES_PATH)).expect("catalog should load");
    let builtin = AbilityCatalog::builtin();

    assert_eq!(loaded.len(), builtin.len());
    for id in AbilityId::ALL {
        let a = loaded.get(&id).expect("ability in file");
        let b = builtin.get(&id).expect("ability in builtin");
        assert_eq!(a.cost, b.cost, "{} cost", id);
        assert_eq!(a.cooldown, b.cooldown, "{} cooldown", id);
        assert_eq!(a.range, b.range, "{} range", id);
        assert_eq!(a.cast_time, b.cast_time, "{} cast time", id);
    }
}

#[test]
fn test_every_class_can_use_its_starter_bar() {
    let catalog = AbilityCatalog::builtin();
    for class in ClassId::ALL {
        let starters = class.starter_abilities();
        assert!(!starters.is_empty());
        for ability in starters {
            let def = catalog.get(ability).unwrap();
            assert!(def.usable_by(class), "{} can't use {}", class.name(), ability);
        }
        assert_eq!(catalog.abilities_for_class(class).len(), starters.len());
    }
}

#[test]
fn test_firebolt_is_the_only_timed_cast() {
    let catalog = AbilityCatalog::builtin();
    let timed: Vec<AbilityId> = catalog
        .iter()
        .filter(|def| def.timed_cast().is_some())
        .map(|def| def.id)
        .collect();
    assert_eq!(timed, vec![AbilityId::Firebolt]);
    assert_eq!(catalog.get(&AbilityId::Firebolt).unwrap().timed_cast(), Some(1.5));
}

#[test]
fn test_shield_block_targets_self() {
    let catalog = AbilityCatalog::builtin();
    let shield_block = catalog.get(&AbilityId::ShieldBlock).unwrap();
    assert!(shield_block.targets_self());
    assert!(!shield_block.is_damage());
    assert!(catalog.get(&AbilityId::Charge).unwrap().is_damage());
}

#[test]
fn test_ability_ids_parse_back() {
    for id in AbilityId::ALL {
        assert_eq!(AbilityId::parse(id.as_str()), Some(id));
    }
    assert_eq!(AbilityId::parse("fireball"), None);
}
