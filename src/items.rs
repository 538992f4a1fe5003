//! Item catalog
//!
//! The registry loot is drawn from. Item use and equipping belong to the
//! inventory layer; the combat core only hands out identifiers.

use serde::{Deserialize, Serialize};

use crate::classes::ClassId;

#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rarity {
    Common,
    Rare,
    Epic,
    Legendary,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ItemDefinition {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Equipment slot, None for consumables
    #[serde(default)]
    pub slot: Option<String>,
    #[serde(default)]
    pub class_tags: Vec<ClassId>,
    pub rarity: Rarity,
}

/// All known items, in registry order.
#[derive(Clone, Debug)]
pub struct ItemCatalog {
    items: Vec<ItemDefinition>,
}

impl Default for ItemCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl ItemCatalog {
    pub fn new(items: Vec<ItemDefinition>) -> Self {
        Self { items }
    }

    pub fn builtin() -> Self {
        let item = |id: &str, name: &str, description: &str, slot: Option<&str>, class_tags: Vec<ClassId>, rarity| {
            ItemDefinition {
                id: id.to_string(),
                name: name.to_string(),
                description: description.to_string(),
                slot: slot.map(str::to_string),
                class_tags,
                rarity,
            }
        };
        Self::new(vec![
            item("rusty_sword", "Rusty Sword", "A dull blade, but better than fists.", Some("weapon"), vec![ClassId::Warrior, ClassId::Rogue], Rarity::Common),
            item("cloth_gloves", "Cloth Gloves", "Simple cloth gloves.", Some("hands"), vec![ClassId::Mage], Rarity::Common),
            item("training_shield", "Training Shield", "A wooden shield for recruits.", Some("offhand"), vec![ClassId::Warrior], Rarity::Rare),
            item("rogue_daggers", "Pair of Daggers", "Quick blades for rogues.", Some("weapon"), vec![ClassId::Rogue], Rarity::Rare),
            item("apprentice_staff", "Apprentice's Staff", "Basic focus for a mage.", Some("weapon"), vec![ClassId::Mage], Rarity::Rare),
            item("minor_health_potion", "Minor Health Potion", "Restores a bit of health.", None, vec![], Rarity::Common),
        ])
    }

    pub fn get(&self, id: &str) -> Option<&ItemDefinition> {
        self.items.iter().find(|item| item.id == id)
    }

    pub fn all(&self) -> &[ItemDefinition] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
