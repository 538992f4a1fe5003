//! Loot Table Resolver
//!
//! Turns a creature template's loot table into the concrete list of drops
//! attached to its corpse. Gold travels in the same list as items, encoded as
//! the sentinel `gold:<amount>`.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::constants::{GOLD_ROLL_MAX, GOLD_ROLL_MIN, MINIMUM_GOLD_DROP};
use crate::items::ItemCatalog;
use crate::rng::GameRng;

/// One row of a loot table.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LootEntry {
    pub item_id: String,
    /// Drop chance in [0, 1]
    pub chance: f32,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
}

fn default_quantity() -> u32 {
    1
}

fn default_gold_multiplier() -> f32 {
    1.0
}

/// Per-template drop table. Never mutated at runtime.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LootTable {
    #[serde(default = "default_gold_multiplier")]
    pub gold_multiplier: f32,
    #[serde(default)]
    pub entries: Vec<LootEntry>,
}

impl LootTable {
    pub fn new(gold_multiplier: f32) -> Self {
        Self {
            gold_multiplier,
            entries: Vec::new(),
        }
    }

    /// Builder-style entry with quantity 1
    pub fn with_entry(mut self, item_id: &str, chance: f32) -> Self {
        self.entries.push(LootEntry {
            item_id: item_id.to_string(),
            chance,
            quantity: 1,
        });
        self
    }
}

/// A single resolved drop on a corpse.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum LootDrop {
    Item(String),
    Gold(u32),
}

impl LootDrop {
    /// Parse a wire entry. Accepts `gold:<n>` and the legacy `gold_<n>`;
    /// anything else is an item id.
    pub fn parse(entry: &str) -> LootDrop {
        let amount = entry
            .strip_prefix("gold:")
            .or_else(|| entry.strip_prefix("gold_"))
            .and_then(|n| n.parse::<u32>().ok());
        match amount {
            Some(amount) => LootDrop::Gold(amount),
            None => LootDrop::Item(entry.to_string()),
        }
    }

    pub fn is_gold(&self) -> bool {
        matches!(self, LootDrop::Gold(_))
    }
}

impl fmt::Display for LootDrop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LootDrop::Item(id) => f.write_str(id),
            LootDrop::Gold(amount) => write!(f, "gold:{}", amount),
        }
    }
}

/// Resolve a corpse's drops.
///
/// With a table, gold is always present and every entry rolls independently.
/// Without one, 1-3 random catalog items drop alongside 5-14 gold.
pub fn resolve_loot(
    table: Option<&LootTable>,
    items: &ItemCatalog,
    rng: &mut GameRng,
) -> Vec<LootDrop> {
    let Some(table) = table else {
        return resolve_fallback(items, rng);
    };

    let mut drops = Vec::new();

    let gold = (rng.random_range(GOLD_ROLL_MIN, GOLD_ROLL_MAX) * table.gold_multiplier).round();
    drops.push(LootDrop::Gold((gold as u32).max(MINIMUM_GOLD_DROP)));

    for entry in &table.entries {
        if rng.random_f32() < entry.chance {
            for _ in 0..entry.quantity {
                drops.push(LootDrop::Item(entry.item_id.clone()));
            }
        }
    }

    drops
}

fn resolve_fallback(items: &ItemCatalog, rng: &mut GameRng) -> Vec<LootDrop> {
    let mut drops = Vec::new();
    if !items.is_empty() {
        let count = rng.random_inclusive(1, 3);
        for _ in 0..count {
            let item = &items.all()[rng.random_index(items.len())];
            drops.push(LootDrop::Item(item.id.clone()));
        }
    }
    let gold = rng.random_range(GOLD_ROLL_MIN, GOLD_ROLL_MAX).floor() as u32;
    drops.push(LootDrop::Gold(gold));
    drops
}
