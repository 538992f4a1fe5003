//! Combat Constants
//!
//! Default values for the tunable combat parameters. `CombatTuning` starts from
//! these and can be overridden by `assets/config/tuning.ron`.

// ============================================================================
// Cooldowns
// ============================================================================

/// Shared global cooldown between any two ability activations (650 ms)
pub const GLOBAL_COOLDOWN: f32 = 0.65;

/// Number of ability slots on the action bar
pub const SLOT_COUNT: usize = 12;

// ============================================================================
// Player
// ============================================================================

/// Reach of the legacy melee swing (the click auto-attack)
pub const PLAYER_ATTACK_RANGE: f32 = 3.0;

/// Minimum time between two melee swings
pub const PLAYER_ATTACK_COOLDOWN: f32 = 0.8;

/// Player run speed in units per second
pub const PLAYER_MOVE_SPEED: f32 = 6.0;

// ============================================================================
// Creatures
// ============================================================================

/// Distance to the player inside which a hostile creature keeps pursuing
pub const LEASH_RADIUS: f32 = 8.0;

/// Creature melee reach
pub const CREATURE_MELEE_RANGE: f32 = 1.5;

/// Time between two creature melee hits
pub const CREATURE_MELEE_COOLDOWN: f32 = 1.0;

/// Damage used when a template doesn't define one
pub const DEFAULT_CREATURE_DAMAGE: f32 = 5.0;

/// Movement multiplier applied while running back to spawn
pub const LEASH_SPEED_MULTIPLIER: f32 = 2.0;

/// Distance from spawn at which a returning creature snaps home and resets
pub const SPAWN_EPSILON: f32 = 0.05;

/// Angular frequency of the pursuit zig-zag (radians per second)
pub const ZIGZAG_FREQUENCY: f32 = 5.0;

/// Lateral weight of the pursuit zig-zag
pub const ZIGZAG_AMPLITUDE: f32 = 0.1;

// ============================================================================
// Regeneration
// ============================================================================

/// Seconds without combat activity before the player counts as out of combat
pub const OUT_OF_COMBAT_DELAY: f32 = 5.0;

/// Interval between out-of-combat health ticks
pub const HEALTH_REGEN_INTERVAL: f32 = 3.0;

/// Fraction of max health restored per out-of-combat tick
pub const HEALTH_REGEN_FRACTION: f32 = 0.03;

/// Fraction of max mana restored per second out of combat
pub const MANA_REGEN_OUT_OF_COMBAT: f32 = 0.10;

/// Fraction of max mana restored per second in combat
pub const MANA_REGEN_IN_COMBAT: f32 = 0.02;

// ============================================================================
// Loot
// ============================================================================

/// Lower bound of the base gold roll
pub const GOLD_ROLL_MIN: f32 = 5.0;

/// Upper bound (exclusive) of the base gold roll
pub const GOLD_ROLL_MAX: f32 = 15.0;

/// Gold granted when a table roll somehow yields nothing
pub const MINIMUM_GOLD_DROP: u32 = 1;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_constants_are_positive() {
        assert!(PLAYER_ATTACK_RANGE > 0.0);
        assert!(CREATURE_MELEE_RANGE > 0.0);
        assert!(LEASH_RADIUS > CREATURE_MELEE_RANGE);
    }

    #[test]
    fn test_regen_fractions_are_valid() {
        assert!(HEALTH_REGEN_FRACTION > 0.0 && HEALTH_REGEN_FRACTION <= 1.0);
        assert!(MANA_REGEN_IN_COMBAT < MANA_REGEN_OUT_OF_COMBAT);
    }

    #[test]
    fn test_gcd_is_650ms() {
        assert_eq!(GLOBAL_COOLDOWN, 0.65);
    }
}
