//! Actors
//!
//! The health/resource/position model shared by the player and creatures.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Identifier of a spawned creature, unique within a session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CreatureId(pub u32);

impl std::fmt::Display for CreatureId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "creature#{}", self.0)
    }
}

/// Who did something, or had something done to them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActorRef {
    Player,
    Creature(CreatureId),
}

impl std::fmt::Display for ActorRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ActorRef::Player => write!(f, "player"),
            ActorRef::Creature(id) => write!(f, "{}", id),
        }
    }
}

/// Combat-relevant state of a player or creature.
#[derive(Clone, Debug)]
pub struct Actor {
    pub health: f32,
    pub max_health: f32,
    /// Current mana (the single spendable resource)
    pub mana: f32,
    pub max_mana: f32,
    /// Damage every ability multiplier scales from
    pub base_damage: f32,
    pub position: Vec3,
    /// Unit vector the actor faces on the ground plane
    pub facing: Vec3,
    pub alive: bool,
}

impl Actor {
    pub fn new(max_health: f32, max_mana: f32, base_damage: f32, position: Vec3) -> Self {
        Self {
            health: max_health,
            max_health,
            mana: max_mana,
            max_mana,
            base_damage,
            position,
            facing: Vec3::NEG_Z,
            alive: max_health > 0.0,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }

    /// Health as a fraction of max (0.0 to 1.0)
    pub fn health_pct(&self) -> f32 {
        if self.max_health > 0.0 {
            self.health / self.max_health
        } else {
            0.0
        }
    }

    pub fn distance_to(&self, other: &Actor) -> f32 {
        self.position.distance(other.position)
    }

    /// Damage intake. Returns the amount taken, which is 0 for a dead actor.
    ///
    /// Health clamps at zero, and reaching zero is terminal until `revive`.
    pub fn take_damage(&mut self, amount: f32) -> f32 {
        debug_assert!(amount >= 0.0, "take_damage: negative amount {}", amount);
        if !self.alive {
            return 0.0;
        }
        let amount = amount.max(0.0);
        self.health = (self.health - amount).max(0.0);
        if self.health <= 0.0 {
            self.alive = false;
        }
        amount
    }

    /// Restore health up to max. Returns the amount actually restored.
    pub fn heal(&mut self, amount: f32) -> f32 {
        if !self.alive {
            return 0.0;
        }
        let before = self.health;
        self.health = (self.health + amount.max(0.0)).min(self.max_health);
        self.health - before
    }

    pub fn restore_mana(&mut self, amount: f32) {
        self.mana = (self.mana + amount.max(0.0)).min(self.max_mana);
    }

    /// Spend mana if enough is available.
    pub fn spend_mana(&mut self, cost: f32) -> bool {
        if cost > self.mana {
            return false;
        }
        self.mana -= cost;
        true
    }

    /// Explicit revive, the only way out of death.
    pub fn revive(&mut self) {
        self.health = self.max_health;
        self.alive = true;
    }

    /// Step toward `destination` by at most `max_step`, turning to face it.
    /// Returns the remaining distance.
    pub fn step_toward(&mut self, destination: Vec3, max_step: f32) -> f32 {
        let offset = destination - self.position;
        let distance = offset.length();
        if distance <= max_step || distance <= f32::EPSILON {
            self.position = destination;
            return 0.0;
        }
        let direction = offset / distance;
        self.face(direction);
        self.position += direction * max_step;
        distance - max_step
    }

    /// Turn to face a direction, ignoring its vertical component.
    pub fn face(&mut self, direction: Vec3) {
        let flat = Vec3::new(direction.x, 0.0, direction.z).normalize_or_zero();
        if flat != Vec3::ZERO {
            self.facing = flat;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn actor() -> Actor {
        Actor::new(100.0, 50.0, 10.0, Vec3::ZERO)
    }

    #[test]
    fn test_damage_clamps_and_kills() {
        let mut a = actor();
        assert_eq!(a.take_damage(30.0), 30.0);
        assert_eq!(a.health, 70.0);
        a.take_damage(500.0);
        assert_eq!(a.health, 0.0);
        assert!(!a.is_alive());
    }

    #[test]
    fn test_dead_actor_takes_no_damage_and_no_healing() {
        let mut a = actor();
        a.take_damage(100.0);
        assert_eq!(a.take_damage(10.0), 0.0);
        assert_eq!(a.heal(10.0), 0.0);
        assert_eq!(a.health, 0.0);
    }

    #[test]
    fn test_revive_restores_full_health() {
        let mut a = actor();
        a.take_damage(100.0);
        a.revive();
        assert!(a.is_alive());
        assert_eq!(a.health, a.max_health);
    }

    #[test]
    fn test_heal_caps_at_max() {
        let mut a = actor();
        a.take_damage(5.0);
        assert_eq!(a.heal(20.0), 5.0);
        assert_eq!(a.health, 100.0);
    }

    #[test]
    fn test_spend_mana_rejects_overdraw() {
        let mut a = actor();
        assert!(!a.spend_mana(60.0));
        assert_eq!(a.mana, 50.0);
        assert!(a.spend_mana(20.0));
        assert_eq!(a.mana, 30.0);
    }

    #[test]
    fn test_step_toward_snaps_when_close() {
        let mut a = actor();
        let remaining = a.step_toward(Vec3::new(0.5, 0.0, 0.0), 1.0);
        assert_eq!(remaining, 0.0);
        assert_eq!(a.position, Vec3::new(0.5, 0.0, 0.0));

        let remaining = a.step_toward(Vec3::new(10.5, 0.0, 0.0), 2.0);
        assert!((remaining - 8.0).abs() < 1e-4);
        assert_eq!(a.facing, Vec3::X);
    }
}
