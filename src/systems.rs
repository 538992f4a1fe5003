//! Bevy integration
//!
//! Wires a `CombatSession` resource into an app. Each frame runs three
//! chained phases:
//!
//! 1. `Simulation` advances the session clock (casts, creature AI, deaths, regen)
//! 2. `Intents` applies the player's `PlayerIntent` events
//! 3. `Publish` drains session events into `CombatEvent` events and the log
//!
//! ## Usage
//! ```ignore
//! app.add_plugins(CombatCorePlugin)
//!     .insert_resource(CombatSession::new(ClassId::Mage, GameRng::from_seed(7)));
//! ```

use bevy::prelude::*;

use crate::actor::CreatureId;
use crate::combat::events::CombatEvent;
use crate::combat::log::CombatLog;
use crate::session::CombatSession;
use crate::talents::TalentId;

/// Discrete input from the player. The core has no knowledge of devices.
#[derive(Event, Clone, Debug, PartialEq)]
pub enum PlayerIntent {
    CastSlot(usize),
    SetTarget(CreatureId),
    ClearTarget,
    AutoAttack,
    /// Walk in a direction for this frame
    Move(Vec3),
    Face(Vec3),
    TakeLoot { creature: CreatureId, index: usize },
    TakeAllLoot(CreatureId),
    LearnTalent(TalentId),
}

impl PlayerIntent {
    /// Apply the intent to a session. `dt` is the frame time used for movement.
    pub fn apply(&self, session: &mut CombatSession, dt: f32) {
        match self {
            PlayerIntent::CastSlot(slot) => {
                // Rejections are kept on the session for the UI
                let _ = session.attempt_cast(*slot);
            }
            PlayerIntent::SetTarget(id) => {
                if !session.set_target(*id) {
                    debug!("Can't target {}", id);
                }
            }
            PlayerIntent::ClearTarget => session.clear_target(),
            PlayerIntent::AutoAttack => {
                session.auto_attack();
            }
            PlayerIntent::Move(direction) => session.move_player(*direction, dt),
            PlayerIntent::Face(direction) => session.face_player(*direction),
            PlayerIntent::TakeLoot { creature, index } => {
                session.take_loot(*creature, *index);
            }
            PlayerIntent::TakeAllLoot(creature) => {
                session.take_all_loot(*creature);
            }
            PlayerIntent::LearnTalent(talent) => {
                if let Err(rejection) = session.learn_talent(*talent) {
                    debug!("{}", rejection);
                }
            }
        }
    }
}

/// System sets for ordering combat within a frame
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum CombatSystemPhase {
    /// Casts, creature AI, death settlement, regeneration
    Simulation,
    /// Player input for this frame
    Intents,
    /// Event fan-out and logging
    Publish,
}

/// Configures the ordering between combat system phases.
pub fn configure_combat_system_ordering(app: &mut App) {
    app.configure_sets(
        Update,
        (
            CombatSystemPhase::Simulation,
            CombatSystemPhase::Intents,
            CombatSystemPhase::Publish,
        )
            .chain(),
    );
}

/// Adds the combat systems to the app, gated by `run_condition`.
///
/// # Example
/// ```ignore
/// add_core_combat_systems(&mut app, resource_exists::<CombatSession>);
/// ```
pub fn add_core_combat_systems<M>(app: &mut App, run_condition: impl Condition<M> + Clone)
where
    M: 'static,
{
    app.add_systems(
        Update,
        advance_session
            .in_set(CombatSystemPhase::Simulation)
            .run_if(run_condition.clone()),
    );
    app.add_systems(
        Update,
        apply_player_intents
            .in_set(CombatSystemPhase::Intents)
            .run_if(run_condition.clone()),
    );
    app.add_systems(
        Update,
        publish_combat_events
            .in_set(CombatSystemPhase::Publish)
            .run_if(run_condition),
    );
}

/// Plugin for the combat core. The app inserts the `CombatSession` itself.
pub struct CombatCorePlugin;

impl Plugin for CombatCorePlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<CombatEvent>()
            .add_event::<PlayerIntent>()
            .init_resource::<CombatLog>();

        configure_combat_system_ordering(app);
        add_core_combat_systems(app, resource_exists::<CombatSession>);
    }
}

fn advance_session(time: Res<Time>, mut session: ResMut<CombatSession>) {
    session.update(time.delta_secs());
}

fn apply_player_intents(
    time: Res<Time>,
    mut intents: EventReader<PlayerIntent>,
    mut session: ResMut<CombatSession>,
) {
    let dt = time.delta_secs();
    for intent in intents.read() {
        intent.apply(&mut session, dt);
    }
}

fn publish_combat_events(
    mut session: ResMut<CombatSession>,
    mut combat_log: ResMut<CombatLog>,
    mut events: EventWriter<CombatEvent>,
) {
    let now = session.now();
    for event in session.drain_events() {
        combat_log.record(&event, now);
        events.send(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classes::ClassId;
    use crate::combat::log::CombatLogEventType;
    use crate::creatures::CreatureSpawn;
    use crate::rng::GameRng;
    use bevy::time::TimeUpdateStrategy;
    use std::time::Duration;

    fn app_with_session(session: CombatSession) -> App {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins)
            .insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_secs_f32(
                1.0 / 60.0,
            )))
            .add_plugins(CombatCorePlugin)
            .insert_resource(session);
        app
    }

    #[test]
    fn test_intents_reach_the_session() {
        let mut session = CombatSession::new(ClassId::Mage, GameRng::from_seed(5));
        let zombie = session
            .spawn_creature(&CreatureSpawn::new("z", "zombie", Vec3::new(0.0, 0.0, -10.0), true))
            .unwrap();
        let mut app = app_with_session(session);

        app.world_mut().send_event(PlayerIntent::SetTarget(zombie));
        app.world_mut().send_event(PlayerIntent::CastSlot(0));
        app.update();

        let session = app.world().resource::<CombatSession>();
        assert_eq!(session.player().target, Some(zombie));
        assert_eq!(session.player().actor.mana, 135.0);

        let log = app.world().resource::<CombatLog>();
        assert!(!log.filter_by_type(CombatLogEventType::AbilityUsed).is_empty());
        assert!(!log.filter_by_type(CombatLogEventType::Damage).is_empty());
    }

    #[test]
    fn test_clock_advances_with_frames() {
        let session = CombatSession::new(ClassId::Rogue, GameRng::from_seed(5));
        let mut app = app_with_session(session);
        for _ in 0..10 {
            app.update();
        }
        let now = app.world().resource::<CombatSession>().now();
        assert!(now > 0.0);
    }
}
