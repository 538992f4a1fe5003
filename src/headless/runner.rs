//! Headless encounter execution
//!
//! Runs an encounter without any graphical output, suitable for automated
//! testing. Frames use a fixed time step, so a seeded encounter replays
//! identically.

use bevy::app::ScheduleRunnerPlugin;
use bevy::log::LogPlugin;
use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use std::time::Duration;

use crate::combat::events::CombatEvent;
use crate::combat::log::{CombatLog, CombatLogEventType, EncounterMetadata};
use crate::rng::GameRng;
use crate::session::CombatSession;
use crate::systems::{CombatCorePlugin, CombatSystemPhase, PlayerIntent};

use super::config::HeadlessEncounterConfig;
use super::driver::Autopilot;

/// Simulation step for headless frames
pub const HEADLESS_FRAME_SECS: f32 = 1.0 / 60.0;

/// How an encounter ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncounterOutcome {
    /// Every hostile creature died and was looted
    Victory,
    /// The player died
    Defeat,
    /// Max duration elapsed first
    Timeout,
}

/// Result of a completed headless encounter
#[derive(Debug, Clone)]
pub struct EncounterResult {
    pub outcome: EncounterOutcome,
    /// Session time when the encounter ended
    pub duration_secs: f32,
    pub creatures_killed: usize,
    pub player_final_health: f32,
    pub player_max_health: f32,
    pub gold: u32,
    pub experience: u32,
    pub inventory: Vec<String>,
    /// Random seed used (if deterministic mode)
    pub random_seed: Option<u64>,
}

/// Build the session an encounter starts from: class, world and autopilot.
pub fn setup_encounter(
    config: &HeadlessEncounterConfig,
) -> Result<(CombatSession, Autopilot), String> {
    let class = config.class_id()?;

    // Initialize GameRng with seed if provided (deterministic mode)
    let rng = match config.random_seed {
        Some(seed) => {
            info!("Using deterministic RNG with seed: {}", seed);
            GameRng::from_seed(seed)
        }
        None => {
            info!("Using non-deterministic RNG (no seed provided)");
            GameRng::from_entropy()
        }
    };

    let mut session = CombatSession::from_assets(class, rng);
    session.player_mut().actor.position = config.player_start();
    for talent in &config.talents {
        session.learn_talent(*talent).map_err(|e| e.to_string())?;
    }
    for spawn in config.creature_spawns() {
        session.spawn_creature(&spawn);
    }
    let autopilot = Autopilot::new(&mut session, &config.rotation_abilities()?)?;

    info!(
        "Headless encounter setup complete: {} vs {} creatures",
        class.name(),
        session.creatures().filter(|c| c.hostile).count()
    );
    Ok((session, autopilot))
}

/// Decide whether the encounter is over
pub fn check_outcome(session: &CombatSession, max_duration: f32) -> Option<EncounterOutcome> {
    if !session.player().actor.is_alive() {
        return Some(EncounterOutcome::Defeat);
    }
    let unfinished = session
        .creatures()
        .any(|c| c.hostile && (c.is_alive() || !c.loot.is_empty()));
    if !unfinished {
        return Some(EncounterOutcome::Victory);
    }
    if session.now() >= max_duration {
        return Some(EncounterOutcome::Timeout);
    }
    None
}

fn build_result(
    session: &CombatSession,
    outcome: EncounterOutcome,
    creatures_killed: usize,
) -> EncounterResult {
    let player = session.player();
    EncounterResult {
        outcome,
        duration_secs: session.now(),
        creatures_killed,
        player_final_health: player.actor.health,
        player_max_health: player.actor.max_health,
        gold: player.gold,
        experience: player.experience,
        inventory: player.inventory.clone(),
        random_seed: session.random_seed(),
    }
}

fn encounter_metadata(session: &CombatSession, creatures_killed: usize) -> EncounterMetadata {
    EncounterMetadata {
        class_name: session.player().class.name().to_string(),
        duration_secs: session.now(),
        creatures_killed,
        player_survived: session.player().actor.is_alive(),
        random_seed: session.random_seed(),
    }
}

/// Run an encounter to completion in a plain loop, without a Bevy app.
///
/// Frames follow the same order as the app: simulate, apply intents, publish.
pub fn simulate_encounter(
    config: &HeadlessEncounterConfig,
) -> Result<(EncounterResult, CombatLog), String> {
    let (mut session, autopilot) = setup_encounter(config)?;
    let mut combat_log = CombatLog::default();
    combat_log.log(
        CombatLogEventType::MatchEvent,
        "Encounter started (headless mode)!".to_string(),
    );

    let mut creatures_killed = 0;
    loop {
        session.update(HEADLESS_FRAME_SECS);
        for intent in autopilot.plan(&session) {
            intent.apply(&mut session, HEADLESS_FRAME_SECS);
        }
        let now = session.now();
        for event in session.drain_events() {
            if matches!(event, CombatEvent::LootGenerated { .. }) {
                creatures_killed += 1;
            }
            combat_log.record(&event, now);
        }

        if let Some(outcome) = check_outcome(&session, config.max_duration_secs) {
            combat_log.log(
                CombatLogEventType::MatchEvent,
                format!("Encounter ended: {:?}", outcome),
            );
            return Ok((build_result(&session, outcome, creatures_killed), combat_log));
        }
    }
}

/// Resource to track headless encounter state
#[derive(Resource)]
pub struct HeadlessEncounterState {
    pub max_duration: f32,
    /// Custom output path for the combat log
    pub output_path: Option<String>,
    pub creatures_killed: usize,
    pub complete: bool,
    /// Populated when the encounter completes
    pub result: Option<EncounterResult>,
}

/// Plugin for headless encounter execution
pub struct HeadlessPlugin {
    pub autopilot: Autopilot,
    pub config: HeadlessEncounterConfig,
}

impl Plugin for HeadlessPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(self.autopilot.clone())
            .insert_resource(HeadlessEncounterState {
                max_duration: self.config.max_duration_secs,
                output_path: self.config.output_path.clone(),
                creatures_killed: 0,
                complete: false,
                result: None,
            })
            .add_plugins(CombatCorePlugin)
            .add_systems(Startup, headless_start_log)
            .add_systems(
                Update,
                headless_autopilot
                    .after(CombatSystemPhase::Simulation)
                    .before(CombatSystemPhase::Intents),
            )
            .add_systems(
                Update,
                headless_check_encounter_end.after(CombatSystemPhase::Publish),
            )
            .add_systems(PostUpdate, headless_exit_on_complete);
    }
}

fn headless_start_log(mut combat_log: ResMut<CombatLog>) {
    combat_log.clear();
    combat_log.log(
        CombatLogEventType::MatchEvent,
        "Encounter started (headless mode)!".to_string(),
    );
}

fn headless_autopilot(
    session: Res<CombatSession>,
    autopilot: Res<Autopilot>,
    mut intents: EventWriter<PlayerIntent>,
) {
    for intent in autopilot.plan(&session) {
        intents.send(intent);
    }
}

fn headless_check_encounter_end(
    session: Res<CombatSession>,
    combat_log: Res<CombatLog>,
    mut events: EventReader<CombatEvent>,
    mut state: ResMut<HeadlessEncounterState>,
) {
    state.creatures_killed += events
        .read()
        .filter(|e| matches!(e, CombatEvent::LootGenerated { .. }))
        .count();

    if state.complete {
        return;
    }
    let Some(outcome) = check_outcome(&session, state.max_duration) else {
        return;
    };

    info!("Encounter ended after {:.1}s: {:?}", session.now(), outcome);
    let metadata = encounter_metadata(&session, state.creatures_killed);
    match combat_log.save_to_file(&metadata, state.output_path.as_deref()) {
        Ok(filename) => println!("Encounter complete. Log saved to: {}", filename),
        Err(e) => eprintln!("Failed to save combat log: {}", e),
    }
    state.result = Some(build_result(&session, outcome, state.creatures_killed));
    state.complete = true;
}

/// Exit the app when the encounter is complete
fn headless_exit_on_complete(
    state: Res<HeadlessEncounterState>,
    mut exit: EventWriter<AppExit>,
) {
    if state.complete {
        exit.send(AppExit::Success);
    }
}

/// Run a headless encounter with the given configuration
pub fn run_headless_encounter(config: HeadlessEncounterConfig) -> Result<(), String> {
    println!("Starting headless encounter simulation...");
    println!("  Class: {}", config.class);
    println!("  Spawns: {}", config.creature_spawns().len());
    println!("  Max duration: {:.0}s", config.max_duration_secs);

    let (session, autopilot) = setup_encounter(&config)?;

    App::new()
        // Minimal plugins - no window, no rendering. Frames run back to back
        // with a fixed simulated step.
        .add_plugins(MinimalPlugins.set(ScheduleRunnerPlugin::run_loop(Duration::ZERO)))
        .add_plugins(LogPlugin::default())
        .insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_secs_f32(
            HEADLESS_FRAME_SECS,
        )))
        .insert_resource(session)
        .add_plugins(HeadlessPlugin {
            autopilot,
            config,
        })
        .run();

    Ok(())
}
