//! Headless mode for automated encounters
//!
//! Runs a scripted encounter without any graphical output. An autopilot plays
//! the character through the same `PlayerIntent`s a front end would send, and
//! the combat log is written as JSON when the encounter ends.
//!
//! ## Usage
//!
//! ```bash
//! cargo run --release -- --headless encounter.json --seed 42
//! ```
//!
//! ## JSON Configuration
//!
//! ```json
//! {
//!   "class": "Mage",
//!   "rotation": ["firebolt", "arcane_bolt"],
//!   "spawns": [
//!     { "template": "zombie", "position": [0, 0, -12] },
//!     { "template": "evil_wizard", "position": [4, 0, -14] }
//!   ],
//!   "max_duration_secs": 120,
//!   "random_seed": 42
//! }
//! ```

pub mod config;
pub mod driver;
pub mod runner;

pub use config::{HeadlessEncounterConfig, SpawnConfig};
pub use driver::Autopilot;
pub use runner::{
    check_outcome, run_headless_encounter, simulate_encounter, EncounterOutcome, EncounterResult,
};
