//! Emberfall - headless encounter runner
//!
//! Loads an encounter config (or builds one for the shipped world), applies
//! command-line overrides and plays it out with the autopilot.

use emberfall::cli;
use emberfall::headless::{run_headless_encounter, HeadlessEncounterConfig};

fn main() {
    let args = cli::parse_args();

    let config = match &args.headless {
        Some(path) => HeadlessEncounterConfig::load_from_file(path),
        None => HeadlessEncounterConfig::from_json(&format!(r#"{{ "class": "{}" }}"#, args.class)),
    };
    let mut config = match config {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    // Command-line flags win over the file
    if let Some(output) = &args.output {
        config.output_path = Some(output.to_string_lossy().to_string());
    }
    if let Some(max_duration) = args.max_duration {
        config.max_duration_secs = max_duration;
    }
    if args.seed.is_some() {
        config.random_seed = args.seed;
    }

    if let Err(e) = config.validate().and_then(|_| run_headless_encounter(config)) {
        eprintln!("Error running headless encounter: {}", e);
        std::process::exit(1);
    }
}
