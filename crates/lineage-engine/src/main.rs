//! Replay binary for the Lineage progression engine.
//!
//! Loads the progression configuration, seeds an in-memory store from a
//! scenario file, distributes every kill in the scenario through the
//! engine, and prints the final state of every player as JSON.
//!
//! # Usage
//!
//! ```text
//! lineage-engine [SCENARIO] [CONFIG]
//! ```
//!
//! `SCENARIO` defaults to `demos/scenario.json` and `CONFIG` to
//! `lineage-config.yaml`, both relative to the working directory. A missing
//! config file falls back to defaults. `RUST_LOG` overrides the configured
//! log level.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `lineage-config.yaml`
//! 2. Initialize structured logging (tracing)
//! 3. Read the scenario
//! 4. Replay kills and awards
//! 5. Print the report

mod error;
mod scenario;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use lineage_core::{ProgressionConfig, ProgressionEngine, TracingSink};
use lineage_store::MemoryStore;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::error::ReplayError;
use crate::scenario::Scenario;

/// Default scenario path.
const DEFAULT_SCENARIO: &str = "demos/scenario.json";

/// Default configuration path.
const DEFAULT_CONFIG: &str = "lineage-config.yaml";

fn main() -> anyhow::Result<()> {
    let mut args = std::env::args_os().skip(1);
    let scenario_path = args
        .next()
        .map_or_else(|| PathBuf::from(DEFAULT_SCENARIO), PathBuf::from);
    let config_path = args
        .next()
        .map_or_else(|| PathBuf::from(DEFAULT_CONFIG), PathBuf::from);

    // 1. Load configuration.
    let (config, config_found) = load_config(&config_path)?;

    // 2. Initialize structured logging.
    init_tracing(&config);
    info!(
        config = %config_path.display(),
        config_found,
        max_level = config.leveling.max_level,
        rested_xp = config.rested_xp.enabled,
        sharing = config.experience_sharing.enabled,
        share_level_range = config.experience_sharing.share_level_range,
        "Configuration loaded"
    );

    // 3. Read the scenario.
    let scenario = Scenario::from_file(&scenario_path)
        .with_context(|| format!("loading scenario {}", scenario_path.display()))?;
    info!(
        players = scenario.players.len(),
        kills = scenario.kills.len(),
        awards = scenario.awards.len(),
        "Scenario loaded"
    );

    // 4. Replay.
    let store = Arc::new(MemoryStore::new());
    let engine = ProgressionEngine::new(config, store).with_sink(Arc::new(TracingSink));
    let report = scenario::replay(&scenario, &engine).context("replaying scenario")?;
    info!(
        kills = report.kills,
        awards = report.awards,
        level_ups = report.level_ups,
        "Replay complete"
    );

    // 5. Print the report.
    let json = serde_json::to_string_pretty(&report).context("serializing report")?;
    println!("{json}");

    Ok(())
}

/// Load the configuration, falling back to defaults when the file is absent.
fn load_config(path: &Path) -> Result<(ProgressionConfig, bool), ReplayError> {
    if path.exists() {
        Ok((ProgressionConfig::from_file(path)?, true))
    } else {
        Ok((ProgressionConfig::default(), false))
    }
}

/// Install the global subscriber. `RUST_LOG` wins over the config file.
fn init_tracing(config: &ProgressionConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr);
    if config.logging.json {
        builder.json().init();
    } else {
        builder.init();
    }
}
