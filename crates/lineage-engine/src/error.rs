//! Error types for the replay binary.

use std::path::PathBuf;

/// Top-level error for a scenario replay.
#[derive(Debug, thiserror::Error)]
pub enum ReplayError {
    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: lineage_core::ConfigError,
    },

    /// The scenario file could not be read.
    #[error("failed to read scenario {path}: {source}")]
    ScenarioRead {
        /// Path that was tried.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The scenario file is not valid scenario JSON.
    #[error("failed to parse scenario: {source}")]
    ScenarioParse {
        /// The underlying JSON error.
        #[from]
        source: serde_json::Error,
    },

    /// A kill or award referenced a player the scenario never declared.
    #[error("scenario references unknown player {player}")]
    UnknownPlayer {
        /// The undeclared player id.
        player: lineage_types::PlayerId,
    },

    /// Seeding the store failed.
    #[error("store error: {source}")]
    Store {
        /// The underlying store error.
        #[from]
        source: lineage_store::StoreError,
    },

    /// The engine failed while replaying.
    #[error("engine error: {source}")]
    Engine {
        /// The underlying engine error.
        #[from]
        source: lineage_core::EngineError,
    },
}
