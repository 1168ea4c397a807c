//! Configuration loading and typed config structures.
//!
//! The canonical configuration lives in `lineage-config.yaml` at the project
//! root. This module defines strongly-typed structs that mirror the YAML
//! structure, and provides a loader that reads and validates the file.
//! Every key is optional; missing keys take the defaults below.

use std::path::Path;

use serde::Deserialize;

use lineage_ledger::{GainRates, LevelingRates, PrestigeRates, TrackRates};

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// A value parsed but is out of range.
    #[error("invalid config value for {field}: {reason}")]
    Invalid {
        /// Dotted path of the offending key.
        field: &'static str,
        /// What is wrong with it.
        reason: String,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level progression configuration.
///
/// Mirrors the structure of `lineage-config.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ProgressionConfig {
    /// Overall leveling track.
    #[serde(default)]
    pub leveling: LevelingConfig,

    /// Weapon expertise tracks.
    #[serde(default)]
    pub expertise: ExpertiseConfig,

    /// Blood legacy tracks.
    #[serde(default)]
    pub legacy: LegacyConfig,

    /// Familiar tracks.
    #[serde(default)]
    pub familiar: FamiliarConfig,

    /// Prestige rate constants.
    #[serde(default)]
    pub prestige: PrestigeConfig,

    /// Rested-XP pool.
    #[serde(default)]
    pub rested_xp: RestedXpConfig,

    /// Group kill sharing.
    #[serde(default)]
    pub experience_sharing: SharingConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl ProgressionConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read,
    /// [`ConfigError::Yaml`] if the content is not valid YAML, or
    /// [`ConfigError::Invalid`] if a value is out of range.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML, or
    /// [`ConfigError::Invalid`] if a value is out of range.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_yml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the gain formulas cannot work with.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the first bad key.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let caps = [
            ("leveling.max_level", self.leveling.max_level),
            ("expertise.max_level", self.expertise.max_level),
            ("legacy.max_level", self.legacy.max_level),
            ("familiar.max_level", self.familiar.max_level),
        ];
        for (field, value) in caps {
            if value == 0 {
                return Err(ConfigError::Invalid {
                    field,
                    reason: "max level must be at least 1".to_owned(),
                });
            }
        }

        let rates = [
            ("leveling.unit_multiplier", self.leveling.unit_multiplier),
            ("leveling.vblood_multiplier", self.leveling.vblood_multiplier),
            ("leveling.level_scaling_multiplier", self.leveling.level_scaling_multiplier),
            ("leveling.group_multiplier", self.leveling.group_multiplier),
            ("expertise.unit_multiplier", self.expertise.unit_multiplier),
            ("expertise.vblood_multiplier", self.expertise.vblood_multiplier),
            ("legacy.unit_multiplier", self.legacy.unit_multiplier),
            ("legacy.vblood_multiplier", self.legacy.vblood_multiplier),
            ("familiar.unit_multiplier", self.familiar.unit_multiplier),
            ("familiar.vblood_multiplier", self.familiar.vblood_multiplier),
            ("prestige.rates_reducer", self.prestige.rates_reducer),
            ("prestige.rate_multiplier", self.prestige.rate_multiplier),
        ];
        for (field, value) in rates {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::Invalid {
                    field,
                    reason: format!("expected a finite non-negative number, got {value}"),
                });
            }
        }

        Ok(())
    }

    /// Convert into the rate tables the gain formulas read.
    pub const fn gain_rates(&self) -> GainRates {
        GainRates {
            leveling: LevelingRates {
                rates: TrackRates {
                    unit_multiplier: self.leveling.unit_multiplier,
                    elite_multiplier: self.leveling.vblood_multiplier,
                    max_level: self.leveling.max_level,
                },
                level_scaling_multiplier: self.leveling.level_scaling_multiplier,
            },
            expertise: self.expertise.rates(),
            legacy: self.legacy.rates(),
            familiar: self.familiar.rates(),
            prestige: PrestigeRates {
                rates_reducer: self.prestige.rates_reducer,
                rate_multiplier: self.prestige.rate_multiplier,
            },
        }
    }
}

/// Overall leveling configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LevelingConfig {
    /// Highest reachable level.
    #[serde(default = "default_max_level")]
    pub max_level: u32,

    /// Multiplier per victim level for ordinary units.
    #[serde(default = "default_unit_leveling_multiplier")]
    pub unit_multiplier: f64,

    /// Multiplier per victim level for `VBlood` units.
    #[serde(default = "default_vblood_leveling_multiplier")]
    pub vblood_multiplier: f64,

    /// Decay rate per level the recipient is above the victim.
    #[serde(default = "default_level_scaling_multiplier")]
    pub level_scaling_multiplier: f64,

    /// Multiplier applied to everyone when more than one player shares a kill.
    #[serde(default = "default_group_multiplier")]
    pub group_multiplier: f64,
}

impl Default for LevelingConfig {
    fn default() -> Self {
        Self {
            max_level: default_max_level(),
            unit_multiplier: default_unit_leveling_multiplier(),
            vblood_multiplier: default_vblood_leveling_multiplier(),
            level_scaling_multiplier: default_level_scaling_multiplier(),
            group_multiplier: default_group_multiplier(),
        }
    }
}

/// Generates a per-track config section with its own defaults.
macro_rules! track_config {
    (
        $(#[$meta:meta])*
        $name:ident { max_level: $max:expr, unit: $unit:expr, vblood: $vblood:expr }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Deserialize)]
        #[serde(default)]
        pub struct $name {
            /// Highest reachable level.
            pub max_level: u32,
            /// Multiplier for ordinary units.
            pub unit_multiplier: f64,
            /// Multiplier for `VBlood` units.
            pub vblood_multiplier: f64,
        }

        impl Default for $name {
            fn default() -> Self {
                Self {
                    max_level: $max,
                    unit_multiplier: $unit,
                    vblood_multiplier: $vblood,
                }
            }
        }

        impl $name {
            /// The rate table for this track family.
            pub const fn rates(&self) -> TrackRates {
                TrackRates {
                    unit_multiplier: self.unit_multiplier,
                    elite_multiplier: self.vblood_multiplier,
                    max_level: self.max_level,
                }
            }
        }
    };
}

track_config! {
    /// Weapon expertise configuration.
    ExpertiseConfig { max_level: 100, unit: 2.0, vblood: 5.0 }
}

track_config! {
    /// Blood legacy configuration.
    LegacyConfig { max_level: 100, unit: 1.0, vblood: 5.0 }
}

track_config! {
    /// Familiar leveling configuration.
    FamiliarConfig { max_level: 90, unit: 7.5, vblood: 15.0 }
}

/// Prestige rate constants.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PrestigeConfig {
    /// Rate lost per prestige of the awarded track.
    #[serde(default = "default_prestige_rates_reducer")]
    pub rates_reducer: f64,

    /// Rate gained on other tracks per overall experience prestige.
    #[serde(default = "default_prestige_rate_multiplier")]
    pub rate_multiplier: f64,
}

impl Default for PrestigeConfig {
    fn default() -> Self {
        Self {
            rates_reducer: default_prestige_rates_reducer(),
            rate_multiplier: default_prestige_rate_multiplier(),
        }
    }
}

/// Rested-XP configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RestedXpConfig {
    /// Whether leveling gains draw on rested pools.
    #[serde(default)]
    pub enabled: bool,
}

/// Group kill sharing configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SharingConfig {
    /// Whether non-killers may receive a share at all.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Largest level gap (inclusive) across which a PvE kill is shared.
    #[serde(default = "default_share_level_range")]
    pub share_level_range: u32,
}

impl Default for SharingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            share_level_range: default_share_level_range(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Emit JSON lines instead of human-readable output.
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

const fn default_max_level() -> u32 {
    90
}

const fn default_unit_leveling_multiplier() -> f64 {
    7.5
}

const fn default_vblood_leveling_multiplier() -> f64 {
    15.0
}

const fn default_level_scaling_multiplier() -> f64 {
    0.05
}

const fn default_group_multiplier() -> f64 {
    1.0
}

const fn default_prestige_rates_reducer() -> f64 {
    0.10
}

const fn default_prestige_rate_multiplier() -> f64 {
    0.10
}

const fn default_share_level_range() -> u32 {
    10
}

fn default_log_level() -> String {
    "info".to_owned()
}

const fn default_true() -> bool {
    true
}
