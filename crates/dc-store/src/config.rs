use std::fs;
use std::path::Path;

use serde::Deserialize;

use dc_core::{PresenceStrategy, SimModel, constants::SIM_DEFAULT_TRIALS};

/// User tuning knobs, read from `config.toml` in the data directory.
/// Every field has a default; a missing or malformed file never blocks
/// the CLI, it just falls back to defaults with a warning.
#[derive(Debug, Clone, PartialEq, Deserialize, Default)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub presence: PresenceConfig,
    pub simulation: SimulationConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PresenceConfig {
    /// "raw" or "penalized".
    pub strategy: String,
    /// Denominator shrink per BAD event, only used by "penalized".
    pub penalty_factor: f64,
}

impl Default for PresenceConfig {
    fn default() -> Self {
        Self {
            strategy: "raw".to_string(),
            penalty_factor: 0.25,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimulationConfig {
    pub open_p: f64,
    pub finalize_p: f64,
    pub missing_quarter_p: f64,
    pub lambda: f64,
    pub trials: u32,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        let model = SimModel::default();
        Self {
            open_p: model.open_p,
            finalize_p: model.finalize_p,
            missing_quarter_p: model.missing_quarter_p,
            lambda: model.lambda,
            trials: SIM_DEFAULT_TRIALS,
        }
    }
}

impl Config {
    /// Load `config.toml` from `base_dir`. Absent file is the normal case
    /// and yields defaults silently; an unreadable or unparsable file also
    /// yields defaults but logs what was wrong.
    pub fn load(base_dir: &Path) -> Self {
        let path = base_dir.join("config.toml");
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Self::default(),
            Err(e) => {
                tracing::warn!("could not read {}: {e}", path.display());
                return Self::default();
            }
        };
        Self::parse(&content).unwrap_or_else(|e| {
            tracing::warn!("ignoring malformed {}: {e}", path.display());
            Self::default()
        })
    }

    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    pub fn presence_strategy(&self) -> PresenceStrategy {
        match self.presence.strategy.as_str() {
            "penalized" => PresenceStrategy::Penalized {
                factor: self.presence.penalty_factor,
            },
            _ => PresenceStrategy::Raw,
        }
    }

    pub fn sim_model(&self) -> SimModel {
        SimModel {
            open_p: self.simulation.open_p,
            finalize_p: self.simulation.finalize_p,
            missing_quarter_p: self.simulation.missing_quarter_p,
            lambda: self.simulation.lambda,
            ..SimModel::default()
        }
    }

    pub fn trials(&self) -> u32 {
        self.simulation.trials
    }
}
