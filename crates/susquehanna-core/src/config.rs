//! Model construction parameters, loadable from TOML.
//!
//! Every section has defaults for the reference system, so a minimal file
//! only names what differs:
//!
//! ```toml
//! n_years = 2
//! objectives = "extended"
//!
//! [data_mode]
//! mode = "monte_carlo"
//! n_samples = 20
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::calendar::DAYS_PER_WEEK;
use crate::data::{DataLayout, HydrologySource};
use crate::error::ConfigError;
use crate::objectives::{EnergyTarget, ObjectiveSet};
use crate::operations::OperatingRules;
use crate::policy::RbfShape;

fn default_n_samples() -> usize {
    2
}

fn default_percentile() -> f64 {
    99.0
}

fn default_seed() -> u64 {
    0
}

/// Where the hydrology of an evaluation comes from.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum DataMode {
    #[default]
    /// One deterministic run over the first `n_years` of the historic record.
    Historic,
    /// `n_samples` runs over stochastic traces, each objective aggregated by
    /// `percentile`.
    MonteCarlo {
        #[serde(default = "default_n_samples")]
        n_samples: usize,
        #[serde(default = "default_percentile")]
        percentile: f64,
        #[serde(default = "default_seed")]
        seed: u64,
    },
}

impl DataMode {
    pub fn hydrology_source(&self) -> HydrologySource {
        match self {
            DataMode::Historic => HydrologySource::Historic,
            DataMode::MonteCarlo { .. } => HydrologySource::Stochastic,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Conowingo level at the start of the horizon [ft].
    pub initial_level_conowingo: f64,
    /// Muddy Run level at the start of the horizon [ft].
    pub initial_level_muddy_run: f64,
    /// Day of week of the first simulated day (0 = Sunday).
    pub first_weekday: usize,
    pub n_years: usize,
    pub rbf: RbfShape,
    pub data_mode: DataMode,
    /// Send one evaluation log per trace to the diagnostics sink and emit
    /// per-run equity events. Equity is then computed for every
    /// objective set.
    pub diagnostics: bool,
    pub objectives: ObjectiveSet,
    pub rules: OperatingRules,
    pub energy_target: EnergyTarget,
    pub layout: DataLayout,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            initial_level_conowingo: 108.5,
            initial_level_muddy_run: 505.0,
            first_weekday: 5,
            n_years: 1,
            rbf: RbfShape::default(),
            data_mode: DataMode::Historic,
            diagnostics: false,
            objectives: ObjectiveSet::Standard,
            rules: OperatingRules::default(),
            energy_target: EnergyTarget::default(),
            layout: DataLayout::default(),
        }
    }
}

impl ModelConfig {
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.n_years == 0 {
            return Err(ConfigError::InvalidParameter(
                "n_years must be at least 1".to_string(),
            ));
        }
        if self.first_weekday >= DAYS_PER_WEEK {
            return Err(ConfigError::InvalidParameter(format!(
                "first_weekday must be in 0..7, got {}",
                self.first_weekday
            )));
        }
        for (name, level) in [
            ("initial_level_conowingo", self.initial_level_conowingo),
            ("initial_level_muddy_run", self.initial_level_muddy_run),
        ] {
            if !level.is_finite() {
                return Err(ConfigError::InvalidParameter(format!(
                    "{name} must be finite, got {level}"
                )));
            }
        }
        if let DataMode::MonteCarlo {
            n_samples,
            percentile,
            ..
        } = self.data_mode
        {
            if n_samples == 0 {
                return Err(ConfigError::InvalidParameter(
                    "n_samples must be at least 1".to_string(),
                ));
            }
            if !(0.0..=100.0).contains(&percentile) {
                return Err(ConfigError::InvalidParameter(format!(
                    "percentile must be in [0, 100], got {percentile}"
                )));
            }
        }
        self.rbf.validate()?;
        self.rules.validate()?;
        self.energy_target.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_reference_config() {
        let config = ModelConfig::from_toml_str("").unwrap();
        assert_eq!(config, ModelConfig::default());
        assert_eq!(config.rbf.n_params(), 32);
    }

    #[test]
    fn monte_carlo_section_with_defaults() {
        let config = ModelConfig::from_toml_str(
            r#"
            n_years = 2
            objectives = "extended"

            [data_mode]
            mode = "monte_carlo"
            seed = 42
            "#,
        )
        .unwrap();
        assert_eq!(config.n_years, 2);
        assert_eq!(config.objectives, ObjectiveSet::Extended);
        assert_eq!(
            config.data_mode,
            DataMode::MonteCarlo {
                n_samples: 2,
                percentile: 99.0,
                seed: 42
            }
        );
        assert_eq!(config.data_mode.hydrology_source(), HydrologySource::Stochastic);
    }

    #[test]
    fn nested_rule_override() {
        let config = ModelConfig::from_toml_str(
            r#"
            [rules]
            leak = 0.0

            [rules.ladder]
            downstream = 104.0
            "#,
        )
        .unwrap();
        assert_eq!(config.rules.leak, 0.0);
        assert_eq!(config.rules.ladder.downstream, 104.0);
        assert_eq!(config.rules.turbine_capacity, 85_412.0);
    }

    #[test]
    fn rejects_invalid_values() {
        assert!(ModelConfig::from_toml_str("n_years = 0").is_err());
        assert!(ModelConfig::from_toml_str("first_weekday = 7").is_err());
        assert!(ModelConfig::from_toml_str(
            "[data_mode]\nmode = \"monte_carlo\"\npercentile = 120.0"
        )
        .is_err());
        assert!(matches!(
            ModelConfig::from_toml_str("n_years = \"two\""),
            Err(ConfigError::Toml(_))
        ));
    }
}
