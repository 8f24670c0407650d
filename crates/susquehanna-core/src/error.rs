//! Error types for model construction and policy evaluation.
//!
//! Configuration problems are detected before the first simulated hour and
//! are reported separately from numeric failures of the aggregation layer.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("table `{table}` is invalid: {reason}")]
    InvalidTable { table: String, reason: String },

    #[error("`{name}` has {actual} values, expected {expected}")]
    DimensionMismatch {
        name: String,
        expected: usize,
        actual: usize,
    },

    #[error("series `{series}` covers {available_years} years, the horizon needs {required_years}")]
    HorizonTooLong {
        series: String,
        required_years: usize,
        available_years: usize,
    },

    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("decision vector has {actual} values, the policy expects {expected}")]
    DecisionVectorLength { expected: usize, actual: usize },

    #[error("decision variable {index} = {value} is out of bounds [{min}, {max}]")]
    DecisionVariableOutOfBounds {
        index: usize,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("could not parse `{source_name}` at token {position}: `{token}`")]
    Parse {
        source_name: String,
        position: usize,
        token: String,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

#[derive(Error, Debug)]
pub enum SimulationError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("{measure} is undefined: mean {mean} with dispersion {dispersion}")]
    DegenerateEquity {
        measure: &'static str,
        mean: f64,
        dispersion: f64,
    },

    #[error("objective `{objective}` is not finite ({value})")]
    NonFinite { objective: &'static str, value: f64 },
}

pub type Result<T> = std::result::Result<T, SimulationError>;
