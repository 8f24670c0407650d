//! Historic and Monte Carlo evaluation strategies.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::config::DataMode;
use crate::data::{HydrologyRecord, HydrologyTrace};
use crate::error::ConfigError;
use crate::metrics;
use crate::traits::EvaluationStrategy;

/// Chosen once from the [`DataMode`] at model construction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Strategy {
    /// One run over the first years of the record.
    Historic,
    /// `n_samples` runs over randomly selected disjoint traces; each
    /// objective is the `percentile` of its per-run values.
    MonteCarlo {
        n_samples: usize,
        percentile: f64,
        seed: u64,
    },
}

impl From<DataMode> for Strategy {
    fn from(mode: DataMode) -> Self {
        match mode {
            DataMode::Historic => Strategy::Historic,
            DataMode::MonteCarlo {
                n_samples,
                percentile,
                seed,
            } => Strategy::MonteCarlo {
                n_samples,
                percentile,
                seed,
            },
        }
    }
}

impl EvaluationStrategy for Strategy {
    fn n_runs(&self) -> usize {
        match self {
            Strategy::Historic => 1,
            Strategy::MonteCarlo { n_samples, .. } => *n_samples,
        }
    }

    fn validate(&self, record: &HydrologyRecord, n_years: usize) -> Result<(), ConfigError> {
        match self {
            Strategy::Historic => record.trace(0, n_years).map(|_| ()),
            Strategy::MonteCarlo { .. } => {
                if record.n_traces(n_years) == 0 {
                    return Err(ConfigError::HorizonTooLong {
                        series: "stochastic hydrology".to_string(),
                        required_years: n_years,
                        available_years: record.n_years(),
                    });
                }
                Ok(())
            }
        }
    }

    fn traces<'a>(
        &self,
        record: &'a HydrologyRecord,
        n_years: usize,
    ) -> Result<Vec<HydrologyTrace<'a>>, ConfigError> {
        match *self {
            Strategy::Historic => Ok(vec![record.trace(0, n_years)?]),
            Strategy::MonteCarlo {
                n_samples, seed, ..
            } => {
                let n_traces = record.n_traces(n_years);
                if n_traces == 0 {
                    return Err(ConfigError::HorizonTooLong {
                        series: "stochastic hydrology".to_string(),
                        required_years: n_years,
                        available_years: record.n_years(),
                    });
                }
                // reseeded on every call: the same traces for every evaluation
                let mut rng = ChaCha8Rng::seed_from_u64(seed);
                (0..n_samples)
                    .map(|_| record.trace(rng.gen_range(0..n_traces) * n_years, n_years))
                    .collect()
            }
        }
    }

    fn combine(&self, runs: &[Vec<f64>]) -> Vec<f64> {
        match self {
            Strategy::Historic => runs.first().cloned().unwrap_or_default(),
            Strategy::MonteCarlo { percentile, .. } => {
                let n_objectives = runs.first().map_or(0, Vec::len);
                (0..n_objectives)
                    .map(|k| {
                        let column: Vec<f64> = runs.iter().map(|r| r[k]).collect();
                        metrics::percentile(&column, *percentile)
                    })
                    .collect()
            }
        }
    }
}
