//! Performance and equity metrics for reservoir objectives.
//!
//! Daily series are indexed from the first simulated day; calendar series
//! (demands, targets) cover one year and wrap modulo 365.

use crate::calendar::{month_of_day, DAYS_PER_YEAR, MONTHS_PER_YEAR};
use crate::error::SimulationError;

/// Arithmetic mean. Zero for an empty slice.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population standard deviation.
pub fn std_dev(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let m = mean(values);
    (values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / values.len() as f64).sqrt()
}

/// Fraction of demand delivered on each day. A zero-demand day is fully
/// reliable; over-delivery counts as fully reliable. An empty demand
/// series means no demand.
pub fn daily_reliability(release: &[f64], demand: &[f64]) -> Vec<f64> {
    if demand.is_empty() {
        return vec![1.0; release.len()];
    }
    release
        .iter()
        .enumerate()
        .map(|(t, &r)| {
            let d = demand[t % demand.len()];
            if d > 0.0 {
                (r / d).clamp(0.0, 1.0)
            } else {
                1.0
            }
        })
        .collect()
}

/// Volumetric reliability: mean daily delivered fraction. Range: [0, 1].
pub fn volumetric_reliability(release: &[f64], demand: &[f64]) -> f64 {
    mean(&daily_reliability(release, demand))
}

/// Squared normalized shortfall of each day. A zero or missing target has
/// no shortfall.
pub fn daily_shortage(release: &[f64], target: &[f64]) -> Vec<f64> {
    if target.is_empty() {
        return vec![0.0; release.len()];
    }
    release
        .iter()
        .enumerate()
        .map(|(t, &r)| {
            let q = target[t % target.len()];
            if q > 0.0 {
                ((q - r).max(0.0) / q).powi(2)
            } else {
                0.0
            }
        })
        .collect()
}

/// Shortage index: mean squared normalized shortfall. Range: [0, 1], 0 = no shortage.
pub fn shortage_index(release: &[f64], target: &[f64]) -> f64 {
    mean(&daily_shortage(release, target))
}

/// Fraction of days with a positive target level where the level meets the
/// target. Range: [0, 1]; 1 when no day has a positive target.
pub fn storage_reliability(levels: &[f64], target: &[f64]) -> f64 {
    if target.is_empty() {
        return 1.0;
    }
    let mut eligible = 0usize;
    let mut met = 0usize;
    for (t, &h) in levels.iter().enumerate() {
        let h_target = target[t % target.len()];
        if h_target > 0.0 {
            eligible += 1;
            if h >= h_target {
                met += 1;
            }
        }
    }
    if eligible == 0 {
        return 1.0;
    }
    met as f64 / eligible as f64
}

/// Calendar-month means of a daily series starting on day 0 of a year.
/// Months without any day are 0.
pub fn monthly_average(daily: &[f64]) -> [f64; MONTHS_PER_YEAR] {
    let mut sums = [0.0; MONTHS_PER_YEAR];
    let mut counts = [0usize; MONTHS_PER_YEAR];
    for (t, &v) in daily.iter().enumerate() {
        let m = month_of_day(t % DAYS_PER_YEAR);
        sums[m] += v;
        counts[m] += 1;
    }
    let mut out = [0.0; MONTHS_PER_YEAR];
    for m in 0..MONTHS_PER_YEAR {
        if counts[m] > 0 {
            out[m] = sums[m] / counts[m] as f64;
        }
    }
    out
}

/// Sum of absolute differences over all unordered pairs.
pub fn pairwise_distance(values: &[f64]) -> f64 {
    let mut total = 0.0;
    for (i, a) in values.iter().enumerate() {
        for b in &values[i + 1..] {
            total += (a - b).abs();
        }
    }
    total
}

/// Summed pairwise Euclidean distance of scalar values.
pub fn euclidean(values: &[f64]) -> f64 {
    pairwise_distance(values)
}

/// Gini coefficient: `sum_{i<j} |x_i - x_j| / (2 n^2 mean)`.
///
/// An all-equal vector gives 0. A non-positive mean with non-zero
/// dispersion is reported as [`SimulationError::DegenerateEquity`].
pub fn gini(values: &[f64]) -> Result<f64, SimulationError> {
    let distance = pairwise_distance(values);
    if distance == 0.0 {
        return Ok(0.0);
    }
    let n = values.len() as f64;
    let m = mean(values);
    if m <= 0.0 {
        return Err(SimulationError::DegenerateEquity {
            measure: "gini",
            mean: m,
            dispersion: distance,
        });
    }
    Ok(distance / (2.0 * n * n * m))
}

/// `std / yearly`, with 0 when both are 0.
pub fn dispersion_ratio(
    measure: &'static str,
    std: f64,
    yearly: f64,
) -> Result<f64, SimulationError> {
    if yearly > 0.0 {
        Ok(std / yearly)
    } else if yearly == 0.0 && std == 0.0 {
        Ok(0.0)
    } else {
        Err(SimulationError::DegenerateEquity {
            measure,
            mean: yearly,
            dispersion: std,
        })
    }
}

/// Percentile `q` in [0, 100] with linear interpolation between order
/// statistics. NaN for an empty slice.
pub fn percentile(values: &[f64], q: f64) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let rank = (q / 100.0).clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    sorted[lo] + (sorted[hi] - sorted[lo]) * (rank - lo as f64)
}
