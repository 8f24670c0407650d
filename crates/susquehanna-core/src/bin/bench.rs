/// Pure Rust benchmarks of policy evaluation.
///
/// Uses std::time::Instant for timing, a deterministic LCG PRNG for decision
/// vectors, the synthetic reference system for data, and
/// std::hint::black_box to prevent dead-code elimination.
use std::hint::black_box;
use std::time::{Duration, Instant};

use susquehanna_core::config::{DataMode, ModelConfig};
use susquehanna_core::synthetic;
use susquehanna_core::{ObjectiveSet, SusquehannaModel};

const REPEATS: usize = 7;

/// Decision vector drawn uniformly inside `bounds` with a simple LCG.
fn make_decision_vars(bounds: &[(f64, f64)], seed: u64) -> Vec<f64> {
    let mut state = seed;
    let mut next_f64 = || -> f64 {
        state = state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        (state >> 33) as f64 / (1u64 << 31) as f64
    };
    bounds
        .iter()
        .map(|&(lo, hi)| lo + next_f64() * (hi - lo))
        .collect()
}

/// Run a closure `REPEATS` times, return the median duration.
fn median_time<F: FnMut()>(mut f: F) -> Duration {
    let mut times: Vec<Duration> = (0..REPEATS)
        .map(|_| {
            let start = Instant::now();
            f();
            start.elapsed()
        })
        .collect();
    times.sort();
    times[REPEATS / 2]
}

fn bench_mode(
    label: &'static str,
    mode: DataMode,
    objectives: ObjectiveSet,
    horizons: &[usize],
) -> Vec<(&'static str, usize, Duration)> {
    let mut results = Vec::new();

    for &n_years in horizons {
        let record_years = match mode {
            DataMode::Historic => n_years,
            DataMode::MonteCarlo { .. } => 4 * n_years,
        };
        let data = match synthetic::reference_system(record_years, 42) {
            Ok(d) => d,
            Err(e) => {
                eprintln!("{label}: cannot build reference system: {e}");
                continue;
            }
        };
        let config = ModelConfig {
            n_years,
            data_mode: mode,
            objectives,
            ..ModelConfig::default()
        };
        let model = match SusquehannaModel::new(config, data) {
            Ok(m) => m,
            Err(e) => {
                eprintln!("{label}: cannot build model: {e}");
                continue;
            }
        };
        let vars = make_decision_vars(&model.decision_bounds(), 42);

        // Warmup
        if let Err(e) = black_box(model.evaluate(&vars)) {
            eprintln!("{label}: evaluation failed: {e}");
            continue;
        }

        let dur = median_time(|| {
            let _ = black_box(model.evaluate(&vars));
        });
        results.push((label, n_years, dur));
    }
    results
}

fn main() {
    println!("Policy Evaluation Benchmarks");
    println!("============================================================");
    println!("{:<18} {:>6}   {:>12}", "Mode", "Years", "Median (ms)");
    println!("--------------------------------------------");

    let mut all_results: Vec<(&str, usize, Duration)> = Vec::new();

    all_results.extend(bench_mode(
        "historic",
        DataMode::Historic,
        ObjectiveSet::Standard,
        &[1, 5, 10],
    ));
    all_results.extend(bench_mode(
        "historic-extended",
        DataMode::Historic,
        ObjectiveSet::Extended,
        &[1, 10],
    ));
    all_results.extend(bench_mode(
        "monte-carlo-4",
        DataMode::MonteCarlo {
            n_samples: 4,
            percentile: 99.0,
            seed: 0,
        },
        ObjectiveSet::Extended,
        &[1, 5],
    ));

    for (mode, n, dur) in &all_results {
        let ms = dur.as_secs_f64() * 1000.0;
        println!("{:<18} {:>6}      {:>8.2}", mode, n, ms);
    }

    println!("============================================================");
}
