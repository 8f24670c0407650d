//! Synthetic reference system.
//!
//! Plausible tables, demands, prices and hydrology shaped like the lower
//! Susquehanna (Conowingo and Muddy Run). Used by tests, benchmarks and the
//! CLI when no data directory is given. Hydrology noise comes from a seeded
//! ChaCha8 generator so a given seed always gives the same record.

use std::f64::consts::PI;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::calendar::{DAYS_PER_WEEK, DAYS_PER_YEAR, HOURS_PER_DAY};
use crate::data::{DemandSeries, HydrologyRecord, PriceMatrix, SystemData};
use crate::error::ConfigError;
use crate::tables::constants::CONOWINGO_TURBINES;
use crate::tables::{PhysicalTables, TableRows};

const CONOWINGO_LEVELS: [f64; 10] = [
    80.0, 85.0, 90.0, 95.0, 100.0, 103.0, 106.0, 109.0, 112.0, 120.0,
];
const CONOWINGO_SURFACES: [f64; 10] = [
    3000.0, 3800.0, 4600.0, 5400.0, 6300.0, 7000.0, 7800.0, 8600.0, 9200.0, 10_000.0,
];
const CONOWINGO_BASE_STORAGE: f64 = 60_000.0;

const MUDDY_RUN_BASE_STORAGE: f64 = 5000.0;

/// Day-of-week of day 0 used to place weekend recreation targets.
const REFERENCE_FIRST_WEEKDAY: usize = 5;
const RECREATION_SEASON: (usize, usize) = (120, 273);
const RECREATION_LEVEL: f64 = 106.5;

/// Storage [acre-ft] by trapezoidal integration of surface [acre] over level.
fn integrate_storage(levels: &[f64], surfaces: &[f64], base: f64) -> Vec<f64> {
    let mut storage = Vec::with_capacity(levels.len());
    storage.push(base);
    for i in 1..levels.len() {
        let dh = levels[i] - levels[i - 1];
        let prev = storage[i - 1];
        storage.push(prev + 0.5 * (surfaces[i] + surfaces[i - 1]) * dh);
    }
    storage
}

/// Cosine seasonal shape peaking on `peak_day`, in [-1, 1].
fn seasonal(day: usize, peak_day: usize) -> f64 {
    (2.0 * PI * (day as f64 - peak_day as f64) / DAYS_PER_YEAR as f64).cos()
}

fn year(f: impl Fn(usize) -> f64) -> Vec<f64> {
    (0..DAYS_PER_YEAR).map(f).collect()
}

pub fn reference_rows() -> TableRows {
    let co_levels = CONOWINGO_LEVELS.to_vec();
    let co_surfaces = CONOWINGO_SURFACES.to_vec();
    let co_storage = integrate_storage(&co_levels, &co_surfaces, CONOWINGO_BASE_STORAGE);

    let mr_levels: Vec<f64> = (0..10).map(|i| 440.0 + 10.0 * i as f64).collect();
    let mr_surfaces: Vec<f64> = (0..10).map(|i| 300.0 + 520.0 * i as f64 / 9.0).collect();
    let mr_storage = integrate_storage(&mr_levels, &mr_surfaces, MUDDY_RUN_BASE_STORAGE);

    // 11 large units and 2 small house units, about 84 600 cfs in total
    let mut max_flow = vec![7200.0; CONOWINGO_TURBINES - 2];
    max_flow.extend_from_slice(&[2700.0, 2700.0]);
    let min_flow: Vec<f64> = max_flow.iter().map(|q| 0.3 * q).collect();
    let efficiency = vec![0.79; CONOWINGO_TURBINES];

    TableRows {
        conowingo_lsv: vec![co_levels, co_surfaces, co_storage],
        muddy_run_lsv: vec![mr_levels, mr_surfaces, mr_storage],
        tailwater: vec![
            vec![0.0, 10_000.0, 20_000.0, 40_000.0, 60_000.0, 85_000.0, 150_000.0, 300_000.0],
            vec![19.0, 20.5, 22.0, 25.0, 28.0, 31.0, 38.0, 50.0],
        ],
        spillways: vec![
            (0..8).map(|i| 108.0 + i as f64).collect(),
            vec![0.0, 20_000.0, 60_000.0, 150_000.0, 300_000.0, 500_000.0, 800_000.0, 1_200_000.0],
            vec![0.0, 0.0, 0.0, 10_000.0, 50_000.0, 150_000.0, 300_000.0, 600_000.0],
        ],
        conowingo_turbines: vec![max_flow, min_flow, efficiency],
        muddy_run_units: vec![4000.0, 0.87, 3100.0, 0.85],
    }
}

pub fn reference_tables() -> Result<PhysicalTables, ConfigError> {
    PhysicalTables::from_rows(&reference_rows())
}

/// Seasonal withdrawals peaking in summer, a spring-high minimum flow and
/// a weekend recreation target during the tourist season.
pub fn reference_demands() -> Result<DemandSeries, ConfigError> {
    let summer = 200;
    let recreation = year(|d| {
        let weekday = (REFERENCE_FIRST_WEEKDAY + d) % DAYS_PER_WEEK;
        let in_season = (RECREATION_SEASON.0..=RECREATION_SEASON.1).contains(&d);
        if in_season && (weekday == 0 || weekday == 6) {
            RECREATION_LEVEL
        } else {
            0.0
        }
    });
    DemandSeries::new(
        year(|d| 40.0 + 10.0 * seasonal(d, summer)),
        year(|d| 150.0 + 60.0 * seasonal(d, summer)),
        year(|d| 30.0 + 10.0 * seasonal(d, summer)),
        year(|d| 6750.0 + 3250.0 * seasonal(d, 100)),
        recreation,
    )
}

/// Diurnal prices with a daytime peak and a summer premium [$/MWh].
pub fn reference_prices() -> Result<PriceMatrix, ConfigError> {
    let prices = (0..HOURS_PER_DAY)
        .map(|h| {
            let peak = if (7..=20).contains(&h) { 15.0 } else { 0.0 };
            year(|d| 25.0 + peak + 8.0 * seasonal(d, 200).max(0.0))
        })
        .collect();
    PriceMatrix::new(prices)
}

/// `n_years` of daily hydrology with multiplicative noise.
pub fn reference_hydrology(n_years: usize, seed: u64) -> Result<HydrologyRecord, ConfigError> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut inflow = Vec::with_capacity(n_years);
    let mut lateral = Vec::with_capacity(n_years);
    let mut muddy_run = Vec::with_capacity(n_years);
    let mut evap_co = Vec::with_capacity(n_years);
    let mut evap_mr = Vec::with_capacity(n_years);

    for _ in 0..n_years {
        let year_factor = rng.gen_range(0.7..1.3);
        let mut q = Vec::with_capacity(DAYS_PER_YEAR);
        let mut q_lat = Vec::with_capacity(DAYS_PER_YEAR);
        let mut q_mr = Vec::with_capacity(DAYS_PER_YEAR);
        let mut e_co = Vec::with_capacity(DAYS_PER_YEAR);
        let mut e_mr = Vec::with_capacity(DAYS_PER_YEAR);
        for d in 0..DAYS_PER_YEAR {
            let spring = seasonal(d, 80);
            let summer = seasonal(d, 190);
            q.push(40_000.0 * year_factor * (1.0 + 0.6 * spring) * rng.gen_range(0.6..1.4));
            q_lat.push(1000.0 * (1.0 + 0.3 * spring) * rng.gen_range(0.5..1.5));
            q_mr.push(5.0 * rng.gen_range(0.5..1.5));
            let evap = 0.15 + 0.1 * summer;
            e_co.push(evap);
            e_mr.push(evap);
        }
        inflow.push(q);
        lateral.push(q_lat);
        muddy_run.push(q_mr);
        evap_co.push(e_co);
        evap_mr.push(e_mr);
    }
    HydrologyRecord::new(inflow, lateral, muddy_run, evap_co, evap_mr)
}

pub fn reference_system(n_years: usize, seed: u64) -> Result<SystemData, ConfigError> {
    Ok(SystemData {
        tables: reference_tables()?,
        demands: reference_demands()?,
        prices: reference_prices()?,
        hydrology: reference_hydrology(n_years, seed)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn trapezoid_storage() {
        let s = integrate_storage(&[0.0, 10.0, 20.0], &[100.0, 200.0, 200.0], 50.0);
        assert_eq!(s, vec![50.0, 1550.0, 3550.0]);
    }

    #[test]
    fn turbine_capacity_near_plant_rating() {
        let tables = reference_tables().unwrap();
        let cap = tables.conowingo_turbines.total_capacity();
        assert_relative_eq!(cap, 84_600.0);
    }

    #[test]
    fn muddy_run_has_a_full_generating_hour_at_reference_level() {
        let g = reference_tables().unwrap().muddy_run;
        let active = g.level_to_storage(505.0) - g.level_to_storage(470.0);
        assert!(active / 3600.0 > 32_000.0);
    }

    #[test]
    fn same_seed_same_record() {
        let a = reference_hydrology(2, 11).unwrap();
        let b = reference_hydrology(2, 11).unwrap();
        let c = reference_hydrology(2, 12).unwrap();
        let day = |r: &HydrologyRecord| r.trace(0, 2).unwrap().day(1, 40).inflow;
        assert_eq!(day(&a), day(&b));
        assert_ne!(day(&a), day(&c));
    }

    #[test]
    fn recreation_target_only_on_season_weekends() {
        let d = reference_demands().unwrap();
        let n_target = d.recreation_target.iter().filter(|&&h| h > 0.0).count();
        assert!(n_target > 30 && n_target < 50);
        assert_eq!(d.recreation_target[0], 0.0);
    }
}
