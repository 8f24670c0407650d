//! Plain-text numeric input files.
//!
//! Files hold whitespace- or comma-separated numbers; line breaks carry no
//! meaning, shapes are supplied by the caller. `DataLayout` names the files
//! of a data directory.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::demand::{DemandSeries, PriceMatrix};
use super::hydrology::HydrologyRecord;
use super::SystemData;
use crate::calendar::DAYS_PER_YEAR;
use crate::error::ConfigError;
use crate::tables::constants::{
    LSV_ROWS, PUMP_TURBINE_FIELDS, SPILLWAY_ROWS, TAILWATER_ROWS, TURBINE_ROWS,
};
use crate::tables::{PhysicalTables, TableRows};

/// Parse every number in `text`.
pub fn parse_numbers(source_name: &str, text: &str) -> Result<Vec<f64>, ConfigError> {
    text.split(|c: char| c.is_whitespace() || c == ',')
        .filter(|t| !t.is_empty())
        .enumerate()
        .map(|(position, token)| {
            token.parse::<f64>().map_err(|_| ConfigError::Parse {
                source_name: source_name.to_string(),
                position,
                token: token.to_string(),
            })
        })
        .collect()
}

/// Split a flat row-major buffer into `n_rows` rows of equal length.
pub fn reshape(name: &str, values: Vec<f64>, n_rows: usize) -> Result<Vec<Vec<f64>>, ConfigError> {
    if n_rows == 0 || values.is_empty() || values.len() % n_rows != 0 {
        return Err(ConfigError::InvalidTable {
            table: name.to_string(),
            reason: format!("{} values cannot form {n_rows} equal rows", values.len()),
        });
    }
    let n_cols = values.len() / n_rows;
    Ok(values.chunks_exact(n_cols).map(<[f64]>::to_vec).collect())
}

fn read_numbers(path: &Path) -> Result<Vec<f64>, ConfigError> {
    let text = fs::read_to_string(path)?;
    let values = parse_numbers(&path.display().to_string(), &text)?;
    debug!(path = %path.display(), n_values = values.len(), "loaded numeric file");
    Ok(values)
}

/// Matrix with a known number of rows.
pub fn load_rows(path: &Path, n_rows: usize) -> Result<Vec<Vec<f64>>, ConfigError> {
    reshape(&path.display().to_string(), read_numbers(path)?, n_rows)
}

/// Vector with a known length.
pub fn load_vector(path: &Path, len: usize) -> Result<Vec<f64>, ConfigError> {
    let values = read_numbers(path)?;
    if values.len() != len {
        return Err(ConfigError::DimensionMismatch {
            name: path.display().to_string(),
            expected: len,
            actual: values.len(),
        });
    }
    Ok(values)
}

/// Year-major daily matrix; the number of years follows from the file.
pub fn load_years(path: &Path) -> Result<Vec<Vec<f64>>, ConfigError> {
    let values = read_numbers(path)?;
    if values.len() % DAYS_PER_YEAR != 0 {
        return Err(ConfigError::InvalidTable {
            table: path.display().to_string(),
            reason: format!("{} values is not a whole number of years", values.len()),
        });
    }
    let n_years = values.len() / DAYS_PER_YEAR;
    reshape(&path.display().to_string(), values, n_years)
}

/// Which hydrology files to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HydrologySource {
    Historic,
    Stochastic,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HydrologyFiles {
    pub inflow: PathBuf,
    pub lateral_inflow: PathBuf,
    pub muddy_run_inflow: PathBuf,
    pub evaporation_conowingo: PathBuf,
    pub evaporation_muddy_run: PathBuf,
}

impl Default for HydrologyFiles {
    fn default() -> Self {
        Self::historic()
    }
}

impl HydrologyFiles {
    pub fn historic() -> Self {
        let dir = Path::new("data_historical/vectors");
        Self {
            inflow: dir.join("MariettaFlows_history.txt"),
            lateral_inflow: dir.join("nLat_history.txt"),
            muddy_run_inflow: dir.join("nMR_history.txt"),
            evaporation_conowingo: dir.join("evapCO_history.txt"),
            evaporation_muddy_run: dir.join("evapMR_history.txt"),
        }
    }

    pub fn stochastic() -> Self {
        let dir = Path::new("dataMC");
        Self {
            inflow: dir.join("MariettaFlows_MC.txt"),
            lateral_inflow: dir.join("nLat_MC.txt"),
            muddy_run_inflow: dir.join("nMR_MC.txt"),
            evaporation_conowingo: dir.join("evapCO_MC.txt"),
            evaporation_muddy_run: dir.join("evapMR_MC.txt"),
        }
    }
}

/// File names, relative to a data directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataLayout {
    pub conowingo_lsv: PathBuf,
    pub muddy_run_lsv: PathBuf,
    pub tailwater: PathBuf,
    pub spillways: PathBuf,
    pub conowingo_turbines: PathBuf,
    pub muddy_run_units: PathBuf,
    /// One row of 24 hourly prices per day.
    pub energy_prices: PathBuf,
    pub min_flow: PathBuf,
    pub recreation_target: PathBuf,
    pub atomic_demand: PathBuf,
    pub baltimore_demand: PathBuf,
    pub chester_demand: PathBuf,
    pub historic: HydrologyFiles,
    pub stochastic: HydrologyFiles,
}

impl Default for DataLayout {
    fn default() -> Self {
        let dir = Path::new("data1999");
        Self {
            conowingo_lsv: dir.join("lsv_rel_Conowingo.txt"),
            muddy_run_lsv: dir.join("lsv_rel_Muddy.txt"),
            tailwater: dir.join("tailwater.txt"),
            spillways: dir.join("spillways_Conowingo.txt"),
            conowingo_turbines: dir.join("turbines_Conowingo2.txt"),
            muddy_run_units: dir.join("turbines_Muddy.txt"),
            energy_prices: dir.join("Pavg99.txt"),
            min_flow: dir.join("min_flow_req.txt"),
            recreation_target: dir.join("h_rec99.txt"),
            atomic_demand: dir.join("wAtomic.txt"),
            baltimore_demand: dir.join("wBaltimore.txt"),
            chester_demand: dir.join("wChester.txt"),
            historic: HydrologyFiles::historic(),
            stochastic: HydrologyFiles::stochastic(),
        }
    }
}

/// Load every table and series below `root`.
pub fn load_system(
    root: &Path,
    layout: &DataLayout,
    source: HydrologySource,
) -> Result<SystemData, ConfigError> {
    let at = |p: &Path| root.join(p);

    let rows = TableRows {
        conowingo_lsv: load_rows(&at(&layout.conowingo_lsv), LSV_ROWS)?,
        muddy_run_lsv: load_rows(&at(&layout.muddy_run_lsv), LSV_ROWS)?,
        tailwater: load_rows(&at(&layout.tailwater), TAILWATER_ROWS)?,
        spillways: load_rows(&at(&layout.spillways), SPILLWAY_ROWS)?,
        conowingo_turbines: load_rows(&at(&layout.conowingo_turbines), TURBINE_ROWS)?,
        muddy_run_units: load_vector(&at(&layout.muddy_run_units), PUMP_TURBINE_FIELDS)?,
    };
    let tables = PhysicalTables::from_rows(&rows)?;

    let demands = DemandSeries::new(
        load_vector(&at(&layout.atomic_demand), DAYS_PER_YEAR)?,
        load_vector(&at(&layout.baltimore_demand), DAYS_PER_YEAR)?,
        load_vector(&at(&layout.chester_demand), DAYS_PER_YEAR)?,
        load_vector(&at(&layout.min_flow), DAYS_PER_YEAR)?,
        load_vector(&at(&layout.recreation_target), DAYS_PER_YEAR)?,
    )?;

    let price_rows = load_rows(&at(&layout.energy_prices), DAYS_PER_YEAR)?;
    let prices = PriceMatrix::from_daily_rows(&price_rows)?;

    let files = match source {
        HydrologySource::Historic => &layout.historic,
        HydrologySource::Stochastic => &layout.stochastic,
    };
    let hydrology = HydrologyRecord::new(
        load_years(&at(&files.inflow))?,
        load_years(&at(&files.lateral_inflow))?,
        load_years(&at(&files.muddy_run_inflow))?,
        load_years(&at(&files.evaporation_conowingo))?,
        load_years(&at(&files.evaporation_muddy_run))?,
    )?;

    Ok(SystemData {
        tables,
        demands,
        prices,
        hydrology,
    })
}
