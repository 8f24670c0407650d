//! Level / surface / storage relationships of a reservoir.
//!
//! Tables are stored in ft, acres and acre-ft; the public API works in ft,
//! square feet and cubic feet, which is what the mass balance integrates.

use super::constants::LSV_ROWS;
use crate::error::ConfigError;
use crate::interpolation::PiecewiseLinear;
use crate::units;

#[derive(Debug, Clone)]
pub struct ReservoirGeometry {
    name: String,
    level_to_storage: PiecewiseLinear,
    storage_to_level: PiecewiseLinear,
    level_to_surface: PiecewiseLinear,
}

impl ReservoirGeometry {
    /// Build from parallel level [ft], surface [acre] and storage [acre-ft]
    /// breakpoints. Storage must be strictly increasing with level so the
    /// mapping is invertible.
    pub fn new(
        name: &str,
        levels: Vec<f64>,
        surfaces: Vec<f64>,
        storages: Vec<f64>,
    ) -> Result<Self, ConfigError> {
        let level_to_storage =
            PiecewiseLinear::new(&format!("{name} level->storage"), levels.clone(), storages)?;
        let storage_to_level = level_to_storage.inverse(&format!("{name} storage->level"))?;
        let level_to_surface =
            PiecewiseLinear::new(&format!("{name} level->surface"), levels, surfaces)?;
        if level_to_surface.y().iter().any(|&a| a < 0.0) {
            return Err(ConfigError::InvalidTable {
                table: format!("{name} level->surface"),
                reason: "negative surface area".to_string(),
            });
        }
        Ok(Self {
            name: name.to_string(),
            level_to_storage,
            storage_to_level,
            level_to_surface,
        })
    }

    /// Build from a 3-row matrix `[levels, surfaces, storages]`.
    pub fn from_rows(name: &str, rows: &[Vec<f64>]) -> Result<Self, ConfigError> {
        if rows.len() != LSV_ROWS {
            return Err(ConfigError::DimensionMismatch {
                name: format!("{name} lsv table rows"),
                expected: LSV_ROWS,
                actual: rows.len(),
            });
        }
        Self::new(name, rows[0].clone(), rows[1].clone(), rows[2].clone())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Level range covered by the table [ft].
    pub fn level_domain(&self) -> (f64, f64) {
        self.level_to_storage.domain()
    }

    /// Level [ft] for a storage [ft^3].
    pub fn storage_to_level(&self, storage: f64) -> f64 {
        self.storage_to_level
            .eval(units::cubic_feet_to_acre_feet(storage))
    }

    /// Storage [ft^3] for a level [ft].
    pub fn level_to_storage(&self, level: f64) -> f64 {
        units::acre_feet_to_cubic_feet(self.level_to_storage.eval(level))
    }

    /// Surface area [ft^2] for a level [ft].
    pub fn level_to_surface(&self, level: f64) -> f64 {
        units::acres_to_square_feet(self.level_to_surface.eval(level))
    }
}
