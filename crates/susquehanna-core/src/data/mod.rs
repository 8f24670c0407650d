//! Reference data shared by every evaluation: tables, demands, prices and
//! hydrology.

pub mod demand;
pub mod hydrology;
pub mod loader;

pub use demand::{DailyDemand, DemandSeries, PriceMatrix};
pub use hydrology::{DailyHydrology, HydrologyRecord, HydrologyTrace};
pub use loader::{load_system, DataLayout, HydrologyFiles, HydrologySource};

use crate::tables::PhysicalTables;

/// Everything a model reads but never mutates.
#[derive(Debug, Clone)]
pub struct SystemData {
    pub tables: PhysicalTables,
    pub demands: DemandSeries,
    pub prices: PriceMatrix,
    pub hydrology: HydrologyRecord,
}
