//! Physical constants and reference table shapes.

/// Specific weight factor of water used in the power equation [kg/m^3].
pub const WATER_DENSITY: f64 = 1000.0;

/// Gravitational acceleration [m/s^2].
pub const GRAVITY: f64 = 9.81;

/// Rows of a level/surface/storage table: level [ft], surface [acre], storage [acre-ft].
pub const LSV_ROWS: usize = 3;

/// Number of turbine units at Conowingo.
pub const CONOWINGO_TURBINES: usize = 13;

/// Number of reversible pump-turbine units at Muddy Run.
pub const MUDDY_RUN_UNITS: usize = 8;

/// Rows of the Conowingo turbine table: max flow, min flow, efficiency.
pub const TURBINE_ROWS: usize = 3;

/// Entries of the Muddy Run unit vector: turbine capacity, turbine efficiency,
/// pump capacity, pump efficiency.
pub const PUMP_TURBINE_FIELDS: usize = 4;

/// Rows of the tailwater table: release [cfs], tailwater level [ft].
pub const TAILWATER_ROWS: usize = 2;

/// Rows of the spillway table: level [ft], max discharge [cfs], min discharge [cfs].
pub const SPILLWAY_ROWS: usize = 3;
