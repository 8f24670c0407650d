//! Unit conversions shared by the reservoir and hydropower computations.
//!
//! Geometry tables are in US customary units (ft, acres, acre-ft); the
//! simulation integrates volumes in cubic feet and flows in cfs, and the
//! power equation works in SI.

/// Square feet per acre (and cubic feet per acre-foot).
pub const SQ_FEET_PER_ACRE: f64 = 43_560.0;

/// Cubic metres per cubic foot, as used in the power equation.
pub const CUBIC_METERS_PER_CUBIC_FOOT: f64 = 0.0283;

/// Metres per foot.
pub const METERS_PER_FOOT: f64 = 0.3048;

/// Inches per foot.
pub const INCHES_PER_FOOT: f64 = 12.0;

/// Seconds per day.
pub const SECONDS_PER_DAY: f64 = 86_400.0;

#[inline]
pub fn acre_feet_to_cubic_feet(volume: f64) -> f64 {
    volume * SQ_FEET_PER_ACRE
}

#[inline]
pub fn cubic_feet_to_acre_feet(volume: f64) -> f64 {
    volume / SQ_FEET_PER_ACRE
}

#[inline]
pub fn acres_to_square_feet(area: f64) -> f64 {
    area * SQ_FEET_PER_ACRE
}

#[inline]
pub fn inches_to_feet(depth: f64) -> f64 {
    depth / INCHES_PER_FOOT
}

/// Evaporation loss as a flow [cfs] from a daily depth [in/day] over a
/// surface [ft^2].
#[inline]
pub fn evaporation_flow(depth_in_per_day: f64, surface_sq_ft: f64) -> f64 {
    inches_to_feet(depth_in_per_day) * surface_sq_ft / SECONDS_PER_DAY
}
