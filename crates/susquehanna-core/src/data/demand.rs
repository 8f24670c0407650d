//! Calendar-day demand, target and price series.
//!
//! Every series covers one 365-day year; lookups wrap the day of year.

use crate::calendar::{DAYS_PER_YEAR, HOURS_PER_DAY};
use crate::error::ConfigError;

/// Withdrawal demands of the three supply users on one day [cfs].
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DailyDemand {
    pub atomic: f64,
    pub baltimore: f64,
    pub chester: f64,
}

#[derive(Debug, Clone)]
pub struct DemandSeries {
    pub atomic: Vec<f64>,
    pub baltimore: Vec<f64>,
    pub chester: Vec<f64>,
    /// Minimum environmental flow downstream [cfs].
    pub min_flow: Vec<f64>,
    /// Recreation target level [ft]; zero outside the season.
    pub recreation_target: Vec<f64>,
}

fn check_year(name: &str, values: &[f64]) -> Result<(), ConfigError> {
    if values.len() != DAYS_PER_YEAR {
        return Err(ConfigError::DimensionMismatch {
            name: name.to_string(),
            expected: DAYS_PER_YEAR,
            actual: values.len(),
        });
    }
    if values.iter().any(|v| !v.is_finite() || *v < 0.0) {
        return Err(ConfigError::InvalidTable {
            table: name.to_string(),
            reason: "values must be finite and non-negative".to_string(),
        });
    }
    Ok(())
}

fn series_max(values: &[f64]) -> f64 {
    values.iter().copied().fold(0.0, f64::max)
}

impl DemandSeries {
    pub fn new(
        atomic: Vec<f64>,
        baltimore: Vec<f64>,
        chester: Vec<f64>,
        min_flow: Vec<f64>,
        recreation_target: Vec<f64>,
    ) -> Result<Self, ConfigError> {
        check_year("atomic demand", &atomic)?;
        check_year("baltimore demand", &baltimore)?;
        check_year("chester demand", &chester)?;
        check_year("minimum flow", &min_flow)?;
        check_year("recreation target", &recreation_target)?;
        Ok(Self {
            atomic,
            baltimore,
            chester,
            min_flow,
            recreation_target,
        })
    }

    pub fn day(&self, day_of_year: usize) -> DailyDemand {
        let d = day_of_year % DAYS_PER_YEAR;
        DailyDemand {
            atomic: self.atomic[d],
            baltimore: self.baltimore[d],
            chester: self.chester[d],
        }
    }

    /// Largest daily demand of each user, used to scale policy outputs.
    pub fn max_demand(&self) -> DailyDemand {
        DailyDemand {
            atomic: series_max(&self.atomic),
            baltimore: series_max(&self.baltimore),
            chester: series_max(&self.chester),
        }
    }
}

/// Hourly energy prices, indexed `[hour][day_of_year]` [$/MWh].
#[derive(Debug, Clone)]
pub struct PriceMatrix {
    prices: Vec<Vec<f64>>,
}

impl PriceMatrix {
    /// From a `24 x 365` matrix indexed by hour then day.
    pub fn new(prices: Vec<Vec<f64>>) -> Result<Self, ConfigError> {
        if prices.len() != HOURS_PER_DAY {
            return Err(ConfigError::DimensionMismatch {
                name: "energy price hours".to_string(),
                expected: HOURS_PER_DAY,
                actual: prices.len(),
            });
        }
        for row in &prices {
            if row.len() != DAYS_PER_YEAR {
                return Err(ConfigError::DimensionMismatch {
                    name: "energy price days".to_string(),
                    expected: DAYS_PER_YEAR,
                    actual: row.len(),
                });
            }
        }
        if prices.iter().flatten().any(|p| !p.is_finite()) {
            return Err(ConfigError::InvalidTable {
                table: "energy prices".to_string(),
                reason: "non-finite price".to_string(),
            });
        }
        Ok(Self { prices })
    }

    /// From day-major rows (one row of 24 hourly prices per day).
    pub fn from_daily_rows(rows: &[Vec<f64>]) -> Result<Self, ConfigError> {
        if rows.len() != DAYS_PER_YEAR {
            return Err(ConfigError::DimensionMismatch {
                name: "energy price days".to_string(),
                expected: DAYS_PER_YEAR,
                actual: rows.len(),
            });
        }
        let mut prices = vec![Vec::with_capacity(DAYS_PER_YEAR); HOURS_PER_DAY];
        for row in rows {
            if row.len() != HOURS_PER_DAY {
                return Err(ConfigError::DimensionMismatch {
                    name: "energy price hours".to_string(),
                    expected: HOURS_PER_DAY,
                    actual: row.len(),
                });
            }
            for (hour, &p) in row.iter().enumerate() {
                prices[hour].push(p);
            }
        }
        Self::new(prices)
    }

    #[inline]
    pub fn price(&self, hour: usize, day_of_year: usize) -> f64 {
        self.prices[hour % HOURS_PER_DAY][day_of_year % DAYS_PER_YEAR]
    }
}
