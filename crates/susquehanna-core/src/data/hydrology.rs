/// Exogenous hydrology of the two reservoirs.
///
/// A record holds year-major daily matrices (`[year][day_of_year]`): inflow
/// at Marietta, lateral inflow to Conowingo, inflow to Muddy Run (all cfs)
/// and evaporation depth of both lakes (in/day). Traces are borrowed
/// windows of consecutive years used by one simulation.
use crate::calendar::DAYS_PER_YEAR;
use crate::error::ConfigError;

/// Hydrology of one day.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DailyHydrology {
    pub inflow: f64,
    pub lateral_inflow: f64,
    pub muddy_run_inflow: f64,
    pub evaporation_conowingo: f64,
    pub evaporation_muddy_run: f64,
}

#[derive(Debug, Clone)]
pub struct HydrologyRecord {
    inflow: Vec<Vec<f64>>,
    lateral_inflow: Vec<Vec<f64>>,
    muddy_run_inflow: Vec<Vec<f64>>,
    evaporation_conowingo: Vec<Vec<f64>>,
    evaporation_muddy_run: Vec<Vec<f64>>,
}

fn check_matrix(name: &str, m: &[Vec<f64>], n_years: usize) -> Result<(), ConfigError> {
    if m.len() != n_years {
        return Err(ConfigError::DimensionMismatch {
            name: format!("{name} years"),
            expected: n_years,
            actual: m.len(),
        });
    }
    for row in m {
        if row.len() != DAYS_PER_YEAR {
            return Err(ConfigError::DimensionMismatch {
                name: format!("{name} days"),
                expected: DAYS_PER_YEAR,
                actual: row.len(),
            });
        }
    }
    if m.iter().flatten().any(|v| v.is_nan()) {
        return Err(ConfigError::InvalidTable {
            table: name.to_string(),
            reason: "contains NaN values".to_string(),
        });
    }
    Ok(())
}

impl HydrologyRecord {
    /// Validates:
    /// - at least one year
    /// - every matrix has the same number of 365-day years
    /// - no NaN values
    /// - evaporation depths are non-negative
    pub fn new(
        inflow: Vec<Vec<f64>>,
        lateral_inflow: Vec<Vec<f64>>,
        muddy_run_inflow: Vec<Vec<f64>>,
        evaporation_conowingo: Vec<Vec<f64>>,
        evaporation_muddy_run: Vec<Vec<f64>>,
    ) -> Result<Self, ConfigError> {
        let n_years = inflow.len();
        if n_years == 0 {
            return Err(ConfigError::InvalidTable {
                table: "inflow".to_string(),
                reason: "record is empty".to_string(),
            });
        }
        check_matrix("inflow", &inflow, n_years)?;
        check_matrix("lateral inflow", &lateral_inflow, n_years)?;
        check_matrix("muddy run inflow", &muddy_run_inflow, n_years)?;
        check_matrix("conowingo evaporation", &evaporation_conowingo, n_years)?;
        check_matrix("muddy run evaporation", &evaporation_muddy_run, n_years)?;
        if evaporation_conowingo
            .iter()
            .chain(&evaporation_muddy_run)
            .flatten()
            .any(|&e| e < 0.0)
        {
            return Err(ConfigError::InvalidTable {
                table: "evaporation".to_string(),
                reason: "negative evaporation depth".to_string(),
            });
        }
        Ok(Self {
            inflow,
            lateral_inflow,
            muddy_run_inflow,
            evaporation_conowingo,
            evaporation_muddy_run,
        })
    }

    pub fn n_years(&self) -> usize {
        self.inflow.len()
    }

    /// Number of disjoint traces of `n_years` consecutive years.
    pub fn n_traces(&self, n_years: usize) -> usize {
        if n_years == 0 {
            0
        } else {
            self.n_years() / n_years
        }
    }

    /// Window of `n_years` years starting at `first_year`.
    pub fn trace(
        &self,
        first_year: usize,
        n_years: usize,
    ) -> Result<HydrologyTrace<'_>, ConfigError> {
        if first_year + n_years > self.n_years() {
            return Err(ConfigError::HorizonTooLong {
                series: "hydrology".to_string(),
                required_years: first_year + n_years,
                available_years: self.n_years(),
            });
        }
        Ok(HydrologyTrace {
            record: self,
            first_year,
            n_years,
        })
    }
}

#[derive(Debug, Clone, Copy)]
pub struct HydrologyTrace<'a> {
    record: &'a HydrologyRecord,
    first_year: usize,
    n_years: usize,
}

impl HydrologyTrace<'_> {
    pub fn n_years(&self) -> usize {
        self.n_years
    }

    pub fn first_year(&self) -> usize {
        self.first_year
    }

    /// Hydrology of day `day_of_year` in year `year` of the trace.
    #[inline]
    pub fn day(&self, year: usize, day_of_year: usize) -> DailyHydrology {
        let y = self.first_year + year;
        let d = day_of_year;
        let r = self.record;
        DailyHydrology {
            inflow: r.inflow[y][d],
            lateral_inflow: r.lateral_inflow[y][d],
            muddy_run_inflow: r.muddy_run_inflow[y][d],
            evaporation_conowingo: r.evaporation_conowingo[y][d],
            evaporation_muddy_run: r.evaporation_muddy_run[y][d],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn years(n: usize, v: f64) -> Vec<Vec<f64>> {
        vec![vec![v; DAYS_PER_YEAR]; n]
    }

    fn record(n: usize) -> HydrologyRecord {
        let mut inflow = years(n, 40_000.0);
        for (y, row) in inflow.iter_mut().enumerate() {
            row[0] = y as f64;
        }
        HydrologyRecord::new(inflow, years(n, 1000.0), years(n, 5.0), years(n, 0.1), years(n, 0.1))
            .unwrap()
    }

    // -- valid construction --

    #[test]
    fn trace_offsets_years() {
        let r = record(4);
        assert_eq!(r.n_years(), 4);
        let t = r.trace(2, 2).unwrap();
        assert_eq!(t.day(0, 0).inflow, 2.0);
        assert_eq!(t.day(1, 0).inflow, 3.0);
        assert_eq!(t.day(1, 10).lateral_inflow, 1000.0);
    }

    #[test]
    fn counts_disjoint_traces() {
        let r = record(5);
        assert_eq!(r.n_traces(2), 2);
        assert_eq!(r.n_traces(5), 1);
        assert_eq!(r.n_traces(6), 0);
        assert_eq!(r.n_traces(0), 0);
    }

    // -- validation --

    #[test]
    fn rejects_horizon_past_record() {
        let r = record(2);
        assert!(matches!(
            r.trace(1, 2),
            Err(ConfigError::HorizonTooLong {
                required_years: 3,
                available_years: 2,
                ..
            })
        ));
    }

    #[test]
    fn rejects_year_count_mismatch() {
        let err = HydrologyRecord::new(
            years(2, 1.0),
            years(1, 1.0),
            years(2, 1.0),
            years(2, 0.0),
            years(2, 0.0),
        );
        assert!(matches!(err, Err(ConfigError::DimensionMismatch { .. })));
    }

    #[test]
    fn rejects_short_year() {
        let mut inflow = years(1, 1.0);
        inflow[0].pop();
        let err = HydrologyRecord::new(
            inflow,
            years(1, 1.0),
            years(1, 1.0),
            years(1, 0.0),
            years(1, 0.0),
        );
        assert!(err.is_err());
    }

    #[test]
    fn rejects_nan() {
        let mut lateral = years(1, 1.0);
        lateral[0][7] = f64::NAN;
        let err = HydrologyRecord::new(
            years(1, 1.0),
            lateral,
            years(1, 1.0),
            years(1, 0.0),
            years(1, 0.0),
        );
        assert!(err.is_err());
    }

    #[test]
    fn rejects_negative_evaporation() {
        let err = HydrologyRecord::new(
            years(1, 1.0),
            years(1, 1.0),
            years(1, 1.0),
            years(1, -0.1),
            years(1, 0.0),
        );
        assert!(err.is_err());
    }

    #[test]
    fn rejects_empty_record() {
        assert!(HydrologyRecord::new(vec![], vec![], vec![], vec![], vec![]).is_err());
    }
}
