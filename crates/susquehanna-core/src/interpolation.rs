//! Piecewise-linear relationship tables.
//!
//! Queries inside the breakpoint range interpolate linearly; queries outside
//! extrapolate with the slope of the nearest boundary segment. Tables are
//! validated once and immutable afterwards.

use crate::error::ConfigError;

#[derive(Debug, Clone, PartialEq)]
pub struct PiecewiseLinear {
    x: Vec<f64>,
    y: Vec<f64>,
}

impl PiecewiseLinear {
    /// Build a table from breakpoints sorted by `x`.
    ///
    /// Requires at least two breakpoints, equal lengths, finite values and
    /// strictly increasing `x`.
    pub fn new(name: &str, x: Vec<f64>, y: Vec<f64>) -> Result<Self, ConfigError> {
        let invalid = |reason: String| ConfigError::InvalidTable {
            table: name.to_string(),
            reason,
        };
        if x.len() != y.len() {
            return Err(invalid(format!(
                "x has {} breakpoints but y has {}",
                x.len(),
                y.len()
            )));
        }
        if x.len() < 2 {
            return Err(invalid(format!(
                "needs at least 2 breakpoints, got {}",
                x.len()
            )));
        }
        if x.iter().chain(&y).any(|v| !v.is_finite()) {
            return Err(invalid("contains non-finite values".to_string()));
        }
        if let Some(i) = x.windows(2).position(|w| w[1] <= w[0]) {
            return Err(invalid(format!(
                "x is not strictly increasing at breakpoint {}",
                i + 1
            )));
        }
        Ok(Self { x, y })
    }

    /// Swap the axes. The dependent values must be strictly increasing.
    pub fn inverse(&self, name: &str) -> Result<Self, ConfigError> {
        Self::new(name, self.y.clone(), self.x.clone())
    }

    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    pub fn x(&self) -> &[f64] {
        &self.x
    }

    pub fn y(&self) -> &[f64] {
        &self.y
    }

    /// Domain covered by the breakpoints.
    pub fn domain(&self) -> (f64, f64) {
        (self.x[0], self.x[self.x.len() - 1])
    }

    pub fn is_monotone_increasing(&self) -> bool {
        self.y.windows(2).all(|w| w[1] >= w[0])
    }

    /// Interpolated value at `q`.
    pub fn eval(&self, q: f64) -> f64 {
        let n = self.x.len();
        let seg = if q <= self.x[0] {
            0
        } else if q >= self.x[n - 1] {
            n - 2
        } else {
            // first index with x > q, minus one
            self.x.partition_point(|&xi| xi <= q) - 1
        };
        let (x0, x1) = (self.x[seg], self.x[seg + 1]);
        let (y0, y1) = (self.y[seg], self.y[seg + 1]);
        y0 + (q - x0) * (y1 - y0) / (x1 - x0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn table() -> PiecewiseLinear {
        PiecewiseLinear::new("t", vec![0.0, 10.0, 20.0], vec![0.0, 100.0, 150.0]).unwrap()
    }

    #[test]
    fn interpolates_inside() {
        let t = table();
        assert_relative_eq!(t.eval(5.0), 50.0);
        assert_relative_eq!(t.eval(15.0), 125.0);
    }

    #[test]
    fn hits_breakpoints_exactly() {
        let t = table();
        assert_relative_eq!(t.eval(0.0), 0.0);
        assert_relative_eq!(t.eval(10.0), 100.0);
        assert_relative_eq!(t.eval(20.0), 150.0);
    }

    #[test]
    fn extrapolates_above_with_last_slope() {
        let t = table();
        // last slope = 5 per unit
        assert_relative_eq!(t.eval(30.0), 200.0);
        assert!(t.eval(20.5) > 150.0);
    }

    #[test]
    fn extrapolates_below_with_first_slope() {
        let t = table();
        assert_relative_eq!(t.eval(-2.0), -20.0);
    }

    #[test]
    fn inverse_roundtrip() {
        let t = table();
        let inv = t.inverse("t_inv").unwrap();
        for q in [0.0, 3.3, 10.0, 17.1, 20.0] {
            assert_relative_eq!(inv.eval(t.eval(q)), q, epsilon = 1e-12);
        }
    }

    #[test]
    fn rejects_unsorted_x() {
        let err = PiecewiseLinear::new("bad", vec![0.0, 2.0, 1.0], vec![0.0, 1.0, 2.0]);
        assert!(matches!(err, Err(ConfigError::InvalidTable { .. })));
    }

    #[test]
    fn rejects_duplicate_x() {
        assert!(PiecewiseLinear::new("dup", vec![1.0, 1.0], vec![0.0, 1.0]).is_err());
    }

    #[test]
    fn rejects_single_breakpoint() {
        assert!(PiecewiseLinear::new("one", vec![1.0], vec![1.0]).is_err());
    }

    #[test]
    fn rejects_length_mismatch() {
        assert!(PiecewiseLinear::new("len", vec![1.0, 2.0], vec![1.0]).is_err());
    }

    #[test]
    fn rejects_nan() {
        assert!(PiecewiseLinear::new("nan", vec![1.0, 2.0], vec![1.0, f64::NAN]).is_err());
    }

    #[test]
    fn inverse_of_flat_table_fails() {
        let flat = PiecewiseLinear::new("flat", vec![0.0, 1.0, 2.0], vec![5.0, 5.0, 6.0]).unwrap();
        assert!(flat.inverse("flat_inv").is_err());
    }
}
