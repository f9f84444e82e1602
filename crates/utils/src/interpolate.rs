use crate::error::{Error, Result};
use crate::SliceExt;

/// Natural cubic spline through tabulated values, clamped at the table ends
///
/// Measured moderator widths and white-beam flux tables are interpolated
/// with this. Evaluation reproduces every node exactly and returns the end
/// values (not an extrapolation) for arguments outside the table.
///
/// ```rust
/// # use tofchop_utils::CubicSpline;
/// let spline = CubicSpline::new(&[1.0, 2.0, 3.0], &[10.0, 20.0, 15.0]).unwrap();
///
/// assert_eq!(spline.eval(2.0), 20.0);
/// assert_eq!(spline.eval(0.0), 10.0);
/// assert_eq!(spline.eval(9.0), 15.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct CubicSpline {
    x: Vec<f64>,
    y: Vec<f64>,
    /// Second derivatives at the nodes
    y2: Vec<f64>,
}

impl CubicSpline {
    /// Fit a spline to strictly increasing nodes `x` and values `y`
    ///
    /// At least two nodes are required. Two nodes give linear interpolation.
    pub fn new(x: &[f64], y: &[f64]) -> Result<Self> {
        if x.len() != y.len() {
            return Err(Error::MismatchedLengths {
                x: x.len(),
                y: y.len(),
            });
        }
        if x.len() < 2 {
            return Err(Error::BelowMinimumSliceLength {
                length: x.len(),
                minimum_required: 2,
            });
        }
        x.check_strictly_increasing()?;
        if y.iter().any(|v| !v.is_finite()) {
            return Err(Error::SliceContainsUndefinedValues);
        }

        Ok(Self {
            x: x.to_vec(),
            y: y.to_vec(),
            y2: second_derivatives(x, y),
        })
    }

    /// Interpolated value at `x`, clamped to the end values outside the table
    pub fn eval(&self, x: f64) -> f64 {
        let n = self.x.len();
        if x <= self.x[0] {
            return self.y[0];
        }
        if x >= self.x[n - 1] {
            return self.y[n - 1];
        }

        // in range by the checks above, so the fallback is never taken
        let lo = self.x.find_bin_exclusive(x).unwrap_or(n - 2);
        let hi = lo + 1;

        let h = self.x[hi] - self.x[lo];
        let a = (self.x[hi] - x) / h;
        let b = (x - self.x[lo]) / h;

        a * self.y[lo]
            + b * self.y[hi]
            + ((a * a * a - a) * self.y2[lo] + (b * b * b - b) * self.y2[hi]) * (h * h) / 6.0
    }

    /// Tabulated range `(first, last)` of the spline nodes
    pub fn domain(&self) -> (f64, f64) {
        (self.x[0], self.x[self.x.len() - 1])
    }
}

/// Tridiagonal solve for natural boundary conditions (zero curvature at ends)
fn second_derivatives(x: &[f64], y: &[f64]) -> Vec<f64> {
    let n = x.len();
    let mut y2 = vec![0.0; n];
    let mut u = vec![0.0; n];

    for i in 1..n - 1 {
        let sig = (x[i] - x[i - 1]) / (x[i + 1] - x[i - 1]);
        let p = sig * y2[i - 1] + 2.0;
        y2[i] = (sig - 1.0) / p;
        let slope = (y[i + 1] - y[i]) / (x[i + 1] - x[i]) - (y[i] - y[i - 1]) / (x[i] - x[i - 1]);
        u[i] = (6.0 * slope / (x[i + 1] - x[i - 1]) - sig * u[i - 1]) / p;
    }

    y2[n - 1] = 0.0;
    for k in (0..n - 1).rev() {
        y2[k] = y2[k] * y2[k + 1] + u[k];
    }
    y2
}
