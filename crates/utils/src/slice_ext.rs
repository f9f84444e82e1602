use crate::error::{Error, Result};

/// Extends functionality for slices of float arrays
pub trait SliceExt<T> {
    /// Find index bin containing 'value', where bins are low <= value < high
    ///
    /// A value on a bin edge returns the bin above. Values equal to the highest
    /// bound are considered part of the last bin.
    ///
    /// ```text
    ///     nodes: 1.0 2.0 4.0
    ///     1.0 <= bin 0 < 2.0
    ///     2.0 <= bin 1 <= 4.0
    /// ```
    ///
    /// ```rust
    /// # use tofchop_utils::SliceExt;
    /// let nodes = vec![1.0, 2.0, 4.0];
    ///
    /// assert_eq!(nodes.find_bin_exclusive(1.0), Ok(0));
    /// assert_eq!(nodes.find_bin_exclusive(2.0), Ok(1));
    /// assert_eq!(nodes.find_bin_exclusive(4.0), Ok(1));
    ///
    /// // Values outside the bin bounds are an error case
    /// assert!(nodes.find_bin_exclusive(0.5).is_err());
    /// assert!(nodes.find_bin_exclusive(4.5).is_err());
    /// ```
    fn find_bin_exclusive(&self, value: T) -> Result<usize>;

    /// Check every value is finite and larger than the one before
    ///
    /// The error carries the index of the first offending value.
    ///
    /// ```rust
    /// # use tofchop_utils::{Error, SliceExt};
    /// assert_eq!([0.5, 1.0, 7.0].check_strictly_increasing(), Ok(()));
    /// assert_eq!(
    ///     [0.5, 1.0, 1.0].check_strictly_increasing(),
    ///     Err(Error::NotStrictlyIncreasing { index: 2 })
    /// );
    /// ```
    fn check_strictly_increasing(&self) -> Result<()>;
}

impl SliceExt<f64> for [f64] {
    fn find_bin_exclusive(&self, value: f64) -> Result<usize> {
        // make sure there are bin edges to check against
        let n = self.len();
        let (Some(lower_bound), Some(upper_bound)) = (self.first(), self.last()) else {
            return Err(Error::BelowMinimumSliceLength {
                length: n,
                minimum_required: 2,
            });
        };
        if n < 2 {
            return Err(Error::BelowMinimumSliceLength {
                length: n,
                minimum_required: 2,
            });
        }

        // is the value relevant?
        if value < *lower_bound || value > *upper_bound || value.is_nan() {
            return Err(Error::ValueOutsideOfBounds {
                value,
                lower_bound: *lower_bound,
                upper_bound: *upper_bound,
            });
        }

        // special case for being on the upper edge
        if value == *upper_bound {
            return Ok(n - 2);
        }

        // edges are sorted, so the first upper edge above the value wins
        self.windows(2)
            .position(|edge| edge[0] <= value && value < edge[1])
            .ok_or(Error::UncapturedErrorCondition)
    }

    fn check_strictly_increasing(&self) -> Result<()> {
        if let Some(index) = self.iter().position(|v| !v.is_finite()) {
            return Err(Error::NotStrictlyIncreasing { index });
        }

        match self.windows(2).position(|pair| pair[1] <= pair[0]) {
            Some(index) => Err(Error::NotStrictlyIncreasing { index: index + 1 }),
            None => Ok(()),
        }
    }
}
