// tofchop modules
use tofchop_utils::constants::energy_from_velocity;

/// A neutron trajectory on the time-distance plane
///
/// Time in µs is `slope·d + intercept` for a distance `d` in m from the
/// moderator. The slope is the inverse velocity, so a faster neutron has a
/// shallower line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Line {
    /// Inverse velocity (µs/m)
    pub slope: f64,
    /// Time of emission at the moderator face (µs)
    pub intercept: f64,
}

impl Line {
    /// Line through the points `(0, intercept)` and `(distance, time)`
    pub fn through(intercept: f64, distance: f64, time: f64) -> Self {
        Self {
            slope: (time - intercept) / distance,
            intercept,
        }
    }

    /// Time at which the trajectory reaches `distance` (µs)
    ///
    /// ```rust
    /// # use tofchop_cascade::Line;
    /// let line = Line::through(10.0, 20.0, 50.0);
    /// assert_eq!(line.at(10.0), 30.0);
    /// ```
    pub fn at(&self, distance: f64) -> f64 {
        self.slope * distance + self.intercept
    }

    /// Same velocity, passing through `(distance, time)` instead
    pub fn translated(&self, distance: f64, time: f64) -> Self {
        Self {
            slope: self.slope,
            intercept: time - self.slope * distance,
        }
    }

    /// Rotated about its own time at `pivot` so it passes `(distance, time)`
    pub fn pivoted(&self, pivot: f64, distance: f64, time: f64) -> Self {
        let slope = (self.at(pivot) - time) / (pivot - distance);
        Self {
            slope,
            intercept: time - slope * distance,
        }
    }

    /// Neutron velocity along the line (m/s)
    pub fn velocity(&self) -> f64 {
        1e6 / self.slope
    }
}

/// The fastest and slowest trajectories bounding one transmitted pulse
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinePair {
    /// Leading edge, leaving the moderator first
    pub early: Line,
    /// Trailing edge
    pub late: Line,
}

impl LinePair {
    /// Earliest and latest arrival of the pulse at `distance` (µs)
    ///
    /// Lines may cross, so the two times are ordered before returning.
    pub fn span_at(&self, distance: f64) -> (f64, f64) {
        let a = self.early.at(distance);
        let b = self.late.at(distance);
        if a <= b {
            (a, b)
        } else {
            (b, a)
        }
    }

    /// Mean inverse velocity of the pulse (µs/m)
    pub fn mean_slope(&self) -> f64 {
        0.5 * (self.early.slope + self.late.slope)
    }

    /// Incident energy carried by the pulse centre (meV)
    pub fn energy(&self) -> f64 {
        energy_from_velocity(1e6 / self.mean_slope())
    }
}
