// internal modules
use crate::solver::Rep;
use crate::timing::ChopperTiming;

/// Everything needed to draw a time-distance diagram
///
/// Pure data with time in µs and distance in m. Rendering is left to the
/// caller.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeDistanceDiagram {
    /// Openings of every chopper, ordered from the moderator
    pub choppers: Vec<ChopperTiming>,
    /// One outline per transmitted pulse
    pub reps: Vec<RepTrace>,
    /// Length of the frame the openings cover (µs)
    pub frame: f64,
    /// Moderator to sample distance (m)
    pub sample_distance: f64,
    /// Moderator to detector distance (m)
    pub detector_distance: f64,
}

/// Outline of one transmitted pulse from the moderator to the detector
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RepTrace {
    /// Incident energy (meV)
    pub energy: f64,
    /// Corners as `(distance, time)`, going round the outline
    pub polygon: [(f64, f64); 4],
}

impl RepTrace {
    /// Outline of `rep` out to `distance`, assuming elastic scattering
    pub fn new(rep: &Rep, distance: f64) -> Self {
        let early = rep.lines.early;
        let late = rep.lines.late;
        Self {
            energy: rep.energy,
            polygon: [
                (0.0, early.intercept),
                (distance, early.at(distance)),
                (distance, late.at(distance)),
                (0.0, late.intercept),
            ],
        }
    }
}
