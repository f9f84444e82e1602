use crate::error::{Error, Result};

/// Detector element at the end of the secondary flight path
#[derive(Debug, Clone, PartialEq)]
pub struct Detector {
    /// Outer diameter of a tube, or width of a slab (m)
    pub diameter: f64,
    /// How the absorption depth is distributed
    pub model: DetectorModel,
}

/// Absorption depth models
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DetectorModel {
    /// Uniform absorption across a slab of fixed depth (m)
    Slab { depth: f64 },

    /// Cylindrical ³He gas tube
    ///
    /// Absorption follows the gas `pressure` (atm). The `wall_ratio` is the
    /// fraction of the radius taken up by the tube wall.
    He3Tube { pressure: f64, wall_ratio: f64 },
}

impl Detector {
    /// Inner radius of the gas volume (m)
    pub fn effective_radius(&self) -> f64 {
        match self.model {
            DetectorModel::Slab { .. } => 0.5 * self.diameter,
            DetectorModel::He3Tube { wall_ratio, .. } => 0.5 * self.diameter * (1.0 - wall_ratio),
        }
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if !(self.diameter > 0.0) {
            return Err(Error::invalid("detector", "diameter must be positive"));
        }
        match self.model {
            DetectorModel::Slab { depth } if !(depth > 0.0) => {
                Err(Error::invalid("detector", "slab depth must be positive"))
            }
            DetectorModel::He3Tube {
                pressure,
                wall_ratio,
            } if !(pressure > 0.0) || !(0.0..1.0).contains(&wall_ratio) => Err(Error::invalid(
                "detector",
                "tube pressure must be positive and the wall ratio in [0, 1)",
            )),
            _ => Ok(()),
        }
    }
}
