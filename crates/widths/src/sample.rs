// tofchop modules
use tofchop_instrument::{Sample, SampleShape};

/// Fraction of the squared transverse extent giving the spatial variance
///
/// Shapes without a known scaling, [SampleShape::Other], use the flat plate
/// value of 1/12.
pub fn shape_scaling(shape: SampleShape) -> f64 {
    match shape {
        SampleShape::Flat | SampleShape::Ellipse => 1.0 / 12.0,
        SampleShape::Annulus => 1.0 / 8.0,
        SampleShape::Cylinder => 1.0 / 16.0,
        SampleShape::Sphere => 1.0 / 20.0,
        SampleShape::Other(_) => 1.0 / 12.0,
    }
}

/// Spatial variance across the beam (m²)
///
/// Only the extent transverse to the beam contributes.
pub fn variance(sample: &Sample) -> f64 {
    let y = sample.dimensions[1];
    y * y * shape_scaling(sample.shape)
}

/// Spread in final flight time from the sample size (s²)
///
/// The path difference across the sample projects onto the scattered beam
/// through the scattering angle.
pub fn time_variance(sample: &Sample, vf: f64) -> f64 {
    let phi = sample.angle.to_radians();
    variance(sample) * phi.sin().powi(2) / (vf * vf)
}
