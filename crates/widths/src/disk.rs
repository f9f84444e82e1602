// tofchop modules
use tofchop_instrument::DiskChopper;
use tofchop_utils::constants::SIGMA2FWHM;

/// FWHM of the disk opening in time (s)
///
/// The slot sweeps past the guide in `W = (s + g)/u`. When the guide is at
/// least as wide as the slot the profile is treated as a triangle of FWHM
/// `W/2`. A narrower guide gives a trapezoid with a flat top of `(s − g)/u`
/// and ramps of `g/u`, whose FWHM is the flat top plus one ramp.
///
/// ```rust
/// # use tofchop_instrument::DiskChopper;
/// # use tofchop_widths::disk;
/// let chopper = DiskChopper {
///     slots: 1,
///     slot_angles: None,
///     slot_width: 40.0,
///     guide_width: 40.0,
///     radius: 300.0,
///     disks: 1,
///     independent_phase: false,
///     default_phase: 0.0,
/// };
/// let u = chopper.rim_speed(100.0);
/// assert!((disk::fwhm(&chopper, 100.0) - 40.0 / u).abs() < 1e-15);
/// ```
pub fn fwhm(chopper: &DiskChopper, frequency: f64) -> f64 {
    let u = chopper.rim_speed(frequency);
    let (s, g) = (chopper.slot_width, chopper.guide_width);

    if g >= s {
        0.5 * (s + g) / u
    } else {
        let flat = (s - g) / u;
        let ramp = g / u;
        flat + ramp
    }
}

/// Time variance of the disk opening (s²)
pub fn variance(chopper: &DiskChopper, frequency: f64) -> f64 {
    (fwhm(chopper, frequency) / SIGMA2FWHM).powi(2)
}
