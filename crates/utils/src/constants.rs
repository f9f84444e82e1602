//! Physical constants and unit conversions shared by every crate
//!
//! Energies are in meV, wavelengths in Å, velocities in m/s and times of
//! flight in µs unless stated otherwise.

/// Neutron velocity per square root of energy, `v = E2V·√E` (m/s, meV)
pub const E2V: f64 = 437.392;

/// Energy to wavelength, `λ = √(E2L / E)` (Å, meV)
pub const E2L: f64 = 81.8042;

/// Energy to wavevector squared, `E = E2K·k²` (meV, Å⁻¹)
pub const E2K: f64 = 2.072124;

/// Time of flight per metre per Å of wavelength (µs)
pub const LAM2TOF: f64 = 252.7784;

/// Neutron mass in units of meV·s²/m², so that `E = ½·m·v²` is in meV
pub const NEUTRON_MASS_MEV: f64 = 1.045_408e-5;

/// Conversion between a gaussian standard deviation and its FWHM, 2√(2 ln 2)
pub const SIGMA2FWHM: f64 = 2.354_820_045_030_949;

/// Neutron velocity (m/s) for an energy (meV)
///
/// ```rust
/// # use tofchop_utils::constants::velocity;
/// assert!((velocity(25.0) - 2186.96).abs() < 1e-8);
/// ```
pub fn velocity(energy: f64) -> f64 {
    E2V * energy.sqrt()
}

/// Neutron energy (meV) for a velocity (m/s)
pub fn energy_from_velocity(velocity: f64) -> f64 {
    (velocity / E2V).powi(2)
}

/// Neutron wavelength (Å) for an energy (meV)
pub fn wavelength(energy: f64) -> f64 {
    (E2L / energy).sqrt()
}

/// Neutron energy (meV) for a wavelength (Å)
pub fn energy_from_wavelength(wavelength: f64) -> f64 {
    E2L / (wavelength * wavelength)
}

/// Neutron wavevector (Å⁻¹) for an energy (meV)
pub fn wavevector(energy: f64) -> f64 {
    (energy / E2K).sqrt()
}
