//! Fermi chopper opening time and transmission
//!
//! For a package of slit pitch `p`, radius `R` and slit curvature `ρ`
//! rotating at `ω = 2πf`, a neutron of speed `v` sees the curvature
//! parameter
//!
//! ```text
//!     γ = (2R²/p)·|1/ρ − 2ω/v|
//! ```
//!
//! and the burst has a characteristic half-width `τ = p/(2Rω)`. Nothing is
//! transmitted for `γ ≥ 4`.

// tofchop modules
use tofchop_instrument::FermiPackage;
use tofchop_utils::constants::velocity;

// internal modules
use crate::estimate::{Diagnostic, Estimate};

/// Curvature above which no neutron passes the slits
pub const GAMMA_CUTOFF: f64 = 4.0;

/// Angular speed for a rotation frequency (rad/s)
fn omega(frequency: f64) -> f64 {
    2.0 * std::f64::consts::PI * frequency
}

/// Characteristic half-width τ of the transmitted burst (s)
pub fn burst_half_width(package: &FermiPackage, frequency: f64) -> f64 {
    package.pslit / (2.0 * package.radius * omega(frequency))
}

/// Curvature parameter γ for an incident energy (meV)
pub fn gamma(package: &FermiPackage, frequency: f64, ei: f64) -> f64 {
    // package geometry is in mm
    let p = package.pslit * 1e-3;
    let r = package.radius * 1e-3;
    let rho = package.rho * 1e-3;
    (2.0 * r * r / p) * (1.0 / rho - 2.0 * omega(frequency) / velocity(ei)).abs()
}

/// Time variance of the chopper opening (s²)
///
/// ```text
///     γ ≤ 1:      τ²/6 · (1 − γ⁴/10) / (1 − γ²/6)
///     1 < γ < 4:  τ²/6 · 0.6γ(2 − √γ)²(√γ + 8)/(√γ + 4)
/// ```
///
/// Both branches give `1.08·τ²/6` at `γ = 1` and the second falls to zero
/// as `γ → 4`.
pub fn chopper_variance(package: &FermiPackage, frequency: f64, ei: f64) -> Estimate {
    let g = gamma(package, frequency, ei);
    if !(g < GAMMA_CUTOFF) {
        return Estimate::undefined(Diagnostic::NoTransmission { gamma: g });
    }

    let tau = burst_half_width(package, frequency);
    let base = tau * tau / 6.0;
    let shape = if g <= 1.0 {
        (1.0 - g.powi(4) / 10.0) / (1.0 - g * g / 6.0)
    } else {
        let rg = g.sqrt();
        0.6 * g * (2.0 - rg).powi(2) * (rg + 8.0) / (rg + 4.0)
    };
    Estimate::ok(base * shape)
}

/// Transmission integral of the opening over time (s)
///
/// The triangular burst of a straight slit has an area of τ. Curvature
/// reduces this by
///
/// ```text
///     γ ≤ 1:      1 − γ²/6
///     1 < γ < 4:  √γ(√γ − 2)²(√γ + 4)/6
/// ```
///
/// which is zero at and beyond γ = 4. Unlike the variance this is a valid
/// zero rather than NaN when there is no transmission, but the diagnostic is
/// still attached.
pub fn transmission(package: &FermiPackage, frequency: f64, ei: f64) -> Estimate {
    let g = gamma(package, frequency, ei);
    let tau = burst_half_width(package, frequency);

    if !(g < GAMMA_CUTOFF) {
        return Estimate {
            value: 0.0,
            diagnostic: Some(Diagnostic::NoTransmission { gamma: g }),
        };
    }

    let factor = if g <= 1.0 {
        1.0 - g * g / 6.0
    } else {
        let rg = g.sqrt();
        rg * (rg - 2.0).powi(2) * (rg + 4.0) / 6.0
    };
    Estimate::ok(tau * factor)
}
