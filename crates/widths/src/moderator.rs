//! Time width of the moderator pulse
//!
//! All models return the variance of the emission time in s² for an
//! incident energy in meV.

// tofchop modules
use tofchop_instrument::{Moderator, PulseModel, SoftHat};
use tofchop_utils::constants::{velocity, wavelength, E2L, SIGMA2FWHM};

// internal modules
use crate::chebyshev::erf;

/// Energy above which the fast Ikeda–Carpenter decay constant applies (meV)
const IKEDA_CARPENTER_SWITCH: f64 = 130.0;

/// Smoothed top-hat function of energy
///
/// The hat is flat at 1 far from `[x1, x2]` and rises to `1 + height` in
/// between, with an optional linear `gradient` about the centre. The edges
/// are error functions with widths interpolated linearly from `fwhm1` at `x1`
/// to `fwhm2` at `x2`, held constant outside.
///
/// ```rust
/// # use tofchop_instrument::SoftHat;
/// # use tofchop_widths::moderator::soft_hat;
/// let hat = SoftHat { height: 0.5, gradient: 0.0, x1: 10.0, x2: 200.0, fwhm1: 5.0, fwhm2: 60.0 };
/// assert!((soft_hat(&hat, 1e-3) - 1.0).abs() < 1e-6);
/// assert!((soft_hat(&hat, 60.0) - 1.5).abs() < 1e-6);
/// ```
pub fn soft_hat(hat: &SoftHat, x: f64) -> f64 {
    let sig1 = hat.fwhm1 / SIGMA2FWHM;
    let sig2 = hat.fwhm2 / SIGMA2FWHM;

    let sig = if x <= hat.x1 {
        sig1
    } else if x >= hat.x2 {
        sig2
    } else {
        sig1 + (sig2 - sig1) * (x - hat.x1) / (hat.x2 - hat.x1)
    };

    let e1 = (hat.x1 - x) / (std::f64::consts::SQRT_2 * sig);
    let e2 = (hat.x2 - x) / (std::f64::consts::SQRT_2 * sig);
    let plateau = hat.height + hat.gradient * (x - 0.5 * (hat.x1 + hat.x2));
    0.5 * (erf(e2) - erf(e1)) * plateau + 1.0
}

/// Variance of the Ikeda–Carpenter function (s²)
pub fn ikeda_carpenter(s1: f64, s2: f64, b1: f64, b2: f64, emod: f64, ei: f64) -> f64 {
    let sig = (s1 * s1 + s2 * s2 * E2L / ei).sqrt();
    let a = 4.37392e-4 * sig * ei.sqrt();
    let b = if ei > IKEDA_CARPENTER_SWITCH { b2 } else { b1 };
    let r = (-ei / emod).exp();
    (3.0 / (a * a) + r * (2.0 - r) / (b * b)) * 1e-12
}

/// Chi-squared variance for a depth in mm (s²)
fn chi_squared(depth: f64, ei: f64) -> f64 {
    3.0 * (depth * 1e-3 / velocity(ei)).powi(2)
}

/// Variance of the emission time for an incident energy (s²)
pub fn variance(moderator: &Moderator, ei: f64) -> f64 {
    match &moderator.model {
        PulseModel::ChiSquared { depth } => chi_squared(*depth, ei),
        PulseModel::IkedaCarpenter {
            s1,
            s2,
            b1,
            b2,
            emod,
        } => ikeda_carpenter(*s1, *s2, *b1, *b2, *emod, ei),
        PulseModel::ModifiedChiSquared {
            depth,
            coefficients,
            scale,
        } => {
            let lambda = wavelength(ei);
            let broadening = coefficients
                .iter()
                .enumerate()
                .map(|(k, c)| c * lambda.powi(k as i32 + 1))
                .sum::<f64>();
            let base = chi_squared(depth + broadening, ei);
            match scale {
                Some(hat) => base * soft_hat(hat, ei).powi(2),
                None => base,
            }
        }
        PulseModel::Measured { width } => (width.eval(ei) * 1e-6 / SIGMA2FWHM).powi(2),
    }
}
