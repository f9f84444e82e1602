// tofchop modules
use tofchop_utils::CubicSpline;

// internal modules
use crate::error::{Error, Result};

/// Neutron source, pulse shape and white-beam spectrum
#[derive(Debug, Clone, PartialEq)]
pub struct Moderator {
    /// Model used for the time width of the emitted pulse
    pub model: PulseModel,
    /// Emission window used to bound transmitted trajectories (µs)
    pub emission_window: f64,
    /// Mean emission angle relative to the beam axis (deg)
    pub theta: f64,
    /// White-beam flux at the sample position
    pub flux: FluxSource,
}

/// Time-width models for the moderator pulse
#[derive(Debug, Clone, PartialEq)]
pub enum PulseModel {
    /// Chi-squared with an effective moderator depth (mm)
    ChiSquared { depth: f64 },

    /// Ikeda–Carpenter function
    ///
    /// `s1`, `s2` are in µs·meV^½ style fitting units, `b1` and `b2` are the
    /// slowing-down decay constants (µs⁻¹) below and above 130 meV, and
    /// `emod` is the storage term energy scale (meV).
    IkedaCarpenter {
        s1: f64,
        s2: f64,
        b1: f64,
        b2: f64,
        emod: f64,
    },

    /// Chi-squared with a wavelength dependent depth
    ///
    /// The depth (mm) is `depth + Σ cₖ·λᵏ⁺¹` for the listed coefficients,
    /// with an optional smooth energy-dependent rescaling.
    ModifiedChiSquared {
        depth: f64,
        coefficients: Vec<f64>,
        scale: Option<SoftHat>,
    },

    /// Measured FWHM (µs) interpolated against energy (meV)
    Measured { width: CubicSpline },
}

/// Parameters for a smoothed top-hat function of energy
///
/// The step edges are at `x1` and `x2` (meV) and are broadened by gaussians
/// of FWHM `fwhm1` and `fwhm2`. The plateau rises to `1 + height`, with a
/// linear `gradient` about the centre.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SoftHat {
    pub height: f64,
    pub gradient: f64,
    pub x1: f64,
    pub x2: f64,
    pub fwhm1: f64,
    pub fwhm2: f64,
}

/// Where the white-beam flux comes from
#[derive(Debug, Clone, PartialEq)]
pub enum FluxSource {
    /// Measured flux against wavelength (Å)
    ///
    /// For instruments with a Fermi chopper this is per µs of chopper
    /// opening, otherwise it is the flux at the reference frequency.
    Measured { flux: CubicSpline },

    /// Empirical Maxwellian plus epithermal moderator spectrum
    Analytic(AnalyticSpectrum),
}

/// Empirical moderator spectrum `I(E) = Iₜₕ·E/T²·e^(−E/T) + Iₑₚ·Δ(E)/E`
///
/// The joining function is `Δ(E) = 1 / (1 + (E꜀/E)^w)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnalyticSpectrum {
    /// Thermal intensity scale
    pub thermal: f64,
    /// Moderator temperature (meV)
    pub temperature: f64,
    /// Epithermal intensity scale
    pub epithermal: f64,
    /// Joining function cut-off (meV)
    pub cutoff: f64,
    /// Joining function exponent
    pub width: f64,
}

impl Moderator {
    pub(crate) fn validate(&self) -> Result<()> {
        if !(self.emission_window >= 0.0) {
            return Err(Error::invalid("moderator", "emission window can not be negative"));
        }
        if !self.theta.is_finite() || self.theta.abs() >= 90.0 {
            return Err(Error::invalid("moderator", "emission angle must be within ±90°"));
        }

        match &self.model {
            PulseModel::ChiSquared { depth } if *depth <= 0.0 => {
                return Err(Error::invalid("moderator", "depth must be positive"))
            }
            PulseModel::IkedaCarpenter { b1, b2, emod, .. }
                if *b1 <= 0.0 || *b2 <= 0.0 || *emod <= 0.0 =>
            {
                return Err(Error::invalid(
                    "moderator",
                    "Ikeda-Carpenter decay constants and energy scale must be positive",
                ))
            }
            PulseModel::ModifiedChiSquared { scale: Some(hat), .. }
                if hat.fwhm1 <= 0.0 || hat.fwhm2 <= 0.0 || hat.x1 >= hat.x2 =>
            {
                return Err(Error::invalid("moderator", "soft hat edges are malformed"))
            }
            _ => (),
        }

        if let FluxSource::Analytic(spectrum) = &self.flux {
            if spectrum.temperature <= 0.0 || spectrum.cutoff <= 0.0 {
                return Err(Error::invalid(
                    "moderator flux",
                    "temperature and cut-off energy must be positive",
                ));
            }
        }
        Ok(())
    }
}
