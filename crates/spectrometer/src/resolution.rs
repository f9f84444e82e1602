//! Energy resolution from the propagated time widths
//!
//! Every component adds an independent time spread. Those before the
//! resolution chopper are scaled by how the pulse spreads out over the rest
//! of the flight path, and the sum is converted into an energy width at the
//! detector.
//!
//! ```text
//!     modfac = (x1 + (vi/vf)³·x2) / x0
//!     chpfac = 1 + modfac
//!     σt²    = modfac²·(σ_mod² + σ_tilt²) + chpfac²·(σ_chop² + σ_jit² + σ_ape²)
//!            + σ_sam²·sin²φ/vf² + σ_det²/vf²
//!     FWHM   = 2√(2 ln 2)·m·vf³/x2·σt
//! ```
//!
//! `x0` runs from the moderator (or pulse chopper) to the resolution
//! chopper, `x1` on to the sample and `x2` on to the detector.

// tofchop modules
use tofchop_instrument::{FermiPackage, InstrumentConfig};
use tofchop_utils::constants::{velocity, NEUTRON_MASS_MEV, SIGMA2FWHM};
use tofchop_widths::{detector, disk, fermi, moderator, sample, Diagnostic};

/// Everything that is fixed while sweeping energy
///
/// `frequencies` holds the frequency of every chopper, not the user
/// frequencies. A Fermi instrument without a `package` has an undefined
/// chopper width.
#[derive(Debug, Clone, Copy)]
pub struct OperatingPoint<'a> {
    pub config: &'a InstrumentConfig,
    pub package: Option<&'a FermiPackage>,
    pub frequencies: &'a [f64],
}

/// Energy widths for a set of energy transfers
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    /// FWHM for each energy transfer (meV), NaN where undefined
    pub fwhm: Vec<f64>,
    /// Reasons for any NaN values
    pub diagnostics: Vec<Diagnostic>,
}

/// Time widths of each component for the elastic line
///
/// Widths are FWHM in µs at the component itself, before any geometric
/// scaling. The sample and detector widths are in time along the scattered
/// path.
#[derive(Debug, Clone, PartialEq)]
pub struct Widths {
    /// Incident energy (meV)
    pub ei: f64,
    /// Elastic energy resolution (meV)
    pub energy: f64,
    pub moderator: f64,
    pub tilt: f64,
    pub chopper: f64,
    pub jitter: f64,
    pub aperture: f64,
    pub sample: f64,
    pub detector: f64,
    /// Reasons for any NaN values
    pub diagnostics: Vec<Diagnostic>,
}

/// Flight paths and primary variances (m, s²)
#[derive(Debug, Clone, Copy)]
struct Primary {
    x0: f64,
    x1: f64,
    x2: f64,
    moderator: f64,
    tilt: f64,
    chopper: f64,
    jitter: f64,
    aperture: f64,
    diagnostic: Option<Diagnostic>,
}

impl Primary {
    fn new(point: &OperatingPoint, ei: f64) -> Self {
        let config = point.config;
        let frequency = |i: usize| point.frequencies.get(i).copied().unwrap_or(f64::NAN);

        match config.fermi() {
            Some((index, chopper)) => {
                let f = frequency(index);
                let distance = config.choppers[index].distance;

                let (width, jitter) = match point.package {
                    Some(package) => (
                        fermi::chopper_variance(package, f, ei),
                        (package.jitter * 1e-6).powi(2),
                    ),
                    None => (tofchop_widths::Estimate::ok(f64::NAN), 0.0),
                };

                let omega = 2.0 * std::f64::consts::PI * f;
                let wa = chopper.aperture_width;
                let xa = chopper.aperture_distance;
                let tan_theta = config.moderator.theta.to_radians().tan();

                Self {
                    x0: distance,
                    x1: config.sample_distance() - distance,
                    x2: config.sample_to_detector,
                    moderator: moderator::variance(&config.moderator, ei),
                    tilt: wa * wa / 12.0 * (tan_theta / velocity(ei)).powi(2),
                    chopper: width.value,
                    jitter,
                    aperture: wa * wa / (12.0 * xa * xa * omega * omega),
                    diagnostic: width.diagnostic,
                }
            }
            None => {
                let last = config.choppers.len() - 1;
                let pulse = config.pulse_chopper_index().unwrap_or(0);
                let disk_variance = |i: usize| match config.choppers[i].as_disk() {
                    Some(d) => disk::variance(d, frequency(i)),
                    None => f64::NAN,
                };

                Self {
                    x0: config.choppers[last].distance - config.choppers[pulse].distance,
                    x1: config.chopper_to_sample,
                    x2: config.sample_to_detector,
                    moderator: disk_variance(pulse),
                    tilt: 0.0,
                    chopper: disk_variance(last),
                    jitter: 0.0,
                    aperture: 0.0,
                    diagnostic: None,
                }
            }
        }
    }

    /// Energy FWHM for one transfer, NaN if the final energy is not positive
    fn fwhm(&self, config: &InstrumentConfig, ei: f64, etrans: f64) -> f64 {
        let ef = ei - etrans;
        if !(ef > 0.0) {
            return f64::NAN;
        }

        let vi = velocity(ei);
        let vf = velocity(ef);
        let ratio = (vi / vf).powi(3);
        let modfac = (self.x1 + ratio * self.x2) / self.x0;
        let chpfac = 1.0 + modfac;

        let variance = modfac.powi(2) * (self.moderator + self.tilt)
            + chpfac.powi(2) * (self.chopper + self.jitter + self.aperture)
            + sample::time_variance(&config.sample, vf)
            + detector::time_variance(&config.detector, ef, vf);

        SIGMA2FWHM * NEUTRON_MASS_MEV * vf.powi(3) / self.x2 * variance.sqrt()
    }
}

/// Energy resolution at `ei` for each energy transfer (meV)
///
/// Transfers at or above `ei` give NaN and a single
/// [Diagnostic::UnphysicalTransfer] for the lot. A Fermi chopper that can
/// not transmit at `ei` makes the whole curve NaN.
pub fn resolution(point: &OperatingPoint, ei: f64, etrans: &[f64]) -> Resolution {
    let primary = Primary::new(point, ei);
    let fwhm = etrans
        .iter()
        .map(|et| primary.fwhm(point.config, ei, *et))
        .collect::<Vec<f64>>();

    let mut diagnostics = primary.diagnostic.into_iter().collect::<Vec<Diagnostic>>();
    let count = etrans.iter().filter(|et| !(ei - **et > 0.0)).count();
    if count > 0 {
        diagnostics.push(Diagnostic::UnphysicalTransfer { count });
    }

    Resolution { fwhm, diagnostics }
}

/// Elastic resolution as a fraction of the incident energy
pub fn elastic_fraction(point: &OperatingPoint, ei: f64) -> f64 {
    Primary::new(point, ei).fwhm(point.config, ei, 0.0) / ei
}

/// Time width of every component for the elastic line at `ei`
pub fn widths(point: &OperatingPoint, ei: f64) -> Widths {
    let primary = Primary::new(point, ei);
    let config = point.config;
    let vf = velocity(ei);
    let to_fwhm = |variance: f64| SIGMA2FWHM * variance.sqrt() * 1e6;

    Widths {
        ei,
        energy: primary.fwhm(config, ei, 0.0),
        moderator: to_fwhm(primary.moderator),
        tilt: to_fwhm(primary.tilt),
        chopper: to_fwhm(primary.chopper),
        jitter: to_fwhm(primary.jitter),
        aperture: to_fwhm(primary.aperture),
        sample: to_fwhm(sample::time_variance(&config.sample, vf)),
        detector: to_fwhm(detector::time_variance(&config.detector, ei, vf)),
        diagnostics: primary.diagnostic.into_iter().collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};
    use tofchop_instrument::load_builtin;

    #[fixture]
    fn merlin() -> InstrumentConfig {
        load_builtin("merlin").unwrap()
    }

    #[rstest]
    fn closed_form_elastic(merlin: InstrumentConfig) {
        let (_, fermi) = merlin.fermi().unwrap();
        let package = &fermi.packages["G"];
        let frequencies = [50.0, 400.0];
        let point = OperatingPoint {
            config: &merlin,
            package: Some(package),
            frequencies: &frequencies,
        };
        let ei = 25.0;

        // elastic, so vi = vf and modfac = (x1 + x2)/x0
        let modfac: f64 = (1.82 + 2.5) / 10.0;
        let chpfac: f64 = 1.0 + modfac;
        let v = velocity(ei);
        let tilt = 0.06667f64.powi(2) / 12.0 * (26.7f64.to_radians().tan() / v).powi(2);
        let omega = 2.0 * std::f64::consts::PI * 400.0;
        let aperture = 0.06667f64.powi(2) / (12.0 * 7.19 * 7.19 * omega * omega);
        let variance = modfac.powi(2) * (moderator::variance(&merlin.moderator, ei) + tilt)
            + chpfac.powi(2)
                * (fermi::chopper_variance(package, 400.0, ei).value + 1e-12 + aperture)
            + sample::time_variance(&merlin.sample, v)
            + detector::time_variance(&merlin.detector, ei, v);
        let expected = SIGMA2FWHM * NEUTRON_MASS_MEV * v.powi(3) / 2.5 * variance.sqrt();

        let result = resolution(&point, ei, &[0.0]);
        assert!(result.diagnostics.is_empty());
        assert!((result.fwhm[0] - expected).abs() < 1e-9 * expected);

        // a few percent of the incident energy
        let fraction = elastic_fraction(&point, ei);
        assert!(fraction > 0.01 && fraction < 0.15, "{fraction}");
    }

    #[rstest]
    fn unphysical_transfers(merlin: InstrumentConfig) {
        let (_, fermi) = merlin.fermi().unwrap();
        let frequencies = [50.0, 400.0];
        let point = OperatingPoint {
            config: &merlin,
            package: Some(&fermi.packages["G"]),
            frequencies: &frequencies,
        };

        let result = resolution(&point, 25.0, &[-5.0, 0.0, 10.0, 25.0, 30.0]);
        assert!(result.fwhm[..3].iter().all(|w| w.is_finite() && *w > 0.0));
        assert!(result.fwhm[3..].iter().all(|w| w.is_nan()));
        assert_eq!(result.diagnostics, vec![Diagnostic::UnphysicalTransfer { count: 2 }]);
    }

    #[rstest]
    fn closed_fermi_gives_nan(merlin: InstrumentConfig) {
        let (_, fermi) = merlin.fermi().unwrap();
        // slow neutrons at full speed are well past γ = 4
        let frequencies = [50.0, 600.0];
        let point = OperatingPoint {
            config: &merlin,
            package: Some(&fermi.packages["G"]),
            frequencies: &frequencies,
        };

        let result = resolution(&point, 0.5, &[0.0, 0.25]);
        assert!(result.fwhm.iter().all(|w| w.is_nan()));
        assert!(matches!(result.diagnostics[0], Diagnostic::NoTransmission { .. }));
    }

    #[test]
    fn disk_instrument_uses_pulse_chopper() {
        let config = load_builtin("let").unwrap();
        let frequencies = config.frequency.long_frequency(&[240.0, 120.0]);
        let point = OperatingPoint {
            config: &config,
            package: None,
            frequencies: &frequencies,
        };

        let w = widths(&point, 3.7);
        let first = config.choppers[0].as_disk().unwrap();
        let last = config.choppers[4].as_disk().unwrap();
        let expected = |d: &tofchop_instrument::DiskChopper, f: f64| disk::fwhm(d, f) * 1e6;
        assert!((w.moderator - expected(first, 120.0)).abs() < 1e-9);
        assert!((w.chopper - expected(last, 240.0)).abs() < 1e-9);
        assert_eq!(w.aperture, 0.0);
        assert!(w.energy > 0.0 && w.energy < 0.2 * 3.7);
    }

    #[rstest]
    fn resolution_narrows_with_transfer(merlin: InstrumentConfig) {
        let (_, fermi) = merlin.fermi().unwrap();
        let frequencies = [50.0, 400.0];
        let point = OperatingPoint {
            config: &merlin,
            package: Some(&fermi.packages["G"]),
            frequencies: &frequencies,
        };

        let etrans = (0..10).map(|i| i as f64 * 2.0).collect::<Vec<f64>>();
        let result = resolution(&point, 25.0, &etrans);
        assert!(result.fwhm.windows(2).all(|w| w[1] < w[0]));
    }
}
