//! Monochromatic flux at the sample
//!
//! The flux is the white-beam flux at the incident wavelength scaled by the
//! fraction the chopper cascade lets through.

// tofchop modules
use tofchop_instrument::{AnalyticSpectrum, FluxSource, Moderator};
use tofchop_utils::constants::wavelength;
use tofchop_widths::{fermi, Diagnostic};

// internal modules
use crate::resolution::{elastic_fraction, OperatingPoint};

/// Flux estimate with any reason it is not usable
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Flux {
    /// Flux at the sample (n/cm²/s)
    pub value: f64,
    /// Set when the chopper does not transmit
    pub diagnostic: Option<Diagnostic>,
}

/// White-beam flux for an incident energy (meV)
///
/// A measured table is interpolated in wavelength and held constant past
/// either end. Otherwise the analytic moderator spectrum is used.
pub fn white_beam(moderator: &Moderator, ei: f64) -> f64 {
    match &moderator.flux {
        FluxSource::Measured { flux } => flux.eval(wavelength(ei)),
        FluxSource::Analytic(spectrum) => analytic(spectrum, ei),
    }
}

/// Maxwellian plus joined epithermal spectrum
fn analytic(spectrum: &AnalyticSpectrum, ei: f64) -> f64 {
    let t = spectrum.temperature;
    let thermal = spectrum.thermal * ei / (t * t) * (-ei / t).exp();
    let join = 1.0 / (1.0 + (spectrum.cutoff / ei).powf(spectrum.width));
    thermal + spectrum.epithermal * join / ei
}

/// Flux at the sample for an incident energy (meV)
///
/// With a Fermi chopper the measured flux is per µs of opening, so it is
/// scaled by the opening integral, the open fraction of the package and its
/// correction factor.
///
/// For disk instruments the white beam is the flux at the reference
/// frequency. It falls with the square of the final chopper frequency in the
/// high resolution regime, where the elastic resolution is below the
/// reference threshold, and linearly otherwise.
pub fn flux(point: &OperatingPoint, ei: f64) -> Flux {
    let config = point.config;
    let white = white_beam(&config.moderator, ei);

    match config.fermi() {
        Some((index, _)) => {
            let Some(package) = point.package else {
                return Flux {
                    value: f64::NAN,
                    diagnostic: None,
                };
            };
            let f = point.frequencies.get(index).copied().unwrap_or(f64::NAN);
            let scaled = fermi::transmission(package, f, ei)
                .map(|opening| white * opening * 1e6 * package.open_fraction() * package.flux_correction);
            Flux {
                value: scaled.value,
                diagnostic: scaled.diagnostic,
            }
        }
        None => {
            let Some(reference) = &config.flux_reference else {
                return Flux {
                    value: white,
                    diagnostic: None,
                };
            };

            let last = config.choppers.len() - 1;
            let f = point.frequencies.get(last).copied().unwrap_or(f64::NAN);
            let power = match elastic_fraction(point, ei) < reference.threshold {
                true => 2,
                false => 1,
            };
            Flux {
                value: white * (reference.frequency / f).powi(power),
                diagnostic: None,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use tofchop_instrument::load_builtin;

    #[test]
    fn measured_table_nodes_and_clamping() {
        let merlin = load_builtin("merlin").unwrap();
        let FluxSource::Measured { flux: table } = &merlin.moderator.flux else {
            panic!("merlin has a measured flux table");
        };
        let (first, last) = table.domain();

        // nodes are reproduced
        let ei = tofchop_utils::constants::energy_from_wavelength(first);
        assert!((white_beam(&merlin.moderator, ei) - table.eval(first)).abs() < 1e-9);

        // constant beyond either end
        let short = tofchop_utils::constants::energy_from_wavelength(0.5 * first);
        let long = tofchop_utils::constants::energy_from_wavelength(2.0 * last);
        assert_eq!(white_beam(&merlin.moderator, short), table.eval(first));
        assert_eq!(white_beam(&merlin.moderator, long), table.eval(last));
    }

    #[rstest]
    #[case(1.0)]
    #[case(2.5)]
    #[case(40.0)]
    #[case(500.0)]
    fn analytic_spectrum(#[case] ei: f64) {
        let spectrum = AnalyticSpectrum {
            thermal: 7.4e5,
            temperature: 2.5,
            epithermal: 2e3,
            cutoff: 20.0,
            width: 2.0,
        };
        let expected = 7.4e5 * ei / 6.25 * (-ei / 2.5).exp()
            + 2e3 / (1.0 + (20.0 / ei).powi(2)) / ei;
        assert!((analytic(&spectrum, ei) - expected).abs() < 1e-9 * expected);
    }

    #[test]
    fn fermi_flux_follows_opening() {
        let merlin = load_builtin("merlin").unwrap();
        let (_, fermi) = merlin.fermi().unwrap();
        let package = &fermi.packages["G"];
        let frequencies = [50.0, 400.0];
        let point = OperatingPoint {
            config: &merlin,
            package: Some(package),
            frequencies: &frequencies,
        };

        let ei = 25.0;
        let opening = fermi::transmission(package, 400.0, ei).value * 1e6;
        let expected = white_beam(&merlin.moderator, ei) * opening * (0.2 / 0.22) * 0.8;
        let found = flux(&point, ei);
        assert!(found.diagnostic.is_none());
        assert!((found.value - expected).abs() < 1e-9 * expected);
    }

    #[test]
    fn closed_fermi_has_no_flux() {
        let merlin = load_builtin("merlin").unwrap();
        let (_, fermi) = merlin.fermi().unwrap();
        let frequencies = [50.0, 600.0];
        let point = OperatingPoint {
            config: &merlin,
            package: Some(&fermi.packages["G"]),
            frequencies: &frequencies,
        };
        let found = flux(&point, 0.5);
        assert_eq!(found.value, 0.0);
        assert!(matches!(found.diagnostic, Some(Diagnostic::NoTransmission { .. })));
    }

    #[test]
    fn disk_flux_scales_with_frequency() {
        let config = load_builtin("let").unwrap();
        let reference = config.flux_reference.unwrap();
        let ei = 3.7;

        let at = |user: [f64; 2]| {
            let frequencies = config.frequency.long_frequency(&user);
            let point = OperatingPoint {
                config: &config,
                package: None,
                frequencies: &frequencies,
            };
            let power = match elastic_fraction(&point, ei) < reference.threshold {
                true => 2,
                false => 1,
            };
            (flux(&point, ei).value, power, frequencies[4])
        };

        let white = white_beam(&config.moderator, ei);
        for user in [[240.0, 120.0], [120.0, 60.0], [300.0, 150.0]] {
            let (value, power, f) = at(user);
            let expected = white * (reference.frequency / f).powi(power);
            assert!((value - expected).abs() < 1e-9 * expected);
        }

        // faster choppers always pass less
        assert!(at([300.0, 150.0]).0 < at([120.0, 60.0]).0);
    }
}
