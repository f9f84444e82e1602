// standard library
use std::fmt::Write;

// tofchop modules
use tofchop_spectrometer::Spectrometer;
use tofchop_utils::{f, OptionExt, ValueExt};

// internal modules
use crate::error::Result;

/// One line summary of the current selection
pub fn header(spectrometer: &Spectrometer) -> String {
    f!(
        "{} | chopper: {} | frequency: {:?} Hz | ei: {} meV",
        spectrometer.config().name,
        spectrometer.chopper().display(),
        spectrometer.frequency(),
        spectrometer.ei().display_or("not set"),
    )
}

/// Every transmitted incident energy
pub fn reps(spectrometer: &mut Spectrometer) -> Result<String> {
    let energies = spectrometer.allowed_ei()?;
    let mut text = f!("{}\n", header(spectrometer));
    if energies.is_empty() {
        text.push_str("nothing is transmitted\n");
        return Ok(text);
    }

    let _ = writeln!(text, "{:>4}  {:>12}", "rep", "ei (meV)");
    for (i, ei) in energies.iter().enumerate() {
        let _ = writeln!(text, "{:>4}  {:>12.4}", i + 1, ei);
    }
    Ok(text)
}

/// Resolution at the focus energy, or for every rep with `all_reps`
///
/// For every rep the transfers are fractions of that rep's incident energy.
pub fn resolution(spectrometer: &mut Spectrometer, etrans: &[f64], all_reps: bool) -> Result<String> {
    let etrans = match etrans.is_empty() {
        true => &[0.0][..],
        false => etrans,
    };

    let mut text = f!("{}\n", header(spectrometer));
    let _ = writeln!(text, "{:>12}  {:>12}  {:>12}", "ei (meV)", "etrans (meV)", "fwhm (meV)");

    let curves = match all_reps {
        true => spectrometer
            .multi_rep_resolution(etrans)?
            .into_iter()
            .map(|rep| (rep.ei, rep.etrans, rep.fwhm))
            .collect::<Vec<_>>(),
        false => {
            let ei = spectrometer.ei().unwrap_or(f64::NAN);
            let result = spectrometer.resolution(etrans)?;
            vec![(ei, etrans.to_vec(), result.fwhm)]
        }
    };

    for (ei, etrans, fwhm) in curves {
        for (et, w) in etrans.iter().zip(fwhm) {
            let _ = writeln!(text, "{ei:>12.4}  {et:>12.4}  {:>12}", w.sci_or(4, 2, "-"));
        }
    }
    Ok(text)
}

/// Flux at the sample, for the focus energy or every rep
pub fn flux(spectrometer: &mut Spectrometer, all_reps: bool) -> Result<String> {
    let rows = match all_reps {
        true => spectrometer
            .multi_rep_flux()?
            .into_iter()
            .map(|rep| (rep.ei, rep.flux))
            .collect::<Vec<_>>(),
        false => {
            let ei = spectrometer.ei().unwrap_or(f64::NAN);
            vec![(ei, spectrometer.flux()?.value)]
        }
    };

    let mut text = f!("{}\n", header(spectrometer));
    let _ = writeln!(text, "{:>12}  {:>14}", "ei (meV)", "flux (n/cm²/s)");
    for (ei, flux) in rows {
        let _ = writeln!(text, "{ei:>12.4}  {:>14}", flux.sci_or(4, 2, "-"));
    }
    Ok(text)
}

/// Elastic time width of each component
pub fn widths(spectrometer: &Spectrometer) -> Result<String> {
    let widths = spectrometer.widths()?;
    let rows = [
        ("moderator", widths.moderator),
        ("tilt", widths.tilt),
        ("chopper", widths.chopper),
        ("jitter", widths.jitter),
        ("aperture", widths.aperture),
        ("sample", widths.sample),
        ("detector", widths.detector),
    ];

    let mut text = f!("{}\n", header(spectrometer));
    let _ = writeln!(text, "{:<10}  {:>12}", "component", "fwhm (µs)");
    for (name, width) in rows {
        let _ = writeln!(text, "{name:<10}  {:>12}", width.sci_or(4, 2, "-"));
    }
    let _ = writeln!(
        text,
        "{:<10}  {:>12} meV",
        "energy",
        widths.energy.sci_or(4, 2, "-")
    );
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn merlin() -> Spectrometer {
        let mut merlin = Spectrometer::from_builtin("merlin").unwrap();
        merlin.set_ei(25.0).unwrap();
        merlin
    }

    #[test]
    fn header_names_the_selection() {
        assert_eq!(
            header(&merlin()),
            "MERLIN | chopper: G | frequency: [400.0] Hz | ei: 25 meV"
        );
    }

    #[test]
    fn reps_table() {
        let text = reps(&mut merlin()).unwrap();
        let lines = text.lines().collect::<Vec<&str>>();
        // header, column names and six reps
        assert_eq!(lines.len(), 8);
        let columns = lines[5].split_whitespace().collect::<Vec<&str>>();
        assert_eq!(columns[0], "4");
        let ei = columns[1].parse::<f64>().unwrap();
        assert!((ei - 25.0).abs() < 0.006);
    }

    #[test]
    fn unphysical_transfers_are_gaps() {
        let text = resolution(&mut merlin(), &[0.0, 30.0], false).unwrap();
        let last = text.lines().last().unwrap();
        assert!(last.ends_with('-'), "{last}");
    }

    #[test]
    fn every_rep() {
        let mut merlin = merlin();
        let text = resolution(&mut merlin, &[0.0, 0.5], true).unwrap();
        // two rows for each of six reps
        assert_eq!(text.lines().count(), 2 + 12);

        let text = flux(&mut merlin, true).unwrap();
        assert_eq!(text.lines().count(), 2 + 6);
    }

    #[test]
    fn widths_table() {
        let text = widths(&merlin()).unwrap();
        assert!(text.lines().any(|l| l.starts_with("moderator")));
        assert!(text.lines().last().unwrap().ends_with("meV"));
    }
}
