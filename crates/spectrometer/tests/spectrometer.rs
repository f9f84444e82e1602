use rstest::{fixture, rstest};
use tofchop_spectrometer::{flux, resolution, widths, Error, OperatingPoint, Spectrometer};

#[fixture]
fn merlin() -> Spectrometer {
    Spectrometer::from_builtin("merlin").unwrap()
}

#[fixture]
fn let_() -> Spectrometer {
    let mut spectrometer = Spectrometer::from_builtin("let").unwrap();
    spectrometer.set_ei(3.7).unwrap();
    spectrometer
}

fn bits(values: &[f64]) -> Vec<u64> {
    values.iter().map(|v| v.to_bits()).collect()
}

#[rstest]
fn merlin_defaults(merlin: Spectrometer) {
    assert_eq!(merlin.chopper(), Some("G"));
    assert_eq!(merlin.variant(), None);
    assert_eq!(merlin.frequency(), &[400.0]);
    assert_eq!(merlin.long_frequency(), &[50.0, 400.0]);
    assert_eq!(merlin.phase(), &[1500.0, 0.0]);
    assert_eq!(merlin.ei(), None);
    assert_eq!(merlin.packages(), vec!["A", "G", "S"]);
    assert!(merlin.variants().is_empty());
    assert_eq!(merlin.ei_range(), (7.0, 180.0));
}

#[test]
fn let_defaults() {
    let spectrometer = Spectrometer::from_builtin("let").unwrap();
    assert_eq!(spectrometer.chopper(), Some("High Flux"));
    assert_eq!(spectrometer.variant(), Some("High Flux"));
    assert_eq!(spectrometer.frequency(), &[240.0, 120.0]);
    assert_eq!(
        spectrometer.long_frequency(),
        &[120.0, 10.0, 120.0, 120.0, 240.0]
    );
    assert_eq!(spectrometer.ei_range(), (0.5, 40.0));
}

#[rstest]
fn frequency_round_trip(mut merlin: Spectrometer) {
    merlin.set_frequency(&[350.0], None).unwrap();
    assert_eq!(merlin.frequency(), &[350.0]);
    assert_eq!(merlin.long_frequency(), &[50.0, 350.0]);

    merlin.set_frequency(&[200.0], Some(&[1400.0, 0.0])).unwrap();
    assert_eq!(merlin.frequency(), &[200.0]);
    assert_eq!(merlin.phase(), &[1400.0, 0.0]);
}

#[rstest]
#[case(vec![], "expected 1 frequencies, found 0")] // case 1: too few
#[case(vec![400.0, 50.0], "expected 1 frequencies, found 2")] // case 2: too many
#[case(vec![-50.0], "must be positive")] // case 3: negative
#[case(vec![0.0], "must be positive")] // case 4: stopped
#[case(vec![650.0], "above the 600 Hz maximum")] // case 5: too fast
#[case(vec![375.0], "not a multiple of the 50 Hz source")] // case 6: off harmonic
fn invalid_frequency(mut merlin: Spectrometer, #[case] frequency: Vec<f64>, #[case] message: &str) {
    let error = merlin.set_frequency(&frequency, None).unwrap_err();
    assert!(error.to_string().contains(message), "{error}");

    // nothing changed
    assert_eq!(merlin.frequency(), &[400.0]);
}

#[rstest]
fn invalid_phase_leaves_frequency(mut merlin: Spectrometer) {
    let error = merlin.set_frequency(&[300.0], Some(&[1500.0])).unwrap_err();
    assert!(matches!(error, Error::PhaseCount { expected: 2, found: 1 }));
    assert_eq!(merlin.frequency(), &[400.0]);

    assert!(merlin.set_phase(&[1500.0, 0.0, 0.0]).is_err());
    merlin.set_phase(&[1450.0, 0.0]).unwrap();
    assert_eq!(merlin.phase(), &[1450.0, 0.0]);
}

#[rstest]
fn unknown_chopper(mut merlin: Spectrometer) {
    let error = merlin.set_chopper("Z", None).unwrap_err();
    match error {
        Error::UnknownChopper { name, available } => {
            assert_eq!(name, "Z");
            assert_eq!(available, vec!["A", "G", "S"]);
        }
        other => panic!("unexpected error {other}"),
    }
    assert_eq!(merlin.chopper(), Some("G"));
}

#[rstest]
fn energy_limits_follow_package(mut merlin: Spectrometer) {
    let error = merlin.set_ei(200.0).unwrap_err();
    assert!(matches!(
        error,
        Error::EnergyOutOfRange { min, max, .. } if min == 7.0 && max == 180.0
    ));
    assert_eq!(merlin.ei(), None);

    merlin.set_chopper("A", Some(&[500.0])).unwrap();
    assert_eq!(merlin.chopper(), Some("A"));
    assert_eq!(merlin.frequency(), &[500.0]);
    merlin.set_ei(200.0).unwrap();
    assert_eq!(merlin.ei_range(), (40.0, 2000.0));

    // a package change keeps the stored energy even when it falls outside
    merlin.set_chopper("G", None).unwrap();
    assert_eq!(merlin.ei(), Some(200.0));
    assert!(merlin.resolution(&[0.0]).is_err());
}

fn out_of_range(result: Result<impl std::fmt::Debug, Error>) {
    match result {
        Err(Error::EnergyOutOfRange { energy, min, max }) => {
            assert_eq!((energy, min, max), (200.0, 7.0, 180.0));
        }
        other => panic!("expected an out of range energy, found {other:?}"),
    }
}

#[rstest]
fn stale_energy_fails_every_query(mut merlin: Spectrometer) {
    merlin.set_chopper("A", Some(&[500.0])).unwrap();
    merlin.set_ei(200.0).unwrap();
    assert!(merlin.allowed_ei().is_ok());
    merlin.set_chopper("G", None).unwrap();

    out_of_range(merlin.allowed_ei());
    out_of_range(merlin.resolution(&[0.0]));
    out_of_range(merlin.multi_rep_resolution(&[0.0]));
    out_of_range(merlin.flux());
    out_of_range(merlin.multi_rep_flux());
    out_of_range(merlin.widths());
    out_of_range(merlin.time_distance_diagram());

    // a valid energy brings everything back
    merlin.set_ei(25.0).unwrap();
    assert!(merlin.allowed_ei().is_ok());
    assert!(merlin.widths().is_ok());
}

#[rstest]
fn queries_need_an_energy(mut merlin: Spectrometer) {
    assert!(matches!(merlin.allowed_ei(), Err(Error::EnergyNotSet)));
    assert!(matches!(merlin.resolution(&[0.0]), Err(Error::EnergyNotSet)));
    assert!(matches!(merlin.flux(), Err(Error::EnergyNotSet)));
    assert!(matches!(merlin.widths(), Err(Error::EnergyNotSet)));
    assert!(matches!(merlin.time_distance_diagram(), Err(Error::EnergyNotSet)));
}

#[rstest]
fn merlin_allowed_energies(mut merlin: Spectrometer) {
    merlin.set_ei(25.0).unwrap();

    // the cascade passes more, but only those the package covers are kept
    let expected = [7.55, 10.45, 15.42, 25.0, 47.35, 121.69];
    let energies = merlin.allowed_ei().unwrap();
    assert_eq!(energies.len(), expected.len());
    for (found, expected) in energies.iter().zip(expected) {
        assert!((found - expected).abs() < 0.006, "{found} vs {expected}");
    }
}

#[rstest]
fn let_allowed_energies(mut let_: Spectrometer) {
    let expected = [0.596, 0.769, 1.03, 1.451, 2.195, 3.7, 7.516, 22.748];
    let energies = let_.allowed_ei().unwrap();
    assert_eq!(energies.len(), expected.len());
    for (found, expected) in energies.iter().zip(expected) {
        assert!((found - expected).abs() < 1e-3, "{found} vs {expected}");
    }

    // the diagram is not limited to the usable range
    let diagram = let_.time_distance_diagram().unwrap();
    assert_eq!(diagram.choppers.len(), 5);
    assert_eq!(diagram.reps.len(), 9);
    for energy in energies {
        assert!(diagram.reps.iter().any(|r| r.energy == energy));
    }
}

#[rstest]
fn repeated_queries_are_identical(mut merlin: Spectrometer) {
    merlin.set_ei(25.0).unwrap();
    let etrans = [0.0, 2.5, 5.0, 10.0, 20.0];

    let first = merlin.resolution(&etrans).unwrap();
    let second = merlin.resolution(&etrans).unwrap();
    assert_eq!(bits(&first.fwhm), bits(&second.fwhm));

    let first = merlin.flux().unwrap();
    let second = merlin.flux().unwrap();
    assert_eq!(first.value.to_bits(), second.value.to_bits());
}

#[rstest]
fn facade_matches_free_functions(mut merlin: Spectrometer) {
    merlin.set_ei(25.0).unwrap();
    let etrans = [0.0, 5.0, 10.0];

    let config = merlin.config().clone();
    let (_, fermi) = config.fermi().unwrap();
    let frequencies = [50.0, 400.0];
    let point = OperatingPoint {
        config: &config,
        package: Some(&fermi.packages["G"]),
        frequencies: &frequencies,
    };

    assert_eq!(
        merlin.resolution(&etrans).unwrap(),
        resolution(&point, 25.0, &etrans)
    );
    assert_eq!(merlin.flux().unwrap(), flux(&point, 25.0));
    assert_eq!(merlin.widths().unwrap(), widths(&point, 25.0));
}

#[rstest]
fn selection_change_drops_cached_results(mut merlin: Spectrometer) {
    merlin.set_ei(25.0).unwrap();
    let etrans = [0.0, 10.0];
    let fast = merlin.resolution(&etrans).unwrap();
    let fingerprint = merlin.selection().fingerprint();

    merlin.set_frequency(&[200.0], None).unwrap();
    assert_ne!(merlin.selection().fingerprint(), fingerprint);
    let slow = merlin.resolution(&etrans).unwrap();
    assert_ne!(bits(&fast.fwhm), bits(&slow.fwhm));

    // and back again gives the original answer
    merlin.set_frequency(&[400.0], None).unwrap();
    assert_eq!(merlin.selection().fingerprint(), fingerprint);
    assert_eq!(bits(&merlin.resolution(&etrans).unwrap().fwhm), bits(&fast.fwhm));
}

#[rstest]
fn one_off_frequency_leaves_the_selection(mut merlin: Spectrometer) {
    merlin.set_ei(25.0).unwrap();
    let etrans = [0.0, 10.0];
    let selection = merlin.selection();
    let fingerprint = selection.fingerprint();
    let current = merlin.resolution(&etrans).unwrap();

    let slow = merlin.resolution_at(25.0, &etrans, Some(&[200.0])).unwrap();
    let slow_flux = merlin.flux_at(25.0, Some(&[200.0])).unwrap();
    assert_eq!(merlin.selection(), selection);
    assert_eq!(merlin.selection().fingerprint(), fingerprint);
    assert_eq!(merlin.frequency(), &[400.0]);
    assert_eq!(merlin.long_frequency(), &[50.0, 400.0]);

    // same answers as changing the selection for real
    let mut other = Spectrometer::from_builtin("merlin").unwrap();
    other.set_frequency(&[200.0], None).unwrap();
    other.set_ei(25.0).unwrap();
    assert_eq!(bits(&other.resolution(&etrans).unwrap().fwhm), bits(&slow.fwhm));
    assert_eq!(other.flux().unwrap().value.to_bits(), slow_flux.value.to_bits());

    // and the cached result for the selection is untouched
    assert_eq!(bits(&merlin.resolution(&etrans).unwrap().fwhm), bits(&current.fwhm));
    assert_ne!(bits(&current.fwhm), bits(&slow.fwhm));
}

#[rstest]
#[case(vec![375.0])] // case 1: off harmonic
#[case(vec![650.0])] // case 2: too fast
#[case(vec![400.0, 50.0])] // case 3: too many
fn one_off_frequency_is_validated(mut merlin: Spectrometer, #[case] frequency: Vec<f64>) {
    merlin.set_ei(25.0).unwrap();
    assert!(merlin.resolution_at(25.0, &[0.0], Some(&frequency)).is_err());
    assert!(merlin.flux_at(25.0, Some(&frequency)).is_err());
    assert_eq!(merlin.frequency(), &[400.0]);
}

#[rstest]
fn unphysical_transfers_are_not_errors(mut merlin: Spectrometer) {
    merlin.set_ei(25.0).unwrap();
    let result = merlin.resolution(&[0.0, 25.0, 40.0]).unwrap();
    assert!(result.fwhm[0] > 0.0);
    assert!(result.fwhm[1].is_nan() && result.fwhm[2].is_nan());
    assert_eq!(result.diagnostics.len(), 1);
}

#[rstest]
fn multi_rep_resolution(mut let_: Spectrometer) {
    let fractions = [0.0, 0.25, 0.5];
    let energies = let_.allowed_ei().unwrap();
    let curves = let_.multi_rep_resolution(&fractions).unwrap();
    assert_eq!(curves.len(), energies.len());

    for (curve, ei) in curves.iter().zip(&energies) {
        assert_eq!(curve.ei, *ei);
        assert_eq!(curve.etrans, vec![0.0, 0.25 * ei, 0.5 * ei]);
        assert!(curve.fwhm.iter().all(|w| w.is_finite() && *w > 0.0));
        assert!(curve.fwhm[2] < curve.fwhm[0]);
    }

    // slower reps are better resolved
    assert!(curves.windows(2).all(|pair| pair[0].fwhm[0] < pair[1].fwhm[0]));

    let elastic = let_.resolution_at(energies[0], &[0.0], None).unwrap();
    assert_eq!(elastic.fwhm[0].to_bits(), curves[0].fwhm[0].to_bits());
}

#[rstest]
fn multi_rep_flux(mut let_: Spectrometer) {
    let energies = let_.allowed_ei().unwrap();
    let fluxes = let_.multi_rep_flux().unwrap();
    assert_eq!(fluxes.len(), energies.len());

    for rep in &fluxes {
        assert!(rep.flux.is_finite() && rep.flux > 0.0);
        assert_eq!(let_.flux_at(rep.ei, None).unwrap().value, rep.flux);
    }
}

#[rstest]
fn variants_change_the_slots(mut let_: Spectrometer) {
    let flux_mode = let_.widths().unwrap();

    let_.set_chopper("High Resolution", None).unwrap();
    assert_eq!(let_.variant(), Some("High Resolution"));
    let first = let_.config().choppers[0].as_disk().unwrap();
    let last = let_.config().choppers[4].as_disk().unwrap();
    assert_eq!(first.slot_width, 20.0);
    assert_eq!(last.slot_width, 15.0);

    let resolution_mode = let_.widths().unwrap();
    assert!(resolution_mode.moderator < flux_mode.moderator);
    assert!(resolution_mode.chopper < flux_mode.chopper);
    assert!(resolution_mode.energy < flux_mode.energy);

    // back to the default overlays
    let_.set_variant("High Flux").unwrap();
    assert_eq!(let_.widths().unwrap(), flux_mode);

    assert!(let_.set_variant("Nope").is_err());
    assert_eq!(let_.variant(), Some("High Flux"));
}

#[test]
fn facades_do_not_share_state() {
    let mut a = Spectrometer::from_builtin("merlin").unwrap();
    let mut b = Spectrometer::from_builtin("merlin").unwrap();
    a.set_ei(25.0).unwrap();
    b.set_ei(25.0).unwrap();
    b.set_frequency(&[250.0], None).unwrap();

    let etrans = [0.0];
    assert_ne!(
        a.resolution(&etrans).unwrap().fwhm[0].to_bits(),
        b.resolution(&etrans).unwrap().fwhm[0].to_bits()
    );
    assert_eq!(a.frequency(), &[400.0]);
}
