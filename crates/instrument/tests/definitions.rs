//! Integration tests for instrument definitions

use rstest::{fixture, rstest};
use tofchop_instrument::{
    load_builtin, ChopperKind, Error, FluxSource, InstrumentConfig, PulseModel, SampleShape,
};

#[fixture]
fn merlin() -> InstrumentConfig {
    load_builtin("merlin").unwrap()
}

#[fixture]
fn let_() -> InstrumentConfig {
    load_builtin("let").unwrap()
}

/// Smallest valid disk-only definition, edited by the failure cases
fn minimal() -> serde_json::Value {
    serde_json::json!({
        "name": "TEST",
        "source_rate": 50.0,
        "ei_limits": [1.0, 100.0],
        "choppers": [
            { "name": "A", "distance": 10.0, "kind": "disk", "slots": 1,
              "slot_width": 50.0, "guide_width": 50.0, "radius": 300.0 },
            { "name": "B", "distance": 20.0, "kind": "disk", "slots": 1,
              "slot_width": 25.0, "guide_width": 25.0, "radius": 300.0 }
        ],
        "chopper_to_sample": 1.5,
        "sample_to_detector": 3.0,
        "moderator": {
            "model": { "kind": "chi_squared", "depth": 30.0 },
            "emission_window": 100.0,
            "flux": { "kind": "analytic", "thermal": 1e5, "temperature": 25.0,
                      "epithermal": 1e3, "cutoff": 100.0, "width": 2.0 }
        },
        "sample": { "shape": 0, "dimensions": [0.02, 0.02, 0.02] },
        "detector": { "diameter": 0.025, "model": { "kind": "slab", "depth": 0.025 } },
        "frequency": {
            "names": ["Disk"],
            "matrix": [[1.0], [1.0]],
            "max": [300.0],
            "default": [200.0]
        }
    })
}

fn parse(value: serde_json::Value) -> tofchop_instrument::Result<InstrumentConfig> {
    InstrumentConfig::from_json_str(&value.to_string())
}

#[rstest]
#[case("merlin", 2)]
#[case("MERLIN", 2)]
#[case("let", 5)]
#[case("Let", 5)]
fn builtin_chopper_counts(#[case] name: &str, #[case] choppers: usize) {
    assert_eq!(load_builtin(name).unwrap().choppers.len(), choppers);
}

#[test]
fn unknown_builtin() {
    let error = load_builtin("mari").unwrap_err();
    match error {
        Error::UnknownInstrument { name, available } => {
            assert_eq!(name, "mari");
            assert_eq!(available, vec!["let", "merlin"]);
        }
        other => panic!("unexpected error {other:?}"),
    }
}

#[rstest]
fn merlin_layout(merlin: InstrumentConfig) {
    let (index, fermi) = merlin.fermi().unwrap();
    assert_eq!(index, 1);
    assert_eq!(fermi.default_package, "G");
    assert!(fermi.transmits_at_pi);
    assert_eq!(merlin.pulse_chopper_index(), None);
    assert!((merlin.sample_distance() - 11.82).abs() < 1e-12);
    assert!((merlin.detector_distance() - 14.32).abs() < 1e-12);
    assert_eq!(merlin.frequency.long_frequency(&[400.0]), vec![50.0, 400.0]);
    assert_eq!(merlin.default_phases(), vec![1500.0, 0.0]);
    assert!(matches!(merlin.moderator.model, PulseModel::ModifiedChiSquared { scale: Some(_), .. }));
    assert!(matches!(merlin.moderator.flux, FluxSource::Measured { .. }));
    assert_eq!(merlin.sample.shape, SampleShape::Annulus);
}

#[rstest]
fn let_layout(let_: InstrumentConfig) {
    assert!(let_.fermi().is_none());
    assert_eq!(let_.pulse_chopper_index(), Some(0));
    assert_eq!(let_.default_variant.as_deref(), Some("High Flux"));
    assert_eq!(
        let_.variant_names(),
        vec!["High Flux", "Intermediate", "High Resolution"]
    );
    assert!(let_.package_names().is_empty());
    assert!(matches!(let_.moderator.model, PulseModel::Measured { .. }));
    assert!(matches!(let_.moderator.flux, FluxSource::Analytic(_)));
    assert_eq!(let_.source_period(), 1e5);
}

#[rstest]
fn let_variant_overlay(let_: InstrumentConfig) {
    let high_res = let_.with_variant("High Resolution").unwrap();

    let width = |config: &InstrumentConfig, i: usize| match &config.choppers[i].kind {
        ChopperKind::Disk(disk) => disk.slot_width,
        ChopperKind::Fermi(_) => unreachable!(),
    };
    assert_eq!(width(&high_res, 0), 20.0);
    assert_eq!(width(&high_res, 4), 15.0);

    // untouched choppers and the original are left alone
    assert_eq!(width(&high_res, 2), width(&let_, 2));
    assert_eq!(width(&let_, 4), 31.0);
}

#[rstest]
fn unknown_variant(let_: InstrumentConfig) {
    match let_.with_variant("Ultra").unwrap_err() {
        Error::UnknownVariant { available, .. } => assert_eq!(available.len(), 3),
        other => panic!("unexpected error {other:?}"),
    }
}

#[test]
fn minimal_definition_defaults() {
    let config = parse(minimal()).unwrap();
    assert_eq!(config.frames, 1);
    assert_eq!(config.frequency.constant, vec![0.0, 0.0]);
    assert_eq!(config.frequency.multiple_of_source, vec![false]);
    assert_eq!(config.pulse_chopper_index(), Some(0));
    assert!(config.variants.is_empty());
}

#[rstest]
#[case("/choppers/1/distance", serde_json::json!(5.0))] // case 1: distances out of order
#[case("/choppers/0/slot_width", serde_json::json!(2000.0))] // case 2: slot wider than rim
#[case("/source_rate", serde_json::json!(0.0))] // case 3: no source
#[case("/ei_limits", serde_json::json!([10.0, 1.0]))] // case 4: empty range
#[case("/detector/diameter", serde_json::json!(-1.0))] // case 5: negative detector
#[case("/moderator/emission_window", serde_json::json!(-5.0))] // case 6: negative window
#[case("/frequency/matrix", serde_json::json!([[1.0]]))] // case 7: matrix too short
#[case("/pulse_chopper", serde_json::json!(1))] // case 8: pulse chopper is the final
#[case("/default_variant", serde_json::json!("missing"))] // case 9: undefined default
fn invalid_definitions(#[case] pointer: &str, #[case] value: serde_json::Value) {
    let mut doc = minimal();
    match doc.pointer_mut(pointer) {
        Some(field) => *field = value,
        // optional top-level fields are not in the minimal document
        None => doc[pointer.trim_start_matches('/')] = value,
    }
    assert!(parse(doc).is_err());
}

#[test]
fn unknown_shape_uses_fallback() {
    let mut doc = minimal();
    doc["sample"]["shape"] = serde_json::json!(7);
    let config = parse(doc).unwrap();
    assert_eq!(config.sample.shape, SampleShape::Other(7));
}

#[test]
fn bad_tables_are_reported() {
    let mut doc = minimal();
    doc["moderator"]["model"] = serde_json::json!({
        "kind": "measured",
        "energy": [1.0, 5.0, 3.0],
        "fwhm": [100.0, 50.0, 30.0]
    });
    assert!(matches!(parse(doc), Err(Error::InvalidTable { .. })));
}

#[test]
fn unknown_fields_are_rejected() {
    let mut doc = minimal();
    doc["sample"]["colour"] = serde_json::json!("blue");
    assert!(matches!(parse(doc), Err(Error::FailedSerde(_))));
}
