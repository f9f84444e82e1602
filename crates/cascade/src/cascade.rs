// external crates
use itertools::{izip, Itertools};
use log::debug;

// tofchop modules
use tofchop_instrument::{ChopperKind, FermiPackage, InstrumentConfig};
use tofchop_utils::constants::{wavelength, LAM2TOF};

// internal modules
use crate::diagram::{RepTrace, TimeDistanceDiagram};
use crate::error::{Error, Result};
use crate::solver::{check_path, find_lines, Rep};
use crate::timing::{disk_windows, fermi_windows, ChopperTiming};

/// Chopper openings for one operating point of an instrument
///
/// Built from a configuration, the frequency and phase of every chopper and
/// the energy the choppers are focused on. Construction lays out every
/// opening within the frame. [Cascade::reps] then finds the energies that
/// pass all of them.
///
/// Phases are in µs. For a chopper tracking the focus energy the phase is
/// an offset from the focus time of flight, while for an independently
/// phased chopper it is the time of the first opening itself.
///
/// ```rust
/// # use tofchop_cascade::Cascade;
/// # use tofchop_instrument::load_builtin;
/// let merlin = load_builtin("merlin").unwrap();
/// let (_, fermi) = merlin.fermi().unwrap();
/// let package = &fermi.packages["G"];
///
/// let cascade = Cascade::new(
///     &merlin,
///     Some(package),
///     &[50.0, 400.0],
///     &merlin.default_phases(),
///     25.0,
/// ).unwrap();
///
/// let energies = cascade.energies();
/// assert!(energies.iter().any(|e| (e - 25.0).abs() < 0.01));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Cascade {
    timings: Vec<ChopperTiming>,
    emission_window: f64,
    focus: f64,
    frame: f64,
    sample_distance: f64,
    detector_distance: f64,
}

impl Cascade {
    /// Lay out the openings of every chopper
    ///
    /// `frequencies` and `phases` need one entry per chopper. A Fermi
    /// chopper also needs the `package` currently installed.
    pub fn new(
        config: &InstrumentConfig,
        package: Option<&FermiPackage>,
        frequencies: &[f64],
        phases: &[f64],
        focus: f64,
    ) -> Result<Self> {
        let expected = config.choppers.len();
        if frequencies.len() != expected {
            return Err(Error::FrequencyCount {
                expected,
                found: frequencies.len(),
            });
        }
        if phases.len() != expected {
            return Err(Error::PhaseCount {
                expected,
                found: phases.len(),
            });
        }
        if !(focus > 0.0) {
            return Err(Error::NonPositiveEnergy { energy: focus });
        }

        let emission_window = config.moderator.emission_window;
        let frame = config.frames as f64 * config.source_period();
        let focus_lambda = wavelength(focus);

        let mut timings = Vec::with_capacity(expected);
        for (chopper, &frequency, &phase) in izip!(&config.choppers, frequencies, phases) {
            if !(frequency > 0.0) {
                return Err(Error::NonPositiveFrequency {
                    chopper: chopper.name.clone(),
                    frequency,
                });
            }

            let tracked = chopper.distance * LAM2TOF * focus_lambda + 0.5 * emission_window + phase;
            let windows = match &chopper.kind {
                ChopperKind::Disk(disk) => {
                    let t0 = if disk.independent_phase { phase } else { tracked };
                    disk_windows(disk, frequency, t0, frame)
                }
                ChopperKind::Fermi(fermi) => {
                    let package = package.ok_or_else(|| Error::MissingPackage {
                        chopper: chopper.name.clone(),
                    })?;
                    fermi_windows(fermi, package, frequency, tracked, frame)
                }
            };

            timings.push(ChopperTiming {
                name: chopper.name.clone(),
                distance: chopper.distance,
                windows,
            });
        }

        Ok(Self {
            timings,
            emission_window,
            focus,
            frame,
            sample_distance: config.sample_distance(),
            detector_distance: config.detector_distance(),
        })
    }

    /// Openings of every chopper, ordered from the moderator
    pub fn timings(&self) -> &[ChopperTiming] {
        &self.timings
    }

    /// Energy the choppers are phased for (meV)
    pub fn focus(&self) -> f64 {
        self.focus
    }

    /// Every pulse that passes the whole cascade, by increasing energy
    pub fn reps(&self) -> Vec<Rep> {
        let Some(last) = self.timings.last() else {
            return Vec::new();
        };

        let candidates = find_lines(last, self.emission_window);
        let found = candidates.len();
        let pairs = check_path(candidates, &self.timings, self.emission_window);
        debug!(
            "{found} band(s) from {}, {} transmitted",
            last.name,
            pairs.len()
        );

        pairs
            .into_iter()
            .map(Rep::from)
            .sorted_by(|a, b| a.energy.total_cmp(&b.energy))
            .collect()
    }

    /// Incident energies of every transmitted pulse, ascending (meV)
    pub fn energies(&self) -> Vec<f64> {
        self.reps().iter().map(|rep| rep.energy).collect()
    }

    /// Time-distance picture of the openings and transmitted pulses
    pub fn diagram(&self) -> TimeDistanceDiagram {
        let reps = self
            .reps()
            .iter()
            .map(|rep| RepTrace::new(rep, self.detector_distance))
            .collect();

        TimeDistanceDiagram {
            choppers: self.timings.clone(),
            reps,
            frame: self.frame,
            sample_distance: self.sample_distance,
            detector_distance: self.detector_distance,
        }
    }
}
