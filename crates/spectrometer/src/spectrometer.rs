// external crates
use log::{debug, warn};

// tofchop modules
use tofchop_cascade::{Cascade, Rep, TimeDistanceDiagram};
use tofchop_instrument::{load_builtin, FermiPackage, InstrumentConfig};
use tofchop_widths::Diagnostic;

// internal modules
use crate::cache::Cache;
use crate::error::{Error, Result};
use crate::flux::{flux, Flux};
use crate::resolution::{resolution, widths, OperatingPoint, Resolution, Widths};
use crate::selection::Selection;

/// Relative tolerance when checking a frequency against the source rate
const MULTIPLE_TOLERANCE: f64 = 1e-6;

/// Resolution curve for one transmitted incident energy
#[derive(Debug, Clone, PartialEq)]
pub struct RepResolution {
    /// Incident energy of the rep (meV)
    pub ei: f64,
    /// Energy transfers the curve was evaluated at (meV)
    pub etrans: Vec<f64>,
    /// FWHM at each transfer (meV)
    pub fwhm: Vec<f64>,
}

/// Flux for one transmitted incident energy
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RepFlux {
    /// Incident energy of the rep (meV)
    pub ei: f64,
    /// Flux at the sample (n/cm²/s)
    pub flux: f64,
}

/// A spectrometer at one operating point
///
/// Holds the instrument definition and the current selection of chopper
/// package or variant, frequencies, phases and incident energy. Every query
/// goes through a cache that is only trusted while the [Selection] it was
/// filled for is unchanged.
///
/// Setters validate their input and leave the selection untouched on error.
///
/// ```rust
/// # use tofchop_spectrometer::Spectrometer;
/// let mut merlin = Spectrometer::from_builtin("merlin").unwrap();
/// merlin.set_chopper("G", Some(&[400.0])).unwrap();
/// merlin.set_ei(25.0).unwrap();
///
/// let resolution = merlin.resolution(&[0.0, 5.0, 10.0]).unwrap();
/// assert!(resolution.fwhm.iter().all(|w| *w > 0.0));
/// ```
#[derive(Debug)]
pub struct Spectrometer {
    base: InstrumentConfig,
    config: InstrumentConfig,
    package: Option<String>,
    variant: Option<String>,
    frequency: Vec<f64>,
    long_frequency: Vec<f64>,
    phase: Vec<f64>,
    ei: Option<f64>,
    cache: Cache,
}

impl Spectrometer {
    /// Start from the instrument defaults
    ///
    /// The default package and variant are applied along with the default
    /// frequencies and phases. No incident energy is set.
    pub fn new(base: InstrumentConfig) -> Result<Self> {
        let package = base.fermi().map(|(_, fermi)| fermi.default_package.clone());
        let variant = base.default_variant.clone();
        let config = match &variant {
            Some(name) => base.with_variant(name)?,
            None => base.clone(),
        };

        let frequency = base.frequency.default.clone();
        let long_frequency = base.frequency.long_frequency(&frequency);
        let phase = config.default_phases();

        Ok(Self {
            base,
            config,
            package,
            variant,
            frequency,
            long_frequency,
            phase,
            ei: None,
            cache: Cache::default(),
        })
    }

    /// Start from one of the built-in instruments
    pub fn from_builtin(name: &str) -> Result<Self> {
        Self::new(load_builtin(name)?)
    }

    /// Select a Fermi package or a variant by name
    ///
    /// Any variant overlays and phases are reset to the instrument defaults
    /// first. New frequencies are applied at the same time if given.
    pub fn set_chopper(&mut self, name: &str, frequency: Option<&[f64]>) -> Result<()> {
        let user = match frequency {
            Some(frequency) => Some(self.validated_frequency(frequency)?),
            None => None,
        };

        let (package, variant, config) = if self.base.package_names().iter().any(|p| p == name) {
            let variant = self.base.default_variant.clone();
            let config = match &variant {
                Some(v) => self.base.with_variant(v)?,
                None => self.base.clone(),
            };
            (Some(name.to_string()), variant, config)
        } else if self.base.variant(name).is_some() {
            let package = self.package.clone();
            (package, Some(name.to_string()), self.base.with_variant(name)?)
        } else {
            return Err(Error::UnknownChopper {
                name: name.to_string(),
                available: [self.base.package_names(), self.base.variant_names()].concat(),
            });
        };

        debug!("{}: selected chopper \"{name}\"", self.base.name);
        self.phase = config.default_phases();
        self.config = config;
        self.package = package;
        self.variant = variant;
        if let Some(user) = user {
            self.store_frequency(user);
        }
        self.check_stored_ei();
        Ok(())
    }

    /// Apply a variant without changing the Fermi package
    pub fn set_variant(&mut self, name: &str) -> Result<()> {
        let config = self.base.with_variant(name)?;
        debug!("{}: selected variant \"{name}\"", self.base.name);
        self.phase = config.default_phases();
        self.config = config;
        self.variant = Some(name.to_string());
        Ok(())
    }

    /// Set the user frequencies (Hz), and optionally every chopper phase (µs)
    pub fn set_frequency(&mut self, frequency: &[f64], phase: Option<&[f64]>) -> Result<()> {
        let user = self.validated_frequency(frequency)?;
        if let Some(phase) = phase {
            self.check_phase(phase)?;
            self.phase = phase.to_vec();
        }
        self.store_frequency(user);
        Ok(())
    }

    /// Set the phase of every chopper (µs)
    pub fn set_phase(&mut self, phase: &[f64]) -> Result<()> {
        self.check_phase(phase)?;
        debug!("{}: phases set to {phase:?}", self.base.name);
        self.phase = phase.to_vec();
        Ok(())
    }

    /// Set the incident energy the choppers are focused on (meV)
    pub fn set_ei(&mut self, ei: f64) -> Result<()> {
        self.check_ei(ei)?;
        debug!("{}: incident energy set to {ei} meV", self.base.name);
        self.ei = Some(ei);
        Ok(())
    }

    /// Fermi package if there is one, otherwise the variant
    pub fn chopper(&self) -> Option<&str> {
        self.package.as_deref().or(self.variant.as_deref())
    }

    /// Applied variant
    pub fn variant(&self) -> Option<&str> {
        self.variant.as_deref()
    }

    /// User frequencies (Hz)
    pub fn frequency(&self) -> &[f64] {
        &self.frequency
    }

    /// Frequency of every chopper (Hz)
    pub fn long_frequency(&self) -> &[f64] {
        &self.long_frequency
    }

    /// Phase of every chopper (µs)
    pub fn phase(&self) -> &[f64] {
        &self.phase
    }

    /// Focus energy (meV)
    pub fn ei(&self) -> Option<f64> {
        self.ei
    }

    /// Names of the Fermi packages
    pub fn packages(&self) -> Vec<String> {
        self.base.package_names()
    }

    /// Names of the variants
    pub fn variants(&self) -> Vec<String> {
        self.base.variant_names()
    }

    /// Configuration with the current variant applied
    pub fn config(&self) -> &InstrumentConfig {
        &self.config
    }

    /// Snapshot of everything that determines a result
    pub fn selection(&self) -> Selection {
        Selection {
            package: self.package.clone(),
            variant: self.variant.clone(),
            frequency: self.frequency.clone(),
            phase: self.phase.clone(),
            ei: self.ei,
        }
    }

    /// Valid incident energy range for the active package (meV)
    pub fn ei_range(&self) -> (f64, f64) {
        self.active_package()
            .and_then(|p| p.ei_limits)
            .unwrap_or(self.config.ei_limits)
    }

    /// Incident energies transmitted with the choppers focused on [Self::ei]
    ///
    /// Only energies within [Self::ei_range] are returned. An empty list
    /// means nothing gets through.
    pub fn allowed_ei(&mut self) -> Result<Vec<f64>> {
        Ok(self.reps()?.iter().map(|rep| rep.energy).collect())
    }

    /// Energy resolution at [Self::ei] for each energy transfer (meV)
    pub fn resolution(&mut self, etrans: &[f64]) -> Result<Resolution> {
        let ei = self.ei.ok_or(Error::EnergyNotSet)?;
        self.resolution_at(ei, etrans, None)
    }

    /// Energy resolution at any valid incident energy (meV)
    ///
    /// The choppers stay focused on [Self::ei], only the neutrons change.
    /// User `frequency` overrides are validated like [Self::set_frequency]
    /// but only apply to this call: the selection is untouched and nothing
    /// is cached.
    pub fn resolution_at(
        &mut self,
        ei: f64,
        etrans: &[f64],
        frequency: Option<&[f64]>,
    ) -> Result<Resolution> {
        self.check_ei(ei)?;
        let frequencies = self.frequency_override(frequency)?;
        let fingerprint = self.selection().fingerprint();
        let package = active_package(&self.config, self.package.as_deref());
        let point = OperatingPoint {
            config: &self.config,
            package,
            frequencies: frequencies.as_deref().unwrap_or(self.long_frequency.as_slice()),
        };

        let result = match frequency {
            Some(_) => resolution(&point, ei, etrans),
            None => self
                .cache
                .resolution(&fingerprint, ei, etrans, || resolution(&point, ei, etrans)),
        };
        report(&result.diagnostics);
        Ok(result)
    }

    /// Resolution curve for every transmitted energy
    ///
    /// Transfers are given as fractions of each rep's incident energy, so
    /// `[0.0, 0.5]` evaluates the elastic line and half of each Ei.
    pub fn multi_rep_resolution(&mut self, fractions: &[f64]) -> Result<Vec<RepResolution>> {
        let reps = self.reps()?;
        let fingerprint = self.selection().fingerprint();
        let package = active_package(&self.config, self.package.as_deref());
        let point = OperatingPoint {
            config: &self.config,
            package,
            frequencies: &self.long_frequency,
        };

        let mut diagnostics = Vec::new();
        let mut curves = Vec::with_capacity(reps.len());
        for rep in reps {
            let ei = rep.energy;
            let etrans = fractions.iter().map(|x| x * ei).collect::<Vec<f64>>();
            let result = self
                .cache
                .resolution(&fingerprint, ei, &etrans, || resolution(&point, ei, &etrans));
            diagnostics.extend(result.diagnostics);
            curves.push(RepResolution {
                ei,
                etrans,
                fwhm: result.fwhm,
            });
        }

        report(&diagnostics);
        Ok(curves)
    }

    /// Flux at the sample for [Self::ei] (n/cm²/s)
    pub fn flux(&mut self) -> Result<Flux> {
        let ei = self.ei.ok_or(Error::EnergyNotSet)?;
        self.flux_at(ei, None)
    }

    /// Flux at the sample for any valid incident energy (n/cm²/s)
    ///
    /// A `frequency` override behaves as in [Self::resolution_at].
    pub fn flux_at(&mut self, ei: f64, frequency: Option<&[f64]>) -> Result<Flux> {
        self.check_ei(ei)?;
        let frequencies = self.frequency_override(frequency)?;
        let fingerprint = self.selection().fingerprint();
        let package = active_package(&self.config, self.package.as_deref());
        let point = OperatingPoint {
            config: &self.config,
            package,
            frequencies: frequencies.as_deref().unwrap_or(self.long_frequency.as_slice()),
        };

        let result = match frequency {
            Some(_) => flux(&point, ei),
            None => self.cache.flux(&fingerprint, ei, || flux(&point, ei)),
        };
        report(result.diagnostic.as_slice());
        Ok(result)
    }

    /// Flux for every transmitted energy
    pub fn multi_rep_flux(&mut self) -> Result<Vec<RepFlux>> {
        let reps = self.reps()?;
        let fingerprint = self.selection().fingerprint();
        let package = active_package(&self.config, self.package.as_deref());
        let point = OperatingPoint {
            config: &self.config,
            package,
            frequencies: &self.long_frequency,
        };

        let mut diagnostics = Vec::new();
        let fluxes = reps
            .iter()
            .map(|rep| {
                let ei = rep.energy;
                let result = self.cache.flux(&fingerprint, ei, || flux(&point, ei));
                diagnostics.extend(result.diagnostic);
                RepFlux {
                    ei,
                    flux: result.value,
                }
            })
            .collect();

        report(&diagnostics);
        Ok(fluxes)
    }

    /// Time width of every component for the elastic line at [Self::ei]
    pub fn widths(&self) -> Result<Widths> {
        let ei = self.ei.ok_or(Error::EnergyNotSet)?;
        self.check_ei(ei)?;
        let result = widths(&self.operating_point(), ei);
        report(&result.diagnostics);
        Ok(result)
    }

    /// Openings and transmitted pulses for plotting
    pub fn time_distance_diagram(&self) -> Result<TimeDistanceDiagram> {
        Ok(self.cascade()?.diagram())
    }

    /// Transmitted reps within the valid energy range, from the cache
    fn reps(&mut self) -> Result<Vec<Rep>> {
        let ei = self.ei.ok_or(Error::EnergyNotSet)?;
        self.check_ei(ei)?;
        let fingerprint = self.selection().fingerprint();
        let (lo, hi) = self.ei_range();

        let config = &self.config;
        let frequencies = &self.long_frequency;
        let phase = &self.phase;
        let package = active_package(config, self.package.as_deref());

        self.cache.reps(&fingerprint, || -> Result<Vec<Rep>> {
            let cascade = Cascade::new(config, package, frequencies, phase, ei)?;
            Ok(cascade
                .reps()
                .into_iter()
                .filter(|rep| lo <= rep.energy && rep.energy <= hi)
                .collect())
        })
    }

    fn cascade(&self) -> Result<Cascade> {
        let ei = self.ei.ok_or(Error::EnergyNotSet)?;
        self.check_ei(ei)?;
        Ok(Cascade::new(
            &self.config,
            self.active_package(),
            &self.long_frequency,
            &self.phase,
            ei,
        )?)
    }

    fn operating_point(&self) -> OperatingPoint<'_> {
        OperatingPoint {
            config: &self.config,
            package: self.active_package(),
            frequencies: &self.long_frequency,
        }
    }

    fn active_package(&self) -> Option<&FermiPackage> {
        active_package(&self.config, self.package.as_deref())
    }

    fn validated_frequency(&self, frequency: &[f64]) -> Result<Vec<f64>> {
        let scheme = &self.base.frequency;
        if frequency.len() != scheme.len() {
            return Err(Error::FrequencyCount {
                expected: scheme.len(),
                found: frequency.len(),
            });
        }

        for (i, &f) in frequency.iter().enumerate() {
            let name = || scheme.names[i].clone();
            if !(f > 0.0) {
                return Err(Error::NonPositiveFrequency {
                    name: name(),
                    frequency: f,
                });
            }
            if f > scheme.max[i] {
                return Err(Error::FrequencyAboveMaximum {
                    name: name(),
                    frequency: f,
                    max: scheme.max[i],
                });
            }
            let harmonics = f / self.base.source_rate;
            if scheme.multiple_of_source[i] && (harmonics - harmonics.round()).abs() > MULTIPLE_TOLERANCE {
                return Err(Error::NotSourceMultiple {
                    name: name(),
                    frequency: f,
                    source_rate: self.base.source_rate,
                });
            }
        }
        Ok(frequency.to_vec())
    }

    /// Chopper frequencies for a one-off query with other user frequencies
    fn frequency_override(&self, frequency: Option<&[f64]>) -> Result<Option<Vec<f64>>> {
        let Some(frequency) = frequency else {
            return Ok(None);
        };
        let user = self.validated_frequency(frequency)?;
        Ok(Some(self.base.frequency.long_frequency(&user)))
    }

    fn store_frequency(&mut self, frequency: Vec<f64>) {
        self.long_frequency = self.base.frequency.long_frequency(&frequency);
        debug!(
            "{}: frequencies set to {frequency:?}, choppers at {:?}",
            self.base.name, self.long_frequency
        );
        self.frequency = frequency;
    }

    fn check_phase(&self, phase: &[f64]) -> Result<()> {
        let expected = self.config.choppers.len();
        match phase.len() == expected {
            true => Ok(()),
            false => Err(Error::PhaseCount {
                expected,
                found: phase.len(),
            }),
        }
    }

    fn check_ei(&self, ei: f64) -> Result<()> {
        let (min, max) = self.ei_range();
        match min <= ei && ei <= max {
            true => Ok(()),
            false => Err(Error::EnergyOutOfRange {
                energy: ei,
                min,
                max,
            }),
        }
    }

    /// A new package may not cover the incident energy already set
    fn check_stored_ei(&self) {
        if let Some(ei) = self.ei {
            if let Err(e) = self.check_ei(ei) {
                warn!("{}: {e}", self.base.name);
            }
        }
    }
}

fn active_package<'a>(config: &'a InstrumentConfig, name: Option<&str>) -> Option<&'a FermiPackage> {
    let (_, fermi) = config.fermi()?;
    fermi.packages.get(name?)
}

/// Warn once for everything a query could not compute
fn report(diagnostics: &[Diagnostic]) {
    if diagnostics.is_empty() {
        return;
    }
    let text = diagnostics
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<String>>()
        .join("; ");
    warn!("{text}");
}
