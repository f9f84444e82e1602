// standard library
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

// tofchop modules
use tofchop_utils::f;

// internal modules
use crate::chopper::{Chopper, ChopperKind, FermiChopper};
use crate::detector::Detector;
use crate::document::InstrumentDocument;
use crate::error::{Error, Result};
use crate::frequency::FrequencyScheme;
use crate::moderator::Moderator;
use crate::sample::Sample;
use crate::variant::Variant;

/// Complete, validated description of a spectrometer
///
/// Built once from an [InstrumentDocument] and read-only afterwards. Applying
/// a [Variant] produces a new value with [InstrumentConfig::with_variant].
#[derive(Debug, Clone, PartialEq)]
pub struct InstrumentConfig {
    /// Instrument name
    pub name: String,
    /// Choppers, nearest to the moderator first
    pub choppers: Vec<Chopper>,
    /// Neutron source
    pub moderator: Moderator,
    /// Sample geometry
    pub sample: Sample,
    /// Detector element
    pub detector: Detector,
    /// Final chopper to sample distance (m)
    pub chopper_to_sample: f64,
    /// Sample to detector distance (m)
    pub sample_to_detector: f64,
    /// Source repetition rate (Hz)
    pub source_rate: f64,
    /// Number of source periods covered by the time-distance window
    pub frames: usize,
    /// Coupling of user frequencies onto choppers
    pub frequency: FrequencyScheme,
    /// Named parameter overlays
    pub variants: Vec<Variant>,
    /// Variant applied when a package or variant is not named explicitly
    pub default_variant: Option<String>,
    /// Usable incident energy range of the instrument (meV)
    pub ei_limits: (f64, f64),
    /// Flux normalisation for instruments without a Fermi chopper
    pub flux_reference: Option<FluxReference>,
    /// Chopper defining the pulse on an instrument without a Fermi chopper
    pub pulse_chopper: Option<usize>,
}

/// Reference point for the disk chopper flux scaling law
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FluxReference {
    /// Final chopper frequency the white-beam flux was measured at (Hz)
    pub frequency: f64,
    /// Elastic resolution fraction below which scaling is quadratic
    pub threshold: f64,
}

impl InstrumentConfig {
    /// Read an instrument definition from a JSON file
    ///
    /// ```rust, no_run
    /// # use tofchop_instrument::InstrumentConfig;
    /// let config = InstrumentConfig::from_path("path/to/instrument.json").unwrap();
    /// ```
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let reader = BufReader::new(File::open(path.as_ref())?);
        let document: InstrumentDocument = serde_json::from_reader(reader)?;
        Self::try_from(document)
    }

    /// Parse an instrument definition from a JSON string
    pub fn from_json_str(json: &str) -> Result<Self> {
        let document: InstrumentDocument = serde_json::from_str(json)?;
        Self::try_from(document)
    }

    /// Index and geometry of the Fermi chopper, if there is one
    pub fn fermi(&self) -> Option<(usize, &FermiChopper)> {
        self.choppers
            .iter()
            .enumerate()
            .find_map(|(i, c)| c.as_fermi().map(|fermi| (i, fermi)))
    }

    /// Chopper closest to the sample
    pub fn final_chopper(&self) -> &Chopper {
        // validation guarantees at least one chopper
        &self.choppers[self.choppers.len() - 1]
    }

    /// Moderator to sample distance (m)
    pub fn sample_distance(&self) -> f64 {
        self.final_chopper().distance + self.chopper_to_sample
    }

    /// Moderator to detector distance (m)
    pub fn detector_distance(&self) -> f64 {
        self.sample_distance() + self.sample_to_detector
    }

    /// Length of one source period (µs)
    pub fn source_period(&self) -> f64 {
        1e6 / self.source_rate
    }

    /// Chopper defining the pulse when there is no Fermi chopper
    ///
    /// Defaults to the first chopper for disk-only instruments.
    pub fn pulse_chopper_index(&self) -> Option<usize> {
        match self.fermi() {
            Some(_) => None,
            None => Some(self.pulse_chopper.unwrap_or(0)),
        }
    }

    /// Default phase of every chopper (µs)
    pub fn default_phases(&self) -> Vec<f64> {
        self.choppers.iter().map(Chopper::default_phase).collect()
    }

    /// Names of all variants, in definition order
    pub fn variant_names(&self) -> Vec<String> {
        self.variants.iter().map(|v| v.name.clone()).collect()
    }

    /// Find a variant by name
    pub fn variant(&self, name: &str) -> Option<&Variant> {
        self.variants.iter().find(|v| v.name == name)
    }

    /// Names of all Fermi packages, sorted
    pub fn package_names(&self) -> Vec<String> {
        self.fermi()
            .map(|(_, fermi)| fermi.package_names())
            .unwrap_or_default()
    }

    /// New configuration with the named variant's overlays applied
    ///
    /// The result is validated again, so an overlay can not produce an
    /// impossible chopper.
    pub fn with_variant(&self, name: &str) -> Result<Self> {
        let variant = self.variant(name).ok_or_else(|| Error::UnknownVariant {
            name: name.to_string(),
            available: self.variant_names(),
        })?;

        let mut config = self.clone();
        for overlay in &variant.overlays {
            let chopper = &mut config.choppers[overlay.chopper];
            let ChopperKind::Disk(disk) = &mut chopper.kind else {
                return Err(Error::invalid(
                    f!("variant \"{name}\""),
                    f!("\"{}\" is not a disk chopper", chopper.name),
                ));
            };
            if let Some(width) = overlay.slot_width {
                disk.slot_width = width;
            }
            if let Some(width) = overlay.guide_width {
                disk.guide_width = width;
            }
            if let Some(slots) = overlay.slots {
                disk.slots = slots;
                // angles for the old slot count no longer apply
                disk.slot_angles = None;
            }
            if let Some(angles) = &overlay.slot_angles {
                disk.slot_angles = Some(angles.clone());
            }
            if let Some(phase) = overlay.default_phase {
                disk.default_phase = phase;
            }
        }

        log::debug!("applied variant \"{name}\" to {}", self.name);
        config.validate()?;
        Ok(config)
    }

    /// Check the invariants that tie the separate parts together
    pub(crate) fn validate(&self) -> Result<()> {
        if self.choppers.is_empty() {
            return Err(Error::invalid("choppers", "at least one chopper is required"));
        }
        for chopper in &self.choppers {
            chopper.validate()?;
        }
        if let Some(i) = self
            .choppers
            .windows(2)
            .position(|pair| pair[1].distance <= pair[0].distance)
        {
            return Err(Error::invalid(
                "choppers",
                f!(
                    "distances must increase from the moderator, \"{}\" is not beyond \"{}\"",
                    self.choppers[i + 1].name,
                    self.choppers[i].name
                ),
            ));
        }
        if self.choppers.iter().filter(|c| c.as_fermi().is_some()).count() > 1 {
            return Err(Error::invalid("choppers", "at most one Fermi chopper is supported"));
        }

        self.moderator.validate()?;
        self.detector.validate()?;
        self.frequency.validate(self.choppers.len())?;

        if !(self.chopper_to_sample > 0.0) || !(self.sample_to_detector > 0.0) {
            return Err(Error::invalid("distances", "flight paths must be positive"));
        }
        if !(self.source_rate > 0.0) {
            return Err(Error::invalid("source_rate", "repetition rate must be positive"));
        }
        if self.frames == 0 {
            return Err(Error::invalid("frames", "at least one frame is required"));
        }
        let (lo, hi) = self.ei_limits;
        if !(0.0 < lo && lo < hi) {
            return Err(Error::invalid("ei_limits", f!("energy range [{lo}, {hi}] is empty")));
        }

        for variant in &self.variants {
            if let Some(overlay) = variant
                .overlays
                .iter()
                .find(|o| o.chopper >= self.choppers.len())
            {
                return Err(Error::invalid(
                    f!("variant \"{}\"", variant.name),
                    f!("no chopper at index {}", overlay.chopper),
                ));
            }
        }
        if let Some(name) = &self.default_variant {
            if self.variant(name).is_none() {
                return Err(Error::UnknownVariant {
                    name: name.clone(),
                    available: self.variant_names(),
                });
            }
        }

        match (self.fermi(), self.pulse_chopper) {
            (Some(_), Some(_)) => {
                return Err(Error::invalid(
                    "pulse_chopper",
                    "the Fermi chopper defines the pulse when present",
                ))
            }
            (None, Some(i)) if i + 1 >= self.choppers.len() => {
                return Err(Error::invalid(
                    "pulse_chopper",
                    "the pulse chopper must be upstream of the final chopper",
                ))
            }
            (None, None) if self.choppers.len() < 2 => {
                return Err(Error::invalid(
                    "choppers",
                    "a disk-only instrument needs a pulse and a final chopper",
                ))
            }
            _ => (),
        }

        if !self.sample.shape.is_known() {
            log::warn!(
                "unknown sample shape {:?} on {}, using flat plate scaling",
                self.sample.shape,
                self.name
            );
        }
        Ok(())
    }
}
