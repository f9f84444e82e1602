//! On-disk layout of an instrument definition
//!
//! The document mirrors the JSON closely and is mapped explicitly onto the
//! typed configuration, with every field checked on the way.

// standard library
use std::collections::BTreeMap;

// external crates
use serde::{Deserialize, Serialize};

// tofchop modules
use tofchop_utils::CubicSpline;

// internal modules
use crate::chopper::{Chopper, ChopperKind, DiskChopper, FermiChopper, FermiPackage};
use crate::config::{FluxReference, InstrumentConfig};
use crate::detector::{Detector, DetectorModel};
use crate::error::{Error, Result};
use crate::frequency::FrequencyScheme;
use crate::moderator::{AnalyticSpectrum, FluxSource, Moderator, PulseModel, SoftHat};
use crate::sample::{Sample, SampleShape};
use crate::variant::{ChopperOverlay, Variant};

/// Raw instrument definition as read from JSON
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(deny_unknown_fields)]
pub struct InstrumentDocument {
    pub name: String,
    pub source_rate: f64,
    #[serde(default = "one")]
    pub frames: usize,
    pub ei_limits: [f64; 2],
    pub choppers: Vec<ChopperDocument>,
    pub chopper_to_sample: f64,
    pub sample_to_detector: f64,
    pub moderator: ModeratorDocument,
    pub sample: SampleDocument,
    pub detector: DetectorDocument,
    pub frequency: FrequencyDocument,
    #[serde(default)]
    pub variants: Vec<VariantDocument>,
    #[serde(default)]
    pub default_variant: Option<String>,
    #[serde(default)]
    pub flux_reference: Option<FluxReferenceDocument>,
    #[serde(default)]
    pub pulse_chopper: Option<usize>,
}

fn one() -> usize {
    1
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ChopperDocument {
    pub name: String,
    pub distance: f64,
    #[serde(flatten)]
    pub kind: ChopperKindDocument,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ChopperKindDocument {
    Disk {
        slots: usize,
        #[serde(default)]
        slot_angles: Option<Vec<f64>>,
        slot_width: f64,
        guide_width: f64,
        radius: f64,
        #[serde(default = "one")]
        disks: usize,
        #[serde(default)]
        independent_phase: bool,
        #[serde(default)]
        default_phase: f64,
    },
    Fermi {
        packages: BTreeMap<String, PackageDocument>,
        default_package: String,
        aperture_distance: f64,
        aperture_width: f64,
        #[serde(default)]
        transmits_at_pi: bool,
    },
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(deny_unknown_fields)]
pub struct PackageDocument {
    pub pslit: f64,
    pub pslat: f64,
    pub radius: f64,
    pub rho: f64,
    #[serde(default)]
    pub jitter: f64,
    #[serde(default = "unit")]
    pub flux_correction: f64,
    #[serde(default)]
    pub ei_limits: Option<[f64; 2]>,
}

fn unit() -> f64 {
    1.0
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(deny_unknown_fields)]
pub struct ModeratorDocument {
    pub model: PulseModelDocument,
    pub emission_window: f64,
    #[serde(default)]
    pub theta: f64,
    pub flux: FluxDocument,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PulseModelDocument {
    ChiSquared {
        depth: f64,
    },
    IkedaCarpenter {
        s1: f64,
        s2: f64,
        b1: f64,
        b2: f64,
        emod: f64,
    },
    ModifiedChiSquared {
        depth: f64,
        #[serde(default)]
        coefficients: Vec<f64>,
        /// height, gradient, x1, x2, fwhm1, fwhm2
        #[serde(default)]
        scale: Option<[f64; 6]>,
    },
    Measured {
        energy: Vec<f64>,
        fwhm: Vec<f64>,
    },
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FluxDocument {
    Measured {
        wavelength: Vec<f64>,
        flux: Vec<f64>,
    },
    Analytic {
        thermal: f64,
        temperature: f64,
        epithermal: f64,
        cutoff: f64,
        width: f64,
    },
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(deny_unknown_fields)]
pub struct SampleDocument {
    pub shape: u8,
    pub dimensions: [f64; 3],
    #[serde(default)]
    pub angle: f64,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(deny_unknown_fields)]
pub struct DetectorDocument {
    pub diameter: f64,
    pub model: DetectorModelDocument,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DetectorModelDocument {
    Slab { depth: f64 },
    He3Tube { pressure: f64, wall_ratio: f64 },
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(deny_unknown_fields)]
pub struct FrequencyDocument {
    pub names: Vec<String>,
    pub matrix: Vec<Vec<f64>>,
    #[serde(default)]
    pub constant: Option<Vec<f64>>,
    pub max: Vec<f64>,
    pub default: Vec<f64>,
    #[serde(default)]
    pub multiple_of_source: Option<Vec<bool>>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(deny_unknown_fields)]
pub struct VariantDocument {
    pub name: String,
    #[serde(default)]
    pub overlays: Vec<OverlayDocument>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(deny_unknown_fields)]
pub struct OverlayDocument {
    pub chopper: usize,
    #[serde(default)]
    pub slot_width: Option<f64>,
    #[serde(default)]
    pub guide_width: Option<f64>,
    #[serde(default)]
    pub slots: Option<usize>,
    #[serde(default)]
    pub slot_angles: Option<Vec<f64>>,
    #[serde(default)]
    pub default_phase: Option<f64>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy)]
#[serde(deny_unknown_fields)]
pub struct FluxReferenceDocument {
    pub frequency: f64,
    pub threshold: f64,
}

impl TryFrom<InstrumentDocument> for InstrumentConfig {
    type Error = Error;

    fn try_from(doc: InstrumentDocument) -> Result<Self> {
        let n_choppers = doc.choppers.len();

        let choppers = doc
            .choppers
            .into_iter()
            .map(Chopper::from)
            .collect();

        let config = Self {
            name: doc.name,
            choppers,
            moderator: Moderator::try_from(doc.moderator)?,
            sample: Sample::from(doc.sample),
            detector: Detector::from(doc.detector),
            chopper_to_sample: doc.chopper_to_sample,
            sample_to_detector: doc.sample_to_detector,
            source_rate: doc.source_rate,
            frames: doc.frames,
            frequency: doc.frequency.into_scheme(n_choppers),
            variants: doc.variants.into_iter().map(Variant::from).collect(),
            default_variant: doc.default_variant,
            ei_limits: (doc.ei_limits[0], doc.ei_limits[1]),
            flux_reference: doc.flux_reference.map(|r| FluxReference {
                frequency: r.frequency,
                threshold: r.threshold,
            }),
            pulse_chopper: doc.pulse_chopper,
        };

        config.validate()?;
        log::debug!(
            "loaded {} with {} choppers and {} variants",
            config.name,
            config.choppers.len(),
            config.variants.len()
        );
        Ok(config)
    }
}

impl From<ChopperDocument> for Chopper {
    fn from(doc: ChopperDocument) -> Self {
        let kind = match doc.kind {
            ChopperKindDocument::Disk {
                slots,
                slot_angles,
                slot_width,
                guide_width,
                radius,
                disks,
                independent_phase,
                default_phase,
            } => ChopperKind::Disk(DiskChopper {
                slots,
                slot_angles,
                slot_width,
                guide_width,
                radius,
                disks,
                independent_phase,
                default_phase,
            }),
            ChopperKindDocument::Fermi {
                packages,
                default_package,
                aperture_distance,
                aperture_width,
                transmits_at_pi,
            } => ChopperKind::Fermi(FermiChopper {
                packages: packages
                    .into_iter()
                    .map(|(name, p)| (name, FermiPackage::from(p)))
                    .collect(),
                default_package,
                aperture_distance,
                aperture_width,
                transmits_at_pi,
            }),
        };

        Self {
            name: doc.name,
            distance: doc.distance,
            kind,
        }
    }
}

impl From<PackageDocument> for FermiPackage {
    fn from(doc: PackageDocument) -> Self {
        Self {
            pslit: doc.pslit,
            pslat: doc.pslat,
            radius: doc.radius,
            rho: doc.rho,
            jitter: doc.jitter,
            flux_correction: doc.flux_correction,
            ei_limits: doc.ei_limits.map(|[lo, hi]| (lo, hi)),
        }
    }
}

impl TryFrom<ModeratorDocument> for Moderator {
    type Error = Error;

    fn try_from(doc: ModeratorDocument) -> Result<Self> {
        let model = match doc.model {
            PulseModelDocument::ChiSquared { depth } => PulseModel::ChiSquared { depth },
            PulseModelDocument::IkedaCarpenter {
                s1,
                s2,
                b1,
                b2,
                emod,
            } => PulseModel::IkedaCarpenter {
                s1,
                s2,
                b1,
                b2,
                emod,
            },
            PulseModelDocument::ModifiedChiSquared {
                depth,
                coefficients,
                scale,
            } => PulseModel::ModifiedChiSquared {
                depth,
                coefficients,
                scale: scale.map(|[height, gradient, x1, x2, fwhm1, fwhm2]| SoftHat {
                    height,
                    gradient,
                    x1,
                    x2,
                    fwhm1,
                    fwhm2,
                }),
            },
            PulseModelDocument::Measured { energy, fwhm } => PulseModel::Measured {
                width: CubicSpline::new(&energy, &fwhm)
                    .map_err(|e| Error::table("moderator width", e))?,
            },
        };

        let flux = match doc.flux {
            FluxDocument::Measured { wavelength, flux } => FluxSource::Measured {
                flux: CubicSpline::new(&wavelength, &flux)
                    .map_err(|e| Error::table("moderator flux", e))?,
            },
            FluxDocument::Analytic {
                thermal,
                temperature,
                epithermal,
                cutoff,
                width,
            } => FluxSource::Analytic(AnalyticSpectrum {
                thermal,
                temperature,
                epithermal,
                cutoff,
                width,
            }),
        };

        Ok(Self {
            model,
            emission_window: doc.emission_window,
            theta: doc.theta,
            flux,
        })
    }
}

impl From<SampleDocument> for Sample {
    fn from(doc: SampleDocument) -> Self {
        Self {
            dimensions: doc.dimensions,
            shape: SampleShape::from_code(doc.shape),
            angle: doc.angle,
        }
    }
}

impl From<DetectorDocument> for Detector {
    fn from(doc: DetectorDocument) -> Self {
        let model = match doc.model {
            DetectorModelDocument::Slab { depth } => DetectorModel::Slab { depth },
            DetectorModelDocument::He3Tube {
                pressure,
                wall_ratio,
            } => DetectorModel::He3Tube {
                pressure,
                wall_ratio,
            },
        };
        Self {
            diameter: doc.diameter,
            model,
        }
    }
}

impl FrequencyDocument {
    /// Fill in the optional parts, sized for the chopper count
    fn into_scheme(self, choppers: usize) -> FrequencyScheme {
        let n = self.names.len();
        FrequencyScheme {
            constant: self.constant.unwrap_or_else(|| vec![0.0; choppers]),
            multiple_of_source: self.multiple_of_source.unwrap_or_else(|| vec![false; n]),
            names: self.names,
            matrix: self.matrix,
            max: self.max,
            default: self.default,
        }
    }
}

impl From<VariantDocument> for Variant {
    fn from(doc: VariantDocument) -> Self {
        Self {
            name: doc.name,
            overlays: doc
                .overlays
                .into_iter()
                .map(|o| ChopperOverlay {
                    chopper: o.chopper,
                    slot_width: o.slot_width,
                    guide_width: o.guide_width,
                    slots: o.slots,
                    slot_angles: o.slot_angles,
                    default_phase: o.default_phase,
                })
                .collect(),
        }
    }
}

