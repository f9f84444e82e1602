//! Typed instrument definitions for direct-geometry chopper spectrometers
//!
//! An [InstrumentConfig] describes everything that is fixed about a
//! spectrometer: the ordered chopper cascade, the moderator, sample and
//! detector, the flight paths and the source repetition rate.
//!
//! Definitions are read from JSON into an [InstrumentDocument] and mapped
//! explicitly onto the typed structures, so every field is checked once on the
//! way in and never again.
//!
//! ```rust, no_run
//! # use tofchop_instrument::InstrumentConfig;
//! let config = InstrumentConfig::from_path("path/to/instrument.json").unwrap();
//! ```
//!
//! Two instruments are built in and available through [load_builtin()].
//!
//! ```rust
//! # use tofchop_instrument::load_builtin;
//! let merlin = load_builtin("merlin").unwrap();
//! assert_eq!(merlin.package_names(), vec!["A", "G", "S"]);
//! ```
//!
//! ## Units
//!
//! | Quantity                       | Unit |
//! | ------------------------------ | ---- |
//! | Distances along the beam       | m    |
//! | Chopper and package geometry   | mm   |
//! | Phases, jitter, emission times | µs   |
//! | Energies                       | meV  |
//! | Wavelengths                    | Å    |
//!
//! ## Variants
//!
//! A [Variant] is a named overlay of disk chopper parameters, such as the slot
//! widths used by a resolution mode. [InstrumentConfig::with_variant] returns
//! a new configuration with the overlay applied and validated.

// Modules
mod builtin;
mod chopper;
mod config;
mod detector;
pub mod document;
mod error;
mod frequency;
mod moderator;
mod sample;
mod variant;

#[doc(inline)]
pub use builtin::{load_builtin, BUILTIN_INSTRUMENTS};

#[doc(inline)]
pub use chopper::{Chopper, ChopperKind, DiskChopper, FermiChopper, FermiPackage};

#[doc(inline)]
pub use config::{FluxReference, InstrumentConfig};

#[doc(inline)]
pub use detector::{Detector, DetectorModel};

#[doc(inline)]
pub use document::InstrumentDocument;

#[doc(inline)]
pub use error::{Error, Result};

#[doc(inline)]
pub use frequency::FrequencyScheme;

#[doc(inline)]
pub use moderator::{AnalyticSpectrum, FluxSource, Moderator, PulseModel, SoftHat};

#[doc(inline)]
pub use sample::{Sample, SampleShape};

#[doc(inline)]
pub use variant::{ChopperOverlay, Variant};
