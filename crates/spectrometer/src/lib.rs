//! Resolution and flux of a direct-geometry chopper spectrometer
//!
//! The [Spectrometer] is the single entry point. It owns an instrument
//! definition and the current selection, validates every change to it, and
//! answers queries from a cache tied to a [Fingerprint] of the selection.
//!
//! ```rust
//! # use tofchop_spectrometer::Spectrometer;
//! let mut let_ = Spectrometer::from_builtin("let").unwrap();
//! let_.set_chopper("High Resolution", Some(&[240.0, 120.0])).unwrap();
//! let_.set_ei(3.7).unwrap();
//!
//! for rep in let_.multi_rep_resolution(&[0.0]).unwrap() {
//!     println!("{:.3} meV: {:.4} meV", rep.ei, rep.fwhm[0]);
//! }
//! ```
//!
//! ## Soft failures
//!
//! Invalid input is an [Error]. A chopper that does not transmit or an
//! energy transfer beyond the incident energy is not, and comes back as NaN
//! with a [Diagnostic](tofchop_widths::Diagnostic) explaining why. The
//! facade logs a single warning per query for these.
//!
//! The free functions [resolution()], [widths()] and [flux()] do the same
//! work without any state or logging.

// Modules
mod cache;
mod error;
mod flux;
mod resolution;
mod selection;
mod spectrometer;

#[doc(inline)]
pub use error::{Error, Result};

#[doc(inline)]
pub use flux::{flux, white_beam, Flux};

#[doc(inline)]
pub use resolution::{elastic_fraction, resolution, widths, OperatingPoint, Resolution, Widths};

#[doc(inline)]
pub use selection::{Fingerprint, Selection};

#[doc(inline)]
pub use spectrometer::{RepFlux, RepResolution, Spectrometer};
