//! `tofchop` is a modular toolkit for modelling direct-geometry chopper
//! spectrometers
//!
#![doc = include_str!("../readme.md")]
#![deny(missing_docs, missing_debug_implementations)]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

// Re-exports of toolkit crates.
#[doc(inline)]
pub use tofchop_instrument as instrument;

#[doc(inline)]
pub use tofchop_utils as utils;

#[cfg(feature = "cascade")]
#[cfg_attr(docsrs, doc(cfg(feature = "cascade")))]
#[doc(inline)]
pub use tofchop_cascade as cascade;

#[cfg(feature = "widths")]
#[cfg_attr(docsrs, doc(cfg(feature = "widths")))]
#[doc(inline)]
pub use tofchop_widths as widths;

#[cfg(feature = "spectrometer")]
#[cfg_attr(docsrs, doc(cfg(feature = "spectrometer")))]
#[doc(inline)]
pub use tofchop_spectrometer as spectrometer;
