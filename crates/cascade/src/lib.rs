//! Transmitted energies through a cascade of neutron choppers
//!
//! Each chopper opens for a short time at a fixed point along the beam. On a
//! time-distance diagram a neutron is a straight line whose slope is its
//! inverse velocity, and it is transmitted only if that line passes through
//! an opening of every chopper.
//!
//! A [Cascade] lays out the openings of each chopper for a set of
//! frequencies, phases and a focus energy. Starting from the chopper nearest
//! the sample, every opening defines a band of lines leaving the moderator
//! during its emission window. The band is clipped chopper by chopper back
//! towards the moderator, and whatever survives is a [Rep].
//!
//! ```rust
//! # use tofchop_cascade::Cascade;
//! # use tofchop_instrument::load_builtin;
//! let config = load_builtin("let").unwrap();
//! let long = config.frequency.long_frequency(&[240.0, 120.0]);
//!
//! let cascade = Cascade::new(&config, None, &long, &config.default_phases(), 3.7).unwrap();
//! for rep in cascade.reps() {
//!     println!("{:.3} meV", rep.energy);
//! }
//! ```
//!
//! The same data is available as a [TimeDistanceDiagram] for plotting.

// Modules
mod cascade;
mod diagram;
mod error;
mod line;
mod solver;
mod timing;

#[doc(inline)]
pub use cascade::Cascade;

#[doc(inline)]
pub use diagram::{RepTrace, TimeDistanceDiagram};

#[doc(inline)]
pub use error::{Error, Result};

#[doc(inline)]
pub use line::{Line, LinePair};

#[doc(inline)]
pub use solver::{check_path, find_lines, Rep};

#[doc(inline)]
pub use timing::{disk_windows, fermi_windows, ChopperTiming, Window};
