//! Time-width models for the components of a chopper spectrometer
//!
//! Each component of the instrument adds an independent spread to the
//! neutron flight time. The functions here are pure: they take the
//! component description from [tofchop_instrument] and an energy and return
//! a time variance in s².
//!
//! | Module        | Contribution                                    |
//! | ------------- | ----------------------------------------------- |
//! | [fermi]       | Fermi chopper opening, plus its transmission    |
//! | [disk]        | Disk chopper opening                            |
//! | [moderator]   | Moderator pulse, for each [PulseModel] variant  |
//! | [sample]      | Sample size along the scattered path            |
//! | [detector]    | Absorption depth in a ³He tube or slab          |
//!
//! Soft edge cases, such as a Fermi chopper that can not transmit at the
//! requested energy, come back as NaN wrapped in an [Estimate] with a
//! [Diagnostic] rather than an error.
//!
//! ```rust
//! # use tofchop_instrument::load_builtin;
//! # use tofchop_widths::fermi;
//! let merlin = load_builtin("merlin").unwrap();
//! let (_, chopper) = merlin.fermi().unwrap();
//! let package = &chopper.packages["G"];
//!
//! let var = fermi::chopper_variance(package, 400.0, 25.0);
//! assert!(var.diagnostic.is_none());
//! assert!(var.value > 0.0);
//! ```
//!
//! [PulseModel]: tofchop_instrument::PulseModel

// Modules
mod chebyshev;
pub mod detector;
pub mod disk;
mod estimate;
pub mod fermi;
pub mod moderator;
pub mod sample;

#[doc(inline)]
pub use chebyshev::{chebev, erf, erfc};

#[doc(inline)]
pub use estimate::{Diagnostic, Estimate};
