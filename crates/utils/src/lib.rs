//! Common utility for extended `std` types and shared numerics
//!
//! These are left public for convenience.
//!
//! Physical constants and the clamped cubic spline are used by every other
//! crate in the workspace, as is the prettier formatting for scientific
//! numbers.

// Alias for the format! macro
pub use std::format as f;

// Modules
pub mod constants;
mod error;
mod interpolate;
mod option_ext;
mod slice_ext;
mod value_ext;

// Flatten
pub use error::{Error, Result};
pub use interpolate::CubicSpline;
pub use option_ext::OptionExt;
pub use slice_ext::SliceExt;
pub use value_ext::ValueExt;
