//! Result and Error types for the chopper cascade

/// Type alias for `Result<T, cascade::Error>`
pub type Result<T> = core::result::Result<T, Error>;

/// The error type for the `tofchop-cascade` crate
///
/// Only structurally impossible input is an error. A cascade that transmits
/// nothing is a valid, empty, result.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum Error {
    #[error("expected {expected} chopper frequencies, found {found}")]
    FrequencyCount { expected: usize, found: usize },

    #[error("expected {expected} chopper phases, found {found}")]
    PhaseCount { expected: usize, found: usize },

    #[error("frequency of chopper \"{chopper}\" must be positive, found {frequency} Hz")]
    NonPositiveFrequency { chopper: String, frequency: f64 },

    #[error("focus energy must be positive, found {energy} meV")]
    NonPositiveEnergy { energy: f64 },

    /// A Fermi chopper needs a package to know its opening time
    #[error("no package selected for Fermi chopper \"{chopper}\"")]
    MissingPackage { chopper: String },
}
