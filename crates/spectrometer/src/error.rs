//! Result and Error types for the spectrometer facade

/// Type alias for `Result<T, spectrometer::Error>`
pub type Result<T> = core::result::Result<T, Error>;

/// The error type for the `tofchop-spectrometer` crate
///
/// These are hard validation failures on the selection. Numeric edge cases
/// such as a Fermi chopper that does not transmit come back as NaN values
/// instead.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Instrument(#[from] tofchop_instrument::Error),

    #[error(transparent)]
    Cascade(#[from] tofchop_cascade::Error),

    /// Name is neither a Fermi package nor a variant
    #[error("unknown chopper \"{name}\", expected one of {available:?}")]
    UnknownChopper {
        name: String,
        available: Vec<String>,
    },

    #[error("{energy} meV is outside the valid range {min}-{max} meV")]
    EnergyOutOfRange { energy: f64, min: f64, max: f64 },

    #[error("incident energy has not been set")]
    EnergyNotSet,

    #[error("expected {expected} frequencies, found {found}")]
    FrequencyCount { expected: usize, found: usize },

    #[error("{name} frequency must be positive, found {frequency} Hz")]
    NonPositiveFrequency { name: String, frequency: f64 },

    #[error("{name} frequency {frequency} Hz is above the {max} Hz maximum")]
    FrequencyAboveMaximum { name: String, frequency: f64, max: f64 },

    #[error("{name} frequency {frequency} Hz is not a multiple of the {source_rate} Hz source")]
    NotSourceMultiple {
        name: String,
        frequency: f64,
        source_rate: f64,
    },

    #[error("expected {expected} phases, found {found}")]
    PhaseCount { expected: usize, found: usize },
}
