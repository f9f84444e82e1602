//! Result and Error types for the command line

/// Type alias for `Result<T, CliError>`
pub type Result<T> = core::result::Result<T, CliError>;

/// Everything that can stop a command from producing output
#[derive(thiserror::Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    Instrument(#[from] tofchop_instrument::Error),

    #[error(transparent)]
    Spectrometer(#[from] tofchop_spectrometer::Error),

    #[error("failed to initialise logging")]
    Logger(#[from] log::SetLoggerError),
}
