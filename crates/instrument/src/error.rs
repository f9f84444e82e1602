//! Result and Error types for instrument definitions

/// Type alias for `Result<T, instrument::Error>`
pub type Result<T> = core::result::Result<T, Error>;

/// The error type for the `tofchop-instrument` crate
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("failure in file I/O")]
    Io(#[from] std::io::Error),

    #[error("failed to deserialise instrument definition")]
    FailedSerde(#[from] serde_json::Error),

    /// A value that is present but physically or structurally invalid
    #[error("invalid {field}: {reason}")]
    InvalidConfig { field: String, reason: String },

    /// A tabulated quantity that can not be interpolated
    #[error("invalid table for {field}")]
    InvalidTable {
        field: String,
        #[source]
        source: tofchop_utils::Error,
    },

    #[error("unknown instrument \"{name}\", expected one of {available:?}")]
    UnknownInstrument {
        name: String,
        available: Vec<String>,
    },

    #[error("unknown variant \"{name}\", expected one of {available:?}")]
    UnknownVariant {
        name: String,
        available: Vec<String>,
    },
}

impl Error {
    /// Shorthand for an [Error::InvalidConfig]
    pub(crate) fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Shorthand for wrapping a table error with the field it came from
    pub(crate) fn table(field: impl Into<String>, source: tofchop_utils::Error) -> Self {
        Self::InvalidTable {
            field: field.into(),
            source,
        }
    }
}
