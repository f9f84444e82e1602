// tofchop modules
use tofchop_utils::f;

// internal modules
use crate::error::{Error, Result};

/// Mapping from user-facing frequencies onto every chopper in the beamline
///
/// Users set a short vector of frequencies (e.g. a resolution and a pulse
/// remover frequency). The frequency of each chopper is then
///
/// ```text
///     long[i] = Σⱼ matrix[i][j]·user[j] + constant[i]
/// ```
///
/// so that choppers can be tied to multiples of a user frequency or held at a
/// fixed speed.
#[derive(Debug, Clone, PartialEq)]
pub struct FrequencyScheme {
    /// Label for each user frequency
    pub names: Vec<String>,
    /// Chopper × user frequency coupling
    pub matrix: Vec<Vec<f64>>,
    /// Fixed per-chopper frequency added to the coupled part (Hz)
    pub constant: Vec<f64>,
    /// Maximum for each user frequency (Hz)
    pub max: Vec<f64>,
    /// Default for each user frequency (Hz)
    pub default: Vec<f64>,
    /// User frequencies that must be a whole multiple of the source rate
    pub multiple_of_source: Vec<bool>,
}

impl FrequencyScheme {
    /// Number of user frequencies expected by [FrequencyScheme::long_frequency]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// True for a scheme with no user frequencies
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Frequency of every chopper for the given user frequencies (Hz)
    ///
    /// The caller is expected to have validated the length.
    pub fn long_frequency(&self, user: &[f64]) -> Vec<f64> {
        self.matrix
            .iter()
            .zip(self.constant.iter())
            .map(|(row, constant)| {
                row.iter().zip(user.iter()).map(|(m, u)| m * u).sum::<f64>() + constant
            })
            .collect()
    }

    pub(crate) fn validate(&self, choppers: usize) -> Result<()> {
        let n = self.names.len();
        if n == 0 {
            return Err(Error::invalid("frequency", "at least one user frequency is required"));
        }
        if self.max.len() != n || self.default.len() != n || self.multiple_of_source.len() != n {
            return Err(Error::invalid(
                "frequency",
                f!("maxima, defaults and multiple flags need one entry per name ({n})"),
            ));
        }
        if self.matrix.len() != choppers || self.constant.len() != choppers {
            return Err(Error::invalid(
                "frequency",
                f!("matrix and constants need one row per chopper ({choppers})"),
            ));
        }
        if let Some(row) = self.matrix.iter().position(|row| row.len() != n) {
            return Err(Error::invalid(
                "frequency",
                f!("matrix row {row} needs one column per user frequency ({n})"),
            ));
        }
        if self.max.iter().any(|m| !(*m > 0.0)) {
            return Err(Error::invalid("frequency", "maxima must be positive"));
        }
        Ok(())
    }
}
