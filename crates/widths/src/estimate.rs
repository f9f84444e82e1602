// tofchop modules
use tofchop_utils::f;

/// A numeric result that may carry a note about an unphysical input
///
/// Width models never log or fail on soft edge cases. They return NaN in
/// [Estimate::value] together with a [Diagnostic], and it is up to the
/// caller to decide whether to warn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Estimate {
    /// Result, NaN where there is no physical answer
    pub value: f64,
    /// Reason the value is not usable, if any
    pub diagnostic: Option<Diagnostic>,
}

impl Estimate {
    /// A plain value with nothing to report
    pub fn ok(value: f64) -> Self {
        Self {
            value,
            diagnostic: None,
        }
    }

    /// A NaN value explained by `diagnostic`
    pub fn undefined(diagnostic: Diagnostic) -> Self {
        Self {
            value: f64::NAN,
            diagnostic: Some(diagnostic),
        }
    }

    /// Apply `op` to the value, keeping any diagnostic
    pub fn map(self, op: impl FnOnce(f64) -> f64) -> Self {
        Self {
            value: op(self.value),
            diagnostic: self.diagnostic,
        }
    }
}

/// Soft numeric edge cases
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Diagnostic {
    /// Fermi chopper curvature parameter too large to transmit anything
    NoTransmission { gamma: f64 },
    /// Energy transfers at or above the incident energy
    UnphysicalTransfer { count: usize },
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, fmt: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            Self::NoTransmission { gamma } => {
                f!("Fermi chopper does not transmit at this energy and frequency (γ = {gamma:.3} ≥ 4)")
            }
            Self::UnphysicalTransfer { count } => {
                f!("{count} energy transfer(s) at or above the incident energy")
            }
        };
        write!(fmt, "{text}")
    }
}
