/// Everything a user can choose about the current operating point
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    /// Installed Fermi package, if the instrument has a Fermi chopper
    pub package: Option<String>,
    /// Applied variant, if any
    pub variant: Option<String>,
    /// User frequencies (Hz)
    pub frequency: Vec<f64>,
    /// Phase of every chopper (µs)
    pub phase: Vec<f64>,
    /// Focus energy (meV)
    pub ei: Option<f64>,
}

impl Selection {
    /// Hashable identity of the selection, for validating cached results
    pub fn fingerprint(&self) -> Fingerprint {
        Fingerprint {
            package: self.package.clone(),
            variant: self.variant.clone(),
            frequency: bits(&self.frequency),
            phase: bits(&self.phase),
            ei: self.ei.map(f64::to_bits),
        }
    }
}

/// Exact identity of a [Selection]
///
/// Floating point values are compared by bit pattern, so two selections are
/// only the same if every number is identical.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Fingerprint {
    package: Option<String>,
    variant: Option<String>,
    frequency: Vec<u64>,
    phase: Vec<u64>,
    ei: Option<u64>,
}

pub(crate) fn bits(values: &[f64]) -> Vec<u64> {
    values.iter().map(|v| v.to_bits()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn selection() -> Selection {
        Selection {
            package: Some("G".to_string()),
            variant: None,
            frequency: vec![400.0],
            phase: vec![1500.0, 0.0],
            ei: Some(25.0),
        }
    }

    #[test]
    fn fingerprint_tracks_every_field() {
        let base = selection().fingerprint();
        assert_eq!(base, selection().fingerprint());

        let mut changed = selection();
        changed.package = Some("A".to_string());
        assert_ne!(changed.fingerprint(), base);

        let mut changed = selection();
        changed.variant = Some("High Flux".to_string());
        assert_ne!(changed.fingerprint(), base);

        let mut changed = selection();
        changed.frequency = vec![350.0];
        assert_ne!(changed.fingerprint(), base);

        let mut changed = selection();
        changed.phase[0] = 1500.5;
        assert_ne!(changed.fingerprint(), base);

        let mut changed = selection();
        changed.ei = Some(25.000_000_000_1);
        assert_ne!(changed.fingerprint(), base);
    }
}
