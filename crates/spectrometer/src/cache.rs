// standard library
use std::collections::{HashMap, VecDeque};
use std::hash::Hash;

// external crates
use log::debug;

// tofchop modules
use tofchop_cascade::Rep;

// internal modules
use crate::flux::Flux;
use crate::resolution::Resolution;
use crate::selection::{bits, Fingerprint};

/// Most results kept per query type before the oldest are dropped
const CAPACITY: usize = 64;

/// Results derived from one selection
///
/// Every lookup first checks the fingerprint of the current selection, and
/// the whole cache is dropped on a mismatch. Resolution and flux results are
/// kept for at most [CAPACITY] incident energies each, so sweeping the
/// energy does not grow the cache without bound.
#[derive(Debug, Default)]
pub(crate) struct Cache {
    fingerprint: Option<Fingerprint>,
    reps: Option<Vec<Rep>>,
    resolution: Bounded<(u64, Vec<u64>), Resolution>,
    flux: Bounded<u64, Flux>,
}

impl Cache {
    pub fn clear(&mut self) {
        self.fingerprint = None;
        self.reps = None;
        self.resolution.clear();
        self.flux.clear();
    }

    /// Drop everything unless it was computed for `fingerprint`
    fn sync(&mut self, fingerprint: &Fingerprint) {
        if self.fingerprint.as_ref() != Some(fingerprint) {
            if self.fingerprint.is_some() {
                debug!("selection changed, dropping cached results");
            }
            self.clear();
            self.fingerprint = Some(fingerprint.clone());
        }
    }

    pub fn reps<E>(
        &mut self,
        fingerprint: &Fingerprint,
        compute: impl FnOnce() -> Result<Vec<Rep>, E>,
    ) -> Result<Vec<Rep>, E> {
        self.sync(fingerprint);
        if let Some(reps) = &self.reps {
            debug!("cache hit for {} rep(s)", reps.len());
            return Ok(reps.clone());
        }
        let reps = compute()?;
        self.reps = Some(reps.clone());
        Ok(reps)
    }

    pub fn resolution(
        &mut self,
        fingerprint: &Fingerprint,
        ei: f64,
        etrans: &[f64],
        compute: impl FnOnce() -> Resolution,
    ) -> Resolution {
        self.sync(fingerprint);
        let key = (ei.to_bits(), bits(etrans));
        if let Some(result) = self.resolution.get(&key) {
            debug!("cache hit for resolution at {ei} meV");
            return result.clone();
        }
        let result = compute();
        self.resolution.insert(key, result.clone());
        result
    }

    pub fn flux(&mut self, fingerprint: &Fingerprint, ei: f64, compute: impl FnOnce() -> Flux) -> Flux {
        self.sync(fingerprint);
        let key = ei.to_bits();
        if let Some(result) = self.flux.get(&key) {
            return *result;
        }
        let result = compute();
        self.flux.insert(key, result);
        result
    }
}

/// Map that forgets its oldest insertions beyond [CAPACITY]
#[derive(Debug)]
struct Bounded<K, V> {
    entries: HashMap<K, V>,
    order: VecDeque<K>,
}

impl<K, V> Default for Bounded<K, V> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
            order: VecDeque::new(),
        }
    }
}

impl<K: Clone + Eq + Hash, V> Bounded<K, V> {
    fn get(&self, key: &K) -> Option<&V> {
        self.entries.get(key)
    }

    fn insert(&mut self, key: K, value: V) {
        if self.entries.insert(key.clone(), value).is_none() {
            self.order.push_back(key);
        }
        while self.order.len() > CAPACITY {
            if let Some(oldest) = self.order.pop_front() {
                self.entries.remove(&oldest);
            }
        }
    }

    fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selection::Selection;

    fn fingerprint(frequency: f64) -> Fingerprint {
        Selection {
            package: Some("G".to_string()),
            variant: None,
            frequency: vec![frequency],
            phase: vec![1500.0, 0.0],
            ei: Some(25.0),
        }
        .fingerprint()
    }

    fn flux(value: f64) -> Flux {
        Flux {
            value,
            diagnostic: None,
        }
    }

    #[test]
    fn energy_sweeps_stay_bounded() {
        let mut cache = Cache::default();
        let fp = fingerprint(400.0);
        for i in 0..1000 {
            let ei = 10.0 + i as f64 * 0.01;
            cache.flux(&fp, ei, || flux(ei));
            cache.resolution(&fp, ei, &[0.0], || Resolution {
                fwhm: vec![ei],
                diagnostics: Vec::new(),
            });
        }
        assert_eq!(cache.flux.len(), CAPACITY);
        assert_eq!(cache.resolution.len(), CAPACITY);

        // the most recent energies are still served from the cache
        let last = 10.0 + 999.0 * 0.01;
        assert_eq!(cache.flux(&fp, last, || flux(-1.0)).value, last);
    }

    #[test]
    fn mismatch_drops_everything() {
        let mut cache = Cache::default();
        cache.flux(&fingerprint(400.0), 25.0, || flux(1.0));
        let found = cache.flux(&fingerprint(200.0), 25.0, || flux(2.0));
        assert_eq!(found.value, 2.0);
        assert_eq!(cache.flux.len(), 1);
    }
}
