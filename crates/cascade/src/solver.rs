//! Line pairs transmitted by every chopper
//!
//! The pulse leaving the moderator occupies `[0, t_mod]` µs. Every opening
//! of the final chopper admits a band of trajectories bounded by an early
//! line from `(0, 0)` and a late line from `(0, t_mod)`. Working back towards
//! the moderator, each chopper clips those bands to its own openings.
//!
//! Clipping moves a boundary to the edge of the opening. The boundary is
//! first translated at constant velocity. If that would take it outside the
//! emission window or through a closed chopper already passed, it is instead
//! rotated about its time at the final chopper. A band that can not be
//! clipped either way is not transmitted.

// external crates
use log::trace;

// internal modules
use crate::line::{Line, LinePair};
use crate::timing::{ChopperTiming, EDGE_TOLERANCE};

/// One transmitted incident energy and the pulse that carries it
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rep {
    /// Incident energy at the pulse centre (meV)
    pub energy: f64,
    /// Trajectories bounding the pulse
    pub lines: LinePair,
}

impl From<LinePair> for Rep {
    fn from(lines: LinePair) -> Self {
        Self {
            energy: lines.energy(),
            lines,
        }
    }
}

/// Bands admitted by each opening of the final chopper
///
/// Openings that start at or before the moderator fires, or close before
/// the end of the emission window, would need a non-positive slope and are
/// skipped.
pub fn find_lines(last: &ChopperTiming, emission_window: f64) -> Vec<LinePair> {
    last.windows
        .iter()
        .filter(|w| w.open > 0.0 && w.close > emission_window)
        .map(|w| LinePair {
            early: Line::through(0.0, last.distance, w.open),
            late: Line::through(emission_window, last.distance, w.close),
        })
        .collect()
}

/// Clip bands from the final chopper through every upstream chopper
///
/// `timings` are ordered from the moderator, with the final chopper last.
/// One band may split into several where a chopper opens more than once
/// across it.
pub fn check_path(
    pairs: Vec<LinePair>,
    timings: &[ChopperTiming],
    emission_window: f64,
) -> Vec<LinePair> {
    let Some((last, upstream)) = timings.split_last() else {
        return pairs;
    };

    let mut path = Path {
        passed: vec![last],
        pivot: last.distance,
        emission_window,
    };

    let mut pairs = pairs;
    for chopper in upstream.iter().rev() {
        let d = chopper.distance;
        let mut clipped = Vec::with_capacity(pairs.len());

        for pair in &pairs {
            let (te, tl) = (pair.early.at(d), pair.late.at(d));
            let (lo, hi) = pair.span_at(d);
            // lines may have crossed after an earlier pivot
            let early_leads = te <= tl;

            for window in &chopper.windows {
                if window.close <= lo || window.open >= hi {
                    continue;
                }

                let mut leading = if early_leads { pair.early } else { pair.late };
                let mut trailing = if early_leads { pair.late } else { pair.early };

                if window.open > lo {
                    match path.clip(&leading, d, window.open) {
                        Some(line) => leading = line,
                        None => continue,
                    }
                }
                if window.close < hi {
                    match path.clip(&trailing, d, window.close) {
                        Some(line) => trailing = line,
                        None => continue,
                    }
                }

                let candidate = match early_leads {
                    true => LinePair {
                        early: leading,
                        late: trailing,
                    },
                    false => LinePair {
                        early: trailing,
                        late: leading,
                    },
                };
                if path.admits(&candidate) {
                    clipped.push(candidate);
                }
            }
        }

        trace!(
            "{} at {d} m: {} band(s) in, {} out",
            chopper.name,
            pairs.len(),
            clipped.len()
        );
        pairs = clipped;
        path.passed.push(chopper);
    }

    pairs
}

/// Choppers already clipped against, for checking moved lines
struct Path<'a> {
    passed: Vec<&'a ChopperTiming>,
    pivot: f64,
    emission_window: f64,
}

impl Path<'_> {
    /// Move `line` through `(d, t)`, translating if possible, else pivoting
    fn clip(&self, line: &Line, d: f64, t: f64) -> Option<Line> {
        let translated = line.translated(d, t);
        if self.admits_line(&translated) {
            return Some(translated);
        }

        let pivoted = line.pivoted(self.pivot, d, t);
        if pivoted.slope > 0.0 && self.admits_line(&pivoted) {
            trace!("pivoted line through ({d}, {t}) about {} m", self.pivot);
            return Some(pivoted);
        }
        None
    }

    /// Starts within the emission window and passes every chopper so far
    fn admits_line(&self, line: &Line) -> bool {
        let emitted = -EDGE_TOLERANCE <= line.intercept
            && line.intercept <= self.emission_window + EDGE_TOLERANCE;
        emitted && self.passed.iter().all(|c| c.transmits(line.at(c.distance)))
    }

    /// Both lines pass through the same opening at every chopper so far
    fn admits(&self, pair: &LinePair) -> bool {
        self.passed.iter().all(|c| {
            let (lo, hi) = pair.span_at(c.distance);
            c.windows.iter().any(|w| w.covers(lo, hi))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timing::Window;

    fn timing(distance: f64, windows: &[(f64, f64)]) -> ChopperTiming {
        ChopperTiming {
            name: format!("chopper at {distance}"),
            distance,
            windows: windows
                .iter()
                .map(|(open, close)| Window {
                    open: *open,
                    close: *close,
                })
                .collect(),
        }
    }

    #[test]
    fn final_openings_give_bands() {
        let last = timing(20.0, &[(-50.0, 50.0), (1000.0, 1200.0), (3000.0, 3050.0)]);
        let pairs = find_lines(&last, 100.0);
        assert_eq!(pairs.len(), 2);
        assert_eq!(pairs[0].early, Line::through(0.0, 20.0, 1000.0));
        assert_eq!(pairs[0].late, Line::through(100.0, 20.0, 1200.0));
    }

    #[test]
    fn wide_opening_keeps_band() {
        let chain = [timing(10.0, &[(0.0, 5000.0)]), timing(20.0, &[(1000.0, 1200.0)])];
        let pairs = find_lines(&chain[1], 100.0);
        let kept = check_path(pairs.clone(), &chain, 100.0);
        assert_eq!(kept, pairs);
    }

    #[test]
    fn narrow_opening_translates_both_edges() {
        // band spans [500, 650] at 10 m, opening is [540, 600]
        let chain = [timing(10.0, &[(540.0, 600.0)]), timing(20.0, &[(1000.0, 1200.0)])];
        let pairs = find_lines(&chain[1], 100.0);
        let kept = check_path(pairs, &chain, 100.0);
        assert_eq!(kept.len(), 1);

        let pair = kept[0];
        assert!((pair.early.slope - 50.0).abs() < 1e-12);
        assert!((pair.early.intercept - 40.0).abs() < 1e-9);
        assert!((pair.late.slope - 55.0).abs() < 1e-12);
        assert!((pair.late.intercept - 50.0).abs() < 1e-9);
    }

    #[test]
    fn closed_chopper_blocks_band() {
        let chain = [timing(10.0, &[(0.0, 400.0)]), timing(20.0, &[(1000.0, 1200.0)])];
        let pairs = find_lines(&chain[1], 100.0);
        assert!(check_path(pairs, &chain, 100.0).is_empty());
    }

    #[test]
    fn split_by_two_openings() {
        let chain = [
            timing(10.0, &[(510.0, 560.0), (590.0, 640.0)]),
            timing(20.0, &[(1000.0, 1200.0)]),
        ];
        let pairs = find_lines(&chain[1], 100.0);
        assert_eq!(check_path(pairs, &chain, 100.0).len(), 2);
    }

    #[test]
    fn pivots_when_translation_misses_final_opening() {
        // translating the early edge to 540 µs at 10 m would reach the final
        // chopper after it closed, so the edge is rotated about 1000 µs instead
        let chain = [timing(10.0, &[(540.0, 600.0)]), timing(20.0, &[(1000.0, 1010.0)])];
        let pairs = find_lines(&chain[1], 100.0);
        let kept = check_path(pairs, &chain, 100.0);
        assert_eq!(kept.len(), 1);

        let early = kept[0].early;
        assert!((early.at(20.0) - 1000.0).abs() < 1e-9);
        assert!((early.at(10.0) - 540.0).abs() < 1e-9);
        assert!((early.intercept - 80.0).abs() < 1e-9);
        assert_eq!(kept[0].late, Line::through(100.0, 20.0, 1010.0));
    }
}
