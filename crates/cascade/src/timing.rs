//! Open intervals of each chopper over the source frame

// tofchop modules
use tofchop_instrument::{DiskChopper, FermiChopper, FermiPackage};

/// Tolerance on interval edges (µs)
pub(crate) const EDGE_TOLERANCE: f64 = 1e-9;

/// One opening of a chopper (µs)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Window {
    /// Time the chopper starts to transmit
    pub open: f64,
    /// Time the chopper stops transmitting
    pub close: f64,
}

impl Window {
    /// Window of `width` centred on `centre`
    pub fn centred(centre: f64, width: f64) -> Self {
        Self {
            open: centre - 0.5 * width,
            close: centre + 0.5 * width,
        }
    }

    /// Duration of the opening
    pub fn width(&self) -> f64 {
        self.close - self.open
    }

    /// Whether `time` falls inside the opening, edges included
    pub fn contains(&self, time: f64) -> bool {
        self.open - EDGE_TOLERANCE <= time && time <= self.close + EDGE_TOLERANCE
    }

    /// Whether the whole of `[first, last]` falls inside the opening
    pub fn covers(&self, first: f64, last: f64) -> bool {
        self.contains(first) && self.contains(last)
    }
}

/// Openings of a single chopper at its position along the beam
#[derive(Debug, Clone, PartialEq)]
pub struct ChopperTiming {
    /// Chopper name, for reporting
    pub name: String,
    /// Distance from the moderator (m)
    pub distance: f64,
    /// Openings within the frame, sorted by time
    pub windows: Vec<Window>,
}

impl ChopperTiming {
    /// Whether a neutron at `time` passes this chopper
    pub fn transmits(&self, time: f64) -> bool {
        self.windows.iter().any(|w| w.contains(time))
    }
}

/// Openings of a disk chopper within `[0, span]` (µs)
///
/// The first slot is centred at `t0` and the others follow at their angular
/// offsets, repeating every revolution.
pub fn disk_windows(disk: &DiskChopper, frequency: f64, t0: f64, span: f64) -> Vec<Window> {
    let angles = disk.slot_angles();
    let first = angles.first().copied().unwrap_or_default();
    let offsets = angles
        .iter()
        .map(|a| (a - first) / (360.0 * frequency) * 1e6)
        .collect::<Vec<f64>>();

    let width = disk.open_time(frequency) * 1e6;
    periodic_windows(&offsets, width, 1e6 / frequency, t0, span)
}

/// Openings of a Fermi chopper within `[0, span]` (µs)
///
/// The opening lasts twice the burst half-width. A chopper that also
/// transmits when turned through π opens twice per revolution.
pub fn fermi_windows(
    chopper: &FermiChopper,
    package: &FermiPackage,
    frequency: f64,
    t0: f64,
    span: f64,
) -> Vec<Window> {
    let omega = 2.0 * std::f64::consts::PI * frequency;
    let tau = package.pslit / (2.0 * package.radius * omega) * 1e6;
    let period = 1e6 / frequency;

    let offsets = match chopper.transmits_at_pi {
        true => vec![0.0, 0.5 * period],
        false => vec![0.0],
    };
    periodic_windows(&offsets, 2.0 * tau, period, t0, span)
}

/// Repeat openings at `offsets` from `t0` every `period`, keeping any that
/// overlap `[0, span]`
fn periodic_windows(offsets: &[f64], width: f64, period: f64, t0: f64, span: f64) -> Vec<Window> {
    let first = ((-t0 - width) / period).floor() as i64 - 1;
    let last = ((span - t0 + width) / period).ceil() as i64 + 1;

    let mut windows = (first..=last)
        .flat_map(|k| {
            offsets
                .iter()
                .map(move |offset| Window::centred(t0 + offset + k as f64 * period, width))
        })
        .filter(|w| w.close >= 0.0 && w.open <= span)
        .collect::<Vec<Window>>();

    windows.sort_by(|a, b| a.open.total_cmp(&b.open));
    windows
}
