// standard library
use std::collections::BTreeMap;
use std::f64::consts::PI;

// tofchop modules
use tofchop_utils::{f, SliceExt};

// internal modules
use crate::error::{Error, Result};

/// A single chopper position in the beamline
///
/// Choppers are ordered nearest-moderator first within an
/// [InstrumentConfig](crate::InstrumentConfig).
#[derive(Debug, Clone, PartialEq)]
pub struct Chopper {
    /// Display name, e.g. "Chopper 5"
    pub name: String,
    /// Distance from the moderator face (m)
    pub distance: f64,
    /// Disk or Fermi specific geometry
    pub kind: ChopperKind,
}

/// The two families of chopper, each with their own geometry
#[derive(Debug, Clone, PartialEq)]
pub enum ChopperKind {
    /// Slotted disk, or a stack of counter-rotating disks
    Disk(DiskChopper),
    /// Curved-slit Fermi chopper with interchangeable packages
    Fermi(FermiChopper),
}

/// Geometry of a slotted disk chopper
///
/// All lengths are in mm as quoted on engineering drawings.
#[derive(Debug, Clone, PartialEq)]
pub struct DiskChopper {
    /// Number of slots around the rim
    pub slots: usize,
    /// Angular slot positions (deg), evenly spaced when not given
    pub slot_angles: Option<Vec<f64>>,
    /// Slot width at the beam position (mm)
    pub slot_width: f64,
    /// Width of the guide the slot passes across (mm)
    pub guide_width: f64,
    /// Radius at the beam position (mm)
    pub radius: f64,
    /// Number of counter-rotating disks, doubling the effective speed
    pub disks: usize,
    /// Phase is an absolute time rather than an offset from the focus
    pub independent_phase: bool,
    /// Default phase (µs)
    pub default_phase: f64,
}

impl DiskChopper {
    /// Slot positions in degrees, generating evenly spaced slots if needed
    pub fn slot_angles(&self) -> Vec<f64> {
        match &self.slot_angles {
            Some(angles) => angles.clone(),
            None => (0..self.slots)
                .map(|j| 360.0 * j as f64 / self.slots as f64)
                .collect(),
        }
    }

    /// Relative speed of slot and guide at the beam (mm/s)
    pub fn rim_speed(&self, frequency: f64) -> f64 {
        2.0 * PI * self.radius * frequency * self.disks as f64
    }

    /// Total time the slot overlaps the guide for one pass (s)
    pub fn open_time(&self, frequency: f64) -> f64 {
        (self.slot_width + self.guide_width) / self.rim_speed(frequency)
    }

    pub(crate) fn validate(&self, field: &str) -> Result<()> {
        if self.slots == 0 {
            return Err(Error::invalid(field, "at least one slot is required"));
        }
        if self.disks == 0 {
            return Err(Error::invalid(field, "at least one disk is required"));
        }
        if self.radius <= 0.0 || self.slot_width <= 0.0 || self.guide_width <= 0.0 {
            return Err(Error::invalid(
                field,
                "radius, slot width and guide width must be positive",
            ));
        }

        // slots can not overlap one another
        let limit = 2.0 * PI * self.radius * self.disks as f64 / self.slots as f64;
        if self.slot_width > limit {
            return Err(Error::invalid(
                field,
                f!("slot width {} mm exceeds the {limit:.1} mm available per slot", self.slot_width),
            ));
        }

        if let Some(angles) = &self.slot_angles {
            if angles.len() != self.slots {
                return Err(Error::invalid(
                    field,
                    f!("{} slot angles given for {} slots", angles.len(), self.slots),
                ));
            }
            angles
                .check_strictly_increasing()
                .map_err(|e| Error::table(f!("{field} slot angles"), e))?;
            if angles[0] < 0.0 || angles[angles.len() - 1] >= angles[0] + 360.0 {
                return Err(Error::invalid(field, "slot angles must span less than 360°"));
            }
        }
        Ok(())
    }
}

/// A Fermi chopper slot, holding one of several named packages
#[derive(Debug, Clone, PartialEq)]
pub struct FermiChopper {
    /// Interchangeable slit packages by name
    pub packages: BTreeMap<String, FermiPackage>,
    /// Package selected when nothing else is asked for
    pub default_package: String,
    /// Distance from the beam-defining aperture to the chopper (m)
    pub aperture_distance: f64,
    /// Width of the beam-defining aperture (m)
    pub aperture_width: f64,
    /// Straight-through symmetry opens the slits twice per revolution
    pub transmits_at_pi: bool,
}

impl FermiChopper {
    /// Names of all packages, sorted
    pub fn package_names(&self) -> Vec<String> {
        self.packages.keys().cloned().collect()
    }

    pub(crate) fn validate(&self, field: &str) -> Result<()> {
        if self.packages.is_empty() {
            return Err(Error::invalid(field, "at least one package is required"));
        }
        if !self.packages.contains_key(&self.default_package) {
            return Err(Error::invalid(
                field,
                f!("default package \"{}\" is not defined", self.default_package),
            ));
        }
        if self.aperture_distance <= 0.0 || self.aperture_width <= 0.0 {
            return Err(Error::invalid(field, "aperture distance and width must be positive"));
        }
        for (name, package) in &self.packages {
            package.validate(&f!("{field} package \"{name}\""))?;
        }
        Ok(())
    }
}

/// Curved-slit Fermi chopper package
///
/// Lengths are in mm, the jitter is a standard deviation in µs.
#[derive(Debug, Clone, PartialEq)]
pub struct FermiPackage {
    /// Slit pitch (mm)
    pub pslit: f64,
    /// Slat thickness (mm)
    pub pslat: f64,
    /// Package radius (mm)
    pub radius: f64,
    /// Radius of curvature of the slits (mm)
    pub rho: f64,
    /// Timing jitter (µs)
    pub jitter: f64,
    /// Empirical scaling of the calculated transmission
    pub flux_correction: f64,
    /// Incident energy range the package is usable over (meV)
    pub ei_limits: Option<(f64, f64)>,
}

impl FermiPackage {
    /// Fraction of the package face that is open slit
    pub fn open_fraction(&self) -> f64 {
        self.pslit / (self.pslit + self.pslat)
    }

    fn validate(&self, field: &str) -> Result<()> {
        if self.pslit <= 0.0 || self.radius <= 0.0 || self.rho <= 0.0 {
            return Err(Error::invalid(field, "pitch, radius and curvature must be positive"));
        }
        if self.pslat < 0.0 || self.jitter < 0.0 || self.flux_correction <= 0.0 {
            return Err(Error::invalid(
                field,
                "slat thickness, jitter and flux correction can not be negative",
            ));
        }
        if let Some((lo, hi)) = self.ei_limits {
            if !(0.0 < lo && lo < hi) {
                return Err(Error::invalid(field, f!("energy range [{lo}, {hi}] is empty")));
            }
        }
        Ok(())
    }
}

impl Chopper {
    /// Default phase for this chopper (µs)
    pub fn default_phase(&self) -> f64 {
        match &self.kind {
            ChopperKind::Disk(disk) => disk.default_phase,
            ChopperKind::Fermi(_) => 0.0,
        }
    }

    /// Convenience for the disk geometry, if this is a disk
    pub fn as_disk(&self) -> Option<&DiskChopper> {
        match &self.kind {
            ChopperKind::Disk(disk) => Some(disk),
            ChopperKind::Fermi(_) => None,
        }
    }

    /// Convenience for the Fermi geometry, if this is a Fermi chopper
    pub fn as_fermi(&self) -> Option<&FermiChopper> {
        match &self.kind {
            ChopperKind::Disk(_) => None,
            ChopperKind::Fermi(fermi) => Some(fermi),
        }
    }

    pub(crate) fn validate(&self) -> Result<()> {
        let field = f!("chopper \"{}\"", self.name);
        if !(self.distance > 0.0) {
            return Err(Error::invalid(field, "distance must be positive"));
        }
        match &self.kind {
            ChopperKind::Disk(disk) => disk.validate(&field),
            ChopperKind::Fermi(fermi) => fermi.validate(&field),
        }
    }
}
