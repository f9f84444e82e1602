/// Named overlay of chopper parameters, e.g. a resolution mode
///
/// Applying a variant to an [InstrumentConfig](crate::InstrumentConfig)
/// replaces only the fields set in each overlay.
#[derive(Debug, Clone, PartialEq)]
pub struct Variant {
    /// Name used to select the variant
    pub name: String,
    /// Per-chopper overrides
    pub overlays: Vec<ChopperOverlay>,
}

/// Overrides for the disk chopper at index `chopper`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChopperOverlay {
    pub chopper: usize,
    pub slot_width: Option<f64>,
    pub guide_width: Option<f64>,
    pub slots: Option<usize>,
    pub slot_angles: Option<Vec<f64>>,
    pub default_phase: Option<f64>,
}
