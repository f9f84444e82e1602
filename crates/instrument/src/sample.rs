/// Sample geometry at the scattering position
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    /// Extent along x, y and z (m), where y is transverse to the beam
    pub dimensions: [f64; 3],
    /// Shape used to choose the spatial variance scaling
    pub shape: SampleShape,
    /// Scattering angle to the detector (deg)
    pub angle: f64,
}

/// Sample shapes with a known spatial variance
///
/// Codes outside the known set are kept as [SampleShape::Other] and use the
/// flat plate scaling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleShape {
    Flat,
    Ellipse,
    Annulus,
    Cylinder,
    Sphere,
    Other(u8),
}

impl SampleShape {
    /// Map a configuration shape code onto a shape
    ///
    /// ```rust
    /// # use tofchop_instrument::SampleShape;
    /// assert_eq!(SampleShape::from_code(2), SampleShape::Annulus);
    /// assert_eq!(SampleShape::from_code(9), SampleShape::Other(9));
    /// ```
    pub fn from_code(code: u8) -> Self {
        match code {
            0 => Self::Flat,
            1 => Self::Ellipse,
            2 => Self::Annulus,
            3 => Self::Cylinder,
            4 => Self::Sphere,
            other => Self::Other(other),
        }
    }

    /// Whether this is one of the recognised shapes
    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Other(_))
    }
}
