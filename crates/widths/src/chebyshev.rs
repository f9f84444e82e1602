//! Chebyshev series evaluation and the error function
//!
//! The error function is needed by the soft hat rescaling of moderator widths.
//! It is evaluated from a 28-term Chebyshev fit to `ln(erfc(z)·e^(z²)/t)` in
//! the variable `t = 2/(2 + z)`, good to around 1e-16 relative.

/// Evaluate a Chebyshev series at `x` in [-1, 1] with Clenshaw recurrence
///
/// The first coefficient is halved, following the usual convention
/// `f(x) ≈ c₀/2 + Σₖ cₖ·Tₖ(x)`.
///
/// ```rust
/// # use tofchop_widths::chebev;
/// // 1/2 + T₁(x) + T₂(x) = 1/2 + x + 2x² − 1
/// let c = [1.0, 1.0, 1.0];
/// assert!((chebev(&c, 0.5) - 0.5).abs() < 1e-15);
/// ```
pub fn chebev(coefficients: &[f64], x: f64) -> f64 {
    let Some((c0, rest)) = coefficients.split_first() else {
        return 0.0;
    };

    let mut d = 0.0;
    let mut dd = 0.0;
    for c in rest.iter().rev() {
        let sv = d;
        d = 2.0 * x * d - dd + c;
        dd = sv;
    }
    x * d - dd + 0.5 * c0
}

const ERFC: [f64; 28] = [
    -1.302_653_719_781_709_4,
    6.419_697_923_564_902_6e-1,
    1.947_647_320_418_583_6e-2,
    -9.561_514_786_808_631_6e-3,
    -9.465_953_444_820_368_7e-4,
    3.668_394_978_527_614_5e-4,
    4.252_332_480_690_777_2e-5,
    -2.027_857_811_253_424_3e-5,
    -1.624_290_004_647_025_5e-6,
    1.303_655_835_580_523_2e-6,
    1.562_644_172_206_614_3e-8,
    -8.523_809_591_492_654_3e-8,
    6.529_054_439_098_851_5e-9,
    5.059_343_495_551_468_7e-9,
    -9.913_641_564_930_323_1e-10,
    -2.273_651_222_931_841_7e-10,
    9.646_791_102_014_961_8e-11,
    2.394_038_083_065_756e-12,
    -6.886_027_526_536_277_1e-12,
    8.944_879_271_730_367_5e-13,
    3.130_921_408_127_142_4e-13,
    -1.127_082_252_522_173_2e-13,
    3.810_871_358_852_898_5e-16,
    7.106_125_536_922_576_4e-15,
    -1.523_087_897_537_330_4e-15,
    -9.464_871_412_184_461_9e-17,
    1.218_683_266_906_788e-16,
    -3.049_473_513_542_469_5e-17,
];

/// Complementary error function
///
/// ```rust
/// # use tofchop_widths::erfc;
/// assert_eq!(erfc(0.0), 1.0);
/// assert!((erfc(1.0) - 0.157_299_207_050_285_1).abs() < 1e-15);
/// ```
pub fn erfc(z: f64) -> f64 {
    if z < 0.0 {
        return 2.0 - erfc(-z);
    }
    let t = 2.0 / (2.0 + z);
    let x = 2.0 * t - 1.0;
    t * (-z * z + chebev(&ERFC, x)).exp()
}

/// Error function
///
/// ```rust
/// # use tofchop_widths::erf;
/// assert!((erf(0.5) - 0.520_499_877_813_046_5).abs() < 1e-15);
/// assert_eq!(erf(-10.0), -1.0);
/// ```
pub fn erf(z: f64) -> f64 {
    1.0 - erfc(z)
}
