//! Absorption depth in the detector
//!
//! For a ³He tube the efficiency, mean absorption depth and its variance are
//! functions of a single parameter `α = μ·R`, the absorption coefficient
//! times the inner radius. They are tabulated here as 25-term Chebyshev
//! series on `[0, 9]` in `x = 2α/9 − 1` and on `[10, ∞)` in `y = 20/α − 1`,
//! joined linearly across `[9, 10]`.
//!
//! Depths are in units of the inner radius and measured from the tube axis,
//! so `delta` runs from 0 for a transparent tube to `−π/4` and `variance`
//! from 1/4 down to `2/3 − π²/16` in the opaque limit.

// tofchop modules
use tofchop_instrument::{Detector, DetectorModel};
use tofchop_utils::constants::wavevector;

// internal modules
use crate::chebyshev::chebev;

/// Absorption per atm of ³He per Å⁻¹ of wavevector (m⁻¹)
pub const HE3_ABSORPTION: f64 = 46.655;

/// Upper end of the low-α series
const ALPHA_LO: f64 = 9.0;

/// Lower end of the high-α series
const ALPHA_HI: f64 = 10.0;

/// Response of a tube to a neutron beam for one value of α
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TubeResponse {
    /// Fraction of neutrons absorbed
    pub efficiency: f64,
    /// Mean absorption depth relative to the tube axis (radii)
    pub delta: f64,
    /// Variance of the absorption depth (radii²)
    pub variance: f64,
}

/// Efficiency and depth moments of a ³He tube
///
/// ```rust
/// # use tofchop_widths::detector::tube_response;
/// let thin = tube_response(0.0);
/// assert!(thin.efficiency.abs() < 1e-12);
/// assert!((thin.variance - 0.25).abs() < 1e-9);
/// ```
pub fn tube_response(alpha: f64) -> TubeResponse {
    if alpha <= ALPHA_LO {
        let x = 2.0 * alpha / ALPHA_LO - 1.0;
        TubeResponse {
            efficiency: chebev(&EFF_LO, x),
            delta: chebev(&DEL_LO, x),
            variance: chebev(&VAR_LO, x),
        }
    } else if alpha >= ALPHA_HI {
        let y = 2.0 * ALPHA_HI / alpha - 1.0;
        TubeResponse {
            efficiency: chebev(&EFF_HI, y),
            delta: chebev(&DEL_HI, y),
            variance: chebev(&VAR_HI, y),
        }
    } else {
        let lo = tube_response(ALPHA_LO);
        let hi = tube_response(ALPHA_HI);
        let t = (alpha - ALPHA_LO) / (ALPHA_HI - ALPHA_LO);
        let blend = |a: f64, b: f64| a + (b - a) * t;
        TubeResponse {
            efficiency: blend(lo.efficiency, hi.efficiency),
            delta: blend(lo.delta, hi.delta),
            variance: blend(lo.variance, hi.variance),
        }
    }
}

/// Dimensionless absorption parameter α for a final energy (meV)
///
/// Always zero for a slab, which has no absorption model.
pub fn alpha(detector: &Detector, ef: f64) -> f64 {
    match detector.model {
        DetectorModel::Slab { .. } => 0.0,
        DetectorModel::He3Tube { pressure, .. } => {
            let mu = HE3_ABSORPTION * pressure / wavevector(ef);
            mu * detector.effective_radius()
        }
    }
}

/// Variance of the absorption depth along the scattered path (m²)
pub fn variance(detector: &Detector, ef: f64) -> f64 {
    match detector.model {
        DetectorModel::Slab { depth } => depth * depth / 12.0,
        DetectorModel::He3Tube { .. } => {
            let radius = detector.effective_radius();
            tube_response(alpha(detector, ef)).variance * radius * radius
        }
    }
}

/// Spread in final flight time from the absorption depth (s²)
pub fn time_variance(detector: &Detector, ef: f64, vf: f64) -> f64 {
    variance(detector, ef) / (vf * vf)
}

const EFF_LO: [f64; 25] = [
    1.6719111708970531,
    0.29003416094046417,
    -0.21962012670623753,
    0.14710539283549917,
    -0.08850483073423701,
    0.048272722062536676,
    -0.024030276246424382,
    0.010978689744374124,
    -0.0046259789263795941,
    0.0018057243078116813,
    -0.0006556521431568446,
    0.0002222873724746512,
    -7.0615060101674266e-5,
    2.1087688622634475e-5,
    -5.937610493769806e-6,
    1.5807002182554349e-6,
    -3.9889278739478034e-7,
    9.5645095444675991e-8,
    -2.1838576663362768e-8,
    4.758029881369199e-9,
    -9.9104701782629242e-10,
    1.9769284336133891e-10,
    -3.7828715938673345e-11,
    6.949251453583177e-12,
    -1.1956929339525007e-12,
];

const EFF_HI: [f64; 25] = [
    1.9981144000103874,
    -0.0012585008035791757,
    -0.00031678981834458623,
    -1.2576925362031973e-6,
    -1.7366277025737229e-7,
    -5.6521449673307434e-9,
    -7.4086259219032285e-10,
    -8.0242694735162459e-11,
    -1.3482570171850033e-11,
    -1.8789548449495799e-12,
    -3.7540090646725458e-14,
    1.1958079070791847e-13,
    5.0609457995987808e-14,
    8.5707595824436499e-15,
    -1.6688557841951186e-15,
    -1.3357770890226286e-15,
    -2.0596554376251002e-16,
    9.0026188829185708e-17,
    4.3645927568445712e-17,
    -1.5529110203557201e-18,
    -5.5823816660454842e-18,
    -6.9483895034730128e-19,
    6.3349223204640584e-19,
    1.6337126427756724e-19,
    -8.0146428266041879e-20,
];

const DEL_LO: [f64; 25] = [
    -0.92909647752256428,
    -0.30238272019234676,
    0.12040198637366058,
    -0.037636705038550179,
    0.0071876855602323189,
    0.000786406327860195,
    -0.0014307826946895434,
    0.00069802322497957383,
    -0.00018683097984101856,
    3.0825791177893524e-6,
    2.5653452555743927e-5,
    -1.4756268021955692e-5,
    4.4420772874733281e-6,
    -3.0260832044772127e-7,
    -4.8207215776833112e-7,
    3.1068086874361128e-7,
    -1.012494797257927e-7,
    1.0593022373172911e-8,
    8.90689216681208e-9,
    -6.4560018500275858e-9,
    2.2641464148451721e-9,
    -3.0877331534970913e-10,
    -1.6021272457074554e-10,
    1.3542713016167204e-10,
    -5.2758046629136241e-11,
];

const DEL_HI: [f64; 25] = [
    -1.4724385083567646,
    0.048890317960000826,
    -0.00029786530686341512,
    -9.5338040863104542e-6,
    -2.7557011988698741e-7,
    -1.6981897733376829e-8,
    -1.3101814851724675e-9,
    -1.6365195850991403e-10,
    -2.4886466337021624e-11,
    -3.5759612758218627e-12,
    -8.6999929512936591e-14,
    2.1417832640200229e-13,
    9.2161208849330675e-14,
    1.5889284491787921e-14,
    -2.9202696680532679e-15,
    -2.4160878454695136e-15,
    -3.8179638199894821e-16,
    1.6012119592400245e-16,
    7.9204861795237875e-17,
    -2.443183300728269e-18,
    -1.0048520093898853e-17,
    -1.2920381678619333e-18,
    1.1336363938449506e-18,
    2.9833365854102411e-19,
    -1.4264546747087922e-19,
];

const VAR_LO: [f64; 25] = [
    0.24836092958843894,
    -0.093774764720891339,
    0.03635742719637008,
    -0.0055221791346364509,
    -0.0039745680246341004,
    0.0038936573014560094,
    -0.0018083391975555668,
    0.00042365253391921301,
    7.0496978168689633e-5,
    -0.00012199225204293861,
    6.2613927494754594e-5,
    -1.6657481013426362e-5,
    -8.0784437444412099e-7,
    3.33162219152338e-6,
    -1.8437804827683062e-6,
    5.3298588466227063e-7,
    -8.283837002845343e-9,
    -8.2638980755686818e-8,
    4.957096583984794e-8,
    -1.5451148136788519e-8,
    9.7993164465404256e-10,
    1.9085731662819963e-9,
    -1.2602299437222584e-9,
    4.3298379023603686e-10,
    -7.4134786009635925e-11,
];

const VAR_HI: [f64; 25] = [
    0.10578895248722665,
    0.0040787756674986021,
    0.00098464682583795864,
    -1.6682240254110993e-5,
    -6.6917046524034023e-7,
    -3.3507338757281974e-8,
    -2.6458823495670422e-9,
    -3.0536979617833322e-10,
    -4.613812404509403e-11,
    -6.5861688212054286e-12,
    -1.9037630013113697e-13,
    3.7816470312388798e-13,
    1.6497684259899634e-13,
    2.8899005204374625e-14,
    -5.0410144437575942e-15,
    -4.300232855927134e-15,
    -6.9439166251461879e-16,
    2.8063602300825081e-16,
    1.4139647379845782e-16,
    -3.7578255499779328e-18,
    -1.7806906458098816e-17,
    -2.3569901350635107e-18,
    1.9979697897582797e-18,
    5.3564798113339828e-19,
    -2.5011086197799368e-19,
];
