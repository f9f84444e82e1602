use crate::f;

/// Extends `f64` with formatting suited to physical results
pub trait ValueExt {
    /// Better scientific number formatting
    ///
    /// The default is not very consistent for scientific in particular, so this
    /// allows easy definition of the precision and exponent padding.
    ///
    /// ```rust
    /// # use tofchop_utils::ValueExt;
    /// assert_eq!((-1.0).sci(5, 2), "-1.00000e+00".to_string());
    /// assert_eq!((1.5e-7).sci(3, 2), "1.500e-07".to_string());
    /// ```
    fn sci(&self, precision: usize, exp_pad: usize) -> String;

    /// Scientific formatting that writes `placeholder` for undefined values
    ///
    /// Resolution and flux results use NaN to mark points with no physical
    /// answer, which should be rendered as a gap rather than "NaN".
    ///
    /// ```rust
    /// # use tofchop_utils::ValueExt;
    /// assert_eq!(f64::NAN.sci_or(3, 2, "-"), "-".to_string());
    /// assert_eq!((2.0).sci_or(3, 2, "-"), "2.000e+00".to_string());
    /// ```
    fn sci_or(&self, precision: usize, exp_pad: usize, placeholder: &str) -> String;
}

impl ValueExt for f64 {
    fn sci(&self, precision: usize, exp_pad: usize) -> String {
        let mut num = f!("{:.precision$e}", &self, precision = precision);
        // Non-finite values have no exponent to pad
        let Some(split) = num.find('e') else {
            return num;
        };
        let exp = num.split_off(split);
        // Make sure the exponent is signed
        let (sign, exp) = match exp.strip_prefix("e-") {
            Some(exp) => ('-', exp),
            None => ('+', &exp[1..]),
        };
        num.push_str(&f!("e{}{:0>pad$}", sign, exp, pad = exp_pad));
        num
    }

    fn sci_or(&self, precision: usize, exp_pad: usize, placeholder: &str) -> String {
        if self.is_finite() {
            self.sci(precision, exp_pad)
        } else {
            placeholder.to_string()
        }
    }
}
