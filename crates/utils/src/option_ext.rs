use crate::f;

/// Extends Option for easy display formatting
pub trait OptionExt {
    /// Either the value contained within `Some()` or "none"
    ///
    /// ```rust
    /// # use tofchop_utils::OptionExt;
    /// assert_eq!(Some("High Flux").display(), "High Flux");
    /// assert_eq!(None::<&str>.display(), "none");
    /// ```
    fn display(&self) -> String {
        self.display_or("none")
    }

    /// Either the value contained within `Some()` or the `fallback` text
    ///
    /// ```rust
    /// # use tofchop_utils::OptionExt;
    /// let x: Option<f64> = None;
    /// assert_eq!(x.display_or("not set"), "not set");
    /// ```
    fn display_or(&self, fallback: &str) -> String;
}

impl<T: std::fmt::Display> OptionExt for Option<T> {
    fn display_or(&self, fallback: &str) -> String {
        match self {
            Some(value) => f!("{value}"),
            None => fallback.to_string(),
        }
    }
}
