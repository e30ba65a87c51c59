use crate::{f, ValueExt};

/// Extends Option for easy display formatting
pub trait OptionExt {
    /// Either the value contained within `Some()` or "none"
    ///
    /// ```rust
    /// # use asdtools_utils::OptionExt;
    /// let x: Option<f64> = Some(48.5997);
    /// assert_eq!(x.display(), "48.5997");
    ///
    /// let x: Option<f64> = None;
    /// assert_eq!(x.display(), "none");
    /// ```
    fn display(&self) -> String;
}

impl<T: std::fmt::Display> OptionExt for Option<T> {
    fn display(&self) -> String {
        match self {
            Some(value) => f!("{value}"),
            None => "none".to_string(),
        }
    }
}

/// Extends numeric Options with scientific display formatting
pub trait OptionValueExt {
    /// Scientific formatting of the contained value, or "none"
    ///
    /// ```rust
    /// # use asdtools_utils::OptionValueExt;
    /// let aki: Option<f64> = Some(7.06e10);
    /// assert_eq!(aki.display_sci(3), "7.060e+10");
    /// assert_eq!(None::<f64>.display_sci(3), "none");
    /// ```
    fn display_sci(&self, precision: usize) -> String;
}

impl<T: std::fmt::LowerExp> OptionValueExt for Option<T> {
    fn display_sci(&self, precision: usize) -> String {
        match self {
            Some(value) => value.sci(precision, 2),
            None => "none".to_string(),
        }
    }
}
