/// Extends string types with useful functions
pub trait StringExt {
    /// Capitalises the first letter in a string
    ///
    /// ```rust
    /// # use asdtools_utils::StringExt;
    /// assert_eq!("fe".capitalise(), "Fe".to_string());
    /// ```
    fn capitalise(&self) -> String;

    /// Lowercase everything, then capitalise the first letter
    ///
    /// Handy for element symbols typed in any case.
    ///
    /// ```rust
    /// # use asdtools_utils::StringExt;
    /// assert_eq!("FE".to_symbol_case(), "Fe".to_string());
    /// assert_eq!("h".to_symbol_case(), "H".to_string());
    /// ```
    fn to_symbol_case(&self) -> String;
}

impl<T: AsRef<str>> StringExt for T {
    fn capitalise(&self) -> String {
        let mut c = self.as_ref().chars();
        match c.next() {
            Some(f) => f.to_uppercase().collect::<String>() + c.as_str(),
            None => String::new(),
        }
    }

    fn to_symbol_case(&self) -> String {
        self.as_ref().to_lowercase().capitalise()
    }
}
