//! Common helpers for extended `std` types
//!
//! These are left public for convenience.
//!
//! Mostly display formatting for tabulated atomic data, where optional values
//! and very large or very small numbers are everywhere.

// Alias for the format! macro
pub use std::format as f;

// Modules
mod option_ext;
mod string_ext;
mod value_ext;

// Flatten
pub use option_ext::{OptionExt, OptionValueExt};
pub use string_ext::StringExt;
pub use value_ext::ValueExt;
