// internal modules
use crate::error::Result;
use crate::levels::{parse_levels, Levels};
use crate::lines::{parse_lines, Lines};

// standard library
use std::path::Path;

/// Energy levels from a previously saved raw table
///
/// The file is the unaltered tab-delimited response of the levels form, for
/// example as written out from [fetch_raw()](crate::fetch_raw).
///
/// ```rust, no_run
/// # use asdtools_nist::load_levels;
/// let levels = load_levels("path/to/fe_xxiv_levels.txt").unwrap();
/// ```
pub fn load_levels<P: AsRef<Path>>(path: P) -> Result<Levels> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)?;
    parse_levels(&text).map_err(|e| e.for_spectrum(&path.display().to_string()))
}

/// Spectral lines from a previously saved raw table
pub fn load_lines<P: AsRef<Path>>(path: P) -> Result<Lines> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)?;
    parse_lines(&text).map_err(|e| e.for_spectrum(&path.display().to_string()))
}
