// standard library
use std::str::FromStr;

// external crates
use log::debug;

// internal modules
use crate::config::Config;
use crate::element::Ion;
use crate::error::{Error, Result};
use crate::levels::{parse_levels, Levels};
use crate::lines::{parse_lines, Lines};
use crate::record::TableKind;

// ! Public API

/// Query URL for the energy levels of an ion
///
/// The element is a symbol such as `"Fe"` and the ion is given by the number
/// of electrons still bound to it. The URL is always the same for the same
/// inputs.
///
/// ```rust
/// # use asdtools_nist::get_level_url;
/// let url = get_level_url("Fe", 3).unwrap();
/// assert!(url.contains("spectrum=Fe+XXIV"));
/// ```
pub fn get_level_url(element: &str, n_bound_electrons: u8) -> Result<String> {
    let ion = Ion::new(element, n_bound_electrons)?;
    Ok(Config::default().level_url(&ion))
}

/// Query URL for the spectral lines of an ion
///
/// ```rust
/// # use asdtools_nist::get_line_url;
/// let url = get_line_url("Fe", 3).unwrap();
/// assert!(url.contains("spectra=Fe+XXIV"));
/// ```
pub fn get_line_url(element: &str, n_bound_electrons: u8) -> Result<String> {
    let ion = Ion::new(element, n_bound_electrons)?;
    Ok(Config::default().line_url(&ion))
}

/// Energy levels directly from the NIST ASD
///
/// For example, lithium-like iron:
///
/// ```rust, no_run
/// # use asdtools_nist::get_levels;
/// let levels = get_levels("Fe", 3).unwrap();
///
/// let first_excited = levels.get(1).unwrap();
/// println!("{first_excited}");
/// ```
///
/// which gives
///
/// ```text
/// Level 1
///   Configuration  1s2.2p
///   Term           2P (odd)
///   J              0.5
///   Energy         48.5997 +/- none eV
///   Theoretical    false
///   Reference      L7185
/// ```
///
/// A valid query for which the database has no levels is
/// [Error::DataNotFound].
pub fn get_levels(element: &str, n_bound_electrons: u8) -> Result<Levels> {
    fetch_levels(&Config::default(), &Ion::new(element, n_bound_electrons)?)
}

/// Spectral lines directly from the NIST ASD
///
/// ```rust, no_run
/// # use asdtools_nist::get_lines;
/// let lines = get_lines("Fe", 3).unwrap();
/// println!("{} lines", lines.len());
/// ```
///
/// A valid query for which the database has no lines is
/// [Error::DataNotFound].
pub fn get_lines(element: &str, n_bound_electrons: u8) -> Result<Lines> {
    fetch_lines(&Config::default(), &Ion::new(element, n_bound_electrons)?)
}

/// Energy levels for an ion using explicit settings
pub fn fetch_levels(config: &Config, ion: &Ion) -> Result<Levels> {
    let text = fetch_raw(config, ion, TableKind::Levels)?;
    parse_levels(&text).map_err(|e| e.for_spectrum(&ion.spectrum_name()))
}

/// Spectral lines for an ion using explicit settings
pub fn fetch_lines(config: &Config, ion: &Ion) -> Result<Lines> {
    let text = fetch_raw(config, ion, TableKind::Lines)?;
    parse_lines(&text).map_err(|e| e.for_spectrum(&ion.spectrum_name()))
}

/// Raw tab-delimited text directly from the NIST ASD
///
/// This is the unaltered response, useful for saving a table to parse later
/// with [load_levels()](crate::load_levels) or
/// [load_lines()](crate::load_lines).
///
/// ```rust, no_run
/// # use asdtools_nist::{fetch_raw, Config, Ion, TableKind};
/// # use std::str::FromStr;
/// let ion = Ion::from_str("Fe XXIV").unwrap();
/// println!("{}", fetch_raw(&Config::default(), &ion, TableKind::Levels).unwrap());
/// ```
///
/// Ions that can not exist, such as more bound electrons than protons, are
/// [Error::DataNotFound] without sending a request.
pub fn fetch_raw(config: &Config, ion: &Ion, kind: TableKind) -> Result<String> {
    if !ion.is_physical() {
        debug!(
            "{} with {} bound electrons can not exist",
            ion.symbol, ion.bound_electrons
        );
        return Err(Error::DataNotFound {
            spectrum: ion.spectrum_name(),
            kind,
        });
    }

    let url = match kind {
        TableKind::Levels => config.level_url(ion),
        TableKind::Lines => config.line_url(ion),
    };
    debug!("fetching {kind} for {ion}: {url}");

    // send get request to NIST
    let mut request = minreq::get(url);
    if let Some(seconds) = config.timeout {
        request = request.with_timeout(seconds);
    }
    let response = request.send()?;

    if response.status_code != 200 {
        return Err(Error::HttpStatus {
            code: response.status_code,
            reason: response.reason_phrase.clone(),
        });
    }

    Ok(response.as_str()?.to_string())
}

/// Energy levels for an ion written in spectroscopic notation, e.g. `"Fe XXIV"`
///
/// ```rust, no_run
/// # use asdtools_nist::get_levels_for;
/// let levels = get_levels_for("Na X").unwrap();
/// ```
pub fn get_levels_for(spectrum: &str) -> Result<Levels> {
    fetch_levels(&Config::default(), &Ion::from_str(spectrum)?)
}

/// Spectral lines for an ion written in spectroscopic notation
pub fn get_lines_for(spectrum: &str) -> Result<Lines> {
    fetch_lines(&Config::default(), &Ion::from_str(spectrum)?)
}
