//! Settings for requests to the NIST ASD

// standard library
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

// external crates
use serde::{Deserialize, Serialize};

// asdtools modules
use asdtools_utils::f;

// internal modules
use crate::element::Ion;
use crate::error::Result;

/// Base of the URL used to query energy levels
const LEVELS_ENDPOINT: &str = "https://physics.nist.gov/cgi-bin/ASD/energy1.pl";

/// Base of the URL used to query spectral lines
const LINES_ENDPOINT: &str = "https://physics.nist.gov/cgi-bin/ASD/lines1.pl";

/// Level form options: tab-delimited (`format=3`), energies in eV
/// (`units=1`), with configuration, term, J, uncertainty, and references
const LEVELS_QUERY: &str = "de=0&units=1&format=3&output=0&page_size=15\
    &multiplet_ordered=0&conf_out=on&term_out=on&level_out=on&unc_out=1\
    &j_out=on&biblio=on&temp=&submit=Retrieve+Data";

/// Line form options: tab-delimited (`format=3`), vacuum wavelengths in nm,
/// energies in eV, with Aki, fik, level designations, and statistical weights
const LINES_QUERY: &str = "limits_type=0&low_w=&upp_w=&unit=1&de=0&format=3\
    &line_out=0&en_unit=1&output=0&bibrefs=1&page_size=15&show_obs_wl=1\
    &show_calc_wl=1&unc_out=1&order_out=0&max_low_enrg=&show_av=2\
    &max_upp_enrg=&tsb_value=0&min_str=&A_out=0&f_out=on&intens_out=on\
    &max_str=&allowed_out=1&forbid_out=1&min_accur=&min_intens=&conf_out=on\
    &term_out=on&enrg_out=on&J_out=on&g_out=on&submit=Retrieve+Data";

/// Request settings
///
/// The defaults point at the public NIST ASD and never time out. Any field
/// left out of a JSON config file takes the default.
///
/// ```rust
/// # use asdtools_nist::{Config, Ion};
/// let config = Config::default();
/// let ion = Ion::new("Fe", 3).unwrap();
/// assert!(config.level_url(&ion).contains("spectrum=Fe+XXIV"));
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    /// Energy levels form
    pub levels_endpoint: String,
    /// Spectral lines form
    pub lines_endpoint: String,
    /// Request timeout in seconds, None to wait forever
    pub timeout: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            levels_endpoint: LEVELS_ENDPOINT.to_string(),
            lines_endpoint: LINES_ENDPOINT.to_string(),
            timeout: None,
        }
    }
}

impl Config {
    /// Read settings from a JSON file
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let reader = BufReader::new(File::open(path)?);
        Ok(serde_json::from_reader(reader)?)
    }

    /// Query URL for the energy levels of an ion
    pub fn level_url(&self, ion: &Ion) -> String {
        f!(
            "{}?spectrum={}&{LEVELS_QUERY}",
            self.levels_endpoint,
            query_spectrum(ion)
        )
    }

    /// Query URL for the spectral lines of an ion
    pub fn line_url(&self, ion: &Ion) -> String {
        f!(
            "{}?spectra={}&{LINES_QUERY}",
            self.lines_endpoint,
            query_spectrum(ion)
        )
    }
}

/// Spectrum name with the space encoded for a query string
fn query_spectrum(ion: &Ion) -> String {
    ion.spectrum_name().replace(' ', "+")
}
