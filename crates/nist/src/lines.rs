//! Spectral line tables

// external crates
use log::{debug, warn};
use serde::{Deserialize, Serialize};

// asdtools modules
use asdtools_utils::{f, OptionExt, OptionValueExt};

// internal modules
use crate::error::{Error, Result};
use crate::levels::{doubled, LevelKey};
use crate::record::{read_table, Annotated, LineRecord, RawLine, TableKind};

/// Reference from a line to one of its levels
///
/// This is the (configuration, term, J) triple exactly as reported on the
/// line, with markers decoded the same way as for levels. It is only
/// resolved to actual levels by [fuse()](crate::fuse).
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Descriptor {
    /// Electron configuration
    pub configuration: String,
    /// Configuration was marked with `?`
    pub configuration_uncertain: bool,
    /// Term symbol without markers
    pub term: String,
    /// Term was marked with `?`
    pub term_uncertain: bool,
    /// Total angular momentum, None if not identified
    pub j: Option<f64>,
}

impl Descriptor {
    /// Doubled J as used by the ASD for exact matching, None if J is not
    /// identified
    pub fn two_j(&self) -> Option<u32> {
        doubled(self.j)
    }

    pub(crate) fn key(&self) -> Option<LevelKey> {
        LevelKey::new(&self.configuration, &self.term, self.j)
    }
}

impl std::fmt::Display for Descriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "{} {} J={}",
            self.configuration,
            self.term,
            self.j.display()
        )
    }
}

/// Multipole type of a transition
///
/// The database leaves the type blank for electric dipole lines.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub enum TransitionType {
    /// Electric dipole
    #[default]
    E1,
    /// Magnetic dipole
    M1,
    /// Electric quadrupole
    E2,
    /// Magnetic quadrupole
    M2,
    /// Electric octupole
    E3,
    /// Magnetic octupole
    M3,
    /// Anything else, e.g. two-photon or hyperfine-induced
    Other(String),
}

impl TransitionType {
    pub(crate) fn from_cell(cell: &str) -> Self {
        match cell.to_ascii_uppercase().as_str() {
            "" | "E1" => Self::E1,
            "M1" => Self::M1,
            "E2" => Self::E2,
            "M2" => Self::M2,
            "E3" => Self::E3,
            "M3" => Self::M3,
            _ => {
                warn!("unknown transition type \"{cell}\", no line strength");
                Self::Other(cell.to_string())
            }
        }
    }

    /// Power of the wavelength and constant relating A and S
    ///
    /// `A = C S / (g_k λ^n)` with λ in Å, S in atomic units, and A in s^-1.
    pub(crate) fn strength_coefficients(&self) -> Option<(i32, f64)> {
        match self {
            Self::E1 => Some((3, 2.02613e18)),
            Self::M1 => Some((3, 2.69735e13)),
            Self::E2 => Some((5, 1.11995e18)),
            Self::M2 => Some((5, 1.49097e13)),
            Self::E3 => Some((7, 3.14441e17)),
            Self::M3 => Some((7, 4.18610e12)),
            Self::Other(_) => None,
        }
    }
}

impl std::fmt::Display for TransitionType {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::Other(t) => write!(f, "{t}"),
            multipole => write!(f, "{multipole:?}"),
        }
    }
}

/// A single spectral line
///
/// Upper and lower levels are [Descriptor]s that still need resolving against
/// a levels table.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Line {
    /// Position in the listing
    pub index: usize,
    /// Upper level (k)
    pub upper: Descriptor,
    /// Lower level (i)
    pub lower: Descriptor,
    /// Transition probability (s^-1)
    pub aki: Option<f64>,
    /// Absorption oscillator strength
    pub fik: Option<f64>,
    /// Accuracy grade of the transition probability
    pub accuracy: Option<String>,
    /// Multipole type
    pub transition_type: TransitionType,
    /// Observed vacuum wavelength (nm)
    pub observed_wavelength: Annotated,
    /// Ritz vacuum wavelength (nm)
    pub ritz_wavelength: Annotated,
    /// Relative intensity as text
    pub intensity: Option<String>,
    /// Lower level energy as reported with the line (eV)
    pub lower_energy: Annotated,
    /// Upper level energy as reported with the line (eV)
    pub upper_energy: Annotated,
    /// Lower level statistical weight as reported with the line
    pub g_lower: Option<u32>,
    /// Upper level statistical weight as reported with the line
    pub g_upper: Option<u32>,
    /// Transition probability reference
    pub tp_reference: Option<String>,
    /// Line identification reference
    pub line_reference: Option<String>,
}

impl Line {
    fn from_record(index: usize, record: LineRecord) -> Self {
        Self {
            index,
            upper: record.upper,
            lower: record.lower,
            aki: record.aki.value,
            fik: record.fik.value,
            accuracy: record.accuracy,
            transition_type: record.transition_type,
            observed_wavelength: record.observed_wavelength,
            ritz_wavelength: record.ritz_wavelength,
            intensity: record.intensity,
            lower_energy: record.lower_energy,
            upper_energy: record.upper_energy,
            g_lower: record.g_lower,
            g_upper: record.g_upper,
            tp_reference: record.tp_reference,
            line_reference: record.line_reference,
        }
    }

    /// Observed wavelength if there is one, otherwise the Ritz wavelength (nm)
    pub fn wavelength(&self) -> Option<f64> {
        self.observed_wavelength.value.or(self.ritz_wavelength.value)
    }
}

impl std::fmt::Display for Line {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let mut s = f!("Line {}\n", self.index);
        s += &f!("  Upper          {}\n", self.upper);
        s += &f!("  Lower          {}\n", self.lower);
        s += &f!("  Wavelength     {} nm\n", self.wavelength().display());
        s += &f!("  Aki            {} s^-1\n", self.aki.display_sci(3));
        s += &f!("  fik            {}\n", self.fik.display_sci(3));
        s += &f!("  Type           {}", self.transition_type);
        write!(f, "{s}")
    }
}

/// Table of spectral lines for one ion
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct Lines {
    /// Every line
    pub lines: Vec<Line>,
}

impl Lines {
    /// Build the table from decoded records
    ///
    /// An empty result is [Error::DataNotFound].
    pub fn from_records(records: Vec<LineRecord>) -> Result<Self> {
        if records.is_empty() {
            return Err(Error::not_found(TableKind::Lines));
        }

        let lines = records
            .into_iter()
            .enumerate()
            .map(|(index, record)| Line::from_record(index, record))
            .collect::<Vec<Line>>();

        debug!(
            "{} lines, {} with Aki, {} with fik",
            lines.len(),
            lines.iter().filter(|l| l.aki.is_some()).count(),
            lines.iter().filter(|l| l.fik.is_some()).count()
        );

        Ok(Self { lines })
    }

    /// Number of lines
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// No lines at all
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Iterate over lines in listing order
    pub fn iter(&self) -> std::slice::Iter<'_, Line> {
        self.lines.iter()
    }

    /// Line by its index
    pub fn get(&self, index: usize) -> Option<&Line> {
        match self.lines.get(index) {
            Some(line) if line.index == index => Some(line),
            _ => self.lines.iter().find(|line| line.index == index),
        }
    }

    /// Subset of lines for which the predicate is true
    ///
    /// Lines keep their original index.
    pub fn select<P>(&self, predicate: P) -> Lines
    where
        P: Fn(&Line) -> bool,
    {
        Lines {
            lines: self
                .lines
                .iter()
                .filter(|l| predicate(l))
                .cloned()
                .collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Lines {
    type Item = &'a Line;
    type IntoIter = std::slice::Iter<'a, Line>;

    fn into_iter(self) -> Self::IntoIter {
        self.lines.iter()
    }
}

/// Parse a raw tab-delimited lines table
pub fn parse_lines(text: &str) -> Result<Lines> {
    Lines::from_records(read_table::<RawLine, LineRecord>(text, TableKind::Lines)?)
}
