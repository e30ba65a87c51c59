//! Energy level tables

// external crates
use itertools::Itertools;
use log::{debug, warn};
use serde::{Deserialize, Serialize};

// asdtools modules
use asdtools_utils::{f, OptionExt};

// internal modules
use crate::error::{Error, Result};
use crate::parsers::configuration_parity;
use crate::record::{read_table, LevelRecord, RawLevel, TableKind};

/// J value used for levels where J is not identified
///
/// A number rather than a null, so levels are filtered with a simple
/// comparison like `level.j > -1.0`.
pub const J_NOT_IDENTIFIED: f64 = -1.0;

/// Parity of a level
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Parity {
    Even,
    Odd,
}

impl std::fmt::Display for Parity {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Parity::Even => write!(f, "even"),
            Parity::Odd => write!(f, "odd"),
        }
    }
}

/// Lookup key shared by levels and the level descriptors of lines
///
/// J is stored doubled so that half-integers hash exactly.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) struct LevelKey {
    pub configuration: String,
    pub term: String,
    pub two_j: u32,
}

impl LevelKey {
    /// None when J is not identified, or there is nothing to identify the
    /// level by
    pub fn new(configuration: &str, term: &str, j: Option<f64>) -> Option<Self> {
        let two_j = doubled(j)?;
        if configuration.is_empty() && term.is_empty() {
            return None;
        }
        Some(Self {
            configuration: configuration.to_string(),
            term: term.to_string(),
            two_j,
        })
    }
}

/// 2J, None for a missing or negative (not identified) J
pub(crate) fn doubled(j: Option<f64>) -> Option<u32> {
    j.filter(|j| *j >= 0.0).map(|j| (2.0 * j).round() as u32)
}

/// A single energy level of an ion
///
/// ```text
/// Level 1
///   Configuration  1s2.2p
///   Term           2P (odd)
///   J              0.5
///   Energy         48.5997 +/- 0.0012 eV
///   Theoretical    false
///   Reference      L7185
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Level {
    /// Position in the listing, 0 for the ground level
    pub index: usize,
    /// Electron configuration, e.g. `1s2.2p`
    pub configuration: String,
    /// Configuration identification is questionable
    pub configuration_uncertain: bool,
    /// Term symbol, e.g. `2P`
    pub term: String,
    /// Term identification is questionable
    pub term_uncertain: bool,
    /// Total angular momentum, [J_NOT_IDENTIFIED] if unknown
    pub j: f64,
    /// Derived parity
    pub parity: Parity,
    /// Level energy (eV)
    pub energy: f64,
    /// Uncertainty in the level energy (eV)
    pub energy_uncertainty: Option<f64>,
    /// Number of decimal digits given for the energy
    pub energy_digits: Option<u8>,
    /// Energy is from theory rather than measurement
    pub energy_is_theoretical: bool,
    /// Energy is questionable, derived, or has an unknown offset
    pub energy_is_uncertain: bool,
    /// Bibliographic reference code
    pub reference: Option<String>,
}

impl Level {
    /// Whether J is known
    pub fn is_j_identified(&self) -> bool {
        self.j >= 0.0
    }

    /// Doubled J, an exact integer for half-integer J
    ///
    /// None if J is not identified.
    pub fn two_j(&self) -> Option<u32> {
        doubled(Some(self.j))
    }

    /// Statistical weight `2J + 1`, None if J is not identified
    pub fn degeneracy(&self) -> Option<u32> {
        self.two_j().map(|two_j| two_j + 1)
    }

    pub(crate) fn key(&self) -> Option<LevelKey> {
        LevelKey::new(&self.configuration, &self.term, Some(self.j))
    }

    /// Does this level match a (configuration, term, J) descriptor
    pub fn matches(&self, configuration: &str, term: &str, j: f64) -> bool {
        match (self.key(), LevelKey::new(configuration, term, Some(j))) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        }
    }
}

impl std::fmt::Display for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let mut s = f!("Level {}\n", self.index);
        s += &f!("  Configuration  {}\n", self.configuration);
        s += &f!("  Term           {} ({})\n", self.term, self.parity);
        s += &f!("  J              {}\n", self.j);
        s += &f!(
            "  Energy         {} +/- {} eV\n",
            self.energy,
            self.energy_uncertainty.display()
        );
        s += &f!("  Theoretical    {}\n", self.energy_is_theoretical);
        s += &f!("  Reference      {}", self.reference.display());
        write!(f, "{s}")
    }
}

/// Table of energy levels for one ion
///
/// Levels are kept in the order listed by the database, which is by
/// increasing energy. The ionisation limit is listed as a pseudo-level by the
/// database, but is removed from the table and kept as `ionization_limit`.
///
/// Duplicate (configuration, term, J) combinations are real and kept.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct Levels {
    /// Every level
    pub levels: Vec<Level>,
    /// Ionisation limit (eV), if listed
    pub ionization_limit: Option<f64>,
}

impl Levels {
    /// Build the table from decoded records
    ///
    /// Indices are assigned in listing order after the limit and any levels
    /// without an energy are removed. An empty result is
    /// [Error::DataNotFound].
    pub fn from_records(records: Vec<LevelRecord>) -> Result<Self> {
        let mut ionization_limit = None;
        let mut levels: Vec<Level> = Vec::with_capacity(records.len());

        for record in records {
            if record.is_limit() {
                debug!("ionisation limit {}", record.energy.value.display());
                ionization_limit = ionization_limit.or(record.energy.value);
                continue;
            }

            let Some(energy) = record.energy.value else {
                warn!(
                    "dropping level {} {} with no energy",
                    record.configuration, record.term
                );
                continue;
            };

            levels.push(Level {
                index: levels.len(),
                parity: parity(&record),
                j: record.j.unwrap_or(J_NOT_IDENTIFIED),
                energy,
                energy_uncertainty: record.energy.uncertainty,
                energy_digits: record.energy.digits,
                energy_is_theoretical: record.energy.theoretical,
                energy_is_uncertain: record.energy.uncertain,
                configuration: record.configuration,
                configuration_uncertain: record.configuration_uncertain,
                term: record.term,
                term_uncertain: record.term_uncertain,
                reference: record.reference,
            });
        }

        if levels.is_empty() {
            return Err(Error::not_found(TableKind::Levels));
        }

        if levels[0].energy != 0.0 {
            warn!("ground level energy is {} eV, not zero", levels[0].energy);
        }

        let levels = Self {
            levels,
            ionization_limit,
        };

        if let Err(e) = levels.reference() {
            warn!("{e}");
        }

        Ok(levels)
    }

    /// Number of levels
    pub fn len(&self) -> usize {
        self.levels.len()
    }

    /// No levels at all
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// Iterate over levels in listing order
    pub fn iter(&self) -> std::slice::Iter<'_, Level> {
        self.levels.iter()
    }

    /// Level by its index
    pub fn get(&self, index: usize) -> Option<&Level> {
        match self.levels.get(index) {
            Some(level) if level.index == index => Some(level),
            // a selection no longer has contiguous indices
            _ => self.levels.iter().find(|level| level.index == index),
        }
    }

    /// The ground level
    pub fn ground(&self) -> Option<&Level> {
        self.levels.first()
    }

    /// Every level matching (configuration, term, J), in listing order
    ///
    /// There may be more than one, this is not an error.
    pub fn find(&self, configuration: &str, term: &str, j: f64) -> Vec<&Level> {
        self.levels
            .iter()
            .filter(|level| level.matches(configuration, term, j))
            .collect()
    }

    /// Subset of levels for which the predicate is true
    ///
    /// Levels keep their original index.
    ///
    /// ```rust, no_run
    /// # use asdtools_nist::get_levels;
    /// let levels = get_levels("Na", 2).unwrap();
    /// let identified = levels.select(|l| l.is_j_identified() && !l.term_uncertain);
    /// ```
    pub fn select<P>(&self, predicate: P) -> Levels
    where
        P: Fn(&Level) -> bool,
    {
        Levels {
            levels: self
                .levels
                .iter()
                .filter(|l| predicate(l))
                .cloned()
                .collect(),
            ionization_limit: self.ionization_limit,
        }
    }

    /// The reference code for the whole table
    ///
    /// The database cites one reference per spectrum, so anything else is
    /// reported as [Error::InconsistentReference] rather than picking one.
    pub fn reference(&self) -> Result<Option<&str>> {
        let references = self
            .levels
            .iter()
            .filter_map(|level| level.reference.as_deref())
            .unique()
            .collect::<Vec<&str>>();

        match references.as_slice() {
            [] => Ok(None),
            [single] => Ok(Some(*single)),
            _ => Err(Error::InconsistentReference {
                references: references.iter().map(|r| r.to_string()).collect(),
            }),
        }
    }
}

impl<'a> IntoIterator for &'a Levels {
    type Item = &'a Level;
    type IntoIter = std::slice::Iter<'a, Level>;

    fn into_iter(self) -> Self::IntoIter {
        self.levels.iter()
    }
}

/// Parse a raw tab-delimited levels table
///
/// ```rust
/// # use asdtools_nist::parse_levels;
/// let text = "Configuration\tTerm\tJ\tLevel (eV)\tReference\n\
///             1s2.2s\t2S\t1/2\t0.0000\tL7185\n\
///             1s2.2p\t2P*\t1/2\t48.5997\tL7185\n";
///
/// let levels = parse_levels(text).unwrap();
/// assert_eq!(levels.len(), 2);
/// assert_eq!(levels.get(1).unwrap().term, "2P");
/// ```
pub fn parse_levels(text: &str) -> Result<Levels> {
    Levels::from_records(read_table::<RawLevel, LevelRecord>(text, TableKind::Levels)?)
}

/// Parity from the term marker, or the configuration if there is no term
fn parity(record: &LevelRecord) -> Parity {
    if record.odd_term {
        Parity::Odd
    } else if !record.term.is_empty() {
        Parity::Even
    } else {
        configuration_parity(&record.configuration).unwrap_or(Parity::Even)
    }
}
