//! Cross-referencing lines against levels
//!
//! Lines only describe their upper and lower levels by (configuration, term,
//! J). Fusion resolves these against a levels table, attaches the level data
//! to each line, and computes the line strength `S`.
//!
//! ## Duplicate levels
//!
//! Several levels can legitimately share the same (configuration, term, J),
//! so a descriptor resolves to every matching level, not just one. All
//! candidates are kept on the [Resolution]. The level used for derived
//! quantities is the candidate closest in energy to the level energy the line
//! itself reports, or the first in listing order if the line reports none.
//!
//! ## Line strength
//!
//! With λ in Å from the resolved level energies, the transition probability
//! is taken directly from `Aki`, or from the oscillator strength as
//! `A = 6.6702e15 / λ² · g_i / g_k · f_ik`. The line strength in atomic
//! units is then `S = A g_k λ^n / C`, with n and C depending on the multipole
//! type.

// standard library
use std::collections::HashMap;

// external crates
use itertools::Itertools;
use log::{debug, trace};
use serde::{Deserialize, Serialize};

// asdtools modules
use asdtools_utils::{f, OptionExt, OptionValueExt};

// internal modules
use crate::error::{Error, Result};
use crate::levels::{Level, LevelKey, Levels};
use crate::lines::{Descriptor, Line, Lines};
use crate::record::TableKind;

/// Photon energy to wavelength conversion, hc (eV Å)
pub const HC_EV_ANGSTROM: f64 = 12398.419843320026;

/// Conversion from oscillator strength to transition probability, λ in Å
const A_FROM_F: f64 = 6.6702e15;

/// Outcome of matching a level descriptor against the levels table
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct Resolution {
    /// Index of every level matching the descriptor, in listing order
    pub candidates: Vec<usize>,
    /// Index of the level used for derived quantities
    pub selected: Option<usize>,
}

impl Resolution {
    /// Matched at least one level
    pub fn is_resolved(&self) -> bool {
        self.selected.is_some()
    }

    /// Matched more than one level
    pub fn is_ambiguous(&self) -> bool {
        self.candidates.len() > 1
    }
}

/// A line with its levels resolved
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct FusedLine {
    /// The line as listed
    pub line: Line,
    /// Resolution of the upper level descriptor
    pub upper: Resolution,
    /// Resolution of the lower level descriptor
    pub lower: Resolution,
    /// Energy of the selected upper level (eV)
    pub upper_energy: Option<f64>,
    /// Energy of the selected lower level (eV)
    pub lower_energy: Option<f64>,
    /// Statistical weight of the upper level
    pub g_upper: Option<u32>,
    /// Statistical weight of the lower level
    pub g_lower: Option<u32>,
    /// Vacuum wavelength from the level energies (Å)
    pub wavelength: Option<f64>,
    /// Line strength (atomic units)
    pub strength: Option<f64>,
}

impl FusedLine {
    /// Transition probability of the line
    pub fn aki(&self) -> Option<f64> {
        self.line.aki
    }

    /// Absorption oscillator strength of the line
    pub fn fik(&self) -> Option<f64> {
        self.line.fik
    }
}

impl std::fmt::Display for FusedLine {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let mut s = f!("{}\n", self.line);
        s += &f!(
            "  Levels         {} -> {}\n",
            self.upper.selected.display(),
            self.lower.selected.display()
        );
        s += &f!(
            "  Energies       {} -> {} eV\n",
            self.upper_energy.display(),
            self.lower_energy.display()
        );
        s += &f!("  S              {} a.u.", self.strength.display_sci(3));
        write!(f, "{s}")
    }
}

/// Levels and lines of one ion, cross-referenced
///
/// Every input line is present, resolved or not, in the original order.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct Fused {
    /// The levels lines were resolved against
    pub levels: Levels,
    /// Every line with its resolved level data
    pub lines: Vec<FusedLine>,
}

impl Fused {
    /// Number of lines
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// No lines at all
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Iterate over every line
    pub fn iter(&self) -> std::slice::Iter<'_, FusedLine> {
        self.lines.iter()
    }

    /// Lines for which the line strength could be computed
    pub fn with_strength(&self) -> impl Iterator<Item = &FusedLine> {
        self.lines.iter().filter(|l| l.strength.is_some())
    }

    /// Number of lines with a transition probability
    pub fn count_aki(&self) -> usize {
        self.lines.iter().filter(|l| l.aki().is_some()).count()
    }

    /// Number of lines with an oscillator strength
    pub fn count_fik(&self) -> usize {
        self.lines.iter().filter(|l| l.fik().is_some()).count()
    }

    /// Number of lines with a line strength
    pub fn count_strength(&self) -> usize {
        self.with_strength().count()
    }

    /// The level a resolution selected
    pub fn level(&self, resolution: &Resolution) -> Option<&Level> {
        resolution.selected.and_then(|i| self.levels.get(i))
    }
}

/// Resolve every line against the levels and compute line strengths
///
/// Lines that can not be resolved are kept with missing derived values, so
/// the output always has as many lines as the input. Empty inputs are
/// [Error::DataNotFound].
///
/// ```rust, no_run
/// # use asdtools_nist::{fuse, get_levels, get_lines};
/// let levels = get_levels("Fe", 3).unwrap();
/// let lines = get_lines("Fe", 3).unwrap();
/// let fused = fuse(&levels, &lines).unwrap();
///
/// for line in fused.with_strength() {
///     println!("{line}");
/// }
/// ```
pub fn fuse(levels: &Levels, lines: &Lines) -> Result<Fused> {
    if levels.is_empty() {
        return Err(Error::not_found(TableKind::Levels));
    }
    if lines.is_empty() {
        return Err(Error::not_found(TableKind::Lines));
    }

    // duplicates are expected, so group rather than insist on unique keys
    let lookup: HashMap<LevelKey, Vec<&Level>> = levels
        .iter()
        .filter_map(|level| level.key().map(|key| (key, level)))
        .into_group_map();

    let fused = lines
        .iter()
        .map(|line| fuse_line(line, &lookup))
        .collect::<Vec<FusedLine>>();

    debug!(
        "fused {} lines, {} with both levels resolved, {} with S",
        fused.len(),
        fused
            .iter()
            .filter(|l| l.upper.is_resolved() && l.lower.is_resolved())
            .count(),
        fused.iter().filter(|l| l.strength.is_some()).count()
    );

    Ok(Fused {
        levels: levels.clone(),
        lines: fused,
    })
}

fn fuse_line(line: &Line, lookup: &HashMap<LevelKey, Vec<&Level>>) -> FusedLine {
    let (upper, upper_level) = resolve(&line.upper, line.upper_energy.value, lookup);
    let (lower, lower_level) = resolve(&line.lower, line.lower_energy.value, lookup);

    if upper.is_ambiguous() || lower.is_ambiguous() {
        trace!(
            "line {} matches {} upper and {} lower levels",
            line.index,
            upper.candidates.len(),
            lower.candidates.len()
        );
    }

    let upper_energy = upper_level.map(|l| l.energy);
    let lower_energy = lower_level.map(|l| l.energy);

    // resolved levels always have J identified
    let g_upper = upper_level.and_then(Level::degeneracy);
    let g_lower = lower_level.and_then(Level::degeneracy);

    let wavelength = match (upper_energy, lower_energy) {
        (Some(u), Some(l)) if u > l => Some(HC_EV_ANGSTROM / (u - l)),
        _ => None,
    };

    let strength = match (wavelength, g_lower, g_upper) {
        (Some(wl), Some(gi), Some(gk)) => line_strength(line, wl, gi, gk),
        _ => None,
    };

    FusedLine {
        line: line.clone(),
        upper,
        lower,
        upper_energy,
        lower_energy,
        g_upper,
        g_lower,
        wavelength,
        strength,
    }
}

/// Find every matching level and pick the one to use
fn resolve<'a>(
    descriptor: &Descriptor,
    reported_energy: Option<f64>,
    lookup: &HashMap<LevelKey, Vec<&'a Level>>,
) -> (Resolution, Option<&'a Level>) {
    let Some(candidates) = descriptor.key().and_then(|key| lookup.get(&key)) else {
        return (Resolution::default(), None);
    };

    let selected = match reported_energy {
        Some(energy) => candidates
            .iter()
            .min_by(|a, b| (a.energy - energy).abs().total_cmp(&(b.energy - energy).abs())),
        None => candidates.first(),
    }
    .copied();

    (
        Resolution {
            candidates: candidates.iter().map(|l| l.index).collect(),
            selected: selected.map(|l| l.index),
        },
        selected,
    )
}

/// Line strength (a.u.) from Aki, or fik if there is no Aki
///
/// Wavelength in Å. None for multipole types with no known relation.
fn line_strength(line: &Line, wavelength: f64, g_lower: u32, g_upper: u32) -> Option<f64> {
    let (power, coefficient) = line.transition_type.strength_coefficients()?;
    let (gi, gk) = (g_lower as f64, g_upper as f64);

    let aki = line
        .aki
        .or_else(|| line.fik.map(|f| A_FROM_F / wavelength.powi(2) * gi / gk * f))?;

    Some(aki * gk * wavelength.powi(power) / coefficient)
}
