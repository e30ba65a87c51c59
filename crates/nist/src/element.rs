//! Element symbols and ion notation

// external crates
use serde::{Deserialize, Serialize};

// asdtools modules
use asdtools_utils::{f, StringExt};

// internal modules
use crate::error::{Error, Result};
use crate::parsers::{ion_from_str, IonNotation};

/// Element symbols indexed by atomic number
///
/// There is no Z=0, so index 0 is a placeholder that never matches a real
/// symbol.
pub static ATOMIC_SYMBOLS: [&str; 119] = [
    "", // no Z=0
    // period 1
    "H", "He", //
    // period 2
    "Li", "Be", "B", "C", "N", "O", "F", "Ne", //
    // period 3
    "Na", "Mg", "Al", "Si", "P", "S", "Cl", "Ar", //
    // period 4
    "K", "Ca", "Sc", "Ti", "V", "Cr", "Mn", "Fe", "Co", "Ni", "Cu", "Zn", "Ga", "Ge", "As", "Se",
    "Br", "Kr", //
    // period 5
    "Rb", "Sr", "Y", "Zr", "Nb", "Mo", "Tc", "Ru", "Rh", "Pd", "Ag", "Cd", "In", "Sn", "Sb", "Te",
    "I", "Xe", //
    // period 6
    "Cs", "Ba", "La", "Ce", "Pr", "Nd", "Pm", "Sm", "Eu", "Gd", "Tb", "Dy", "Ho", "Er", "Tm", "Yb",
    "Lu", "Hf", "Ta", "W", "Re", "Os", "Ir", "Pt", "Au", "Hg", "Tl", "Pb", "Bi", "Po", "At", "Rn",
    // period 7
    "Fr", "Ra", "Ac", "Th", "Pa", "U", "Np", "Pu", "Am", "Cm", "Bk", "Cf", "Es", "Fm", "Md", "No",
    "Lr", "Rf", "Db", "Sg", "Bh", "Hs", "Mt", "Ds", "Rg", "Cn", "Nh", "Fl", "Mc", "Lv", "Ts", "Og",
];

/// Atomic number for an element symbol, in any case
///
/// ```rust
/// # use asdtools_nist::atomic_number;
/// assert_eq!(atomic_number("Fe"), Some(26));
/// assert_eq!(atomic_number("fe"), Some(26));
/// assert_eq!(atomic_number("Xx"), None);
/// ```
pub fn atomic_number(symbol: &str) -> Option<u8> {
    let symbol = symbol.trim().to_symbol_case();
    ATOMIC_SYMBOLS
        .iter()
        .skip(1)
        .position(|s| *s == symbol)
        .map(|i| (i + 1) as u8)
}

/// Element symbol for an atomic number
///
/// ```rust
/// # use asdtools_nist::element_symbol;
/// assert_eq!(element_symbol(26), Some("Fe"));
/// assert_eq!(element_symbol(0), None);
/// ```
pub fn element_symbol(z: u8) -> Option<&'static str> {
    match z {
        0 => None,
        _ => ATOMIC_SYMBOLS.get(z as usize).copied(),
    }
}

/// An element in a particular ionisation stage
///
/// Spectroscopists name ions by spectrum number rather than charge, so the
/// neutral atom is `Fe I`, singly ionised iron is `Fe II`, and so on. The
/// spectrum number is `Z - bound_electrons + 1`.
///
/// The `FromStr` trait accepts the three common notations:
///
/// ```rust
/// # use asdtools_nist::Ion;
/// # use std::str::FromStr;
/// let ion = Ion::new("Fe", 3).unwrap();
/// assert_eq!(Ion::from_str("Fe XXIV").unwrap(), ion);
/// assert_eq!(Ion::from_str("fe 24").unwrap(), ion);
/// assert_eq!(Ion::from_str("Fe23+").unwrap(), ion);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Ion {
    /// Element symbol e.g. 'Fe'
    pub symbol: String,
    /// Atomic number
    pub z: u8,
    /// Number of electrons remaining on the ion
    pub bound_electrons: u8,
}

impl Ion {
    /// Build an ion from an element symbol and bound electron count
    ///
    /// The symbol must be in the periodic table. The bound electron count is
    /// not checked here, see [Ion::is_physical()].
    pub fn new(element: &str, bound_electrons: u8) -> Result<Self> {
        let z = atomic_number(element).ok_or_else(|| Error::UnknownElement {
            symbol: element.to_string(),
        })?;

        Ok(Self {
            symbol: element.trim().to_symbol_case(),
            z,
            bound_electrons,
        })
    }

    /// Net charge of the ion
    pub fn charge(&self) -> i16 {
        self.z as i16 - self.bound_electrons as i16
    }

    /// Spectrum number, 1 for the neutral atom
    pub fn spectrum_number(&self) -> i16 {
        self.charge() + 1
    }

    /// Whether the ion can exist at all, i.e. `1 <= bound_electrons <= Z`
    pub fn is_physical(&self) -> bool {
        self.bound_electrons >= 1 && self.bound_electrons <= self.z
    }

    /// Spectroscopic notation used by the NIST ASD, e.g. `Fe XXIV`
    ///
    /// ```rust
    /// # use asdtools_nist::Ion;
    /// assert_eq!(Ion::new("H", 1).unwrap().spectrum_name(), "H I");
    /// assert_eq!(Ion::new("Na", 2).unwrap().spectrum_name(), "Na X");
    /// ```
    pub fn spectrum_name(&self) -> String {
        f!("{} {}", self.symbol, roman(self.spectrum_number().max(0) as u16))
    }
}

impl std::str::FromStr for Ion {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let (_, (symbol, notation)) = ion_from_str(s.trim()).map_err(|_| Error::InvalidIon {
            hint: s.to_string(),
        })?;

        let z = atomic_number(symbol).ok_or_else(|| Error::UnknownElement {
            symbol: symbol.to_string(),
        })? as i16;

        let charge = match notation {
            IonNotation::Spectrum(n) => n as i16 - 1,
            IonNotation::Charge(q) => q as i16,
        };

        if charge < 0 || charge >= z {
            return Err(Error::InvalidIon {
                hint: s.to_string(),
            });
        }

        Ion::new(symbol, (z - charge) as u8)
    }
}

impl std::fmt::Display for Ion {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.spectrum_name())
    }
}

/// Roman numerals for spectrum numbers
pub(crate) fn roman(mut n: u16) -> String {
    const NUMERALS: [(u16, &str); 13] = [
        (1000, "M"),
        (900, "CM"),
        (500, "D"),
        (400, "CD"),
        (100, "C"),
        (90, "XC"),
        (50, "L"),
        (40, "XL"),
        (10, "X"),
        (9, "IX"),
        (5, "V"),
        (4, "IV"),
        (1, "I"),
    ];

    let mut s = String::new();
    for (value, numeral) in NUMERALS {
        while n >= value {
            s.push_str(numeral);
            n -= value;
        }
    }
    s
}

/// Value of a roman numeral, None for anything malformed
pub(crate) fn from_roman(s: &str) -> Option<u16> {
    let digit = |c: char| match c {
        'I' => Some(1),
        'V' => Some(5),
        'X' => Some(10),
        'L' => Some(50),
        'C' => Some(100),
        'D' => Some(500),
        'M' => Some(1000),
        _ => None,
    };

    let values = s
        .chars()
        .map(|c| digit(c.to_ascii_uppercase()))
        .collect::<Option<Vec<u16>>>()?;

    if values.is_empty() {
        return None;
    }

    let mut total = 0;
    for (i, v) in values.iter().enumerate() {
        match values.get(i + 1) {
            Some(next) if next > v => total -= *v as i32,
            _ => total += *v as i32,
        }
    }

    // reject non-canonical forms like "IIII" or "IC"
    let total = u16::try_from(total).ok()?;
    (roman(total) == s.to_ascii_uppercase()).then_some(total)
}
