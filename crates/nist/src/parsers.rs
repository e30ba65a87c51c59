//! Set of useful parser combinators
//!
//! Everything that understands the annotation micro-syntax of the ASD tables
//! lives here, so a change in the source format only touches this module.

// internal modules
use crate::element::from_roman;
use crate::levels::Parity;
use crate::record::Annotated;

// external crates
use log::trace;

// nom parser combinators
use nom::branch::alt;
use nom::bytes::complete::tag;
use nom::character::complete::{alpha1, char, digit0, digit1, one_of, space1};
use nom::combinator::{all_consuming, eof, map, map_opt, opt, recognize};
use nom::error::{Error, ErrorKind};
use nom::multi::{many0, separated_list1};
use nom::sequence::{delimited, pair, preceded, terminated, tuple};
use nom::{self, Err, IResult};

/// The two ways of writing an ionisation stage after the element symbol
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum IonNotation {
    /// Spectrum number, roman (`XXIV`) or arabic (`24`)
    Spectrum(u16),
    /// Net charge, e.g. `23+`
    Charge(u8),
}

/// Parse an ion written as `Fe XXIV`, `Fe 24`, or `Fe23+`
pub(crate) fn ion_from_str(i: &str) -> IResult<&str, (&str, IonNotation)> {
    let (i, element) = element(i)?;
    let (i, notation) = all_consuming(alt((charge, spectrum_number, spectrum_roman)))(i)?;
    Ok((i, (element, notation)))
}

/// Get the element symbol
fn element(i: &str) -> IResult<&str, &str> {
    let (rest, element) = alpha1(i)?;

    if element.len() > 2 {
        Err(Err::Error(Error::new(i, ErrorKind::Fail)))
    } else {
        Ok((rest, element))
    }
}

/// Charge state such as `23+`, with optional separator
fn charge(i: &str) -> IResult<&str, IonNotation> {
    let (i, _) = opt(one_of("_-"))(i)?;
    map(terminated(nom::character::complete::u8, char('+')), IonNotation::Charge)(i)
}

/// Arabic spectrum number `Fe 24`
fn spectrum_number(i: &str) -> IResult<&str, IonNotation> {
    map(
        preceded(space1, nom::character::complete::u16),
        IonNotation::Spectrum,
    )(i)
}

/// Roman spectrum number `Fe XXIV`
fn spectrum_roman(i: &str) -> IResult<&str, IonNotation> {
    map(
        map_opt(preceded(space1, alpha1), from_roman),
        IonNotation::Spectrum,
    )(i)
}

/// Strip whitespace and spreadsheet-style wrapping from a raw cell
///
/// The ASD quotes cells as `="1s2.2s"` so that spreadsheets do not mangle
/// things like `1/2` into dates. Plain `"..."` quoting is also removed.
pub(crate) fn clean_cell(cell: &str) -> &str {
    let cell = cell.trim();
    let cell = cell.strip_prefix('=').unwrap_or(cell);
    let cell = match cell.strip_prefix('"').and_then(|c| c.strip_suffix('"')) {
        Some(inner) => inner,
        None => cell,
    };
    cell.trim()
}

/// Decode an annotated numeric cell
///
/// Blank cells are a valid missing value rather than an error. See
/// [annotated_number] for the grammar.
pub(crate) fn annotated(cell: &str) -> Result<Annotated, String> {
    let cell = clean_cell(cell);
    if cell.is_empty() {
        return Ok(Annotated::default());
    }

    match annotated_number(cell) {
        Ok((_, a)) => {
            trace!("decoded \"{cell}\" as {a:?}");
            Ok(a)
        }
        Err(_) => Err(format!("\"{cell}\" is not an annotated number")),
    }
}

/// Annotated number, `[48.5997]`, `1163.3(5)`, `(2.5e+08)?`, `x+12.3` etc.
///
/// - `[...]` marks a theoretical value
/// - `(...)` around the value marks a derived value, i.e. uncertain
/// - `(d)` straight after the number is the uncertainty in the last digits
/// - trailing `?`, `*`, `+x` style markers and leading `x+` are uncertain
pub(crate) fn annotated_number(i: &str) -> IResult<&str, Annotated> {
    let (i, offset) = opt(pair(one_of("xyz"), char('+')))(i)?;
    let (i, open) = opt(one_of("[("))(i)?;
    let (i, mantissa) = mantissa(i)?;
    let (i, last_digits) = opt(delimited(char('('), digit1, char(')')))(i)?;
    let (i, exponent) = opt(exponent)(i)?;
    let (i, close) = opt(one_of("])"))(i)?;
    let (i, markers) = many0(alt((
        tag("?"),
        tag("*"),
        recognize(pair(char('+'), one_of("xyz"))),
    )))(i)?;
    let (i, _) = eof(i)?;

    let number = format!("{mantissa}{}", exponent.unwrap_or(""));
    let value = number
        .parse::<f64>()
        .map_err(|_| Err::Error(Error::new(i, ErrorKind::Float)))?;

    let decimals = mantissa
        .split_once('.')
        .map(|(_, frac)| frac.len())
        .unwrap_or(0);

    // uncertainty in the last digits, scaled by any exponent
    let scale = exponent
        .and_then(|e| e[1..].parse::<i32>().ok())
        .unwrap_or(0);

    let uncertainty = match last_digits {
        Some(d) => {
            let d = d
                .parse::<f64>()
                .map_err(|_| Err::Error(Error::new(i, ErrorKind::Digit)))?;
            Some(d * 10f64.powi(scale - decimals as i32))
        }
        None => None,
    };

    Ok((
        i,
        Annotated {
            value: Some(value),
            uncertainty,
            digits: u8::try_from(decimals).ok(),
            theoretical: open == Some('[') || close == Some(']'),
            uncertain: offset.is_some()
                || open == Some('(')
                || close == Some(')')
                || !markers.is_empty(),
        },
    ))
}

/// Signed decimal mantissa, needs at least one digit
fn mantissa(i: &str) -> IResult<&str, &str> {
    recognize(pair(
        opt(one_of("+-")),
        alt((
            recognize(pair(digit1, opt(pair(char('.'), digit0)))),
            recognize(pair(char('.'), digit1)),
        )),
    ))(i)
}

/// Exponent such as `e+08`, `E-3`
fn exponent(i: &str) -> IResult<&str, &str> {
    recognize(tuple((one_of("eE"), opt(one_of("+-")), digit1)))(i)
}

/// A text label such as a configuration or term, with its markers removed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct Label {
    pub value: String,
    pub uncertain: bool,
    pub odd: bool,
}

/// Configuration cell, a trailing `?` marks it as uncertain
pub(crate) fn configuration_label(cell: &str) -> Label {
    let mut value = clean_cell(cell);
    let mut uncertain = false;

    while let Some(stripped) = value.strip_suffix('?') {
        uncertain = true;
        value = stripped.trim_end();
    }

    Label {
        value: value.to_string(),
        uncertain,
        odd: false,
    }
}

/// Term cell, `?` marks uncertain and `*` is the odd parity marker
///
/// Markers come in either order, e.g. `2P*?` or `2P?*`.
pub(crate) fn term_label(cell: &str) -> Label {
    let mut value = clean_cell(cell);
    let mut uncertain = false;
    let mut odd = false;

    loop {
        if let Some(stripped) = value.strip_suffix('?') {
            uncertain = true;
            value = stripped.trim_end();
        } else if let Some(stripped) = value.strip_suffix('*') {
            odd = true;
            value = stripped.trim_end();
        } else {
            break;
        }
    }

    Label {
        value: value.to_string(),
        uncertain,
        odd,
    }
}

/// Total angular momentum J
///
/// Written as `1/2`, `2`, etc. Blank cells, lone question marks, and lists
/// of possible values such as `1/2,3/2` are all "not identified".
pub(crate) fn j_value(cell: &str) -> Result<Option<f64>, String> {
    let cell = clean_cell(cell).trim_end_matches('?').trim();

    if cell.is_empty() || cell.contains(',') {
        return Ok(None);
    }

    match all_consuming(alt((fraction, whole)))(cell) {
        Ok((_, j)) => Ok(Some(j)),
        Err(_) => Err(format!("\"{cell}\" is not a J value")),
    }
}

/// Half-integer J as `a/b`
fn fraction(i: &str) -> IResult<&str, f64> {
    map_opt(
        tuple((
            nom::character::complete::u32,
            char('/'),
            nom::character::complete::u32,
        )),
        |(n, _, d)| (d > 0).then(|| n as f64 / d as f64),
    )(i)
}

/// Integer J
fn whole(i: &str) -> IResult<&str, f64> {
    map(nom::character::complete::u32, |n| n as f64)(i)
}

/// Parity from the electron configuration, e.g. `1s2.2p` is odd
///
/// Sum of `l` times the occupancy over every subshell. Anything fancier than
/// a plain `.` separated list of subshells (parent terms, couplings) gives
/// None.
pub(crate) fn configuration_parity(config: &str) -> Option<Parity> {
    let (_, shells) = all_consuming(separated_list1(char('.'), subshell))(config).ok()?;

    let sum: u32 = shells.iter().map(|(l, occupancy)| l * occupancy).sum();
    Some(if sum % 2 == 0 {
        Parity::Even
    } else {
        Parity::Odd
    })
}

/// Single subshell `nl^k`, returns (l, k)
fn subshell(i: &str) -> IResult<&str, (u32, u32)> {
    let (i, _) = digit1(i)?;
    let (i, l) = map_opt(one_of("spdfghiklmnoqrtuv"), orbital_l)(i)?;
    let (i, occupancy) = opt(nom::character::complete::u32)(i)?;
    Ok((i, (l, occupancy.unwrap_or(1))))
}

/// Orbital angular momentum for a spectroscopic letter
fn orbital_l(c: char) -> Option<u32> {
    "spdfghiklmnoqrtuv".find(c).map(|l| l as u32)
}
