//! Raw table rows and the records decoded from them

// external crates
use csv::StringRecord;
use log::{debug, trace};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

// asdtools modules
use asdtools_utils::f;

// internal modules
use crate::error::{Error, Result};
use crate::lines::{Descriptor, TransitionType};
use crate::parsers::{annotated, clean_cell, configuration_label, j_value, term_label};

/// Kind of table requested from the ASD
///
/// The levels and lines forms of the database have entirely different
/// layouts, so each has its own set of required columns.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TableKind {
    /// Energy levels (`energy1.pl`)
    Levels,
    /// Spectral lines (`lines1.pl`)
    Lines,
}

impl TableKind {
    /// Headers that must be present for the table to make any sense
    pub fn required_columns(&self) -> &'static [&'static str] {
        match self {
            TableKind::Levels => &["Configuration", "Term", "J", "Level (eV)"],
            TableKind::Lines => &["conf_i", "term_i", "J_i", "conf_k", "term_k", "J_k"],
        }
    }
}

impl std::fmt::Display for TableKind {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            TableKind::Levels => write!(f, "levels"),
            TableKind::Lines => write!(f, "lines"),
        }
    }
}

/// A numeric cell split into its value and annotations
///
/// The ASD decorates numbers with brackets, question marks, and
/// uncertainties in the last digits. These are decoded once, on reading, so
/// nothing downstream needs to understand the notation.
///
/// A blank cell is the default, with `value` of `None`, which is distinct
/// from a reported zero.
#[derive(Serialize, Deserialize, Debug, Default, Clone, Copy, PartialEq)]
pub struct Annotated {
    /// Numeric value, None for a blank cell
    pub value: Option<f64>,
    /// Absolute uncertainty, in the same units as the value
    pub uncertainty: Option<f64>,
    /// Number of decimal digits reported
    pub digits: Option<u8>,
    /// Computed rather than measured
    pub theoretical: bool,
    /// Questionable, derived, or relative to an unknown offset
    pub uncertain: bool,
}

impl Annotated {
    /// True for a blank cell
    pub fn is_missing(&self) -> bool {
        self.value.is_none()
    }

    /// Prefer an explicitly tabulated uncertainty over the inline one
    pub(crate) fn with_uncertainty(mut self, uncertainty: Annotated) -> Self {
        if uncertainty.value.is_some() {
            self.uncertainty = uncertainty.value;
        }
        self
    }
}

/// A single row of a levels table after decoding
#[derive(Debug, Clone, PartialEq)]
pub struct LevelRecord {
    /// Electron configuration
    pub configuration: String,
    /// Configuration was marked with `?`
    pub configuration_uncertain: bool,
    /// Term symbol without markers
    pub term: String,
    /// Term was marked with `?`
    pub term_uncertain: bool,
    /// Term carried the odd parity marker `*`
    pub odd_term: bool,
    /// Total angular momentum, None if not identified
    pub j: Option<f64>,
    /// Level energy (eV)
    pub energy: Annotated,
    /// Bibliographic reference code
    pub reference: Option<String>,
}

impl LevelRecord {
    /// The ionisation limit is listed as a pseudo-level with term "Limit"
    pub fn is_limit(&self) -> bool {
        self.term.eq_ignore_ascii_case("limit")
    }
}

/// A single row of a lines table after decoding
#[derive(Debug, Clone, PartialEq)]
pub struct LineRecord {
    /// Observed vacuum wavelength (nm)
    pub observed_wavelength: Annotated,
    /// Ritz vacuum wavelength (nm)
    pub ritz_wavelength: Annotated,
    /// Relative intensity, kept as text since it is full of flags
    pub intensity: Option<String>,
    /// Transition probability (s^-1)
    pub aki: Annotated,
    /// Absorption oscillator strength
    pub fik: Annotated,
    /// Accuracy grade of the transition probability
    pub accuracy: Option<String>,
    /// Lower level energy reported with the line (eV)
    pub lower_energy: Annotated,
    /// Upper level energy reported with the line (eV)
    pub upper_energy: Annotated,
    /// Lower level (i)
    pub lower: Descriptor,
    /// Upper level (k)
    pub upper: Descriptor,
    /// Lower level statistical weight reported with the line
    pub g_lower: Option<u32>,
    /// Upper level statistical weight reported with the line
    pub g_upper: Option<u32>,
    /// Multipole type
    pub transition_type: TransitionType,
    /// Transition probability reference
    pub tp_reference: Option<String>,
    /// Line identification reference
    pub line_reference: Option<String>,
}

/// Levels table row exactly as received
#[derive(Deserialize, Debug, Default)]
#[serde(default)]
pub struct RawLevel {
    #[serde(rename = "Configuration")]
    configuration: String,
    #[serde(rename = "Term")]
    term: String,
    #[serde(rename = "J")]
    j: String,
    #[serde(rename = "Prefix")]
    prefix: String,
    #[serde(rename = "Level (eV)")]
    level: String,
    #[serde(rename = "Suffix")]
    suffix: String,
    #[serde(rename = "Uncertainty (eV)")]
    uncertainty: String,
    #[serde(rename = "Reference")]
    reference: String,
}

/// Lines table row exactly as received
#[derive(Deserialize, Debug, Default)]
#[serde(default)]
pub struct RawLine {
    #[serde(rename = "obs_wl_vac(nm)", alias = "obs_wl_air(nm)")]
    obs_wl: String,
    unc_obs_wl: String,
    #[serde(rename = "ritz_wl_vac(nm)", alias = "ritz_wl_air(nm)")]
    ritz_wl: String,
    unc_ritz_wl: String,
    intens: String,
    #[serde(rename = "Aki(s^-1)")]
    aki: String,
    fik: String,
    #[serde(rename = "Acc")]
    acc: String,
    #[serde(rename = "Ei(eV)")]
    ei: String,
    #[serde(rename = "Ek(eV)")]
    ek: String,
    conf_i: String,
    term_i: String,
    #[serde(rename = "J_i")]
    j_i: String,
    conf_k: String,
    term_k: String,
    #[serde(rename = "J_k")]
    j_k: String,
    g_i: String,
    g_k: String,
    #[serde(rename = "Type")]
    transition_type: String,
    tp_ref: String,
    line_ref: String,
}

impl TryFrom<RawLevel> for LevelRecord {
    type Error = Error;

    fn try_from(raw: RawLevel) -> Result<Self> {
        let configuration = configuration_label(&raw.configuration);
        let term = term_label(&raw.term);

        // the brackets for theoretical values sit in their own columns
        let level = f!(
            "{}{}{}",
            clean_cell(&raw.prefix),
            clean_cell(&raw.level),
            clean_cell(&raw.suffix)
        );
        let energy = annotated(&level)
            .and_then(|e| Ok(e.with_uncertainty(annotated(&raw.uncertainty)?)))
            .map_err(|e| Error::ParseError(f!("level energy, {e}")))?;

        Ok(Self {
            configuration: configuration.value,
            configuration_uncertain: configuration.uncertain,
            term: term.value,
            term_uncertain: term.uncertain,
            odd_term: term.odd,
            j: j_value(&raw.j).map_err(|e| Error::ParseError(f!("level J, {e}")))?,
            energy,
            reference: text(&raw.reference),
        })
    }
}

impl TryFrom<RawLine> for LineRecord {
    type Error = Error;

    fn try_from(raw: RawLine) -> Result<Self> {
        let number = |name: &str, cell: &str| {
            annotated(cell).map_err(|e| Error::ParseError(f!("line {name}, {e}")))
        };

        Ok(Self {
            observed_wavelength: number("obs_wl", &raw.obs_wl)?
                .with_uncertainty(number("unc_obs_wl", &raw.unc_obs_wl)?),
            ritz_wavelength: number("ritz_wl", &raw.ritz_wl)?
                .with_uncertainty(number("unc_ritz_wl", &raw.unc_ritz_wl)?),
            intensity: text(&raw.intens),
            aki: number("Aki", &raw.aki)?,
            fik: number("fik", &raw.fik)?,
            accuracy: text(&raw.acc),
            lower_energy: number("Ei", &raw.ei)?,
            upper_energy: number("Ek", &raw.ek)?,
            lower: descriptor(&raw.conf_i, &raw.term_i, &raw.j_i)?,
            upper: descriptor(&raw.conf_k, &raw.term_k, &raw.j_k)?,
            g_lower: weight(&raw.g_i)?,
            g_upper: weight(&raw.g_k)?,
            transition_type: TransitionType::from_cell(clean_cell(&raw.transition_type)),
            tp_reference: text(&raw.tp_ref),
            line_reference: text(&raw.line_ref),
        })
    }
}

/// Optional free text, None when blank
fn text(cell: &str) -> Option<String> {
    let cell = clean_cell(cell);
    (!cell.is_empty()).then(|| cell.to_string())
}

/// Statistical weight g
fn weight(cell: &str) -> Result<Option<u32>> {
    let cell = clean_cell(cell);
    if cell.is_empty() {
        return Ok(None);
    }
    cell.parse::<u32>()
        .map(Some)
        .map_err(|_| Error::ParseError(f!("\"{cell}\" is not a statistical weight")))
}

/// Level descriptor from a line's (configuration, term, J) triple
fn descriptor(conf: &str, term: &str, j: &str) -> Result<Descriptor> {
    let configuration = configuration_label(conf);
    let term = term_label(term);
    Ok(Descriptor {
        configuration: configuration.value,
        configuration_uncertain: configuration.uncertain,
        term: term.value,
        term_uncertain: term.uncertain,
        j: j_value(j).map_err(|e| Error::ParseError(f!("line J, {e}")))?,
    })
}

/// Reader for the tab-delimited tables
fn tsv_reader(text: &str) -> csv::Reader<&[u8]> {
    csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .quoting(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes())
}

/// Messages shown by the ASD in place of a table for a valid query with no
/// data, lowercase
const NO_DATA_MESSAGES: [&str; 3] = [
    "no lines are available",
    "no levels are available",
    "no data available",
];

/// Anything that is not a table comes back as an HTML page
fn is_html(text: &str) -> bool {
    text.trim_start().starts_with('<')
}

/// The page the ASD answers with when there is simply nothing to list
fn is_no_data_page(text: &str) -> bool {
    let text = text.to_lowercase();
    NO_DATA_MESSAGES.iter().any(|m| text.contains(m))
}

/// Short excerpt of a page for error messages
fn excerpt(text: &str) -> String {
    let text = text.split_whitespace().collect::<Vec<_>>().join(" ");
    match text.char_indices().nth(120) {
        Some((i, _)) => f!("{}...", &text[..i]),
        None => text,
    }
}

/// Deserialise every data row of a table, checking it against the schema
///
/// Blank rows are skipped. Rows that do not have one cell per header, or
/// cells that fail to decode, are a [Error::ParseError]. An empty response or
/// the "no data" page is zero rows, any other HTML page is an error.
pub(crate) fn read_table<R, T>(text: &str, kind: TableKind) -> Result<Vec<T>>
where
    R: DeserializeOwned,
    T: TryFrom<R, Error = Error>,
{
    if text.trim().is_empty() {
        debug!("empty response for {kind}, treating as zero rows");
        return Ok(Vec::new());
    }

    if is_html(text) {
        if is_no_data_page(text) {
            debug!("no {kind} available, treating as zero rows");
            return Ok(Vec::new());
        }
        return Err(Error::ParseError(f!(
            "expected a {kind} table, got an HTML page \"{}\"",
            excerpt(text)
        )));
    }

    let mut reader = tsv_reader(text);

    // headers are quoted the same way as cells, field names are not
    let headers = reader
        .headers()?
        .iter()
        .map(clean_cell)
        .collect::<StringRecord>();
    check_headers(&headers, kind)?;

    let mut records = Vec::new();
    for (n, row) in reader.records().enumerate() {
        let row = row?;
        // header is line 1
        let line = n + 2;

        if row.iter().all(|cell| clean_cell(cell).is_empty()) {
            trace!("skipping blank {kind} row on line {line}");
            continue;
        }

        if row.len() != headers.len() {
            return Err(Error::ParseError(f!(
                "{kind} row on line {line} has {} cells, expected {}",
                row.len(),
                headers.len()
            )));
        }

        let raw: R = row
            .deserialize(Some(&headers))
            .map_err(|e| Error::ParseError(f!("{kind} row on line {line}, {e}")))?;

        let record = T::try_from(raw)
            .map_err(|e| Error::ParseError(f!("{kind} row on line {line}, {e}")))?;
        records.push(record);
    }

    debug!("read {} {kind} rows", records.len());
    Ok(records)
}

/// Make sure every column the schema needs is present
fn check_headers(headers: &StringRecord, kind: TableKind) -> Result<()> {
    let missing = kind
        .required_columns()
        .iter()
        .filter(|required| !headers.iter().any(|h| h == **required))
        .collect::<Vec<_>>();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(Error::ParseError(f!(
            "{kind} table is missing columns {missing:?}"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LEVELS: &str = "Configuration\tTerm\tJ\tPrefix\tLevel (eV)\tSuffix\tUncertainty (eV)\tReference\n\
        =\"1s2.2s\"\t=\"2S\"\t=\"1/2\"\t=\"\"\t=\"0.0000\"\t=\"\"\t=\"\"\t=\"L7185\"\n\
        \t\t\t\t\t\t\t\n\
        =\"1s2.2p\"\t=\"2P*\"\t=\"1/2\"\t=\"[\"\t=\"48.5997\"\t=\"]\"\t=\"0.0012\"\t=\"L7185\"\n";

    #[test]
    fn read_levels_table() {
        let records: Vec<LevelRecord> = read_table::<RawLevel, _>(LEVELS, TableKind::Levels).unwrap();
        assert_eq!(records.len(), 2);

        let ground = &records[0];
        assert_eq!(ground.configuration, "1s2.2s");
        assert_eq!(ground.energy.value, Some(0.0));
        assert_eq!(ground.reference.as_deref(), Some("L7185"));

        let excited = &records[1];
        assert_eq!(excited.term, "2P");
        assert!(excited.odd_term);
        assert_eq!(excited.j, Some(0.5));
        assert!(excited.energy.theoretical);
        assert_eq!(excited.energy.uncertainty, Some(0.0012));
        assert_eq!(excited.energy.digits, Some(4));
    }

    #[test]
    fn ragged_row_is_parse_error() {
        let text = "Configuration\tTerm\tJ\tLevel (eV)\n1s2.2s\t2S\t1/2\n";
        let result = read_table::<RawLevel, LevelRecord>(text, TableKind::Levels);
        assert!(matches!(result, Err(Error::ParseError(_))));
    }

    #[test]
    fn bad_cell_is_parse_error() {
        let text = "Configuration\tTerm\tJ\tLevel (eV)\n1s2.2s\t2S\t1/2\tground\n";
        let result = read_table::<RawLevel, LevelRecord>(text, TableKind::Levels);
        assert!(matches!(result, Err(Error::ParseError(_))));
    }

    #[test]
    fn missing_column_is_parse_error() {
        let text = "Configuration\tTerm\tLevel (eV)\n1s2.2s\t2S\t0.0\n";
        let result = read_table::<RawLevel, LevelRecord>(text, TableKind::Levels);
        assert!(matches!(result, Err(Error::ParseError(_))));
    }

    #[test]
    fn no_data_page_is_zero_rows() {
        let text = "<html><body><p><font color=\"red\">No lines are available in ASD \
                    with the parameters selected</font></p></body></html>";
        let records = read_table::<RawLine, LineRecord>(text, TableKind::Lines).unwrap();
        assert!(records.is_empty());

        let records = read_table::<RawLevel, LevelRecord>("\n\n", TableKind::Levels).unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn error_page_is_parse_error() {
        let text = "<html><body><p>Error: Unrecognized token.</p></body></html>";
        let result = read_table::<RawLevel, LevelRecord>(text, TableKind::Levels);
        match result {
            Err(Error::ParseError(msg)) => assert!(msg.contains("Unrecognized token.")),
            other => panic!("expected a parse error, got {other:?}"),
        }
    }

    #[test]
    fn quoted_headers_are_matched() {
        let text = "\"Configuration\"\t\"Term\"\t\"J\"\t=\"Level (eV)\"\t\"Reference\"\n\
                    1s2.2s\t2S\t1/2\t0.0000\tL7185\n\
                    1s2.2p\t2P*\t3/2\t64.5977\tL7185\n";
        let records = read_table::<RawLevel, LevelRecord>(text, TableKind::Levels).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].configuration, "1s2.2p");
        assert_eq!(records[1].j, Some(1.5));
        assert_eq!(records[1].energy.value, Some(64.5977));
        assert_eq!(records[1].reference.as_deref(), Some("L7185"));

        let text = "\"Aki(s^-1)\"\t\"conf_i\"\t\"term_i\"\t\"J_i\"\t\"conf_k\"\t\"term_k\"\t\"J_k\"\n\
                    7.06e+09\t1s2.2s\t2S\t1/2\t1s2.2p\t2P*\t3/2\n";
        let records = read_table::<RawLine, LineRecord>(text, TableKind::Lines).unwrap();
        assert_eq!(records[0].aki.value, Some(7.06e9));
        assert_eq!(records[0].upper.configuration, "1s2.2p");
    }

    #[test]
    fn limit_row_detected() {
        let text = "Configuration\tTerm\tJ\tLevel (eV)\nFe XXV (1s2 1S<0>)\tLimit\t\t2045.759\n";
        let records = read_table::<RawLevel, LevelRecord>(text, TableKind::Levels).unwrap();
        assert!(records[0].is_limit());
        assert_eq!(records[0].j, None);
    }
}
