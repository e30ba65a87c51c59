//! Result and Error types for the NIST data module

use crate::record::TableKind;

/// Type alias for `Result<T, nist::Error>`
pub type Result<T> = core::result::Result<T, Error>;

#[derive(thiserror::Error, Debug)]
/// The error type for `asdtools-nist`
pub enum Error {
    /// Underlying file I/O error
    #[error("failure in file I/O")]
    Io(#[from] std::io::Error),

    /// Failure during GET request to the NIST ASD
    #[error("request to NIST ASD failed")]
    FailedRequest(#[from] minreq::Error),

    /// The NIST ASD answered, but not with a success status
    #[error("NIST ASD responded with status {code} ({reason})")]
    HttpStatus { code: i32, reason: String },

    /// Failure to (de)serialise a JSON string
    #[error("failed serde JSON operation")]
    Json(#[from] serde_json::Error),

    /// Failure reading the tab-delimited tables
    #[error("failed CSV operation")]
    Csv(#[from] csv::Error),

    /// Failure to serialize/deserialize a byte stream
    #[error("failed binary (de)serialization")]
    FailedBinaryOp(#[from] Box<bincode::ErrorKind>),

    /// A fetched table does not match the expected layout
    #[error("parser failed: {0}")]
    ParseError(String),

    /// The query was valid but the database holds nothing for it
    #[error("no {kind} data found for \"{spectrum}\"")]
    DataNotFound { spectrum: String, kind: TableKind },

    /// Symbol is not in the periodic table
    #[error("unknown element \"{symbol}\"")]
    UnknownElement { symbol: String },

    /// Ion notation that could not be understood
    #[error("could not interpret \"{hint}\" as an ion")]
    InvalidIon { hint: String },

    /// A levels table citing more than one reference
    #[error("expected a single reference, found {references:?}")]
    InconsistentReference { references: Vec<String> },
}

impl Error {
    /// True for the "valid query, but no physical data" case
    ///
    /// Everything else is either a transport fault or an upstream format
    /// change, and should be treated as a bug.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::DataNotFound { .. })
    }

    /// No data, for tables built without knowing which ion they describe
    pub(crate) fn not_found(kind: TableKind) -> Self {
        Error::DataNotFound {
            spectrum: "unnamed spectrum".to_string(),
            kind,
        }
    }

    /// Attach the spectrum name to a [Error::DataNotFound], if that is what
    /// this is
    pub(crate) fn for_spectrum(self, spectrum: &str) -> Self {
        match self {
            Error::DataNotFound { kind, .. } => Error::DataNotFound {
                spectrum: spectrum.to_string(),
                kind,
            },
            other => other,
        }
    }
}
