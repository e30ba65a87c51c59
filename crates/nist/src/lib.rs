//! Query atomic spectra data directly from the NIST ASD
//!
//! This crate is intended to make using energy levels and spectral lines from
//! the NIST Atomic Spectra Database slightly less painful.
//!
//! Data for an ion are made available by either:
//! - Fetching directly from the database if an internet connection is
//!   available
//! - Loading raw tables saved from an earlier fetch
//!
//! See <https://physics.nist.gov/PhysRefData/ASD/levels_form.html> and
//! <https://physics.nist.gov/PhysRefData/ASD/lines_form.html> for further
//! information.
//!
//! ## Implementation
//!
//! Ions are given by element symbol and the number of electrons still bound,
//! so `("Fe", 3)` is lithium-like iron, `Fe XXIV`.
//!
//! Every levels request gives a [Levels] table of [Level]s, and every lines
//! request a [Lines] table of [Line]s. The annotations the database puts on
//! its numbers (brackets for theoretical values, question marks, uncertainty
//! in the last digits) are decoded into plain values and flags on reading.
//!
//! The two tables are then cross-referenced with [fuse()], which resolves the
//! upper and lower level of every line and computes the line strength.
//!
//! ```rust, no_run
//! # use asdtools_nist::{fuse, get_levels, get_lines, Fused};
//! // Get levels and lines for lithium-like iron
//! let levels = get_levels("Fe", 3).unwrap();
//! let lines = get_lines("Fe", 3).unwrap();
//!
//! // Attach level data to every line
//! let fused: Fused = fuse(&levels, &lines).unwrap();
//!
//! // Print a summary of the strongest line
//! let strongest = fused
//!     .with_strength()
//!     .max_by(|a, b| a.strength.unwrap().total_cmp(&b.strength.unwrap()))
//!     .unwrap();
//!
//! println!("{strongest}");
//! ```
//!
//! which gives something like
//!
//! ```text
//! Line 12
//!   Upper          1s2.2p 2P J=1.5
//!   Lower          1s2.2s 2S J=0.5
//!   Wavelength     19.2029 nm
//!   Aki            7.060e+10 s^-1
//!   fik            7.810e-02
//!   Type           E1
//!   Levels         2 -> 0
//!   Energies       64.5977 -> 0 eV
//!   S              5.418e-02 a.u.
//! ```
//!
//! ## Missing data
//!
//! A perfectly valid query may have no data, for example `("F", 1)`. This is
//! always [Error::DataNotFound], which is distinct from any transport or
//! parsing failure. Use [Error::is_not_found()] to tell them apart.

// Modules
mod config;
mod element;
mod error;
mod export;
mod fetch;
mod fusion;
mod levels;
mod lines;
mod load;
mod parsers;
mod record;

// Re-exports of anything important with in-lined documentation for simplicity
#[doc(inline)]
pub use config::Config;

#[doc(inline)]
pub use element::{atomic_number, element_symbol, Ion, ATOMIC_SYMBOLS};

#[doc(inline)]
pub use error::{Error, Result};

#[doc(inline)]
pub use export::{read_binary, read_json, write_binary, write_json};

#[doc(inline)]
pub use fetch::{
    fetch_levels, fetch_lines, fetch_raw, get_level_url, get_levels, get_levels_for,
    get_line_url, get_lines, get_lines_for,
};

#[doc(inline)]
pub use fusion::{fuse, Fused, FusedLine, Resolution, HC_EV_ANGSTROM};

#[doc(inline)]
pub use levels::{parse_levels, Level, Levels, Parity, J_NOT_IDENTIFIED};

#[doc(inline)]
pub use lines::{parse_lines, Descriptor, Line, Lines, TransitionType};

#[doc(inline)]
pub use load::{load_levels, load_lines};

#[doc(inline)]
pub use record::{Annotated, LevelRecord, LineRecord, TableKind};
