//! Writing datasets to disk and reading them back
//!
//! Any of [Levels](crate::Levels), [Lines](crate::Lines), or
//! [Fused](crate::Fused) can be saved. JSON is readable, binary is compact and
//! exact.

// internal modules
use crate::error::Result;

// external crates
use serde::de::DeserializeOwned;
use serde::Serialize;

// standard library
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

/// Write a dataset to a pretty JSON file
///
/// ```rust, no_run
/// # use asdtools_nist::{get_levels, write_json};
/// let levels = get_levels("Fe", 3).unwrap();
/// write_json(&levels, "fe_xxiv_levels.json").unwrap();
/// ```
pub fn write_json<T: Serialize, P: AsRef<Path>>(data: &T, path: P) -> Result<()> {
    let f = BufWriter::new(File::create(path)?);
    Ok(serde_json::to_writer_pretty(f, data)?)
}

/// Read a dataset back from a JSON file
pub fn read_json<T: DeserializeOwned, P: AsRef<Path>>(path: P) -> Result<T> {
    let f = BufReader::new(File::open(path)?);
    Ok(serde_json::from_reader(f)?)
}

/// Write a dataset to a binary file
pub fn write_binary<T: Serialize, P: AsRef<Path>>(data: &T, path: P) -> Result<()> {
    let f = BufWriter::new(File::create(path)?);
    Ok(bincode::serialize_into(f, data)?)
}

/// Read a dataset back from a binary file
///
/// The binary file is produced by [write_binary()].
pub fn read_binary<T: DeserializeOwned, P: AsRef<Path>>(path: P) -> Result<T> {
    let f = BufReader::new(File::open(path)?);
    Ok(bincode::deserialize_from(f)?)
}
