//! `asdtools` is a small toolkit of libraries for retrieving and
//! cross-referencing atomic spectroscopy data
//!
#![doc = include_str!("../readme.md")]
#![deny(missing_docs, missing_debug_implementations)]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

// Re-exports of toolkit crates.
#[doc(inline)]
pub use asdtools_utils as utils;

#[cfg(feature = "nist")]
#[cfg_attr(docsrs, doc(cfg(feature = "nist")))]
#[doc(inline)]
pub use asdtools_nist as nist;
