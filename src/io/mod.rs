//! Input/output helpers.
//!
//! - CSV ingest + row validation (`ingest`)
//! - aggregate exports (CSV) (`export`)

pub mod export;
pub mod ingest;

pub use export::*;
pub use ingest::*;
