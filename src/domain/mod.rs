//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - raw input rows (`RawRow`)
//! - validated sale records (`SaleRecord`)
//! - row-level rejections (`RowError`, `Rejection`)

pub mod types;

pub use types::*;
