//! Reporting utilities: formatted terminal output.
//!
//! We keep formatting code in one place so the aggregation code stays clean
//! and output changes are localized.

pub mod format;

pub use format::*;

/// Printed instead of the product section when no record was accepted.
pub const NO_PRODUCT_DATA: &str = "No data to determine the top product.";
/// Printed instead of the date section when no record was accepted.
pub const NO_DATE_DATA: &str = "No data to compute sales by date.";
/// Printed instead of rendering the product chart.
pub const NO_PRODUCT_CHART: &str = "No data to plot sales per product.";
/// Printed instead of rendering the date chart.
pub const NO_DATE_CHART: &str = "No data to plot sales by date.";
