//! The sales pipeline: read -> aggregate -> select.
//!
//! Each stage hands its output to the next as a return value. Presentation
//! (report text, charts, exports) consumes the resulting [`RunOutput`].

use chrono::NaiveDate;
use log::debug;

use crate::aggregate::{DateTotals, ProductTotals, sales_over_time, total_sales_per_product};
use crate::config::Config;
use crate::error::AppError;
use crate::io::ingest::{IngestSummary, load_sales};

/// All computed outputs of a single run.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub ingest: IngestSummary,
    pub products: ProductTotals,
    pub dates: DateTotals,
    /// `None` when `products` is empty.
    pub top_product: Option<(String, f64)>,
    /// `None` when `dates` is empty.
    pub top_date: Option<(NaiveDate, f64)>,
}

/// Read the configured input and compute every aggregate.
pub fn run(config: &Config) -> Result<RunOutput, AppError> {
    let ingest = load_sales(config)?;
    Ok(summarize(ingest))
}

/// Aggregate an ingest result and select the maxima.
///
/// The selector only runs on non-empty maps.
pub fn summarize(ingest: IngestSummary) -> RunOutput {
    let products = total_sales_per_product(&ingest.records);
    let dates = sales_over_time(&ingest.records);

    let top_product = if products.is_empty() {
        None
    } else {
        products.max().map(|(name, total)| (name.to_string(), total))
    };
    let top_date = if dates.is_empty() { None } else { dates.max() };

    debug!(
        "aggregated {} records into {} products and {} dates",
        ingest.records.len(),
        products.len(),
        dates.len()
    );

    RunOutput {
        ingest,
        products,
        dates,
        top_product,
        top_date,
    }
}
