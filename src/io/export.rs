//! Export aggregate totals to CSV.
//!
//! The export is meant to be easy to consume in spreadsheets or downstream scripts:
//! one `kind,key,total` row per product and per date.

use std::path::Path;

use serde::Serialize;

use crate::aggregate::{DateTotals, ProductTotals};
use crate::error::AppError;

#[derive(Debug, Serialize)]
struct TotalRow<'a> {
    kind: &'static str,
    key: &'a str,
    total: f64,
}

/// Write both aggregate maps to a CSV file.
///
/// Products keep first-seen order, dates are ascending.
pub fn write_totals_csv(
    path: &Path,
    products: &ProductTotals,
    dates: &DateTotals,
) -> Result<(), AppError> {
    let mut writer = csv::Writer::from_path(path).map_err(|e| {
        AppError::output(format!("Failed to create export CSV '{}': {e}", path.display()))
    })?;

    for (product, total) in products.iter() {
        writer
            .serialize(TotalRow {
                kind: "product",
                key: product,
                total,
            })
            .map_err(|e| AppError::output(format!("Failed to write export CSV row: {e}")))?;
    }

    for (date, total) in dates.iter() {
        let key = date.format(crate::io::ingest::DATE_FORMAT).to_string();
        writer
            .serialize(TotalRow {
                kind: "date",
                key: &key,
                total,
            })
            .map_err(|e| AppError::output(format!("Failed to write export CSV row: {e}")))?;
    }

    writer
        .flush()
        .map_err(|e| AppError::output(format!("Failed to flush export CSV: {e}")))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn export_writes_header_and_rows_in_order() {
        let mut products = ProductTotals::default();
        products.add("Widget", 15.0);
        products.add("Gadget", 6.0);

        let mut dates = DateTotals::default();
        dates.add(NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(), 5.0);
        dates.add(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(), 16.0);

        let path = std::env::temp_dir().join(format!("sales_export_{}.csv", std::process::id()));
        write_totals_csv(&path, &products, &dates).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        let _ = std::fs::remove_file(&path);

        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines,
            vec![
                "kind,key,total",
                "product,Widget,15.0",
                "product,Gadget,6.0",
                "date,2024-01-01,16.0",
                "date,2024-01-02,5.0",
            ]
        );
    }
}
