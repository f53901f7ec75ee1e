//! Console report for a pipeline run.

use crate::app::pipeline::RunOutput;
use crate::report::{NO_DATE_DATA, NO_PRODUCT_DATA};

/// Totals print at full precision; whole numbers keep one decimal (`15.0`).
fn fmt_total(v: f64) -> String {
    if v.is_finite() && v.fract() == 0.0 && v.abs() < 1e16 {
        format!("{v:.1}")
    } else {
        format!("{v}")
    }
}

/// Format the full run report: row counts, per-product and per-date totals,
/// and the maxima.
///
/// An empty map is replaced by an explicit "no data" line. The selector
/// produces a maximum exactly when its map is non-empty.
pub fn format_report(run: &RunOutput) -> String {
    let mut out = String::new();

    out.push_str("=== Sales report ===\n");
    out.push_str(&format!(
        "Rows: read={} | accepted={} | rejected={}\n",
        run.ingest.rows_read,
        run.ingest.records.len(),
        run.ingest.rejected
    ));

    out.push('\n');
    match &run.top_product {
        Some((product, total)) => {
            out.push_str("Total sales per product:\n");
            for (name, value) in run.products.iter() {
                out.push_str(&format!("{name}: {}\n", fmt_total(value)));
            }
            out.push_str(&format!(
                "\nProduct with the highest revenue: {product} ({})\n",
                fmt_total(*total)
            ));
        }
        None => {
            out.push_str(NO_PRODUCT_DATA);
            out.push('\n');
        }
    }

    out.push('\n');
    match &run.top_date {
        Some((date, total)) => {
            out.push_str("Total sales by date:\n");
            for (day, value) in run.dates.iter() {
                out.push_str(&format!("{}: {}\n", day.format("%Y-%m-%d"), fmt_total(value)));
            }
            out.push_str(&format!(
                "Date with the highest sales: {} ({})\n",
                date.format("%Y-%m-%d"),
                fmt_total(*total)
            ));
        }
        None => {
            out.push_str(NO_DATE_DATA);
            out.push('\n');
        }
    }

    out
}
