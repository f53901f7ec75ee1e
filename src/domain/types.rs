//! Shared domain types.

use std::fmt;

use chrono::NaiveDate;
use serde::Serialize;
use thiserror::Error;

/// One row as read from the input: ordered string fields, no guaranteed length.
pub type RawRow = Vec<String>;

/// Number of leading fields a row must carry.
pub const REQUIRED_FIELDS: usize = 4;

/// A validated sale.
///
/// Only ever built by [`crate::io::parse_row`] once every field has parsed,
/// so a partially-parsed record cannot exist.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SaleRecord {
    pub product_name: String,
    pub quantity: i64,
    pub price: f64,
    pub date: NaiveDate,
}

impl SaleRecord {
    /// `quantity * price`.
    pub fn revenue(&self) -> f64 {
        self.quantity as f64 * self.price
    }
}

/// The typed fields of a sale row, in parse order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    ProductName,
    Quantity,
    Price,
    Date,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Field::ProductName => "product_name",
            Field::Quantity => "quantity",
            Field::Price => "price",
            Field::Date => "date",
        };
        f.write_str(name)
    }
}

/// Why a row was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RowError {
    #[error("insufficient fields: expected {expected}, found {found}", expected = REQUIRED_FIELDS)]
    InsufficientFields { found: usize },
    #[error("parse error: invalid {field} '{value}': {message}")]
    FieldParse {
        field: Field,
        value: String,
        message: String,
    },
    /// The CSV reader could not decode the line at all.
    #[error("malformed row: {0}")]
    Malformed(String),
}

/// A rejected row: the reason plus the original row content.
#[derive(Debug, Clone, PartialEq)]
pub struct Rejection {
    /// 1-based line in the input where the row starts.
    pub line: usize,
    pub row: RawRow,
    pub error: RowError,
}

impl Rejection {
    /// The line written to the error sink (and echoed to the console).
    pub fn log_line(&self) -> String {
        let row = format_row(&self.row);
        match &self.error {
            RowError::InsufficientFields { .. } => {
                format!("Skipped row due to insufficient data: {row}")
            }
            err => format!("Error in row {row}: {err}"),
        }
    }
}

/// Render a row the way it is echoed in logs: `["bad", "row"]`.
pub fn format_row(row: &[String]) -> String {
    format!("{row:?}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(fields: &[&str]) -> RawRow {
        fields.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn revenue_is_quantity_times_price() {
        let sale = SaleRecord {
            product_name: "Widget".to_string(),
            quantity: 3,
            price: 2.5,
            date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        };
        assert!((sale.revenue() - 7.5).abs() < 1e-12);
    }

    #[test]
    fn insufficient_fields_log_line() {
        let rejection = Rejection {
            line: 4,
            row: row(&["bad", "row"]),
            error: RowError::InsufficientFields { found: 2 },
        };
        assert_eq!(
            rejection.log_line(),
            r#"Skipped row due to insufficient data: ["bad", "row"]"#
        );
    }

    #[test]
    fn insufficient_fields_message_names_required_count() {
        let err = RowError::InsufficientFields { found: 2 };
        assert_eq!(err.to_string(), "insufficient fields: expected 4, found 2");
    }

    #[test]
    fn parse_error_log_line_carries_message() {
        let rejection = Rejection {
            line: 1,
            row: row(&["Widget", "two", "5.00", "2024-01-01"]),
            error: RowError::FieldParse {
                field: Field::Quantity,
                value: "two".to_string(),
                message: "invalid digit found in string".to_string(),
            },
        };
        assert_eq!(
            rejection.log_line(),
            r#"Error in row ["Widget", "two", "5.00", "2024-01-01"]: parse error: invalid quantity 'two': invalid digit found in string"#
        );
    }
}
