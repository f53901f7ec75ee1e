//! CSV ingest and row validation.
//!
//! This module turns a headerless `product_name, quantity, price, date` file
//! into a list of [`SaleRecord`]s.
//!
//! Design goals:
//! - **Row-level validation** (skip bad rows, but report every one of them)
//! - **Input order** is preserved for both accepted records and rejections
//! - **File-level failures are fatal**: an unreadable input aborts the run
//! - **Blank lines** are rows too: they are rejected, not silently dropped
//! - **Separation of concerns**: no aggregation logic here

use std::collections::VecDeque;
use std::fs::File;
use std::io::{BufWriter, Write};

use chrono::NaiveDate;
use csv::StringRecord;
use log::{info, warn};

use crate::config::Config;
use crate::domain::{Field, REQUIRED_FIELDS, RawRow, Rejection, RowError, SaleRecord};
use crate::error::AppError;

/// Date format accepted for the `date` column.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Ingest output: accepted records in input order plus row counts.
#[derive(Debug, Clone, Default)]
pub struct IngestSummary {
    pub records: Vec<SaleRecord>,
    pub rows_read: usize,
    pub rejected: usize,
}

/// One input row tagged with the line it starts on.
///
/// `Err` marks a line the reader could not decode (e.g. invalid UTF-8).
#[derive(Debug, Clone, PartialEq)]
pub struct SourceRow {
    pub line: usize,
    pub fields: Result<RawRow, RowError>,
}

/// Number in-memory rows `1, 2, 3, ...` as if each sat on its own line.
pub fn number_rows<I>(rows: I) -> impl Iterator<Item = SourceRow>
where
    I: IntoIterator<Item = Result<RawRow, RowError>>,
{
    rows.into_iter()
        .enumerate()
        .map(|(idx, fields)| SourceRow { line: idx + 1, fields })
}

/// Destination for rejected rows.
///
/// Rejections are forwarded as they occur, in input order.
pub trait RejectionSink {
    fn reject(&mut self, rejection: Rejection) -> Result<(), AppError>;
}

/// Collects rejections in memory.
impl RejectionSink for Vec<Rejection> {
    fn reject(&mut self, rejection: Rejection) -> Result<(), AppError> {
        self.push(rejection);
        Ok(())
    }
}

/// Writes one line per rejection to `out` and echoes it to stdout.
pub struct FileRejectionSink<W: Write> {
    out: W,
}

impl<W: Write> FileRejectionSink<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Flush and hand back the writer.
    pub fn finish(mut self) -> Result<W, AppError> {
        self.out
            .flush()
            .map_err(|e| AppError::io(format!("Failed to flush error log: {e}")))?;
        Ok(self.out)
    }
}

impl<W: Write> RejectionSink for FileRejectionSink<W> {
    fn reject(&mut self, rejection: Rejection) -> Result<(), AppError> {
        let line = rejection.log_line();
        writeln!(self.out, "{line}")
            .map_err(|e| AppError::io(format!("Failed to write error log: {e}")))?;
        println!("{line}");
        warn!("rejected line {}: {}", rejection.line, rejection.error);
        Ok(())
    }
}

/// Rows of a headerless CSV held in memory, including blank lines.
///
/// The `csv` reader skips empty lines; here each one comes back as an empty
/// row so it is rejected like any other short row. Every row carries the
/// 1-based line its content starts on.
pub struct CsvRows<'a> {
    input: &'a [u8],
    reader: csv::Reader<&'a [u8]>,
    record: StringRecord,
    queued: VecDeque<SourceRow>,
    /// Newlines counted in `input[..counted]`, plus one.
    line: usize,
    counted: usize,
    done: bool,
}

impl<'a> CsvRows<'a> {
    pub fn new(input: &'a [u8]) -> Self {
        let reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(input);
        Self {
            input,
            reader,
            record: StringRecord::new(),
            queued: VecDeque::new(),
            line: 1,
            counted: 0,
            done: false,
        }
    }

    fn line_at(&mut self, byte: usize) -> usize {
        let byte = byte.min(self.input.len());
        if byte > self.counted {
            self.line += self.input[self.counted..byte]
                .iter()
                .filter(|&&b| b == b'\n')
                .count();
            self.counted = byte;
        }
        self.line
    }

    /// Queue an empty row for every blank line at the front of
    /// `input[from..to]` and return the line the next content starts on.
    fn queue_blank_lines(&mut self, from: usize, to: usize, mut line: usize) -> usize {
        let to = to.min(self.input.len());
        for i in from..to {
            match self.input[i] {
                // Tail of the previous record's `\r\n` terminator.
                b'\n' if i == from && i > 0 && self.input[i - 1] == b'\r' => line += 1,
                b'\n' => {
                    self.queued.push_back(SourceRow {
                        line,
                        fields: Ok(RawRow::new()),
                    });
                    line += 1;
                }
                b'\r' => {}
                _ => break,
            }
        }
        line
    }
}

impl Iterator for CsvRows<'_> {
    type Item = SourceRow;

    fn next(&mut self) -> Option<SourceRow> {
        loop {
            if let Some(row) = self.queued.pop_front() {
                return Some(row);
            }
            if self.done {
                return None;
            }

            let start = self.reader.position().byte() as usize;
            let start_line = self.line_at(start);
            let result = self.reader.read_record(&mut self.record);
            let end = self.reader.position().byte() as usize;
            let line = self.queue_blank_lines(start, end, start_line);

            match result {
                Ok(true) => {
                    let fields = self.record.iter().map(str::to_string).collect();
                    self.queued.push_back(SourceRow {
                        line,
                        fields: Ok(fields),
                    });
                }
                Ok(false) => self.done = true,
                Err(e) => {
                    self.queued.push_back(SourceRow {
                        line,
                        fields: Err(RowError::Malformed(format!("CSV parse error: {e}"))),
                    });
                    // A reader that cannot move forward would loop forever.
                    if end <= start {
                        self.done = true;
                    }
                }
            }
        }
    }
}

/// Read the configured input file, writing rejections to the configured error log.
///
/// The input is read in full up front, so any I/O failure on it is fatal
/// before a single row is processed. The error log is only held open for the
/// duration of this call.
pub fn load_sales(config: &Config) -> Result<IngestSummary, AppError> {
    let input = std::fs::read(&config.input_path).map_err(|e| {
        AppError::io(format!(
            "Failed to read CSV '{}': {e}",
            config.input_path.display()
        ))
    })?;
    let errors = File::create(&config.error_log_path).map_err(|e| {
        AppError::io(format!(
            "Failed to create error log '{}': {e}",
            config.error_log_path.display()
        ))
    })?;

    let mut sink = FileRejectionSink::new(BufWriter::new(errors));
    let summary = ingest_rows(CsvRows::new(&input), &mut sink)?;
    sink.finish()?;

    info!(
        "read {} rows from '{}': {} accepted, {} rejected",
        summary.rows_read,
        config.input_path.display(),
        summary.records.len(),
        summary.rejected
    );

    Ok(summary)
}

/// Run the parser over every row, keeping valid records and forwarding rejections.
///
/// Every row is processed; a bad row never stops the loop. An empty result is
/// a valid outcome.
pub fn ingest_rows<I, S>(rows: I, sink: &mut S) -> Result<IngestSummary, AppError>
where
    I: IntoIterator<Item = SourceRow>,
    S: RejectionSink + ?Sized,
{
    let mut summary = IngestSummary::default();

    for SourceRow { line, fields } in rows {
        summary.rows_read += 1;

        let (row, error) = match fields {
            Ok(row) => match parse_row(&row) {
                Ok(record) => {
                    summary.records.push(record);
                    continue;
                }
                Err(error) => (row, error),
            },
            Err(error) => (RawRow::new(), error),
        };

        summary.rejected += 1;
        sink.reject(Rejection { line, row, error })?;
    }

    Ok(summary)
}

/// Parse one raw row into a [`SaleRecord`].
///
/// Rows with fewer than four fields are rejected before any numeric parsing.
/// Fields beyond the fourth are ignored. Quantity, price and date are parsed
/// in that order and the first failure is reported.
pub fn parse_row(row: &[String]) -> Result<SaleRecord, RowError> {
    if row.len() < REQUIRED_FIELDS {
        return Err(RowError::InsufficientFields { found: row.len() });
    }

    let product_name = row[0].trim();
    let quantity = parse_quantity(row[1].trim())?;
    let price = parse_price(row[2].trim())?;
    let date = parse_date(row[3].trim())?;

    if product_name.is_empty() {
        return Err(field_error(Field::ProductName, product_name, "must not be empty"));
    }

    Ok(SaleRecord {
        product_name: product_name.to_string(),
        quantity,
        price,
        date,
    })
}

fn parse_quantity(s: &str) -> Result<i64, RowError> {
    s.parse::<i64>()
        .map_err(|e| field_error(Field::Quantity, s, e))
}

fn parse_price(s: &str) -> Result<f64, RowError> {
    let v = s.parse::<f64>().map_err(|e| field_error(Field::Price, s, e))?;
    if v.is_finite() {
        Ok(v)
    } else {
        Err(field_error(Field::Price, s, "not a finite number"))
    }
}

fn parse_date(s: &str) -> Result<NaiveDate, RowError> {
    NaiveDate::parse_from_str(s, DATE_FORMAT)
        .map_err(|e| field_error(Field::Date, s, format!("{e} (expected YYYY-MM-DD)")))
}

fn field_error(field: Field, value: &str, message: impl ToString) -> RowError {
    RowError::FieldParse {
        field,
        value: value.to_string(),
        message: message.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(fields: &[&str]) -> RawRow {
        fields.iter().map(|s| s.to_string()).collect()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn parses_and_trims_well_formed_row() {
        let record = parse_row(&row(&["  Widget ", " 2", "5.00 ", " 2024-01-01 "])).unwrap();
        assert_eq!(record.product_name, "Widget");
        assert_eq!(record.quantity, 2);
        assert!((record.price - 5.0).abs() < 1e-12);
        assert_eq!(record.date, date(2024, 1, 1));
    }

    #[test]
    fn extra_fields_are_ignored() {
        let record = parse_row(&row(&["Gadget", "3", "2.00", "2024-01-01", "note", "x"])).unwrap();
        assert_eq!(record.product_name, "Gadget");
        assert_eq!(record.quantity, 3);
    }

    #[test]
    fn short_row_is_insufficient_even_when_fields_are_garbage() {
        let err = parse_row(&row(&["bad", "row"])).unwrap_err();
        assert_eq!(err, RowError::InsufficientFields { found: 2 });

        let err = parse_row(&row(&["x", "not-a-number", "nan?"])).unwrap_err();
        assert_eq!(err, RowError::InsufficientFields { found: 3 });

        let err = parse_row(&[]).unwrap_err();
        assert_eq!(err, RowError::InsufficientFields { found: 0 });
    }

    #[test]
    fn first_failing_field_is_reported() {
        let err = parse_row(&row(&["Widget", "two", "abc", "yesterday"])).unwrap_err();
        match err {
            RowError::FieldParse { field, value, .. } => {
                assert_eq!(field, Field::Quantity);
                assert_eq!(value, "two");
            }
            other => panic!("unexpected error: {other:?}"),
        }

        let err = parse_row(&row(&["Widget", "2", "abc", "yesterday"])).unwrap_err();
        assert!(matches!(err, RowError::FieldParse { field: Field::Price, .. }));

        let err = parse_row(&row(&["Widget", "2", "1.5", "01/02/2024"])).unwrap_err();
        assert!(matches!(err, RowError::FieldParse { field: Field::Date, .. }));
    }

    #[test]
    fn fractional_quantity_is_rejected() {
        let err = parse_row(&row(&["Widget", "1.5", "2.0", "2024-01-01"])).unwrap_err();
        assert!(matches!(err, RowError::FieldParse { field: Field::Quantity, .. }));
    }

    #[test]
    fn non_finite_price_is_rejected() {
        let err = parse_row(&row(&["Widget", "1", "inf", "2024-01-01"])).unwrap_err();
        assert!(matches!(err, RowError::FieldParse { field: Field::Price, .. }));
    }

    #[test]
    fn empty_product_name_is_rejected() {
        let err = parse_row(&row(&["   ", "1", "2.0", "2024-01-01"])).unwrap_err();
        assert!(matches!(err, RowError::FieldParse { field: Field::ProductName, .. }));
    }

    #[test]
    fn parse_error_message_mentions_underlying_cause() {
        let err = parse_row(&row(&["Widget", "1", "2.0", "2024-13-01"])).unwrap_err();
        let text = err.to_string();
        assert!(text.starts_with("parse error: invalid date '2024-13-01'"), "{text}");
    }

    #[test]
    fn ingest_continues_after_rejections_and_keeps_order() {
        let rows = vec![
            Ok(row(&["Widget", "2", "5.00", "2024-01-01"])),
            Ok(row(&["bad", "row"])),
            Ok(row(&["Widget", "x", "5.00", "2024-01-02"])),
            Err(RowError::Malformed("CSV parse error: invalid utf-8".to_string())),
            Ok(row(&["Gadget", "3", "2.00", "2024-01-01"])),
        ];

        let mut rejections: Vec<Rejection> = Vec::new();
        let summary = ingest_rows(number_rows(rows), &mut rejections).unwrap();

        assert_eq!(summary.rows_read, 5);
        assert_eq!(summary.rejected, 3);
        let names: Vec<&str> = summary.records.iter().map(|r| r.product_name.as_str()).collect();
        assert_eq!(names, vec!["Widget", "Gadget"]);

        let numbers: Vec<usize> = rejections.iter().map(|r| r.line).collect();
        assert_eq!(numbers, vec![2, 3, 4]);
        assert_eq!(rejections[0].error, RowError::InsufficientFields { found: 2 });
        assert_eq!(rejections[0].row, row(&["bad", "row"]));
        assert!(rejections[2].row.is_empty());
    }

    #[test]
    fn ingest_of_only_bad_rows_is_empty_not_an_error() {
        let rows = vec![Ok(row(&["a"])), Ok(row(&["b", "c", "d", "e"]))];
        let mut rejections: Vec<Rejection> = Vec::new();
        let summary = ingest_rows(number_rows(rows), &mut rejections).unwrap();
        assert!(summary.records.is_empty());
        assert_eq!(summary.rejected, 2);
    }

    fn read_csv(input: &str) -> Vec<SourceRow> {
        CsvRows::new(input.as_bytes()).collect()
    }

    fn fields(rows: &[SourceRow]) -> Vec<(usize, usize)> {
        rows.iter()
            .map(|r| (r.line, r.fields.as_ref().map(Vec::len).unwrap_or(usize::MAX)))
            .collect()
    }

    #[test]
    fn csv_rows_keep_blank_lines_as_empty_rows() {
        let rows = read_csv("Widget,2,5.00,2024-01-01\n\nGadget,3,2.00,2024-01-01\n");
        assert_eq!(fields(&rows), vec![(1, 4), (2, 0), (3, 4)]);
        assert_eq!(rows[1].fields, Ok(RawRow::new()));
    }

    #[test]
    fn csv_rows_report_leading_and_trailing_blank_lines() {
        let rows = read_csv("\nA,1\n\n\n");
        assert_eq!(fields(&rows), vec![(1, 0), (2, 2), (3, 0), (4, 0)]);

        assert!(read_csv("").is_empty());
        assert_eq!(fields(&read_csv("A,1")), vec![(1, 2)]);
    }

    #[test]
    fn csv_rows_handle_crlf_terminators() {
        let rows = read_csv("A,1\r\n\r\nB,2\r\n");
        assert_eq!(fields(&rows), vec![(1, 2), (2, 0), (3, 2)]);
    }

    #[test]
    fn csv_rows_number_lines_after_multiline_fields() {
        let rows = read_csv("\"multi\nline\",1,2.0,2024-01-01\nB,2\n");
        assert_eq!(fields(&rows), vec![(1, 4), (3, 2)]);
        assert_eq!(rows[0].fields.as_ref().unwrap()[0], "multi\nline");
    }

    #[test]
    fn csv_rows_turn_undecodable_lines_into_malformed_rows() {
        let mut input = b"A,1,2.0,2024-01-01\n".to_vec();
        input.extend_from_slice(b"B,\xff,2.0,2024-01-01\n");
        input.extend_from_slice(b"C,1,2.0,2024-01-01\n");

        let rows: Vec<SourceRow> = CsvRows::new(&input).collect();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[1].line, 2);
        assert!(matches!(rows[1].fields, Err(RowError::Malformed(_))));
        assert_eq!(rows[2].line, 3);
    }

    #[test]
    fn blank_line_is_rejected_as_insufficient() {
        let mut rejections: Vec<Rejection> = Vec::new();
        let summary = ingest_rows(
            CsvRows::new(b"Widget,2,5.00,2024-01-01\n\nGadget,3,2.00,2024-01-01\n"),
            &mut rejections,
        )
        .unwrap();

        assert_eq!(summary.rows_read, 3);
        assert_eq!(summary.records.len(), 2);
        assert_eq!(rejections.len(), 1);
        assert_eq!(rejections[0].line, 2);
        assert_eq!(rejections[0].error, RowError::InsufficientFields { found: 0 });
        assert_eq!(rejections[0].log_line(), "Skipped row due to insufficient data: []");
    }

    mod capture {
        use std::sync::Mutex;

        use log::{Level, Log, Metadata, Record};

        pub static RECORDS: Mutex<Vec<(Level, String)>> = Mutex::new(Vec::new());

        struct Capture;

        impl Log for Capture {
            fn enabled(&self, _: &Metadata) -> bool {
                true
            }

            fn log(&self, record: &Record) {
                if let Ok(mut records) = RECORDS.lock() {
                    records.push((record.level(), record.args().to_string()));
                }
            }

            fn flush(&self) {}
        }

        static CAPTURE: Capture = Capture;

        pub fn install() {
            let _ = log::set_logger(&CAPTURE);
            log::set_max_level(log::LevelFilter::Trace);
        }
    }

    #[test]
    fn rejections_are_logged_at_warn() {
        capture::install();

        let rows = vec![Ok(row(&["only-one-field-zq"]))];
        let mut sink = FileRejectionSink::new(Vec::new());
        ingest_rows(number_rows(rows), &mut sink).unwrap();

        let records = capture::RECORDS.lock().unwrap();
        let entry = records
            .iter()
            .find(|(_, msg)| msg.starts_with("rejected line 1: insufficient fields"))
            .expect("rejection was not logged");
        assert_eq!(entry.0, log::Level::Warn);
    }

    #[test]
    fn file_sink_writes_one_line_per_rejection() {
        let rows = vec![
            Ok(row(&["bad", "row"])),
            Ok(row(&["Widget", "1", "oops", "2024-01-01"])),
        ];
        let mut sink = FileRejectionSink::new(Vec::new());
        ingest_rows(number_rows(rows), &mut sink).unwrap();
        let text = String::from_utf8(sink.finish().unwrap()).unwrap();

        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], r#"Skipped row due to insufficient data: ["bad", "row"]"#);
        assert!(lines[1].starts_with(r#"Error in row ["Widget", "1", "oops", "2024-01-01"]: parse error: invalid price 'oops'"#));
    }
}
