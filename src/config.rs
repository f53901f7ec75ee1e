//! Run configuration.
//!
//! File locations default to fixed constants. A `.env` file or the process
//! environment may override them; there are no command-line flags.

use std::path::PathBuf;

use crate::error::AppError;

pub const DEFAULT_INPUT_PATH: &str = "sales_data.csv";
pub const DEFAULT_ERROR_LOG_PATH: &str = "sales_errors.log";
pub const DEFAULT_CHART_DIR: &str = ".";
pub const DEFAULT_PLOT_WIDTH: usize = 60;
pub const DEFAULT_PLOT_HEIGHT: usize = 15;

/// Names of the chart files written into `chart_dir`.
pub const PRODUCT_CHART_FILE: &str = "sales_by_product.svg";
pub const DATE_CHART_FILE: &str = "sales_by_date.svg";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Headerless `product_name, quantity, price, date` CSV.
    pub input_path: PathBuf,
    /// One line per rejected row. Truncated at the start of every run.
    pub error_log_path: PathBuf,
    /// Directory receiving the SVG charts.
    pub chart_dir: PathBuf,
    /// Optional CSV export of both aggregate maps.
    pub export_path: Option<PathBuf>,
    /// Terminal chart size (columns x rows).
    pub plot_width: usize,
    pub plot_height: usize,
    /// Write SVG charts in addition to the terminal charts.
    pub svg_charts: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input_path: PathBuf::from(DEFAULT_INPUT_PATH),
            error_log_path: PathBuf::from(DEFAULT_ERROR_LOG_PATH),
            chart_dir: PathBuf::from(DEFAULT_CHART_DIR),
            export_path: None,
            plot_width: DEFAULT_PLOT_WIDTH,
            plot_height: DEFAULT_PLOT_HEIGHT,
            svg_charts: true,
        }
    }
}

impl Config {
    /// Load `.env` (if present) and apply environment overrides.
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build a config from an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let mut config = Self::default();

        if let Some(v) = lookup("SALES_DATA_PATH") {
            config.input_path = PathBuf::from(v);
        }
        if let Some(v) = lookup("SALES_ERRORS_PATH") {
            config.error_log_path = PathBuf::from(v);
        }
        if let Some(v) = lookup("SALES_CHART_DIR") {
            config.chart_dir = PathBuf::from(v);
        }
        config.export_path = lookup("SALES_EXPORT_PATH")
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from);
        if let Some(v) = lookup("SALES_PLOT_WIDTH") {
            config.plot_width = parse_usize("SALES_PLOT_WIDTH", &v)?;
        }
        if let Some(v) = lookup("SALES_PLOT_HEIGHT") {
            config.plot_height = parse_usize("SALES_PLOT_HEIGHT", &v)?;
        }
        if let Some(v) = lookup("SALES_SVG_CHARTS") {
            config.svg_charts = parse_bool("SALES_SVG_CHARTS", &v)?;
        }

        Ok(config)
    }

    pub fn product_chart_path(&self) -> PathBuf {
        self.chart_dir.join(PRODUCT_CHART_FILE)
    }

    pub fn date_chart_path(&self) -> PathBuf {
        self.chart_dir.join(DATE_CHART_FILE)
    }
}

fn parse_usize(name: &str, value: &str) -> Result<usize, AppError> {
    value
        .trim()
        .parse::<usize>()
        .map_err(|e| AppError::io(format!("Invalid {name} '{value}': {e}")))
}

fn parse_bool(name: &str, value: &str) -> Result<bool, AppError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(AppError::io(format!(
            "Invalid {name} '{value}': expected true/false"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn defaults_use_fixed_file_names() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.input_path, PathBuf::from("sales_data.csv"));
        assert_eq!(config.error_log_path, PathBuf::from("sales_errors.log"));
        assert_eq!(config.product_chart_path(), PathBuf::from("./sales_by_product.svg"));
    }

    #[test]
    fn environment_overrides_defaults() {
        let config = Config::from_lookup(lookup(&[
            ("SALES_DATA_PATH", "in.csv"),
            ("SALES_ERRORS_PATH", "err.log"),
            ("SALES_CHART_DIR", "charts"),
            ("SALES_EXPORT_PATH", "totals.csv"),
            ("SALES_PLOT_WIDTH", "80"),
            ("SALES_PLOT_HEIGHT", " 20 "),
            ("SALES_SVG_CHARTS", "off"),
        ]))
        .unwrap();

        assert_eq!(config.input_path, PathBuf::from("in.csv"));
        assert_eq!(config.error_log_path, PathBuf::from("err.log"));
        assert_eq!(config.date_chart_path(), PathBuf::from("charts/sales_by_date.svg"));
        assert_eq!(config.export_path, Some(PathBuf::from("totals.csv")));
        assert_eq!(config.plot_width, 80);
        assert_eq!(config.plot_height, 20);
        assert!(!config.svg_charts);
    }

    #[test]
    fn invalid_numbers_are_fatal() {
        let err = Config::from_lookup(lookup(&[("SALES_PLOT_WIDTH", "wide")])).unwrap_err();
        assert_eq!(err.exit_code(), 2);
        assert!(err.message().contains("SALES_PLOT_WIDTH"));

        let err = Config::from_lookup(lookup(&[("SALES_SVG_CHARTS", "maybe")])).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }
}
