//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - resolves configuration
//! - runs the ingest/aggregate/select pipeline
//! - prints the report
//! - renders charts
//! - writes the optional export

use log::info;

use crate::config::Config;
use crate::error::AppError;

pub mod pipeline;

/// Entry point for the `sales` binary.
pub fn run() -> Result<(), AppError> {
    let config = Config::from_env()?;
    run_with_config(&config)?;
    Ok(())
}

/// Run the whole batch for an explicit configuration.
pub fn run_with_config(config: &Config) -> Result<pipeline::RunOutput, AppError> {
    let run = pipeline::run(config)?;

    println!("{}", crate::report::format_report(&run));

    crate::plot::render_charts(&run, config)?;

    if let Some(path) = &config.export_path {
        crate::io::export::write_totals_csv(path, &run.products, &run.dates)?;
        info!("wrote totals export to '{}'", path.display());
    }

    Ok(run)
}
