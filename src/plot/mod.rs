//! Chart adapter.
//!
//! Renders each non-empty aggregate map as a terminal chart (`ascii`) and,
//! when enabled, an SVG file (`svg`). Empty maps get a "no data" line and no
//! chart.

pub mod ascii;
pub mod svg;

use log::info;

use crate::app::pipeline::RunOutput;
use crate::config::Config;
use crate::error::AppError;
use crate::report::{NO_DATE_CHART, NO_PRODUCT_CHART};

/// Render both charts for a run.
pub fn render_charts(run: &RunOutput, config: &Config) -> Result<(), AppError> {
    if config.svg_charts && !(run.products.is_empty() && run.dates.is_empty()) {
        std::fs::create_dir_all(&config.chart_dir).map_err(|e| {
            AppError::output(format!(
                "Failed to create chart directory '{}': {e}",
                config.chart_dir.display()
            ))
        })?;
    }

    if run.products.is_empty() {
        println!("{NO_PRODUCT_CHART}");
    } else {
        println!("{}", ascii::render_product_bars(&run.products, config.plot_width));
        if config.svg_charts {
            let path = config.product_chart_path();
            svg::write_product_chart(&path, &run.products)?;
            info!("wrote product chart to '{}'", path.display());
        }
    }

    if run.dates.is_empty() {
        println!("{NO_DATE_CHART}");
    } else {
        println!(
            "{}",
            ascii::render_date_line(&run.dates, config.plot_width, config.plot_height)
        );
        if config.svg_charts {
            let path = config.date_chart_path();
            svg::write_date_chart(&path, &run.dates)?;
            info!("wrote date chart to '{}'", path.display());
        }
    }

    Ok(())
}
