//! Plotters-powered SVG charts.
//!
//! One file per chart:
//! - bar chart of revenue per product (first-seen order)
//! - line chart of revenue per date (chronological, x spaced by calendar days)
//!
//! Callers only invoke these for non-empty maps.

use std::error::Error;
use std::path::Path;

use chrono::TimeDelta;
use plotters::prelude::*;

use crate::aggregate::{DateTotals, ProductTotals};
use crate::error::AppError;

const CHART_SIZE: (u32, u32) = (1000, 500);

/// Write the per-product bar chart.
pub fn write_product_chart(path: &Path, products: &ProductTotals) -> Result<(), AppError> {
    draw_product_chart(path, products).map_err(|e| {
        AppError::output(format!("Failed to render product chart '{}': {e}", path.display()))
    })
}

/// Write the per-date line chart.
pub fn write_date_chart(path: &Path, dates: &DateTotals) -> Result<(), AppError> {
    draw_date_chart(path, dates).map_err(|e| {
        AppError::output(format!("Failed to render date chart '{}': {e}", path.display()))
    })
}

fn draw_product_chart(path: &Path, products: &ProductTotals) -> Result<(), Box<dyn Error>> {
    if products.is_empty() {
        return Ok(());
    }

    let names: Vec<&str> = products.iter().map(|(name, _)| name).collect();
    let (y0, y1) = value_bounds(products.iter().map(|(_, v)| v));

    let root = SVGBackend::new(path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption("Total sales per product", ("sans-serif", 20))
        .margin(10)
        .x_label_area_size(60)
        .y_label_area_size(70)
        .build_cartesian_2d((0..names.len() as i32).into_segmented(), y0..y1)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_desc("Product")
        .y_desc("Total sales")
        .x_labels(names.len())
        .x_label_formatter(&|v| match v {
            SegmentValue::CenterOf(i) => names
                .get(*i as usize)
                .map(|name| name.to_string())
                .unwrap_or_default(),
            _ => String::new(),
        })
        .draw()?;

    chart.draw_series(
        Histogram::vertical(&chart)
            .style(BLUE.filled())
            .margin(10)
            .data(
                products
                    .iter()
                    .enumerate()
                    .map(|(i, (_, total))| (i as i32, total)),
            ),
    )?;

    root.present()?;
    Ok(())
}

fn draw_date_chart(path: &Path, dates: &DateTotals) -> Result<(), Box<dyn Error>> {
    let Some(first) = dates.first_date() else {
        return Ok(());
    };

    let points: Vec<(f64, f64)> = dates
        .iter()
        .map(|(date, total)| ((date - first).num_days() as f64, total))
        .collect();
    let span = points.last().map(|&(x, _)| x).unwrap_or(0.0);
    let (x0, x1) = if span > 0.0 {
        (-span * 0.02, span * 1.02)
    } else {
        (-1.0, 1.0)
    };
    let (y0, y1) = value_bounds(points.iter().map(|&(_, y)| y));

    let root = SVGBackend::new(path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption("Total sales by date", ("sans-serif", 20))
        .margin(10)
        .x_label_area_size(60)
        .y_label_area_size(70)
        .build_cartesian_2d(x0..x1, y0..y1)?;

    // Ticks only get a label when they land on a whole day.
    chart
        .configure_mesh()
        .x_desc("Date")
        .y_desc("Total sales")
        .x_labels(points.len().clamp(2, 10))
        .x_label_formatter(&|v| {
            if (v - v.round()).abs() > 1e-6 {
                return String::new();
            }
            first
                .checked_add_signed(TimeDelta::days(v.round() as i64))
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_default()
        })
        .draw()?;

    chart.draw_series(LineSeries::new(points.iter().copied(), &BLUE))?;
    chart.draw_series(
        points
            .iter()
            .map(|&(x, y)| Circle::new((x, y), 4, BLUE.filled())),
    )?;

    root.present()?;
    Ok(())
}

/// Y bounds that always include zero, with headroom on the populated side.
fn value_bounds(values: impl Iterator<Item = f64>) -> (f64, f64) {
    let (lo, hi) = values
        .filter(|v| v.is_finite())
        .fold((0.0_f64, 0.0_f64), |(lo, hi), v| (lo.min(v), hi.max(v)));
    let span = hi - lo;
    if span <= 0.0 {
        return (0.0, 1.0);
    }
    let lo = if lo < 0.0 { lo - span * 0.1 } else { 0.0 };
    let hi = if hi > 0.0 { hi + span * 0.1 } else { 0.0 };
    (lo, hi)
}
