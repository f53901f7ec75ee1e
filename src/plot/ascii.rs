//! ASCII plotting for terminal output.
//!
//! This is intentionally "dumb" (fixed-size grid), optimized for:
//! - quick visual sanity checks in a terminal
//! - deterministic output (helpful for golden tests)
//!
//! Plot elements:
//! - product totals: horizontal `#` bars (`-` for negative totals)
//! - date totals: `o` points joined by a `-` line, x spaced by calendar days

use crate::aggregate::{DateTotals, ProductTotals};

/// Product labels longer than this are truncated.
const MAX_LABEL: usize = 20;

/// Render a horizontal bar chart of revenue per product.
///
/// Bars are scaled so the largest absolute total spans `width` columns.
pub fn render_product_bars(products: &ProductTotals, width: usize) -> String {
    let width = width.max(10);

    let max_abs = products
        .iter()
        .map(|(_, v)| v.abs())
        .filter(|v| v.is_finite())
        .fold(0.0, f64::max);
    let label_width = products
        .iter()
        .map(|(name, _)| name.chars().count().min(MAX_LABEL))
        .max()
        .unwrap_or(0);

    let mut out = String::new();
    out.push_str("Total sales per product\n");

    for (name, total) in products.iter() {
        let len = if max_abs > 0.0 && total.is_finite() {
            ((total.abs() / max_abs) * width as f64).round() as usize
        } else {
            0
        };
        let ch = if total < 0.0 { '-' } else { '#' };
        let bar: String = std::iter::repeat_n(ch, len.min(width)).collect();
        out.push_str(&format!(
            "{:<label_width$} | {bar:<width$} {total:.2}\n",
            truncate(name, MAX_LABEL)
        ));
    }

    out
}

/// Render a line chart of revenue per date.
pub fn render_date_line(dates: &DateTotals, width: usize, height: usize) -> String {
    let width = width.max(10);
    let height = height.max(5);

    let (Some(first), Some(last)) = (dates.first_date(), dates.last_date()) else {
        return String::new();
    };

    let points: Vec<(f64, f64)> = dates
        .iter()
        .map(|(date, total)| ((date - first).num_days() as f64, total))
        .collect();

    let t_min = 0.0;
    let t_max = ((last - first).num_days() as f64).max(1.0);

    let (y_min, y_max) = y_range(&points).unwrap_or((0.0, 1.0));
    let (y_min, y_max) = pad_range(y_min, y_max, 0.05);

    let mut grid = vec![vec![' '; width]; height];

    // Draw the line first so points can overlay it.
    draw_polyline(&mut grid, &points, t_min, t_max, y_min, y_max);
    for &(t, y) in &points {
        let x = map_x(t, t_min, t_max, width);
        let yy = map_y(y, y_min, y_max, height);
        grid[yy][x] = 'o';
    }

    let mut out = String::new();
    out.push_str(&format!(
        "Total sales by date | total=[{y_min:.2}, {y_max:.2}]\n"
    ));
    for row in grid {
        out.push_str(&row.into_iter().collect::<String>());
        out.push('\n');
    }
    out.push_str(&format!(
        "{} .. {}\n",
        first.format("%Y-%m-%d"),
        last.format("%Y-%m-%d")
    ));

    out
}

fn y_range(points: &[(f64, f64)]) -> Option<(f64, f64)> {
    let mut min_y = f64::INFINITY;
    let mut max_y = f64::NEG_INFINITY;
    for &(_, y) in points {
        min_y = min_y.min(y);
        max_y = max_y.max(y);
    }
    if min_y.is_finite() && max_y.is_finite() {
        Some((min_y, max_y))
    } else {
        None
    }
}

fn pad_range(min: f64, max: f64, frac: f64) -> (f64, f64) {
    let span = (max - min).abs();
    let pad = if span > 0.0 { span * frac } else { min.abs().max(1.0) * frac };
    (min - pad, max + pad)
}

fn map_x(t: f64, t_min: f64, t_max: f64, width: usize) -> usize {
    let width = width.max(2);
    let u = ((t - t_min) / (t_max - t_min)).clamp(0.0, 1.0);
    (u * (width as f64 - 1.0)).round() as usize
}

fn map_y(y: f64, y_min: f64, y_max: f64, height: usize) -> usize {
    let height = height.max(2);
    let u = ((y - y_min) / (y_max - y_min)).clamp(0.0, 1.0);
    // y=top is max -> row 0
    (height as f64 - 1.0 - (u * (height as f64 - 1.0))).round() as usize
}

fn draw_polyline(grid: &mut [Vec<char>], points: &[(f64, f64)], t_min: f64, t_max: f64, y_min: f64, y_max: f64) {
    let height = grid.len();
    let width = grid[0].len();

    let mut prev = None;
    for &(t, y) in points {
        let x = map_x(t, t_min, t_max, width);
        let yy = map_y(y, y_min, y_max, height);
        if let Some((x0, y0)) = prev {
            draw_line(grid, x0, y0, x, yy, '-');
        }
        prev = Some((x, yy));
    }
}

/// Integer line drawing (Bresenham-ish).
fn draw_line(grid: &mut [Vec<char>], x0: usize, y0: usize, x1: usize, y1: usize, ch: char) {
    let mut x0 = x0 as isize;
    let mut y0 = y0 as isize;
    let x1 = x1 as isize;
    let y1 = y1 as isize;

    let dx = (x1 - x0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let dy = -(y1 - y0).abs();
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        if y0 >= 0
            && (y0 as usize) < grid.len()
            && x0 >= 0
            && (x0 as usize) < grid[0].len()
            && grid[y0 as usize][x0 as usize] == ' '
        {
            grid[y0 as usize][x0 as usize] = ch;
        }

        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out = String::new();
    for (i, ch) in s.chars().enumerate() {
        if i + 1 >= max {
            break;
        }
        out.push(ch);
    }
    out.push('.');
    out
}
