//! ASCII/Unicode plotting for terminal output.
//!
//! This is intentionally "dumb" (fixed-size grid), optimized for:
//! - quick visual sanity checks in a terminal
//! - deterministic output (helpful for golden tests)
//!
//! Plot elements:
//! - observed points: `o`
//! - model curves: one glyph per model (`*` Fisher, `+` Landau, `.` Gompertz)

use crate::domain::{Coefficients, ModelKind};
use crate::math::{finite_range, linspace, pad_range};
use crate::models::evaluate_many;
use crate::report::{CycleFit, ModelSeries};

/// Fallback tau range when the data has none.
const DEFAULT_TAU_RANGE: (f64, f64) = (0.0, 1.2);

/// A sampled curve to draw.
#[derive(Debug, Clone)]
pub struct PlotCurve {
    pub glyph: char,
    pub label: String,
    pub points: Vec<(f64, f64)>,
}

/// Sample a model curve with `n` points across `[t_min, t_max]`.
pub fn model_curve(kind: ModelKind, coefficients: Coefficients, t_min: f64, t_max: f64, n: usize) -> PlotCurve {
    let tau = linspace(t_min, t_max, n);
    let y = evaluate_many(kind, &tau, coefficients);
    PlotCurve {
        glyph: kind.glyph(),
        label: format!(
            "{} (c1={:.3}, c2={:.3})",
            kind.display_name(),
            coefficients.c1,
            coefficients.c2
        ),
        points: tau.into_iter().zip(y).collect(),
    }
}

/// Plot the mean cycle with every evaluated model overlaid.
pub fn render_mean_overlay(
    tau: &[f64],
    mean: &[f64],
    series: &[ModelSeries],
    width: usize,
    height: usize,
) -> String {
    let (t_min, t_max) = tau_range(tau);
    let curves: Vec<PlotCurve> = series
        .iter()
        .map(|s| model_curve(s.kind, s.coefficients, t_min, t_max, width.max(2)))
        .collect();
    render_ascii_plot(tau, mean, &curves, width, height)
}

/// Plot one cycle against its Fisher curve.
pub fn render_cycle_plot(tau: &[f64], observed: &[f64], fit: &CycleFit, width: usize, height: usize) -> String {
    let (t_min, t_max) = tau_range(tau);
    let curve = model_curve(ModelKind::Fisher, fit.coefficients, t_min, t_max, width.max(2));
    render_ascii_plot(tau, observed, &[curve], width, height)
}

/// Render observed points and curves on a fixed-size grid.
pub fn render_ascii_plot(
    tau: &[f64],
    observed: &[f64],
    curves: &[PlotCurve],
    width: usize,
    height: usize,
) -> String {
    let width = width.max(10);
    let height = height.max(5);
    let (t_min, t_max) = tau_range(tau);

    let y_values = observed
        .iter()
        .chain(curves.iter().flat_map(|c| c.points.iter().map(|(_, y)| y)));
    let (y_min, y_max) = finite_range(y_values)
        .filter(|(lo, hi)| hi > lo)
        .unwrap_or((0.0, 1.0));
    let (y_min, y_max) = pad_range(y_min, y_max, 0.05);

    let mut grid = vec![vec![' '; width]; height];

    // Curves first so observations overlay them.
    for curve in curves {
        draw_curve(&mut grid, curve, t_min, t_max, y_min, y_max);
    }

    for (&t, &y) in tau.iter().zip(observed) {
        if !(t.is_finite() && y.is_finite()) {
            continue;
        }
        let x = map_x(t, t_min, t_max, width);
        let row = map_y(y, y_min, y_max, height);
        grid[row][x] = 'o';
    }

    let mut out = String::new();
    out.push_str(&format!(
        "Plot: tau=[{t_min:.3}, {t_max:.3}] | y=[{y_min:.3}, {y_max:.3}]\n"
    ));
    for row in grid {
        out.push_str(&row.into_iter().collect::<String>());
        out.push('\n');
    }
    for curve in curves {
        out.push_str(&format!("{} {}\n", curve.glyph, curve.label));
    }

    out
}

fn tau_range(tau: &[f64]) -> (f64, f64) {
    finite_range(tau)
        .filter(|(lo, hi)| hi > lo)
        .unwrap_or(DEFAULT_TAU_RANGE)
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

fn draw_curve(grid: &mut [Vec<char>], curve: &PlotCurve, t_min: f64, t_max: f64, y_min: f64, y_max: f64) {
    if curve.points.len() < 2 {
        return;
    }
    let height = grid.len();
    let width = grid[0].len();

    let mut prev = None;
    for &(t, y) in &curve.points {
        if !(t.is_finite() && y.is_finite()) {
            prev = None;
            continue;
        }
        let x = map_x(t, t_min, t_max, width);
        let yy = map_y(y, y_min, y_max, height);
        match prev {
            Some((x0, y0)) => draw_line(grid, x0, y0, x, yy, curve.glyph),
            None => grid[yy][x] = curve.glyph,
        }
        prev = Some((x, yy));
    }
}

/// Integer line drawing (Bresenham-ish). Only fills empty cells.
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plot_golden_snapshot_small() {
        let tau = [0.0, 1.0];
        let observed = [0.0, 1.0];
        // c1 = c2 = 0 gives a flat Fisher curve at 0.5.
        let curve = model_curve(ModelKind::Fisher, Coefficients::new(0.0, 0.0), 0.0, 1.0, 10);

        let txt = render_ascii_plot(&tau, &observed, &[curve], 10, 5);
        let expected = concat!(
            "Plot: tau=[0.000, 1.000] | y=[-0.050, 1.050]\n",
            "         o\n",
            "          \n",
            "**********\n",
            "          \n",
            "o         \n",
            "* Fisher (c1=0.000, c2=0.000)\n",
        );
        assert_eq!(txt, expected);
    }

    #[test]
    fn observations_overlay_curves_and_skip_missing() {
        let tau = [0.0, 0.5, 1.0];
        let observed = [0.5, f64::NAN, 0.5];
        let curve = model_curve(ModelKind::Fisher, Coefficients::new(0.0, 0.0), 0.0, 1.0, 12);
        let txt = render_ascii_plot(&tau, &observed, &[curve], 12, 5);
        let flat_row = txt
            .lines()
            .find(|l| l.starts_with('o'))
            .expect("row with observations");
        assert_eq!(flat_row, "o**********o");
    }

    #[test]
    fn model_curve_samples_endpoints() {
        let c = Coefficients::new(2.24074685, 3.38374238);
        let curve = model_curve(ModelKind::Gompertz, c, 0.0, 1.2, 7);
        assert_eq!(curve.points.len(), 7);
        assert_eq!(curve.points[0].0, 0.0);
        assert!((curve.points[6].0 - 1.2).abs() < 1e-12);
        assert_eq!(curve.glyph, '.');
    }
}
