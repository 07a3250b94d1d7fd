//! Plotters-powered growth chart widget for Ratatui.
//!
//! We render Plotters output into the Ratatui buffer using `plotters-ratatui-backend`.

use plotters::prelude::*;
use plotters_ratatui_backend::widget_fn;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::Widget,
};

/// One data series with its color.
#[derive(Clone)]
pub struct ChartSeries {
    pub data: Vec<(f64, f64)>,
    pub color: RGBColor,
}

impl ChartSeries {
    /// Pair `x` with `y`, dropping non-finite points.
    pub fn from_xy(x: &[f64], y: &[f64], color: RGBColor) -> Self {
        let data = x
            .iter()
            .zip(y)
            .filter(|(a, b)| a.is_finite() && b.is_finite())
            .map(|(&a, &b)| (a, b))
            .collect();
        Self { data, color }
    }
}

/// A lightweight, render-only chart description.
///
/// All series and bounds are computed outside the render call.
pub struct GrowthPlottersChart<'a> {
    /// Line series (model curves, background cycles).
    pub lines: &'a [ChartSeries],
    /// Point series drawn on top of the lines (observations).
    pub markers: &'a [ChartSeries],
    /// X bounds (tau).
    pub x_bounds: [f64; 2],
    /// Y bounds (growth fraction).
    pub y_bounds: [f64; 2],
    pub x_label: &'a str,
    pub y_label: &'a str,
}

impl<'a> Widget for GrowthPlottersChart<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // Plotters may fail to lay out a chart in a tiny area; show a hint instead.
        if area.width < 20 || area.height < 8 {
            buf.set_string(
                area.x,
                area.y,
                "Chart area too small (resize terminal).",
                Style::default().fg(Color::Yellow),
            );
            return;
        }

        let [x0, x1] = self.x_bounds;
        let [y0, y1] = self.y_bounds;

        if !(x0.is_finite() && x1.is_finite() && y0.is_finite() && y1.is_finite()) || x1 <= x0 || y1 <= y0 {
            return;
        }

        let widget = widget_fn(move |root| {
            let mut chart = ChartBuilder::on(&root)
                .margin(1)
                // Terminal cells are low-res, so keep label areas compact.
                .set_label_area_size(LabelAreaPosition::Left, 6)
                .set_label_area_size(LabelAreaPosition::Bottom, 3)
                .build_cartesian_2d(x0..x1, y0..y1)?;

            chart
                .configure_mesh()
                .disable_x_mesh()
                .disable_y_mesh()
                .x_desc(self.x_label)
                .y_desc(self.y_label)
                .x_labels(5)
                .y_labels(5)
                .x_label_formatter(&|v| format!("{v:.2}"))
                .y_label_formatter(&|v| format!("{v:.2}"))
                .label_style(("sans-serif", 10).into_font().color(&WHITE))
                .axis_style(&WHITE)
                .bold_line_style(&WHITE)
                .draw()?;

            for series in self.lines {
                chart.draw_series(LineSeries::new(series.data.iter().copied(), &series.color))?;
            }

            // `Pixel` rather than `Circle`: the backend maps circle radii to
            // canvas units incorrectly and draws huge markers.
            for series in self.markers {
                chart.draw_series(
                    series
                        .data
                        .iter()
                        .map(|&(x, y)| Pixel::new((x, y), series.color)),
                )?;
            }

            Ok(())
        });

        widget.render(area, buf);
    }
}
