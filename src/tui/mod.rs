//! Ratatui-based terminal UI.
//!
//! Three views over the same dashboard run:
//! - **Models**: mean cycle with the Fisher / Landau / Gompertz curves
//! - **Cycles**: every normalized cycle (grey) with the mean (red)
//! - **Cycle fit**: one cycle against its own Fisher curve

use std::io;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use plotters::style::RGBColor;
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph},
};

use crate::app::pipeline::{self, DashboardRun};
use crate::domain::{DashboardConfig, ModelKind};
use crate::error::AppError;
use crate::math::{finite_range, linspace, pad_range};
use crate::models::evaluate_many;

mod plotters_chart;

use plotters_chart::{ChartSeries, GrowthPlottersChart};

const CURVE_SAMPLES: usize = 200;
const MEAN_COLOR: RGBColor = RGBColor(255, 0, 0);
const CYCLE_COLOR: RGBColor = RGBColor(128, 128, 128);
const OBSERVED_COLOR: RGBColor = RGBColor(255, 255, 255);

/// Start the TUI.
pub fn run(config: DashboardConfig) -> Result<(), AppError> {
    // Load before touching the terminal so input errors print normally.
    let mut app = App::new(config)?;

    let _guard = TerminalGuard::new()?;
    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)
        .map_err(|e| AppError::runtime(format!("Failed to initialize terminal: {e}")))?;

    app.event_loop(&mut terminal)
}

/// Ensures the terminal is restored (raw mode, alternate screen) on exit.
struct TerminalGuard;

impl TerminalGuard {
    fn new() -> Result<Self, AppError> {
        enable_raw_mode().map_err(|e| AppError::runtime(format!("Failed to enable raw mode: {e}")))?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(AppError::runtime(format!("Failed to enter alternate screen: {e}")));
        }
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum View {
    Models,
    Cycles,
    CycleFit,
}

impl View {
    fn next(self) -> Self {
        match self {
            View::Models => View::Cycles,
            View::Cycles => View::CycleFit,
            View::CycleFit => View::Models,
        }
    }

    fn prev(self) -> Self {
        match self {
            View::Models => View::CycleFit,
            View::Cycles => View::Models,
            View::CycleFit => View::Cycles,
        }
    }

    fn title(self) -> &'static str {
        match self {
            View::Models => "Fitted models",
            View::Cycles => "Normalized cycles",
            View::CycleFit => "Fisher per cycle",
        }
    }
}

/// Chart data for one frame.
struct ChartData {
    lines: Vec<ChartSeries>,
    markers: Vec<ChartSeries>,
    x_bounds: [f64; 2],
    y_bounds: [f64; 2],
}

struct App {
    config: DashboardConfig,
    view: View,
    selected_cycle: usize,
    status: String,
    run: DashboardRun,
}

impl App {
    fn new(config: DashboardConfig) -> Result<Self, AppError> {
        let run = pipeline::run_dashboard(&config)?;
        let status = format!("Loaded {}", run.inputs.source.describe());
        Ok(Self {
            config,
            view: View::Models,
            selected_cycle: 0,
            status,
            run,
        })
    }

    fn event_loop<B: ratatui::backend::Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<(), AppError> {
        let mut needs_redraw = true;
        loop {
            if needs_redraw {
                terminal
                    .draw(|f| self.draw(f))
                    .map_err(|e| AppError::runtime(format!("Terminal draw error: {e}")))?;
                needs_redraw = false;
            }

            if !event::poll(Duration::from_millis(100))
                .map_err(|e| AppError::runtime(format!("Event poll error: {e}")))?
            {
                continue;
            }

            match event::read().map_err(|e| AppError::runtime(format!("Event read error: {e}")))? {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if self.handle_key(key.code)? {
                        break;
                    }
                    needs_redraw = true;
                }
                Event::Resize(_, _) => {
                    needs_redraw = true;
                }
                _ => {}
            }
        }
        Ok(())
    }

    fn handle_key(&mut self, code: KeyCode) -> Result<bool, AppError> {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => return Ok(true),
            KeyCode::Tab => self.view = self.view.next(),
            KeyCode::BackTab => self.view = self.view.prev(),
            KeyCode::Left | KeyCode::Up => self.step_cycle(-1),
            KeyCode::Right | KeyCode::Down => self.step_cycle(1),
            KeyCode::Char('m') => {
                self.config.model_spec = self.config.model_spec.next();
                let inputs = self.run.inputs.clone();
                self.run = pipeline::evaluate_inputs(&self.config, inputs);
                self.status = format!("model: {:?}", self.config.model_spec);
            }
            KeyCode::Char('r') => {
                if self.run.inputs.source.is_synthetic() {
                    self.config.demo_seed = self.config.demo_seed.wrapping_add(1);
                    self.run = pipeline::run_dashboard(&self.config)?;
                    self.status = format!("Resampled demo cycles (seed={}).", self.config.demo_seed);
                } else {
                    self.status = "Resampling only applies to synthetic demo data.".to_string();
                }
            }
            _ => {}
        }
        Ok(false)
    }

    fn step_cycle(&mut self, delta: isize) {
        let n = self.run.cycle_fits.fits.len();
        if n == 0 {
            return;
        }
        let next = (self.selected_cycle as isize + delta).rem_euclid(n as isize);
        self.selected_cycle = next as usize;
        if let Some(fit) = self.run.cycle_fits.fits.get(self.selected_cycle) {
            self.status = format!("cycle: {}", fit.cycle);
        }
    }

    fn draw(&mut self, frame: &mut ratatui::Frame<'_>) {
        let size = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(4), Constraint::Min(0), Constraint::Length(3)])
            .split(size);

        self.draw_header(frame, chunks[0]);
        self.draw_body(frame, chunks[1]);
        self.draw_footer(frame, chunks[2]);
    }

    fn draw_header(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let stats = &self.run.inputs.ingest.stats;
        let lines = vec![
            Line::from(vec![
                Span::styled("alfalfa", Style::default().fg(Color::Cyan)),
                Span::raw(format!(" | {}", self.view.title())),
            ]),
            Line::from(Span::styled(
                format!(
                    "data: {} | rows={} cycles={} tau=[{:.2}, {:.2}] | model: {:?}",
                    self.run.inputs.source.describe(),
                    stats.n_rows,
                    stats.n_cycles,
                    stats.tau_min,
                    stats.tau_max,
                    self.config.model_spec,
                ),
                Style::default().fg(Color::Gray),
            )),
        ];

        let p = Paragraph::new(Text::from(lines)).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_body(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(0), Constraint::Length(38)])
            .split(area);

        self.draw_chart(frame, chunks[0]);
        self.draw_side_panel(frame, chunks[1]);
    }

    fn draw_chart(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let block = Block::default().title(self.view.title()).borders(Borders::ALL);
        let inner = block.inner(area);
        frame.render_widget(block, area);
        frame.render_widget(Clear, inner);

        let data = self.chart_data();
        let (chart_rect, insets) = chart_layout(inner);
        let widget = GrowthPlottersChart {
            lines: &data.lines,
            markers: &data.markers,
            x_bounds: data.x_bounds,
            y_bounds: data.y_bounds,
            x_label: "tau",
            y_label: "growth",
        };

        frame.render_widget(widget, chart_rect);
        if let Some(insets) = insets {
            draw_axis_ticks(frame, inner, chart_rect, insets, data.x_bounds, data.y_bounds);
        }
    }

    fn chart_data(&self) -> ChartData {
        let table = &self.run.inputs.ingest.table;
        let (t0, t1) = finite_range(&table.tau)
            .filter(|(lo, hi)| hi > lo)
            .unwrap_or((0.0, 1.2));
        let grid = linspace(t0, t1, CURVE_SAMPLES);

        let mut lines = Vec::new();
        let mut markers = Vec::new();

        match self.view {
            View::Models => {
                for s in &self.run.mean_fits {
                    let y = evaluate_many(s.kind, &grid, s.coefficients);
                    lines.push(ChartSeries::from_xy(&grid, &y, model_color(s.kind)));
                }
                markers.push(ChartSeries::from_xy(&table.tau, &table.mean, OBSERVED_COLOR));
            }
            View::Cycles => {
                for c in &table.cycles {
                    lines.push(ChartSeries::from_xy(&table.tau, &c.values, CYCLE_COLOR));
                }
                lines.push(ChartSeries::from_xy(&table.tau, &table.mean, MEAN_COLOR));
                markers.push(ChartSeries::from_xy(&table.tau, &table.mean, MEAN_COLOR));
            }
            View::CycleFit => {
                if let Some(fit) = self.run.cycle_fits.fits.get(self.selected_cycle) {
                    let y = evaluate_many(ModelKind::Fisher, &grid, fit.coefficients);
                    lines.push(ChartSeries::from_xy(&grid, &y, model_color(ModelKind::Fisher)));
                    if let Some(series) = table.cycle(&fit.cycle) {
                        markers.push(ChartSeries::from_xy(&table.tau, &series.values, OBSERVED_COLOR));
                    }
                }
            }
        }

        let ys = lines
            .iter()
            .chain(&markers)
            .flat_map(|s| s.data.iter().map(|(_, y)| y));
        let (y_min, y_max) = finite_range(ys)
            .filter(|(lo, hi)| hi > lo)
            .unwrap_or((0.0, 1.0));
        let (y_min, y_max) = pad_range(y_min, y_max, 0.05);

        ChartData {
            lines,
            markers,
            x_bounds: [t0, t1],
            y_bounds: [y_min, y_max],
        }
    }

    fn draw_side_panel(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        match self.view {
            View::Models => {
                let items: Vec<ListItem> = self
                    .run
                    .mean_fits
                    .iter()
                    .flat_map(|s| {
                        [
                            ListItem::new(Line::from(Span::styled(
                                s.kind.display_name(),
                                Style::default().fg(ratatui_color(s.kind)).add_modifier(Modifier::BOLD),
                            ))),
                            ListItem::new(format!(
                                "  c1={:.4} c2={:.4}",
                                s.coefficients.c1, s.coefficients.c2
                            )),
                            ListItem::new(format!(
                                "  rmse ref={} obs={}",
                                fmt_metric(s.reference_rmse),
                                fmt_metric(Some(s.stats.rmse)),
                            )),
                        ]
                    })
                    .collect();
                let list = List::new(items).block(Block::default().title("Models").borders(Borders::ALL));
                frame.render_widget(list, area);
            }
            View::Cycles | View::CycleFit => {
                let items: Vec<ListItem> = self
                    .run
                    .cycle_fits
                    .fits
                    .iter()
                    .map(|f| {
                        ListItem::new(format!(
                            "{:<10} c1={:.3} c2={:.3} {}",
                            f.cycle,
                            f.coefficients.c1,
                            f.coefficients.c2,
                            fmt_metric(Some(f.stats.rmse)),
                        ))
                    })
                    .collect();
                let list = List::new(items)
                    .block(Block::default().title("Cycles (Fisher)").borders(Borders::ALL))
                    .highlight_style(Style::default().fg(Color::Black).bg(Color::White))
                    .highlight_symbol("» ");

                let mut state = ListState::default();
                if self.view == View::CycleFit {
                    state.select(Some(self.selected_cycle));
                }
                frame.render_stateful_widget(list, area, &mut state);
            }
        }
    }

    fn draw_footer(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let help = "Tab view  ←/→ cycle  m model  r resample  q quit";
        let line = Line::from(vec![
            Span::styled(help, Style::default().fg(Color::Gray)),
            Span::raw(" | "),
            Span::styled(&self.status, Style::default().fg(Color::Yellow)),
        ]);
        let p = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }
}

fn model_color(kind: ModelKind) -> RGBColor {
    match kind {
        ModelKind::Fisher => RGBColor(0, 255, 255),
        ModelKind::Landau => RGBColor(255, 255, 0),
        ModelKind::Gompertz => RGBColor(255, 0, 255),
    }
}

fn ratatui_color(kind: ModelKind) -> Color {
    match kind {
        ModelKind::Fisher => Color::Cyan,
        ModelKind::Landau => Color::Yellow,
        ModelKind::Gompertz => Color::Magenta,
    }
}

fn fmt_metric(v: Option<f64>) -> String {
    match v {
        Some(v) if v.is_finite() => format!("{v:.4}"),
        _ => "-".to_string(),
    }
}

#[derive(Debug, Clone, Copy)]
struct AxisInsets {
    left: u16,
    right: u16,
    top: u16,
    bottom: u16,
}

fn chart_layout(inner: Rect) -> (Rect, Option<AxisInsets>) {
    let insets = AxisInsets {
        left: 7,
        right: 2,
        top: 1,
        bottom: 2,
    };

    if inner.width <= insets.left + insets.right + 10 || inner.height <= insets.top + insets.bottom + 5 {
        return (inner, None);
    }

    let rect = Rect {
        x: inner.x + insets.left,
        y: inner.y + insets.top,
        width: inner.width - insets.left - insets.right,
        height: inner.height - insets.top - insets.bottom,
    };

    (rect, Some(insets))
}

fn draw_axis_ticks(
    frame: &mut ratatui::Frame<'_>,
    inner: Rect,
    chart: Rect,
    insets: AxisInsets,
    x_bounds: [f64; 2],
    y_bounds: [f64; 2],
) {
    let ticks = 5usize;
    let style = Style::default().fg(Color::Gray);

    for i in 0..ticks {
        let u = i as f64 / (ticks as f64 - 1.0);
        let x_val = x_bounds[0] + u * (x_bounds[1] - x_bounds[0]);
        let x = chart.x + ((chart.width - 1) as f64 * u).round() as u16;
        let label = format!("{x_val:.2}");
        let label_len = label.len() as u16;
        let start = x.saturating_sub(label_len / 2);
        let y = chart.y + chart.height;
        if y >= inner.y + inner.height - 1 {
            continue;
        }
        frame.render_widget(
            Paragraph::new(label).style(style),
            Rect {
                x: start,
                y,
                width: label_len,
                height: 1,
            },
        );
    }

    for i in 0..ticks {
        let u = i as f64 / (ticks as f64 - 1.0);
        let y_val = y_bounds[0] + u * (y_bounds[1] - y_bounds[0]);
        let y = chart.y + (chart.height - 1) - ((chart.height - 1) as f64 * u).round() as u16;
        let label = format!("{y_val:.2}");
        let label_len = label.len() as u16;
        let x = inner.x + insets.left.saturating_sub(1);
        let start = x.saturating_sub(label_len);
        if start < inner.x {
            continue;
        }
        frame.render_widget(
            Paragraph::new(label).style(style),
            Rect {
                x: start,
                y,
                width: label_len,
                height: 1,
            },
        );
    }

    let x_label = Paragraph::new("tau")
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::Gray));
    let x_rect = Rect {
        x: chart.x,
        y: chart.y + chart.height + 1,
        width: chart.width,
        height: 1,
    };
    if x_rect.y < inner.y + inner.height {
        frame.render_widget(x_label, x_rect);
    }
}
