use crate::error::{DashboardError, Result};
use crate::processors::ChartData;
use crate::utils::constants::{CHART_TITLE, DEFAULT_CHART_HEIGHT, DEFAULT_CHART_WIDTH};
use chrono::{Duration, NaiveDate};
use plotters::coord::Shift;
use plotters::prelude::*;
use std::fmt::Display;
use std::fs;
use std::path::Path;
use tracing::info;

/// One colour per series, by position in the chart's variable list
pub const SERIES_PALETTE: [RGBColor; 4] = [
    RGBColor(231, 76, 60),  // Red
    RGBColor(52, 152, 219), // Blue
    RGBColor(46, 204, 113), // Green
    RGBColor(243, 156, 18), // Orange
];

/// Line chart of the long-form table: date on x, normalized value on y,
/// one series per variable.
pub struct ChartWriter {
    width: u32,
    height: u32,
    title: String,
}

impl ChartWriter {
    pub fn new() -> Self {
        Self {
            width: DEFAULT_CHART_WIDTH,
            height: DEFAULT_CHART_HEIGHT,
            title: CHART_TITLE.to_string(),
        }
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_title(mut self, title: &str) -> Self {
        self.title = title.to_string();
        self
    }

    pub fn write_svg(&self, data: &ChartData, path: &Path) -> Result<()> {
        let svg = self.render_svg(data)?;
        fs::write(path, svg)?;

        info!("Chart written to {}", path.display());
        Ok(())
    }

    /// Render the chart to an in-memory SVG document
    pub fn render_svg(&self, data: &ChartData) -> Result<String> {
        ensure_not_empty(data)?;

        let mut svg = String::new();
        {
            let root = SVGBackend::with_string(&mut svg, (self.width, self.height)).into_drawing_area();
            self.draw(&root, data)?;
        }
        Ok(svg)
    }

    fn draw<DB: DrawingBackend>(&self, root: &DrawingArea<DB, Shift>, data: &ChartData) -> Result<()> {
        let (x_start, x_end) = x_bounds(data)?;

        root.fill(&WHITE).map_err(chart_error)?;

        let mut chart = ChartBuilder::on(root)
            .caption(&self.title, ("sans-serif", 28).into_font())
            .margin(10)
            .x_label_area_size(50)
            .y_label_area_size(60)
            .build_cartesian_2d(x_start..x_end, -0.02f64..1.02f64)
            .map_err(chart_error)?;

        chart
            .configure_mesh()
            .x_desc("date")
            .y_desc("value")
            .x_label_formatter(&|d: &NaiveDate| d.format("%Y-%m").to_string())
            .draw()
            .map_err(chart_error)?;

        for (idx, variable) in data.variables.iter().enumerate() {
            let color = series_color(idx);
            chart
                .draw_series(LineSeries::new(data.series(*variable), color.stroke_width(2)))
                .map_err(chart_error)?
                .label(variable.normalized_label())
                .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color));
        }

        chart
            .configure_series_labels()
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()
            .map_err(chart_error)?;

        root.present().map_err(chart_error)?;
        Ok(())
    }
}

impl Default for ChartWriter {
    fn default() -> Self {
        Self::new()
    }
}

pub fn series_color(index: usize) -> RGBColor {
    SERIES_PALETTE[index % SERIES_PALETTE.len()]
}

fn ensure_not_empty(data: &ChartData) -> Result<()> {
    if data.is_empty() {
        return Err(DashboardError::EmptyRange {
            start: data.range.start,
            end: data.range.end,
        });
    }
    Ok(())
}

/// X-axis extent; a single month is widened so the axis is never degenerate
fn x_bounds(data: &ChartData) -> Result<(NaiveDate, NaiveDate)> {
    let start = data.rows.iter().map(|r| r.date).min();
    let end = data.rows.iter().map(|r| r.date).max();

    match (start, end) {
        (Some(start), Some(end)) if start == end => Ok((start, end + Duration::days(30))),
        (Some(start), Some(end)) => Ok((start, end)),
        _ => Err(DashboardError::EmptyRange {
            start: data.range.start,
            end: data.range.end,
        }),
    }
}

fn chart_error<E: Display>(err: E) -> DashboardError {
    DashboardError::Chart(err.to_string())
}
