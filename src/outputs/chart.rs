//! SVG chart of placements over time.
//!
//! Each placement is a point at (ordinal start date, place) on a logarithmic
//! place axis, with the least-squares trend line drawn over it. Tick labels
//! on the date axis are the ordinal positions converted back to calendar
//! dates.

use crate::dataset::{AxisLimits, RegressionLine, from_ordinal, plot_points};
use crate::error::{Error, Result};
use crate::models::FlatRow;
use crate::outputs::Render;
use plotters::prelude::*;
use std::fmt::Display;
use std::path::PathBuf;
use tokio::fs;
use tracing::{info, instrument};

/// Lower bound of the place axis. The axis nominally starts at 0, which a
/// log scale cannot represent, so it starts just below the best place.
const LOG_AXIS_FLOOR: f64 = 0.8;
const TREND_STEPS: u32 = 200;

/// Writes the chart as an SVG file.
#[derive(Debug, Clone)]
pub struct SvgChart {
    pub path: PathBuf,
    pub title: String,
    pub size: (u32, u32),
}

impl SvgChart {
    pub fn new(path: impl Into<PathBuf>, title: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            title: title.into(),
            size: (1024, 640),
        }
    }
}

impl Render for SvgChart {
    #[instrument(level = "info", skip_all, fields(path = %self.path.display(), rows = rows.len()))]
    async fn render(&self, rows: &[FlatRow]) -> Result<()> {
        let svg = draw_svg(rows, &self.title, self.size)?;
        fs::write(&self.path, svg).await?;
        info!("Wrote placement chart");
        Ok(())
    }
}

fn chart_err(e: impl Display) -> Error {
    Error::Chart(e.to_string())
}

fn format_ordinal(x: f64) -> String {
    from_ordinal(x.round() as i32)
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| format!("{x:.0}"))
}

/// Draw `rows` into an SVG document.
///
/// # Errors
///
/// [`Error::EmptyDataset`] when `rows` is empty, since no axis range exists.
pub fn draw_svg(rows: &[FlatRow], title: &str, size: (u32, u32)) -> Result<String> {
    let limits = AxisLimits::from_rows(rows).ok_or(Error::EmptyDataset)?;
    let points = plot_points(rows);
    let trend = RegressionLine::fit(&points);

    let x_range = f64::from(limits.x_min)..f64::from(limits.x_max);
    let y_floor = LOG_AXIS_FLOOR.max(f64::from(limits.y_min));
    let y_ceil = f64::from(limits.y_max);

    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, size).into_drawing_area();
        root.fill(&WHITE).map_err(chart_err)?;

        let mut chart = ChartBuilder::on(&root)
            .caption(title, ("sans-serif", 22))
            .margin(16)
            .x_label_area_size(48)
            .y_label_area_size(56)
            .build_cartesian_2d(x_range.clone(), (y_floor..y_ceil).log_scale())
            .map_err(chart_err)?;

        chart
            .configure_mesh()
            .x_desc("date")
            .y_desc("place")
            .x_labels(8)
            .x_label_formatter(&|x: &f64| format_ordinal(*x))
            .draw()
            .map_err(chart_err)?;

        chart
            .draw_series(
                points
                    .iter()
                    .map(|p| Circle::new((p.x, p.y), 3, BLUE.mix(0.7).filled())),
            )
            .map_err(chart_err)?;

        if let Some(line) = trend {
            let span = x_range.end - x_range.start;
            // Points outside the visible band would be NaN or clipped on a log axis.
            let curve = (0..=TREND_STEPS)
                .map(|i| x_range.start + span * f64::from(i) / f64::from(TREND_STEPS))
                .map(|x| (x, line.predict(x)))
                .filter(|(_, y)| *y >= y_floor && *y <= y_ceil);
            chart
                .draw_series(LineSeries::new(curve, RED.stroke_width(2)))
                .map_err(chart_err)?;
        }

        root.present().map_err(chart_err)?;
    }
    Ok(svg)
}
