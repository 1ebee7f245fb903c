//! Flat plotting dataset derived from joined placements.
//!
//! Dates are placed on the x-axis as ordinal day numbers: the proleptic
//! Gregorian day count with 0001-01-01 as day 1. This module also computes the
//! least-squares trend line and the axis limits the chart is drawn with.

use crate::models::{FlatRow, JoinedYear};
use chrono::{DateTime, Datelike, FixedOffset, NaiveDate};
use itertools::{Itertools, MinMaxResult};

/// Flatten joined years into rows, keeping year order then start order.
pub fn flatten(joined: &[JoinedYear]) -> Vec<FlatRow> {
    joined
        .iter()
        .flat_map(|year| {
            year.placements.iter().map(move |p| FlatRow {
                year: year.year.clone(),
                start: p.start,
                place: p.placement.place,
            })
        })
        .collect()
}

/// Ordinal day of the timestamp's calendar date in its own offset.
pub fn to_ordinal(start: &DateTime<FixedOffset>) -> i32 {
    start.date_naive().num_days_from_ce()
}

pub fn from_ordinal(ordinal: i32) -> Option<NaiveDate> {
    NaiveDate::from_num_days_from_ce_opt(ordinal)
}

/// One scatter point: ordinal date against place.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlotPoint {
    pub x: f64,
    pub y: f64,
}

pub fn plot_points(rows: &[FlatRow]) -> Vec<PlotPoint> {
    rows.iter()
        .map(|row| PlotPoint {
            x: f64::from(to_ordinal(&row.start)),
            y: f64::from(row.place),
        })
        .collect()
}

/// Ordinary least-squares fit `y = slope * x + intercept`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RegressionLine {
    pub slope: f64,
    pub intercept: f64,
}

impl RegressionLine {
    /// `None` when fewer than two points are given or every point shares the
    /// same x, since no line is determined then.
    pub fn fit(points: &[PlotPoint]) -> Option<Self> {
        if points.len() < 2 {
            return None;
        }
        let n = points.len() as f64;
        let mean_x = points.iter().map(|p| p.x).sum::<f64>() / n;
        let mean_y = points.iter().map(|p| p.y).sum::<f64>() / n;

        let (sxy, sxx) = points.iter().fold((0.0, 0.0), |(sxy, sxx), p| {
            let dx = p.x - mean_x;
            (sxy + dx * (p.y - mean_y), sxx + dx * dx)
        });
        if sxx == 0.0 {
            return None;
        }

        let slope = sxy / sxx;
        Some(Self {
            slope,
            intercept: mean_y - slope * mean_x,
        })
    }

    pub fn predict(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }
}

/// Chart bounds: x is `[min - 1, max + 1]` ordinal days, y is
/// `[0, max place + 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisLimits {
    pub x_min: i32,
    pub x_max: i32,
    pub y_min: u32,
    pub y_max: u32,
}

impl AxisLimits {
    /// `None` for an empty dataset.
    pub fn from_rows(rows: &[FlatRow]) -> Option<Self> {
        let (x_lo, x_hi) = match rows.iter().map(|r| to_ordinal(&r.start)).minmax() {
            MinMaxResult::NoElements => return None,
            MinMaxResult::OneElement(x) => (x, x),
            MinMaxResult::MinMax(lo, hi) => (lo, hi),
        };
        let max_place = rows.iter().map(|r| r.place).max()?;

        Some(Self {
            x_min: x_lo - 1,
            x_max: x_hi + 1,
            y_min: 0,
            y_max: max_place + 1,
        })
    }
}
