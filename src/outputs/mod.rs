//! Renderers for the flat placement dataset.
//!
//! The pipeline produces a `Vec<FlatRow>`; how it is presented is decided
//! here. Every renderer implements [`Render`] so the binary can drive any
//! combination of them over the same rows.
//!
//! # Submodules
//!
//! - [`chart`]: Scatter of place over time with a trend line, written as SVG
//! - [`json`]: The rows themselves, written as a JSON array

use crate::error::Result;
use crate::models::FlatRow;

pub mod chart;
pub mod json;

/// A consumer of the flat dataset.
pub trait Render {
    /// Present `rows`. Implementations decide whether an empty dataset is an
    /// error.
    async fn render(&self, rows: &[FlatRow]) -> Result<()>;
}
