//! Volume bar charts for flagged pairs

mod svg_chart;

pub use svg_chart::SvgChartRenderer;

use std::path::PathBuf;

use crate::domain::volume::IntervalVolumeSeries;
use crate::shared::errors::ChartError;

pub const DEFAULT_CHART_DIR: &str = "images";

/// Writes one chart per flagged pair
pub trait ChartRenderer: Send + Sync {
    /// Render `volumes` under `title`, returning where the chart was written
    fn render(&self, title: &str, volumes: &IntervalVolumeSeries) -> Result<PathBuf, ChartError>;
}
