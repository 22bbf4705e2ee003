//! Volume domain - cumulative readings and per-interval volumes

mod series_builder;
mod volume_series;

pub use series_builder::{build_interval_series, fetch_cumulative};
pub use volume_series::{
    difference, reconstruct, CumulativeVolumeSeries, IntervalVolumeSeries, VolumeReading,
};
