//! Cumulative and interval volume series

use serde::{Deserialize, Serialize};

use crate::shared::types::BlockHeight;

/// Cumulative USD volume of a pair as of one block (whole dollars)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VolumeReading {
    pub block: BlockHeight,
    pub total_usd: i64,
}

/// Complete run of cumulative readings, one per resolved block
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CumulativeVolumeSeries {
    readings: Vec<VolumeReading>,
}

impl CumulativeVolumeSeries {
    pub fn new(readings: Vec<VolumeReading>) -> Self {
        Self { readings }
    }

    pub fn len(&self) -> usize {
        self.readings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }

    pub fn readings(&self) -> &[VolumeReading] {
        &self.readings
    }

    pub fn totals(&self) -> Vec<i64> {
        self.readings.iter().map(|r| r.total_usd).collect()
    }

    /// Volume traded between each pair of consecutive blocks
    pub fn intervals(&self) -> IntervalVolumeSeries {
        IntervalVolumeSeries::new(difference(&self.totals()))
    }
}

/// Volume per interval, oldest first; the last entry is "today"
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct IntervalVolumeSeries {
    values: Vec<i64>,
}

impl IntervalVolumeSeries {
    pub fn new(values: Vec<i64>) -> Self {
        Self { values }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn values(&self) -> &[i64] {
        &self.values
    }

    pub fn as_f64(&self) -> Vec<f64> {
        self.values.iter().map(|&v| v as f64).collect()
    }

    /// Indices of intervals whose volume went down, which only happens when
    /// the upstream snapshots are inconsistent
    pub fn negative_intervals(&self) -> Vec<usize> {
        self.values
            .iter()
            .enumerate()
            .filter_map(|(i, &v)| (v < 0).then_some(i))
            .collect()
    }
}

/// `out[i] = totals[i + 1] - totals[i]`
pub fn difference(totals: &[i64]) -> Vec<i64> {
    totals.windows(2).map(|w| w[1] - w[0]).collect()
}

/// Inverse of [`difference`]
pub fn reconstruct(first: i64, intervals: &[i64]) -> Vec<i64> {
    let mut totals = Vec::with_capacity(intervals.len() + 1);
    let mut running = first;
    totals.push(running);
    for &delta in intervals {
        running += delta;
        totals.push(running);
    }
    totals
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_difference_values() {
        let totals = vec![100, 150, 150, 400, 1_000];
        let d = difference(&totals);
        assert_eq!(d, vec![50, 0, 250, 600]);
        for i in 0..d.len() {
            assert_eq!(d[i], totals[i + 1] - totals[i]);
        }
    }

    #[test]
    fn test_difference_short_inputs() {
        assert!(difference(&[]).is_empty());
        assert!(difference(&[7]).is_empty());
    }

    #[test]
    fn test_reconstruct_inverts_difference() {
        let series = vec![
            vec![0, 0, 0],
            vec![5, 10, 30, 31, 90_000_000_000],
            vec![1_000, 900, 950],
        ];
        for totals in series {
            let d = difference(&totals);
            assert_eq!(d.len(), totals.len() - 1);
            assert_eq!(reconstruct(totals[0], &d), totals);
        }
    }

    #[test]
    fn test_negative_intervals_are_reported() {
        let cumulative = CumulativeVolumeSeries::new(vec![
            VolumeReading { block: 1, total_usd: 100 },
            VolumeReading { block: 2, total_usd: 90 },
            VolumeReading { block: 3, total_usd: 120 },
        ]);
        let intervals = cumulative.intervals();
        assert_eq!(intervals.values(), &[-10, 30]);
        assert_eq!(intervals.negative_intervals(), vec![0]);
    }
}
