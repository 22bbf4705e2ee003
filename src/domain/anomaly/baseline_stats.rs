//! Baseline mean / deviation and the Chebyshev bound

use serde::{Deserialize, Serialize};

/// Mean and population standard deviation of the baseline window
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BaselineStats {
    pub mean: f64,
    pub std_dev: f64,
}

impl BaselineStats {
    /// `None` for an empty window
    pub fn from_values(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        let n = values.len() as f64;
        let mean = values.iter().sum::<f64>() / n;
        let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
        Some(Self {
            mean,
            std_dev: variance.sqrt(),
        })
    }

    /// Deviation of `value` from the baseline; `None` when the baseline has
    /// no spread and `k` would be a division by zero.
    pub fn deviation(&self, value: f64) -> Option<Deviation> {
        if !(self.std_dev > 0.0) {
            return None;
        }
        let delta = value - self.mean;
        let k = delta.abs() / self.std_dev;
        Some(Deviation {
            delta,
            k,
            p: chebyshev_bound(k),
        })
    }
}

/// One interval measured against the baseline
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Deviation {
    /// `value - mean`
    pub delta: f64,
    /// `|delta| / std_dev`
    pub k: f64,
    /// Upper bound on the probability of a deviation of at least `k` sigmas
    pub p: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    High,
    Low,
    Normal,
}

impl Deviation {
    pub fn direction(&self, threshold: f64) -> Direction {
        if self.p < threshold && self.delta > 0.0 {
            Direction::High
        } else if self.p < threshold && self.delta < 0.0 {
            Direction::Low
        } else {
            Direction::Normal
        }
    }
}

/// `1 / k²`, infinite for `k == 0`
pub fn chebyshev_bound(k: f64) -> f64 {
    if k > 0.0 {
        1.0 / (k * k)
    } else {
        f64::INFINITY
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_population_std() {
        let stats = BaselineStats::from_values(&[8.0, 12.0, 8.0, 12.0]).unwrap();
        assert_eq!(stats.mean, 10.0);
        assert_eq!(stats.std_dev, 2.0);
    }

    #[test]
    fn test_empty_window() {
        assert!(BaselineStats::from_values(&[]).is_none());
    }

    #[test]
    fn test_deviation_bound() {
        let stats = BaselineStats { mean: 10.0, std_dev: 2.0 };
        let d = stats.deviation(18.0).unwrap();
        assert_eq!(d.delta, 8.0);
        assert_eq!(d.k, 4.0);
        assert_eq!(d.p, 0.0625);
        assert_eq!(d.direction(0.4), Direction::High);

        let low = stats.deviation(2.0).unwrap();
        assert_eq!(low.direction(0.4), Direction::Low);
    }

    #[test]
    fn test_zero_spread_has_no_deviation() {
        let stats = BaselineStats { mean: 10.0, std_dev: 0.0 };
        assert!(stats.deviation(1_000.0).is_none());
    }

    #[test]
    fn test_value_at_mean_is_normal() {
        let stats = BaselineStats { mean: 10.0, std_dev: 2.0 };
        let d = stats.deviation(10.0).unwrap();
        assert!(d.p.is_infinite());
        assert_eq!(d.direction(0.5), Direction::Normal);
    }
}
