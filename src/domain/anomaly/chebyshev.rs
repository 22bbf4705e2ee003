//! Chebyshev deviation policy

use tracing::debug;

use super::{baseline_window, Assessment, BaselineStats, Direction, Verdict};
use crate::domain::volume::IntervalVolumeSeries;

/// Classify today against the baseline with the bound `p = 1 / k²`.
///
/// Only today's direction can flag a pair; yesterday decides whether the
/// move is fresh, sustained or already over. With `require_acceleration`,
/// a second consecutive high day is flagged only if today deviates further
/// than yesterday did.
pub fn classify_deviation(
    series: &IntervalVolumeSeries,
    threshold: f64,
    require_acceleration: bool,
) -> Verdict {
    let values = series.values();
    let Some(window) = baseline_window(values) else {
        return Verdict::ignored(Assessment::InsufficientBaseline, None);
    };

    let baseline: Vec<f64> = window.iter().map(|&v| v as f64).collect();
    let Some(stats) = BaselineStats::from_values(&baseline) else {
        return Verdict::ignored(Assessment::InsufficientBaseline, None);
    };

    let n = values.len();
    let (Some(yesterday), Some(today)) = (
        stats.deviation(values[n - 2] as f64),
        stats.deviation(values[n - 1] as f64),
    ) else {
        return Verdict::ignored(Assessment::ZeroVariance, Some(stats));
    };

    debug!(
        "baseline mean={:.2} std={:.2} yesterday k={:.2} p={:.3} today k={:.2} p={:.3}",
        stats.mean, stats.std_dev, yesterday.k, yesterday.p, today.k, today.p
    );

    let assessment = match (yesterday.direction(threshold), today.direction(threshold)) {
        (Direction::Low, _) => Assessment::YesterdayLow,
        (Direction::High, Direction::High) if !require_acceleration => Assessment::SustainedHigh,
        (Direction::High, Direction::High) if today.delta > yesterday.delta => {
            Assessment::Accelerating
        }
        (Direction::High, Direction::High) => Assessment::TooLate,
        (Direction::High, _) => Assessment::AlreadyPumped,
        (Direction::Normal, Direction::High) => Assessment::FreshSpike,
        (Direction::Normal, Direction::Low) => Assessment::TodayLow,
        (Direction::Normal, Direction::Normal) => Assessment::WithinRange,
    };

    match assessment {
        Assessment::FreshSpike | Assessment::SustainedHigh | Assessment::Accelerating => {
            Verdict::flagged(assessment, Some(stats))
        }
        _ => Verdict::ignored(assessment, Some(stats)),
    }
}
