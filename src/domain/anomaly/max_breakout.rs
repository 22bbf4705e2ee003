//! "New maximum" policy

use super::{baseline_window, Assessment, Verdict};
use crate::domain::volume::IntervalVolumeSeries;

/// Today may be at most this multiple of the baseline maximum
pub const BREAKOUT_RATIO_LIMIT: f64 = 2.5;

/// Flag when today is the first-occurring maximum of the whole series and
/// stays below `BREAKOUT_RATIO_LIMIT` times the baseline maximum.
pub fn classify_new_maximum(series: &IntervalVolumeSeries) -> Verdict {
    let values = series.values();
    let Some(baseline) = baseline_window(values) else {
        return Verdict::ignored(Assessment::InsufficientBaseline, None);
    };

    let today_index = values.len() - 1;
    let today = values[today_index];

    // Ties go to the earliest interval
    let argmax = values
        .iter()
        .enumerate()
        .fold(0, |best, (i, &v)| if v > values[best] { i } else { best });
    if argmax != today_index {
        return Verdict::ignored(Assessment::NotMaximum, None);
    }

    let baseline_max = baseline.iter().copied().max().unwrap_or(0);
    if (today as f64) < BREAKOUT_RATIO_LIMIT * baseline_max as f64 {
        Verdict::flagged(Assessment::NewMaximum, None)
    } else {
        Verdict::ignored(Assessment::ExceedsBreakoutRatio, None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn verdict(values: &[i64]) -> Verdict {
        classify_new_maximum(&IntervalVolumeSeries::new(values.to_vec()))
    }

    #[test]
    fn test_breakout_within_ratio_is_flagged() {
        let v = verdict(&[10, 10, 10, 10, 10, 20]);
        assert!(v.flagged);
        assert_eq!(v.assessment, Assessment::NewMaximum);
    }

    #[test]
    fn test_breakout_past_ratio_is_rejected() {
        let v = verdict(&[10, 10, 10, 10, 10, 50]);
        assert!(!v.flagged);
        assert_eq!(v.assessment, Assessment::ExceedsBreakoutRatio);
    }

    #[test]
    fn test_exactly_at_ratio_is_rejected() {
        assert!(!verdict(&[10, 10, 10, 10, 10, 25]).flagged);
    }

    #[test]
    fn test_earlier_maximum_wins_ties() {
        let v = verdict(&[10, 30, 10, 10, 10, 30]);
        assert!(!v.flagged);
        assert_eq!(v.assessment, Assessment::NotMaximum);
    }

    #[test]
    fn test_yesterday_is_outside_ratio_denominator() {
        // Yesterday (40) is not in the baseline, so 45 < 2.5 * 20 flags
        assert!(verdict(&[20, 15, 10, 5, 40, 45]).flagged);
    }

    #[test]
    fn test_quiet_baseline_never_flags() {
        assert!(!verdict(&[0, 0, 0, 0, 0, 5]).flagged);
    }

    #[test]
    fn test_too_short_for_baseline() {
        assert_eq!(verdict(&[1, 2]).assessment, Assessment::InsufficientBaseline);
        assert_eq!(verdict(&[]).assessment, Assessment::InsufficientBaseline);
    }
}
