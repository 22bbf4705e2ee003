//! Anomaly domain - deciding whether today's volume is an outlier
//!
//! Both policies look at an interval series of length `L` and split it the
//! same way: the first `L - 2` intervals form the baseline, the last two are
//! "yesterday" and "today".

mod baseline_stats;
mod chebyshev;
mod max_breakout;

pub use baseline_stats::{chebyshev_bound, BaselineStats, Deviation, Direction};
pub use chebyshev::classify_deviation;
pub use max_breakout::{classify_new_maximum, BREAKOUT_RATIO_LIMIT};

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::volume::IntervalVolumeSeries;

/// Intervals reserved for evaluation at the end of the series
pub const EVALUATION_INTERVALS: usize = 2;

/// Reference Chebyshev thresholds of the two deviation modes
pub const DEFAULT_DEVIATION_THRESHOLD: f64 = 0.4;
pub const DEFAULT_RECENCY_THRESHOLD: f64 = 0.5;

/// Decision policy for a scan run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum ScanPolicy {
    /// Today is the period maximum without an outsized jump
    NewMaximum,
    /// Today is a Chebyshev outlier on the high side
    Deviation { threshold: f64 },
    /// Like `Deviation`, but a second high day must beat the first
    DeviationRecency { threshold: f64 },
}

impl ScanPolicy {
    /// Line that introduces the flagged pairs in an alert
    pub fn headline(&self, lookback_days: u32) -> String {
        match self {
            ScanPolicy::NewMaximum => {
                format!("24hr volume is most in {} day period:", lookback_days)
            }
            ScanPolicy::Deviation { .. } => {
                format!("24hr volume is anomalously high vs the last {} days:", lookback_days)
            }
            ScanPolicy::DeviationRecency { .. } => format!(
                "24hr volume is anomalously high and rising vs the last {} days:",
                lookback_days
            ),
        }
    }
}

impl fmt::Display for ScanPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScanPolicy::NewMaximum => write!(f, "new-maximum"),
            ScanPolicy::Deviation { threshold } => write!(f, "deviation(p<{})", threshold),
            ScanPolicy::DeviationRecency { threshold } => {
                write!(f, "deviation-recency(p<{})", threshold)
            }
        }
    }
}

/// Why a series was or was not flagged
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Assessment {
    /// Fewer intervals than a baseline plus yesterday and today
    InsufficientBaseline,
    /// Baseline has no variance, the bound is undefined
    ZeroVariance,

    NewMaximum,
    NotMaximum,
    /// Today is the maximum but jumped past the breakout ratio
    ExceedsBreakoutRatio,

    /// Today high, yesterday unremarkable
    FreshSpike,
    /// Today and yesterday both high
    SustainedHigh,
    /// Today and yesterday both high, today further out
    Accelerating,
    /// Today and yesterday both high, today no further out
    TooLate,
    /// Yesterday high, today back to normal
    AlreadyPumped,
    YesterdayLow,
    TodayLow,
    WithinRange,
}

impl Assessment {
    pub fn description(&self) -> &'static str {
        match self {
            Assessment::InsufficientBaseline => "not enough intervals for a baseline",
            Assessment::ZeroVariance => "baseline volume has zero variance, bound undefined",
            Assessment::NewMaximum => "24hr volume is the period maximum",
            Assessment::NotMaximum => "24hr volume is not the period maximum",
            Assessment::ExceedsBreakoutRatio => "period maximum, but already far above baseline",
            Assessment::FreshSpike => "today volume anomalously high",
            Assessment::SustainedHigh => "volume anomalously high yesterday and today",
            Assessment::Accelerating => "anomalously high yesterday and even higher today",
            Assessment::TooLate => "anomalously high yesterday and today, probably too late",
            Assessment::AlreadyPumped => "yesterday anomalous, today not, likely pumped already",
            Assessment::YesterdayLow => "yesterday volume anomalously low",
            Assessment::TodayLow => "today volume anomalously low",
            Assessment::WithinRange => "volume within expected range",
        }
    }
}

/// Classifier output for one pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Verdict {
    pub flagged: bool,
    pub assessment: Assessment,
    pub baseline: Option<BaselineStats>,
}

impl Verdict {
    pub fn flagged(assessment: Assessment, baseline: Option<BaselineStats>) -> Self {
        Self {
            flagged: true,
            assessment,
            baseline,
        }
    }

    pub fn ignored(assessment: Assessment, baseline: Option<BaselineStats>) -> Self {
        Self {
            flagged: false,
            assessment,
            baseline,
        }
    }

    /// The verdict is "not anomalous" only because the data could not be judged
    pub fn is_data_quality_warning(&self) -> bool {
        self.assessment == Assessment::ZeroVariance
    }
}

/// Run `policy` over `series`
pub fn classify(policy: &ScanPolicy, series: &IntervalVolumeSeries) -> Verdict {
    match *policy {
        ScanPolicy::NewMaximum => classify_new_maximum(series),
        ScanPolicy::Deviation { threshold } => classify_deviation(series, threshold, false),
        ScanPolicy::DeviationRecency { threshold } => classify_deviation(series, threshold, true),
    }
}

/// Baseline window: everything but the evaluated intervals
pub(crate) fn baseline_window(values: &[i64]) -> Option<&[i64]> {
    if values.len() <= EVALUATION_INTERVALS {
        return None;
    }
    Some(&values[..values.len() - EVALUATION_INTERVALS])
}
