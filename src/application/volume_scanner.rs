//! One scan pass over the candidate pair universe

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::domain::anomaly::{classify, ScanPolicy, Verdict};
use crate::domain::market::{BlockSource, PairDiscovery, PairVolumeSource};
use crate::domain::scan::ScanRecord;
use crate::domain::timeline::{generate_baseline_timestamps, resolve_blocks, BlockTimeline};
use crate::domain::volume::{build_interval_series, IntervalVolumeSeries};
use crate::infrastructure::chart::ChartRenderer;
use crate::shared::clock::Clock;
use crate::shared::errors::ScanError;
use crate::shared::types::Pair;
use crate::shared::utils::Throttle;

/// Log progress every this many pairs
const PROGRESS_EVERY: usize = 50;

/// Scan pass parameters
#[derive(Debug, Clone)]
pub struct ScanSettings {
    pub lookback_days: u32,
    pub pair_count: usize,
    /// Most active pairs to skip before scanning
    pub pair_offset: usize,
    /// Seconds subtracted from "now" so the block index has caught up
    pub head_lag_secs: i64,
    pub throttle: Throttle,
}

impl Default for ScanSettings {
    fn default() -> Self {
        Self {
            lookback_days: 10,
            pair_count: 1000,
            pair_offset: 0,
            head_lag_secs: 300,
            throttle: Throttle::from_millis(100),
        }
    }
}

/// Per-pass counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanSummary {
    pub examined: usize,
    pub flagged: usize,
    pub insufficient_history: usize,
    pub fetch_failures: usize,
    pub data_quality_warnings: usize,
}

/// Sealed record plus counters
#[derive(Debug, Clone)]
pub struct ScanOutcome {
    pub record: ScanRecord,
    pub summary: ScanSummary,
}

enum PairOutcome {
    Flagged(IntervalVolumeSeries, Verdict),
    Ignored(Verdict),
    InsufficientHistory,
    FetchFailed,
    DataQuality,
}

/// Drives resolver, series builder and classifier over every candidate pair
pub struct VolumeScanner {
    discovery: Arc<dyn PairDiscovery>,
    blocks: Arc<dyn BlockSource>,
    volumes: Arc<dyn PairVolumeSource>,
    charts: Option<Arc<dyn ChartRenderer>>,
    clock: Arc<dyn Clock>,
    settings: ScanSettings,
}

impl VolumeScanner {
    pub fn new(
        discovery: Arc<dyn PairDiscovery>,
        blocks: Arc<dyn BlockSource>,
        volumes: Arc<dyn PairVolumeSource>,
        clock: Arc<dyn Clock>,
        settings: ScanSettings,
    ) -> Self {
        Self {
            discovery,
            blocks,
            volumes,
            charts: None,
            clock,
            settings,
        }
    }

    pub fn with_charts(mut self, charts: Arc<dyn ChartRenderer>) -> Self {
        self.charts = Some(charts);
        self
    }

    pub fn settings(&self) -> &ScanSettings {
        &self.settings
    }

    /// Run one full pass and return the sealed record.
    ///
    /// Fails only when there is no pair universe or no block mapping; any
    /// per-pair problem is logged and the pair skipped.
    pub async fn run_pass(&self, policy: &ScanPolicy) -> Result<ScanOutcome, ScanError> {
        let started = self.clock.now();
        let mut record = ScanRecord::start(*policy, started);
        let mut summary = ScanSummary::default();

        info!("🔍 Starting scan pass {} with policy {}", record.id, policy);

        let pairs = self
            .discovery
            .top_pairs(self.settings.pair_offset, self.settings.pair_count)
            .await
            .map_err(ScanError::Discovery)?;
        if pairs.is_empty() {
            warn!("⚠️ Pair discovery returned no pairs, abandoning pass");
            return Err(ScanError::EmptyUniverse);
        }
        record.num_searched = pairs.len();

        let reference = started.timestamp() - self.settings.head_lag_secs;
        let timestamps = generate_baseline_timestamps(reference, self.settings.lookback_days);
        let timeline = resolve_blocks(self.blocks.as_ref(), &timestamps, &self.settings.throttle).await?;
        info!(
            "🧱 Resolved {} blocks ({} .. {})",
            timeline.len(),
            timeline.blocks.first().copied().unwrap_or_default(),
            timeline.blocks.last().copied().unwrap_or_default()
        );

        for (i, pair) in pairs.iter().enumerate() {
            if i % PROGRESS_EVERY == 0 {
                info!("Got through {} of {} pairs so far", i, pairs.len());
            }
            if i > 0 {
                self.settings.throttle.pause().await;
            }

            summary.examined += 1;
            match self.scan_pair(pair, &timeline, policy).await {
                PairOutcome::Flagged(series, verdict) => {
                    info!(
                        "🚨 {} ({}) flagged: {}",
                        pair.display_name(),
                        pair.address,
                        verdict.assessment.description()
                    );
                    record.flag(pair, self.clock.now());
                    summary.flagged += 1;
                    self.render_chart(pair, &series);
                }
                PairOutcome::Ignored(verdict) => {
                    debug!(
                        "{} not flagged: {}",
                        pair.display_name(),
                        verdict.assessment.description()
                    );
                }
                PairOutcome::InsufficientHistory => summary.insufficient_history += 1,
                PairOutcome::FetchFailed => summary.fetch_failures += 1,
                PairOutcome::DataQuality => summary.data_quality_warnings += 1,
            }
        }

        let record = record.seal(self.clock.now());
        info!(
            "✅ Scan pass {} done: {} examined, {} flagged, {} without full history, {} failed, {} data-quality warnings",
            record.id,
            summary.examined,
            summary.flagged,
            summary.insufficient_history,
            summary.fetch_failures,
            summary.data_quality_warnings
        );

        Ok(ScanOutcome { record, summary })
    }

    async fn scan_pair(&self, pair: &Pair, timeline: &BlockTimeline, policy: &ScanPolicy) -> PairOutcome {
        let name = pair.display_name();

        let series = match build_interval_series(
            self.volumes.as_ref(),
            &pair.address,
            timeline,
            self.settings.lookback_days,
            &self.settings.throttle,
        )
        .await
        {
            Ok(series) => series,
            Err(e) if e.is_insufficient_history() => {
                info!(
                    "Pair {} ({}) full historical data not available: {}",
                    name, pair.address, e
                );
                return PairOutcome::InsufficientHistory;
            }
            Err(e) => {
                warn!("⚠️ Volume fetch for {} ({}) failed: {}", name, pair.address, e);
                return PairOutcome::FetchFailed;
            }
        };

        let negative = series.negative_intervals();
        if !negative.is_empty() {
            warn!(
                "⚠️ Negative interval volume for {} ({}) at intervals {:?}: {:?}, examine it manually",
                name,
                pair.address,
                negative,
                series.values()
            );
            return PairOutcome::DataQuality;
        }

        let verdict = classify(policy, &series);
        if verdict.is_data_quality_warning() {
            warn!(
                "⚠️ {} ({}): {}, examine it manually",
                name,
                pair.address,
                verdict.assessment.description()
            );
            return PairOutcome::DataQuality;
        }

        if verdict.flagged {
            PairOutcome::Flagged(series, verdict)
        } else {
            PairOutcome::Ignored(verdict)
        }
    }

    fn render_chart(&self, pair: &Pair, series: &IntervalVolumeSeries) {
        let Some(charts) = &self.charts else {
            return;
        };
        match charts.render(&pair.display_name(), series) {
            Ok(path) => debug!("Chart for {} written to {}", pair.display_name(), path.display()),
            Err(e) => warn!("⚠️ Could not render chart for {}: {}", pair.display_name(), e),
        }
    }
}
