//! Repeated scan passes

use std::time::Duration;

use async_trait::async_trait;
use tracing::{error, info};

use super::scan_service::ScanService;

/// How the scheduler waits between passes
#[async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

#[derive(Debug, Default, Clone, Copy)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Runs a pass, waits `interval`, and repeats.
///
/// The wait starts after the previous pass has stored and notified, so
/// passes never overlap.
pub struct Scheduler<S: Sleeper = TokioSleeper> {
    interval: Duration,
    sleeper: S,
    max_passes: Option<usize>,
}

impl Scheduler<TokioSleeper> {
    pub fn new(interval: Duration) -> Self {
        Self::with_sleeper(interval, TokioSleeper)
    }
}

impl<S: Sleeper> Scheduler<S> {
    pub fn with_sleeper(interval: Duration, sleeper: S) -> Self {
        Self {
            interval,
            sleeper,
            max_passes: None,
        }
    }

    /// Stop after `passes` passes instead of running forever
    pub fn limit_passes(mut self, passes: usize) -> Self {
        self.max_passes = Some(passes);
        self
    }

    /// Returns the number of passes that completed without error
    pub async fn run(&self, service: &ScanService) -> usize {
        info!(
            "⏰ Scheduling {} scans every {}s",
            service.policy(),
            self.interval.as_secs()
        );

        let mut pass = 0;
        let mut succeeded = 0;
        loop {
            pass += 1;
            match service.run_once().await {
                Ok(report) => {
                    succeeded += 1;
                    info!(
                        "Pass {} finished: {} flagged, {} new, {} alert chunks sent",
                        pass,
                        report.record.pairs.len(),
                        report.new_pairs.len(),
                        report.alerts_sent
                    );
                }
                Err(e) => error!("❌ Pass {} failed, retrying next tick: {}", pass, e),
            }

            if self.max_passes.is_some_and(|max| pass >= max) {
                break;
            }
            self.sleeper.sleep(self.interval).await;
        }
        succeeded
    }
}
