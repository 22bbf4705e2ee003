//! One pass end to end: scan, remember, notify

use std::sync::Arc;

use tracing::{error, info};

use super::alerts::format_alert;
use super::volume_scanner::{ScanSummary, VolumeScanner};
use crate::domain::anomaly::ScanPolicy;
use crate::domain::scan::ScanRecord;
use crate::infrastructure::notify::{deliver_alert, AlertSink};
use crate::infrastructure::storage::HistoryStore;
use crate::shared::errors::ScanError;

/// What a pass produced and what was done with it
#[derive(Debug, Clone)]
pub struct PassReport {
    pub record: ScanRecord,
    pub summary: ScanSummary,
    pub new_pairs: Vec<String>,
    pub history_saved: bool,
    /// Chunks delivered to the alert sink
    pub alerts_sent: usize,
}

/// Wires the scanner to history and alert delivery
pub struct ScanService {
    scanner: VolumeScanner,
    history: Arc<dyn HistoryStore>,
    sink: Arc<dyn AlertSink>,
    policy: ScanPolicy,
}

impl ScanService {
    pub fn new(
        scanner: VolumeScanner,
        history: Arc<dyn HistoryStore>,
        sink: Arc<dyn AlertSink>,
        policy: ScanPolicy,
    ) -> Self {
        Self {
            scanner,
            history,
            sink,
            policy,
        }
    }

    pub fn policy(&self) -> &ScanPolicy {
        &self.policy
    }

    /// Scan, append the record to history and alert on newly flagged pairs.
    ///
    /// Only a failed scan is an error. History and delivery problems are
    /// logged and reflected in the report.
    pub async fn run_once(&self) -> Result<PassReport, ScanError> {
        let outcome = self.scanner.run_pass(&self.policy).await?;
        let record = outcome.record;

        let mut history = self.history.load_or_empty();
        let new_pairs = history.newly_flagged(&record);
        if !new_pairs.is_empty() {
            info!("🆕 Newly flagged since last scan: {:?}", new_pairs);
        }

        if let Some(evicted) = history.push(record.clone()) {
            info!("🗑️ Dropping scan {} from history", evicted.id);
        }
        let history_saved = match self.history.save(&history) {
            Ok(()) => true,
            Err(e) => {
                error!("❌ Failed to save scan history: {}", e);
                false
            }
        };

        let lookback_days = self.scanner.settings().lookback_days;
        let alerts_sent = match format_alert(&record, &new_pairs, lookback_days) {
            Some(text) => deliver_alert(self.sink.as_ref(), &text).await,
            None => {
                info!("No new pairs flagged, skipping notification");
                0
            }
        };

        Ok(PassReport {
            record,
            summary: outcome.summary,
            new_pairs,
            history_saved,
            alerts_sent,
        })
    }
}
