//! Scan history as a pretty-printed JSON array

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use super::HistoryStore;
use crate::domain::scan::{ScanHistory, ScanRecord};
use crate::shared::errors::HistoryError;

/// JSON file holding the most recent scan records, oldest first
#[derive(Debug, Clone)]
pub struct JsonHistoryStore {
    path: PathBuf,
    capacity: usize,
}

impl JsonHistoryStore {
    pub fn new(path: impl Into<PathBuf>, capacity: usize) -> Self {
        Self {
            path: path.into(),
            capacity,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl HistoryStore for JsonHistoryStore {
    fn load(&self) -> Result<ScanHistory, HistoryError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("No history at {}, starting fresh", self.path.display());
                return Ok(ScanHistory::new(self.capacity));
            }
            Err(e) => return Err(e.into()),
        };

        let records: Vec<ScanRecord> = serde_json::from_str(&content)?;
        Ok(ScanHistory::from_records(records, self.capacity))
    }

    fn save(&self, history: &ScanHistory) -> Result<(), HistoryError> {
        let records: Vec<&ScanRecord> = history.records().collect();
        let json = serde_json::to_string_pretty(&records)?;

        // Write then rename so a crash never leaves a half-written file
        let tmp = self.temp_path();
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;

        info!("💾 Wrote {} scan records to {}", history.len(), self.path.display());
        Ok(())
    }

    fn capacity(&self) -> usize {
        self.capacity
    }
}
