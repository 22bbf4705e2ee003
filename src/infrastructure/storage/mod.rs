//! Scan history persistence

mod json_history;

pub use json_history::JsonHistoryStore;

use tracing::warn;

use crate::domain::scan::ScanHistory;
use crate::shared::errors::HistoryError;

pub const DEFAULT_HISTORY_PATH: &str = "data.json";

/// Where past scan records live between passes
pub trait HistoryStore: Send + Sync {
    fn load(&self) -> Result<ScanHistory, HistoryError>;

    fn save(&self, history: &ScanHistory) -> Result<(), HistoryError>;

    /// Capacity new histories are created with
    fn capacity(&self) -> usize;

    /// Load, treating an unreadable or malformed store as empty
    fn load_or_empty(&self) -> ScanHistory {
        match self.load() {
            Ok(history) => history,
            Err(e) => {
                warn!("⚠️ Scan history unreadable, starting from empty history: {}", e);
                ScanHistory::new(self.capacity())
            }
        }
    }
}
