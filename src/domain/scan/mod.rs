//! Scan domain - records of scan passes and their rolling history

mod scan_history;
mod scan_record;

pub use scan_history::{ScanHistory, DEFAULT_MAX_HISTORY};
pub use scan_record::{FlaggedPair, ScanRecord};
