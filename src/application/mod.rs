//! Application layer - scan passes, alerts and scheduling

pub mod alerts;
pub mod scan_service;
pub mod scheduler;
pub mod volume_scanner;

pub use alerts::format_alert;
pub use scan_service::{PassReport, ScanService};
pub use scheduler::{Scheduler, Sleeper, TokioSleeper};
pub use volume_scanner::{ScanOutcome, ScanSettings, ScanSummary, VolumeScanner};
