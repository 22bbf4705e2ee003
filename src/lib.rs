//! Volscan - Uniswap v2 pair volume anomaly scanner
//! Built with Domain-Driven Design principles

pub mod app;
pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod shared;

// Re-export main types for convenience
pub use application::{ScanService, Scheduler, VolumeScanner};
pub use domain::anomaly::{classify, ScanPolicy, Verdict};
pub use domain::scan::{ScanHistory, ScanRecord};
