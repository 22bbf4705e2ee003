//! Error handling for the application

use thiserror::Error;

/// Remote source (subgraph) errors
#[derive(Error, Debug, Clone)]
pub enum SourceError {
    #[error("HTTP transport failed: {0}")]
    Transport(String),

    #[error("Subgraph returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("GraphQL errors: {0}")]
    GraphQl(String),

    #[error("Failed to decode response: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for SourceError {
    fn from(err: reqwest::Error) -> Self {
        SourceError::Transport(err.to_string())
    }
}

/// Timestamp to block resolution errors
#[derive(Error, Debug, Clone)]
pub enum ResolveError {
    #[error("No block found after timestamp {0}")]
    NoBlockAfter(i64),

    #[error("Block lookup for timestamp {timestamp} failed: {source}")]
    Lookup {
        timestamp: i64,
        #[source]
        source: SourceError,
    },
}

/// Volume series errors
#[derive(Error, Debug, Clone)]
pub enum SeriesError {
    #[error("Pair {pair} not found at block {block}")]
    PairMissing { pair: String, block: u64 },

    #[error("Insufficient history: expected {expected} readings, got {got}")]
    InsufficientHistory { expected: usize, got: usize },

    #[error("Volume fetch failed: {0}")]
    Fetch(#[from] SourceError),
}

impl SeriesError {
    /// Data-availability conditions, as opposed to outages
    pub fn is_insufficient_history(&self) -> bool {
        matches!(
            self,
            SeriesError::PairMissing { .. } | SeriesError::InsufficientHistory { .. }
        )
    }
}

/// Errors that abort a whole scan pass
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Pair discovery failed: {0}")]
    Discovery(#[source] SourceError),

    #[error("Pair discovery returned no pairs")]
    EmptyUniverse,

    #[error("Block resolution failed: {0}")]
    Resolution(#[from] ResolveError),
}

/// Scan history persistence errors
#[derive(Error, Debug)]
pub enum HistoryError {
    #[error("History I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("History file is malformed: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Notification delivery errors
#[derive(Error, Debug)]
pub enum NotifyError {
    #[error("Webhook request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Webhook rejected message with status {0}")]
    Rejected(u16),
}

/// Chart rendering errors
#[derive(Error, Debug)]
pub enum ChartError {
    #[error("Nothing to plot")]
    EmptySeries,

    #[error("Chart I/O error: {0}")]
    Io(#[from] std::io::Error),
}
