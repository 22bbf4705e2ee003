//! Result of one scan pass

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::anomaly::ScanPolicy;
use crate::shared::types::Pair;
use crate::shared::utils::generate_id;

/// A pair the classifier flagged during a pass
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlaggedPair {
    pub name: String,
    pub address: String,
    pub time: DateTime<Utc>,
}

/// Scan pass record. Append-only until sealed with an end time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanRecord {
    pub id: String,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    pub num_searched: usize,
    pub policy: ScanPolicy,
    pub pairs: Vec<FlaggedPair>,
}

impl ScanRecord {
    pub fn start(policy: ScanPolicy, start_time: DateTime<Utc>) -> Self {
        Self {
            id: generate_id(),
            start_time,
            end_time: None,
            num_searched: 0,
            policy,
            pairs: Vec::new(),
        }
    }

    pub fn flag(&mut self, pair: &Pair, time: DateTime<Utc>) {
        debug_assert!(self.end_time.is_none(), "flag on a sealed scan record");
        self.pairs.push(FlaggedPair {
            name: pair.display_name(),
            address: pair.address.clone(),
            time,
        });
    }

    pub fn seal(mut self, end_time: DateTime<Utc>) -> Self {
        self.end_time = Some(end_time);
        self
    }

    pub fn is_sealed(&self) -> bool {
        self.end_time.is_some()
    }

    pub fn pair_names(&self) -> impl Iterator<Item = &str> {
        self.pairs.iter().map(|p| p.name.as_str())
    }
}
