//! Rolling window of past scan records

use std::collections::{HashSet, VecDeque};

use super::ScanRecord;

/// How many records the history keeps by default
pub const DEFAULT_MAX_HISTORY: usize = 5;

/// Past scans, oldest first, capped at `capacity`
#[derive(Debug, Clone, PartialEq)]
pub struct ScanHistory {
    records: VecDeque<ScanRecord>,
    capacity: usize,
}

impl ScanHistory {
    pub fn new(capacity: usize) -> Self {
        Self {
            records: VecDeque::new(),
            capacity: capacity.max(1),
        }
    }

    /// Keeps the newest `capacity` records
    pub fn from_records(records: Vec<ScanRecord>, capacity: usize) -> Self {
        let mut history = Self::new(capacity);
        for record in records {
            history.push(record);
        }
        history
    }

    /// Append a record, returning the evicted oldest one when full
    pub fn push(&mut self, record: ScanRecord) -> Option<ScanRecord> {
        let evicted = if self.records.len() >= self.capacity {
            self.records.pop_front()
        } else {
            None
        };
        self.records.push_back(record);
        evicted
    }

    pub fn last(&self) -> Option<&ScanRecord> {
        self.records.back()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn records(&self) -> impl Iterator<Item = &ScanRecord> {
        self.records.iter()
    }

    /// Names flagged in `current` that the latest stored scan did not flag.
    /// With no history every flagged name is new.
    pub fn newly_flagged(&self, current: &ScanRecord) -> Vec<String> {
        let previous: HashSet<&str> = self
            .last()
            .map(|r| r.pair_names().collect())
            .unwrap_or_default();

        let mut seen = HashSet::new();
        current
            .pair_names()
            .filter(|name| !previous.contains(name) && seen.insert(*name))
            .map(str::to_string)
            .collect()
    }
}

impl Default for ScanHistory {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_HISTORY)
    }
}
