//! Alert text for a finished scan

use std::collections::HashSet;

use chrono::{DateTime, Utc};

use crate::domain::scan::ScanRecord;

const PAIR_EXPLORER_URL: &str = "https://www.dextools.io/app/uniswap/pair-explorer";
const NEW_TAG: &str = "**NEW** ";
const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S UTC";

fn format_time(time: DateTime<Utc>) -> String {
    time.format(TIME_FORMAT).to_string()
}

/// Build the alert for `record`, listing every flagged pair and tagging the
/// ones in `new_pairs`. `None` when nothing new was flagged.
pub fn format_alert(record: &ScanRecord, new_pairs: &[String], lookback_days: u32) -> Option<String> {
    if new_pairs.is_empty() {
        return None;
    }
    let new_pairs: HashSet<&str> = new_pairs.iter().map(String::as_str).collect();

    let end = record.end_time.unwrap_or(record.start_time);
    let mut out = format!(
        "~~~ \n Scanned {} pairs from {} to {}.\n{}",
        record.num_searched,
        format_time(record.start_time),
        format_time(end),
        record.policy.headline(lookback_days)
    );

    for pair in &record.pairs {
        let tag = if new_pairs.contains(pair.name.as_str()) {
            NEW_TAG
        } else {
            ""
        };
        out.push_str(&format!(
            "\n - {}{}: [dextools]({}/{})",
            tag, pair.name, PAIR_EXPLORER_URL, pair.address
        ));
    }

    Some(out)
}
