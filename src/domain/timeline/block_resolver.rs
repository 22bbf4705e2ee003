//! Time-to-block resolution

use tracing::{debug, warn};

use crate::domain::market::BlockSource;
use crate::shared::errors::ResolveError;
use crate::shared::types::{BlockHeight, Timestamp, SECONDS_PER_DAY};
use crate::shared::utils::Throttle;

/// Timestamps and the block heights resolved for them, index for index
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockTimeline {
    pub timestamps: Vec<Timestamp>,
    pub blocks: Vec<BlockHeight>,
}

impl BlockTimeline {
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Indices whose block is lower than the one before it
    pub fn regressions(&self) -> Vec<usize> {
        self.blocks
            .windows(2)
            .enumerate()
            .filter_map(|(i, w)| (w[1] < w[0]).then_some(i + 1))
            .collect()
    }
}

/// `[t0 - 24h*days, ..., t0 - 24h, t0]`, oldest first, `days + 1` entries.
pub fn generate_baseline_timestamps(t0: Timestamp, days: u32) -> Vec<Timestamp> {
    let days = days as i64;
    (0..=days).map(|i| t0 - SECONDS_PER_DAY * (days - i)).collect()
}

/// Resolve each timestamp to the first block strictly after it.
///
/// One lookup per timestamp, throttled. Any missing block fails the whole
/// resolution: every pair is aligned against the full sequence.
pub async fn resolve_blocks<S>(
    source: &S,
    timestamps: &[Timestamp],
    throttle: &Throttle,
) -> Result<BlockTimeline, ResolveError>
where
    S: BlockSource + ?Sized,
{
    let mut blocks = Vec::with_capacity(timestamps.len());

    for (i, &timestamp) in timestamps.iter().enumerate() {
        if i > 0 {
            throttle.pause().await;
        }

        let block = source
            .first_block_after(timestamp)
            .await
            .map_err(|err| ResolveError::Lookup { timestamp, source: err })?
            .ok_or(ResolveError::NoBlockAfter(timestamp))?;

        debug!("Timestamp {} -> block {}", timestamp, block.number);
        blocks.push(block.number);
    }

    let timeline = BlockTimeline {
        timestamps: timestamps.to_vec(),
        blocks,
    };
    for i in timeline.regressions() {
        warn!(
            "⚠️ Block index went backwards: {} -> {} at timestamp {}",
            timeline.blocks[i - 1], timeline.blocks[i], timeline.timestamps[i]
        );
    }
    Ok(timeline)
}
