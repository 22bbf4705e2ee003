//! Source interfaces for pairs, blocks and volumes

use async_trait::async_trait;

use crate::shared::errors::SourceError;
use crate::shared::types::{Block, BlockHeight, Pair, Timestamp};

/// Candidate pair universe
#[async_trait]
pub trait PairDiscovery: Send + Sync {
    /// Up to `first` pairs ordered by descending transaction count, skipping
    /// the `skip` most active ones.
    async fn top_pairs(&self, skip: usize, first: usize) -> Result<Vec<Pair>, SourceError>;
}

/// Block index
#[async_trait]
pub trait BlockSource: Send + Sync {
    /// Earliest block whose timestamp is strictly greater than `timestamp`.
    /// `None` when the index has no such block yet.
    async fn first_block_after(&self, timestamp: Timestamp) -> Result<Option<Block>, SourceError>;
}

/// Historical pair volume
#[async_trait]
pub trait PairVolumeSource: Send + Sync {
    /// Cumulative USD volume of `pair` as of `block`.
    /// `None` when the pair did not exist at that height.
    async fn cumulative_volume_at(
        &self,
        pair: &str,
        block: BlockHeight,
    ) -> Result<Option<f64>, SourceError>;
}
