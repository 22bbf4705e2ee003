//! Ethereum blocks subgraph: timestamp to block lookups

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

use super::SubgraphClient;
use crate::domain::market::BlockSource;
use crate::shared::errors::SourceError;
use crate::shared::types::{Block, Timestamp};

const BLOCK_AFTER_QUERY: &str = r#"
query ($timestamp_gt: BigInt!) {
  blocks(first: 1, orderBy: timestamp, orderDirection: asc, where: { timestamp_gt: $timestamp_gt }) {
    id
    number
    timestamp
  }
}
"#;

#[derive(Debug, Deserialize)]
struct BlocksData {
    blocks: Vec<BlockDto>,
}

// The subgraph serializes BigInt fields as strings
#[derive(Debug, Deserialize)]
struct BlockDto {
    id: String,
    number: String,
    timestamp: String,
}

impl TryFrom<BlockDto> for Block {
    type Error = SourceError;

    fn try_from(dto: BlockDto) -> Result<Self, Self::Error> {
        let number = dto
            .number
            .parse()
            .map_err(|e| SourceError::Decode(format!("block number {:?}: {}", dto.number, e)))?;
        let timestamp = dto
            .timestamp
            .parse()
            .map_err(|e| SourceError::Decode(format!("block timestamp {:?}: {}", dto.timestamp, e)))?;
        Ok(Block {
            id: dto.id,
            number,
            timestamp,
        })
    }
}

fn first_block(data: BlocksData) -> Result<Option<Block>, SourceError> {
    data.blocks.into_iter().next().map(Block::try_from).transpose()
}

/// Block index subgraph
#[derive(Debug, Clone)]
pub struct BlockSubgraph {
    client: SubgraphClient,
}

impl BlockSubgraph {
    pub fn new(client: SubgraphClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl BlockSource for BlockSubgraph {
    async fn first_block_after(&self, timestamp: Timestamp) -> Result<Option<Block>, SourceError> {
        let data: BlocksData = self
            .client
            .query(BLOCK_AFTER_QUERY, json!({ "timestamp_gt": timestamp.to_string() }))
            .await?;
        first_block(data)
    }
}
