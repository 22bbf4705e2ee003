//! Uniswap v2 subgraph: pair ranking and historical pair volume

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use tracing::info;

use super::SubgraphClient;
use crate::domain::market::{PairDiscovery, PairVolumeSource};
use crate::shared::errors::SourceError;
use crate::shared::types::{BlockHeight, Pair, Token};

/// The Graph caps `first` at 1000 per query
const PAGE_SIZE: usize = 1000;

const TOP_PAIRS_QUERY: &str = r#"
query ($first: Int!, $skip: Int!) {
  pairs(first: $first, skip: $skip, orderBy: txCount, orderDirection: desc) {
    id
    token0 { id symbol name }
    token1 { id symbol name }
  }
}
"#;

const PAIR_VOLUME_QUERY: &str = r#"
query ($id: ID!, $number: Int!) {
  pair(id: $id, block: { number: $number }) {
    volumeUSD
  }
}
"#;

#[derive(Debug, Deserialize)]
struct PairsData {
    pairs: Vec<PairDto>,
}

#[derive(Debug, Deserialize)]
struct PairDto {
    id: String,
    token0: TokenDto,
    token1: TokenDto,
}

#[derive(Debug, Deserialize)]
struct TokenDto {
    id: String,
    symbol: String,
    name: String,
}

#[derive(Debug, Deserialize)]
struct PairVolumeData {
    pair: Option<PairVolumeDto>,
}

#[derive(Debug, Deserialize)]
struct PairVolumeDto {
    #[serde(rename = "volumeUSD")]
    volume_usd: String,
}

impl From<TokenDto> for Token {
    fn from(dto: TokenDto) -> Self {
        Token {
            id: dto.id,
            symbol: dto.symbol,
            name: dto.name,
        }
    }
}

impl From<PairDto> for Pair {
    fn from(dto: PairDto) -> Self {
        Pair {
            address: dto.id,
            token0: dto.token0.into(),
            token1: dto.token1.into(),
        }
    }
}

fn parse_volume(data: PairVolumeData) -> Result<Option<f64>, SourceError> {
    data.pair
        .map(|p| {
            p.volume_usd
                .parse::<f64>()
                .map_err(|e| SourceError::Decode(format!("volumeUSD {:?}: {}", p.volume_usd, e)))
        })
        .transpose()
}

/// Uniswap v2 subgraph
#[derive(Debug, Clone)]
pub struct UniswapSubgraph {
    client: SubgraphClient,
}

impl UniswapSubgraph {
    pub fn new(client: SubgraphClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl PairDiscovery for UniswapSubgraph {
    async fn top_pairs(&self, skip: usize, first: usize) -> Result<Vec<Pair>, SourceError> {
        let mut pairs = Vec::with_capacity(first);

        while pairs.len() < first {
            let page = (first - pairs.len()).min(PAGE_SIZE);
            let offset = skip + pairs.len();
            let data: PairsData = self
                .client
                .query(TOP_PAIRS_QUERY, json!({ "first": page, "skip": offset }))
                .await?;

            let fetched = data.pairs.len();
            pairs.extend(data.pairs.into_iter().map(Pair::from));
            if fetched < page {
                break;
            }
        }

        info!("📥 Fetched {} pairs from {}", pairs.len(), self.client.url());
        Ok(pairs)
    }
}

#[async_trait]
impl PairVolumeSource for UniswapSubgraph {
    async fn cumulative_volume_at(
        &self,
        pair: &str,
        block: BlockHeight,
    ) -> Result<Option<f64>, SourceError> {
        let data: PairVolumeData = self
            .client
            .query(PAIR_VOLUME_QUERY, json!({ "id": pair, "number": block }))
            .await?;
        parse_volume(data)
    }
}
