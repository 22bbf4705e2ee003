//! The Graph subgraph access - GraphQL over HTTP

mod block_subgraph;
mod subgraph_client;
mod uniswap_subgraph;

pub use block_subgraph::BlockSubgraph;
pub use subgraph_client::{RetryPolicy, SubgraphClient};
pub use uniswap_subgraph::UniswapSubgraph;

pub const DEFAULT_EXCHANGE_URL: &str = "https://api.thegraph.com/subgraphs/name/uniswap/uniswap-v2";
pub const DEFAULT_BLOCKS_URL: &str =
    "https://api.thegraph.com/subgraphs/name/blocklytics/ethereum-blocks";
