//! Common types used across the application

use serde::{Deserialize, Serialize};

/// Seconds since the Unix epoch
pub type Timestamp = i64;

/// On-chain block number
pub type BlockHeight = u64;

pub const SECONDS_PER_DAY: i64 = 24 * 60 * 60;

/// Token representation
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Token {
    pub id: String,
    pub symbol: String,
    pub name: String,
}

/// A two-token market on the exchange
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Pair {
    pub address: String,
    pub token0: Token,
    pub token1: Token,
}

impl Pair {
    /// "SYMBOL0-SYMBOL1", used in alerts, history and chart file names
    pub fn display_name(&self) -> String {
        format!("{}-{}", self.token0.symbol, self.token1.symbol)
    }
}

/// Block as reported by the block index
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    pub id: String,
    pub number: BlockHeight,
    pub timestamp: Timestamp,
}
