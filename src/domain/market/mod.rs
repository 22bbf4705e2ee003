//! Market domain - the remote data the scanner consumes

mod market_source;

pub use market_source::{BlockSource, PairDiscovery, PairVolumeSource};
