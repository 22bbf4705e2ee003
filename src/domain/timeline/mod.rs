//! Timeline domain - aligning wall-clock days with block heights

mod block_resolver;

pub use block_resolver::{generate_baseline_timestamps, resolve_blocks, BlockTimeline};
