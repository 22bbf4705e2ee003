//! Infrastructure layer - remote sources, delivery, persistence and rendering

pub mod chart;
pub mod notify;
pub mod storage;
pub mod subgraph;
