//! Domain layer - core business logic and entities

pub mod anomaly;
pub mod market;
pub mod scan;
pub mod timeline;
pub mod volume;
