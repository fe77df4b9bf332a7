//! Duplicate detection: bounded hashing, aggregation, and the scan engine.

pub mod aggregator;
pub mod engine;
pub mod groups;
pub mod pool;

pub use aggregator::GroupAggregator;
pub use engine::{EngineConfig, EngineError, ScanEngine};
pub use groups::{DuplicateGroup, ScanResult};
pub use pool::{HashPool, PoolStats, DEFAULT_CONCURRENCY};
