//! # Lotmap Core
//!
//! Concurrent aggregation of resting quantity by symbol and price.
//!
//! ## Design Principles
//! - Same-price inserts sum, never overwrite
//! - One reader/writer lock over the whole two-level map
//! - Move-only atomic leaf counters
//! - Snapshots are owned copies taken at a single instant

#![forbid(unsafe_code)]

pub mod config;
pub mod error;
pub mod lot;
pub mod map;
pub mod price;
pub mod snapshot;

pub use config::{MapConfig, QuantityPolicy};
pub use error::MapError;
pub use lot::LotSize;
pub use map::AggregatingOrderMap;
pub use price::Price;
pub use snapshot::{Level, Snapshot, SnapshotIter, SymbolLevels};
