//! Bounded, persisted caching for listing queries.
//!
//! The cache is an ordered key/value map with FIFO eviction and write-through
//! persistence: every insertion rewrites one durable snapshot record, and a
//! snapshot that fails to parse at startup simply yields an empty cache.

mod bounded;
mod snapshot;

pub use bounded::BoundedCache;
pub use snapshot::{NoopSnapshot, SnapshotStore, SqliteSnapshot};

#[cfg(test)]
pub use snapshot::MemorySnapshot;
