//! Decoded tile cache.
//!
//! Keeps the canonical decoded [`VectorTile`](crate::decode::VectorTile) per
//! tile address and coalesces concurrent misses so each address is fetched
//! and decoded at most once at a time. Optional capacity bounds memory with
//! least-recently-used eviction.

mod coalesce;
mod decode_cache;
mod memory;
mod stats;

pub use decode_cache::DecodeCache;
pub use memory::MemoryStore;
pub use stats::CacheStats;
