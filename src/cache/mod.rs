//! In-memory LLM response caching with TTL expiry and FIFO eviction.

pub mod response_cache;

pub use response_cache::{CacheStats, ResponseCache, DEFAULT_MAX_ENTRIES, DEFAULT_TTL_SECS};
