//! Cache Module
//!
//! In-memory response caching with TTL expiry and deterministic key derivation.

mod clock;
mod entry;
mod fetch;
mod key;
mod stats;
mod store;


// Re-export public types
pub use clock::{current_timestamp_ms, Clock, ManualClock, SharedClock, SystemClock};
pub use entry::CacheEntry;
pub use fetch::ResponseCache;
pub use key::{generate_key, KEY_DELIMITER};
pub use stats::CacheStats;
pub use store::CacheStore;
