/// In-memory caches owned by the monitor
///
/// - `manager`: write-once keyed cache with hit/miss metrics
/// - `bounded_set`: insertion-ordered set with optional FIFO eviction
pub mod bounded_set;
pub mod manager;

pub use bounded_set::BoundedSet;
pub use manager::{CacheManager, CacheMetrics};
