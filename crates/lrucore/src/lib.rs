//! # lrucore
//!
//! Bounded least-recently-used cache.
//!
//! ## Architecture
//! - **Index**: AHash map from key to entry handle (O(1))
//! - **Recency list**: doubly-linked list over an entry arena, head = LRU,
//!   tail = MRU (O(1) promote and evict)
//! - **Errors**: one [`Error`] enum with stable numeric [`ErrorCode`]s
//!
//! ```
//! use lrucore::Cache;
//!
//! let mut cache = Cache::new(2)?;
//! cache.insert("a", 1)?;
//! cache.insert("b", 2)?;
//! cache.get(&"a")?;
//! cache.insert("c", 3)?; // evicts "b"
//!
//! assert!(!cache.contains(&"b"));
//! assert_eq!(cache.tail().unwrap().key(), &"c");
//! # Ok::<(), lrucore::Error>(())
//! ```
//!
//! Single owner only: share a cache across threads by wrapping it in a lock.

#![warn(missing_docs)]

mod cache;
mod config;
mod entry;
mod error;
mod list;
mod stats;
mod value;

pub use cache::Cache;
pub use config::{CacheConfig, DEFAULT_MAX_SIZE};
pub use entry::{Entry, EntryId, EntryState};
pub use error::{Error, ErrorCode, Result};
pub use list::Iter;
pub use stats::CacheStats;
pub use value::Value;
