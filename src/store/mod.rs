//! Local Cache Storage
//!
//! The per-process half of the cache: a byte-bounded LRU engine, the
//! immutable value type it stores, and the mutex shell that makes the pair
//! safe to share across request tasks.
//!
//! ## Core Concepts
//! - **Byte budget**: capacity is a ceiling on `Σ (key length + value length)`,
//!   not an entry count. `lru` evicts tail-first until the sum fits.
//! - **Immutable values**: `view::ByteView` hands out copies or read-only
//!   borrows, never a mutable alias into the cache.
//! - **Lazy construction**: `cache::ConcurrentCache` only builds the engine
//!   on the first write, so idle groups cost nothing.

pub mod cache;
pub mod lru;
pub mod view;

pub use cache::ConcurrentCache;
pub use lru::{ByteSized, EvictionCallback, LruCache};
pub use view::ByteView;
