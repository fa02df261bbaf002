//! Distributed Group Cache Library
//!
//! This library crate defines the core of a small distributed in-memory
//! cache. It serves as the foundation for the node binary (`main.rs`).
//!
//! ## Architecture Modules
//! A read flows through four loosely coupled subsystems:
//!
//! - **`group`**: The coordination layer. A group is a named cache
//!   namespace that resolves every lookup against the local cache, the
//!   owning peer, or the source-of-truth loader, in that order.
//! - **`store`**: The per-process storage layer. A byte-budgeted LRU engine
//!   behind a mutex shell, storing immutable byte views.
//! - **`routing`**: The placement layer. A consistent-hash ring with
//!   virtual nodes names the owning peer for any key, identically on every
//!   node.
//! - **`peer`**: The transport layer. HTTP client and server for the
//!   peer-to-peer protocol, plus the traits the coordinator consumes.

pub mod config;
pub mod error;
pub mod group;
pub mod peer;
pub mod routing;
pub mod store;

pub use error::{CacheError, PeerError};
pub use group::{get_group, loader_fn, new_group, Group, Loader};
pub use peer::HttpPeerPool;
pub use store::ByteView;
