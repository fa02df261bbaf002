//! Key Routing
//!
//! Decides which peer owns a key. Every node holds the same peer list and
//! computes ownership locally over a consistent-hash ring, so no
//! coordination traffic is needed to route a lookup.

pub mod ring;

pub use ring::{HashFn, HashRing};

#[cfg(test)]
mod tests;
