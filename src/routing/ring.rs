//! Consistent Hash Ring
//!
//! Maps keys to peer identities so that every node computes the same owner
//! for a given key independently, and so that adding or removing one peer
//! only remaps the keys adjacent to its ring positions.
//!
//! ## Mechanism
//! - **Virtual nodes**: each real peer is hashed onto the ring `replicas`
//!   times (virtual key = replica index concatenated with the peer name),
//!   which smooths key distribution across a small fleet.
//! - **Successor search**: a key is owned by the first virtual node at or
//!   after its hash, wrapping past the top of the ring back to the start.

use std::collections::HashMap;

/// Ring hash function: bytes in, unsigned 32-bit position out.
pub type HashFn = Box<dyn Fn(&[u8]) -> u32 + Send + Sync>;

pub struct HashRing {
    hash: HashFn,
    /// Virtual nodes per real peer.
    replicas: usize,
    /// Sorted virtual-node positions.
    ring: Vec<u32>,
    /// Virtual-node position -> real peer identity.
    owners: HashMap<u32, String>,
}

impl HashRing {
    /// Creates a ring with `replicas` virtual nodes per peer. `hash`
    /// defaults to CRC-32/IEEE when not given.
    pub fn new(replicas: usize, hash: Option<HashFn>) -> Self {
        Self {
            hash: hash.unwrap_or_else(|| Box::new(crc32fast::hash)),
            replicas,
            ring: Vec::new(),
            owners: HashMap::new(),
        }
    }

    /// Registers peers, inserting `replicas` virtual nodes for each, and
    /// re-sorts the ring.
    ///
    /// Virtual-node collisions between distinct peers are not detected;
    /// the last writer wins.
    pub fn add<S: AsRef<str>>(&mut self, peers: impl IntoIterator<Item = S>) {
        for peer in peers {
            let peer = peer.as_ref();
            for i in 0..self.replicas {
                let hash = (self.hash)(format!("{i}{peer}").as_bytes());
                self.ring.push(hash);
                self.owners.insert(hash, peer.to_string());
            }
        }
        self.ring.sort_unstable();
    }

    /// Removes a peer's virtual nodes from the ring.
    pub fn remove(&mut self, peer: &str) {
        for i in 0..self.replicas {
            let hash = (self.hash)(format!("{i}{peer}").as_bytes());
            if let Ok(idx) = self.ring.binary_search(&hash) {
                self.ring.remove(idx);
            }
            self.owners.remove(&hash);
        }
    }

    /// The peer owning `key`, or `None` on an empty ring.
    pub fn get(&self, key: &str) -> Option<&str> {
        if self.ring.is_empty() {
            return None;
        }

        let hash = (self.hash)(key.as_bytes());
        // First virtual node at or after the key's hash, wrapping around.
        let idx = self.ring.partition_point(|&h| h < hash) % self.ring.len();
        self.owners.get(&self.ring[idx]).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.ring.is_empty()
    }

    /// Number of virtual nodes on the ring.
    pub fn len(&self) -> usize {
        self.ring.len()
    }
}
