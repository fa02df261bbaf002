//! Node configuration from environment variables.

use std::env;

/// Tunables every node reads at startup. Flags on the command line cover
/// identity and topology; these cover sizing.
#[derive(Debug, Clone)]
pub struct Config {
    /// Per-group cache budget in bytes.
    pub cache_bytes: u64,
}

impl Config {
    /// Loads configuration from the environment.
    ///
    /// - `CACHE_BYTES`: per-group byte budget (default: 2 MiB)
    pub fn from_env() -> Self {
        Self {
            cache_bytes: env::var("CACHE_BYTES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(2 << 20),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cache_bytes: 2 << 20,
        }
    }
}
