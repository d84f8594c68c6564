//! Configuration Module
//!
//! Handles loading holder settings for the in-memory tier from environment variables.

use std::env;
use std::time::Duration;

use crate::codec::CodecKind;
use crate::holder::Expiry;

/// Tier configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Encoding used for serialized holders
    pub codec: CodecKind,
    /// Default TTL in seconds applied on access, 0 = never expire
    pub default_ttl: u64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `HOLDER_CODEC` - `bincode` or `json` (default: bincode)
    /// - `HOLDER_DEFAULT_TTL` - Default TTL in seconds, 0 disables expiry (default: 0)
    pub fn from_env() -> Self {
        Self {
            codec: env::var("HOLDER_CODEC")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or_default(),
            default_ttl: env::var("HOLDER_DEFAULT_TTL")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(0),
        }
    }

    /// Returns the expiry applied when an entry is accessed.
    pub fn expiry(&self) -> Expiry {
        if self.default_ttl == 0 {
            Expiry::Infinite
        } else {
            Expiry::After(Duration::from_secs(self.default_ttl))
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            codec: CodecKind::Bincode,
            default_ttl: 0,
        }
    }
}
