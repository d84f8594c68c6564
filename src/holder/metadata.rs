//! Entry Metadata Module
//!
//! Per-entry bookkeeping shared by every holder variant: identity, timestamps,
//! veto flag and access statistics.

use std::hash::{Hash, Hasher};
use std::time::Duration;

use crate::holder::{NO_EXPIRE, UNASSIGNED_ID};

// == Time Unit ==
/// Unit used when reading holder timestamps.
///
/// Timestamps are stored natively in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeUnit {
    Nanoseconds,
    Microseconds,
    Milliseconds,
    Seconds,
}

impl TimeUnit {
    /// Converts a native millisecond timestamp into this unit.
    ///
    /// `NO_EXPIRE` is returned unchanged. Finite values saturate at
    /// `NO_EXPIRE - 1` so they never read back as "never expires".
    pub fn from_millis(self, millis: u64) -> u64 {
        if millis == NO_EXPIRE {
            return NO_EXPIRE;
        }
        let converted = match self {
            TimeUnit::Nanoseconds => millis.saturating_mul(1_000_000),
            TimeUnit::Microseconds => millis.saturating_mul(1_000),
            TimeUnit::Milliseconds => millis,
            TimeUnit::Seconds => millis / 1_000,
        };
        converted.min(NO_EXPIRE - 1)
    }

    /// Converts a timestamp in this unit into native milliseconds.
    ///
    /// Coarser units saturate instead of overflowing.
    pub fn to_millis(self, value: u64) -> u64 {
        match self {
            TimeUnit::Nanoseconds => value / 1_000_000,
            TimeUnit::Microseconds => value / 1_000,
            TimeUnit::Milliseconds => value,
            TimeUnit::Seconds => value.saturating_mul(1_000),
        }
    }
}

// == Expiry ==
/// Expiry computed by the store's policy for an access.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expiry {
    /// The entry never expires
    Infinite,
    /// The entry expires this long after the access
    After(Duration),
}

// == Entry Metadata ==
/// Bookkeeping embedded in every holder.
///
/// Equality and hashing only consider identity, creation time, expiration time
/// and veto. Hits and last-access time are statistics and never affect them.
#[derive(Debug, Clone)]
pub struct EntryMetadata {
    /// Store-assigned identity, `UNASSIGNED_ID` until assigned
    id: i64,
    /// Creation timestamp (milliseconds)
    creation_time: u64,
    /// Expiration timestamp (milliseconds), `NO_EXPIRE` = never
    expiration_time: u64,
    /// Excludes the entry from some automatic store behaviors
    veto: bool,
    /// Number of recorded hits
    hits: u64,
    /// Last access timestamp (milliseconds)
    last_access_time: u64,
}

impl EntryMetadata {
    // == Constructor ==
    /// Creates metadata for a fresh entry.
    ///
    /// Last-access starts at the creation time and hits at zero.
    pub fn new(id: i64, creation_time: u64, expiration_time: u64, veto: bool) -> Self {
        Self {
            id,
            creation_time,
            expiration_time,
            veto,
            hits: 0,
            last_access_time: creation_time,
        }
    }

    /// Creates unassigned metadata that never expires.
    pub fn unassigned(creation_time: u64, veto: bool) -> Self {
        Self::new(UNASSIGNED_ID, creation_time, NO_EXPIRE, veto)
    }

    pub fn id(&self) -> i64 {
        self.id
    }

    pub fn creation_time(&self) -> u64 {
        self.creation_time
    }

    pub fn expiration_time(&self) -> u64 {
        self.expiration_time
    }

    pub fn veto(&self) -> bool {
        self.veto
    }

    pub fn hits(&self) -> u64 {
        self.hits
    }

    pub fn last_access_time(&self) -> u64 {
        self.last_access_time
    }

    // == Is Expired ==
    /// Checks if the entry has expired at `now` (milliseconds).
    ///
    /// An entry is expired once `now` reaches its expiration time.
    pub fn is_expired(&self, now: u64) -> bool {
        self.expiration_time != NO_EXPIRE && self.expiration_time <= now
    }

    // == Accessed ==
    /// Records an access at `now` (milliseconds).
    ///
    /// `None` keeps the current expiration time. The hit count is left alone;
    /// the store bumps it separately with `record_hit`.
    pub fn accessed(&mut self, now: u64, expiry: Option<Expiry>) {
        match expiry {
            Some(Expiry::Infinite) => self.expiration_time = NO_EXPIRE,
            Some(Expiry::After(ttl)) => {
                let ttl_ms = u64::try_from(ttl.as_millis()).unwrap_or(u64::MAX);
                self.expiration_time = now.saturating_add(ttl_ms);
            }
            None => {}
        }
        self.last_access_time = now;
    }

    // == Hits ==
    /// Increments the hit counter.
    pub fn record_hit(&mut self) {
        self.hits = self.hits.saturating_add(1);
    }

    /// Overwrites the hit counter, used when carrying stats across tiers.
    pub fn set_hits(&mut self, hits: u64) {
        self.hits = hits;
    }
}

impl PartialEq for EntryMetadata {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
            && self.creation_time == other.creation_time
            && self.expiration_time == other.expiration_time
            && self.veto == other.veto
    }
}

impl Eq for EntryMetadata {}

impl Hash for EntryMetadata {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.creation_time.hash(state);
        self.expiration_time.hash(state);
        self.id.hash(state);
        self.veto.hash(state);
    }
}

// == Utility Functions ==
/// Returns current Unix timestamp in milliseconds.
pub fn current_timestamp_ms() -> u64 {
    u64::try_from(chrono::Utc::now().timestamp_millis()).unwrap_or(0)
}
