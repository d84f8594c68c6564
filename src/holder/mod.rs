//! Holder Module
//!
//! Storage cells used by the in-memory tier: entry metadata plus either a
//! live value or its encoded form.

mod copied;
mod metadata;
mod serialized;


use bytes::Bytes;

use crate::error::Result;

// Re-export public types
pub use copied::CopiedHolder;
pub use metadata::{current_timestamp_ms, EntryMetadata, Expiry, TimeUnit};
pub use serialized::SerializedHolder;

// == Public Constants ==
/// Identity of a holder the store has not assigned yet
pub const UNASSIGNED_ID: i64 = -1;

/// Expiration time of an entry that never expires
pub const NO_EXPIRE: u64 = u64::MAX;

// == Value Holder Trait ==
/// Common view over a stored entry and its bookkeeping.
///
/// Implementors embed an `EntryMetadata` and expose it here; every accessor
/// has a default built on top of it.
pub trait ValueHolder<V> {
    /// Returns the stored value.
    fn value(&self) -> Result<V>;

    fn metadata(&self) -> &EntryMetadata;

    fn metadata_mut(&mut self) -> &mut EntryMetadata;

    fn id(&self) -> i64 {
        self.metadata().id()
    }

    fn creation_time(&self, unit: TimeUnit) -> u64 {
        unit.from_millis(self.metadata().creation_time())
    }

    fn expiration_time(&self, unit: TimeUnit) -> u64 {
        unit.from_millis(self.metadata().expiration_time())
    }

    fn last_access_time(&self, unit: TimeUnit) -> u64 {
        unit.from_millis(self.metadata().last_access_time())
    }

    fn hits(&self) -> u64 {
        self.metadata().hits()
    }

    fn veto(&self) -> bool {
        self.metadata().veto()
    }

    /// Checks expiry at `now`, given in `unit`.
    fn is_expired(&self, now: u64, unit: TimeUnit) -> bool {
        self.metadata().is_expired(unit.to_millis(now))
    }

    /// Records an access at `now` (milliseconds), see `EntryMetadata::accessed`.
    fn accessed(&mut self, now: u64, expiry: Option<Expiry>) {
        self.metadata_mut().accessed(now, expiry);
    }
}

// == Binary Value Holder Trait ==
/// Holder able to hand out its value in encoded form without decoding.
pub trait BinaryValueHolder {
    /// Returns an independent view over the encoded value.
    fn binary_value(&self) -> Bytes;

    fn is_binary_value_available(&self) -> bool;
}
