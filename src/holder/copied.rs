//! Copied Holder Module
//!
//! Holder that keeps its value as a live object and hands out copies.

use crate::error::Result;
use crate::holder::{EntryMetadata, ValueHolder, NO_EXPIRE, UNASSIGNED_ID};

// == Copied Holder ==
/// Stores one cache entry as a live value, cloned on every read.
///
/// Usually the source when a live entry gets promoted into a
/// `SerializedHolder`.
#[derive(Debug, Clone)]
pub struct CopiedHolder<V> {
    meta: EntryMetadata,
    value: V,
}

impl<V: Clone> CopiedHolder<V> {
    /// Creates an unassigned holder that never expires.
    pub fn new(value: V, creation_time: u64, veto: bool) -> Self {
        Self::with_id(UNASSIGNED_ID, value, creation_time, NO_EXPIRE, veto)
    }

    pub fn with_id(id: i64, value: V, creation_time: u64, expiration_time: u64, veto: bool) -> Self {
        Self {
            meta: EntryMetadata::new(id, creation_time, expiration_time, veto),
            value,
        }
    }
}

impl<V: Clone> ValueHolder<V> for CopiedHolder<V> {
    fn value(&self) -> Result<V> {
        Ok(self.value.clone())
    }

    fn metadata(&self) -> &EntryMetadata {
        &self.meta
    }

    fn metadata_mut(&mut self) -> &mut EntryMetadata {
        &mut self.meta
    }
}
