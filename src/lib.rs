//! Mini Tier - Serialized value holders for an in-memory cache tier
//!
//! Keeps cache entries in encoded form with per-entry bookkeeping, decoding
//! lazily on read and relaying raw bytes between tiers without a decode.

pub mod codec;
pub mod config;
pub mod error;
pub mod holder;

pub use codec::{Codec, CodecKind, SerdeCodec, Utf8Codec};
pub use config::Config;
pub use error::{HolderError, Result};
pub use holder::{
    current_timestamp_ms, BinaryValueHolder, CopiedHolder, EntryMetadata, Expiry,
    SerializedHolder, TimeUnit, ValueHolder, NO_EXPIRE, UNASSIGNED_ID,
};
