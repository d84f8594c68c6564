//! Codec Module
//!
//! Pluggable encode/decode/compare strategies used by serialized holders.

mod serde_codec;
mod utf8;

use bytes::Bytes;

use crate::error::Result;

pub use serde_codec::{CodecKind, SerdeCodec};
pub use utf8::Utf8Codec;

// == Codec Trait ==
/// Encode/decode/compare capability for values of type `V`.
///
/// A codec is shared between every holder that uses it, so it must be
/// stateless or internally synchronized.
pub trait Codec<V>: Send + Sync {
    /// Encodes a value into a fresh byte buffer.
    fn encode(&self, value: &V) -> Result<Bytes>;

    /// Reconstructs a value from encoded bytes.
    ///
    /// Fails with `HolderError::Serializer` on malformed or unknown input.
    fn decode(&self, bytes: Bytes) -> Result<V>;

    /// Checks whether `value` is equal to the value encoded in `bytes`.
    fn equals(&self, value: &V, bytes: Bytes) -> Result<bool>;
}
