//! UTF-8 string codec.

use bytes::Bytes;

use crate::codec::Codec;
use crate::error::{HolderError, Result};

/// Stores `String` values as their raw UTF-8 bytes.
#[derive(Debug, Clone, Copy, Default)]
pub struct Utf8Codec;

impl Codec<String> for Utf8Codec {
    fn encode(&self, value: &String) -> Result<Bytes> {
        Ok(Bytes::copy_from_slice(value.as_bytes()))
    }

    fn decode(&self, bytes: Bytes) -> Result<String> {
        String::from_utf8(bytes.to_vec()).map_err(HolderError::serializer)
    }

    // Byte comparison is exact for UTF-8, no decode needed
    fn equals(&self, value: &String, bytes: Bytes) -> Result<bool> {
        Ok(value.as_bytes() == bytes.as_ref())
    }
}
