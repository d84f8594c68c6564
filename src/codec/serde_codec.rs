//! Serde Codec Module
//!
//! Serde-backed codec with a selectable wire encoding.

use std::fmt;
use std::marker::PhantomData;
use std::str::FromStr;

use bytes::Bytes;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::codec::Codec;
use crate::config::Config;
use crate::error::{HolderError, Result};

// == Codec Kind ==
/// Encoding used by a `SerdeCodec`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CodecKind {
    /// Compact binary encoding
    #[default]
    Bincode,
    /// JSON text encoding
    Json,
}

impl FromStr for CodecKind {
    type Err = HolderError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "bincode" => Ok(CodecKind::Bincode),
            "json" => Ok(CodecKind::Json),
            other => Err(HolderError::InvalidArgument(format!(
                "unknown codec '{}'",
                other
            ))),
        }
    }
}

impl fmt::Display for CodecKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CodecKind::Bincode => write!(f, "bincode"),
            CodecKind::Json => write!(f, "json"),
        }
    }
}

// == Serde Codec ==
/// Codec for any serde-serializable value type.
///
/// Equality decodes the stored bytes and compares with `PartialEq`, so it
/// holds even for encodings that are not canonical (e.g. JSON maps).
pub struct SerdeCodec<V> {
    kind: CodecKind,
    _value: PhantomData<fn() -> V>,
}

impl<V> SerdeCodec<V> {
    /// Creates a codec using the given encoding.
    pub fn new(kind: CodecKind) -> Self {
        Self {
            kind,
            _value: PhantomData,
        }
    }

    pub fn bincode() -> Self {
        Self::new(CodecKind::Bincode)
    }

    pub fn json() -> Self {
        Self::new(CodecKind::Json)
    }

    /// Creates a codec using the encoding selected in the tier configuration.
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.codec)
    }

    /// Returns the encoding in use.
    pub fn kind(&self) -> CodecKind {
        self.kind
    }
}

impl<V> fmt::Debug for SerdeCodec<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SerdeCodec").field("kind", &self.kind).finish()
    }
}

impl<V> Codec<V> for SerdeCodec<V>
where
    V: Serialize + DeserializeOwned + PartialEq,
{
    fn encode(&self, value: &V) -> Result<Bytes> {
        let encoded = match self.kind {
            CodecKind::Bincode => bincode::serialize(value).map_err(HolderError::serializer)?,
            CodecKind::Json => serde_json::to_vec(value).map_err(HolderError::serializer)?,
        };
        Ok(Bytes::from(encoded))
    }

    fn decode(&self, bytes: Bytes) -> Result<V> {
        match self.kind {
            CodecKind::Bincode => bincode::deserialize(&bytes).map_err(HolderError::serializer),
            CodecKind::Json => serde_json::from_slice(&bytes).map_err(HolderError::serializer),
        }
    }

    fn equals(&self, value: &V, bytes: Bytes) -> Result<bool> {
        Ok(*value == self.decode(bytes)?)
    }
}
