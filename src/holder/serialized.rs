//! Serialized Holder Module
//!
//! Holder that keeps its value encoded and decodes it on every read.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;
use std::sync::Arc;

use bytes::Bytes;
use tracing::{debug, warn};

use crate::codec::Codec;
use crate::error::{HolderError, Result};
use crate::holder::{
    BinaryValueHolder, EntryMetadata, Expiry, TimeUnit, ValueHolder, NO_EXPIRE, UNASSIGNED_ID,
};

// == Serialized Holder ==
/// Stores one cache entry as an immutable encoded payload.
///
/// The payload is encoded once at construction and decoded on each call to
/// `value()`, the decoded value is never cached. Reads clone the `Bytes`
/// handle, so concurrent readers never share a cursor.
pub struct SerializedHolder<V, C: ?Sized> {
    /// Identity, timestamps and statistics
    meta: EntryMetadata,
    /// Encoded value, never mutated
    buffer: Bytes,
    /// Shared encode/decode capability
    codec: Arc<C>,
    _value: PhantomData<fn() -> V>,
}

impl<V, C> SerializedHolder<V, C>
where
    C: Codec<V> + ?Sized,
{
    // == Constructors ==
    /// Encodes `value` into an unassigned holder that never expires.
    ///
    /// # Errors
    /// `InvalidArgument` if `value` or `codec` is missing, `Serializer` if
    /// encoding fails.
    pub fn new(
        value: Option<&V>,
        creation_time: u64,
        veto: bool,
        codec: Option<Arc<C>>,
    ) -> Result<Self> {
        Self::with_expiration(value, creation_time, NO_EXPIRE, veto, codec)
    }

    /// Encodes `value` into an unassigned holder with an explicit expiration.
    pub fn with_expiration(
        value: Option<&V>,
        creation_time: u64,
        expiration_time: u64,
        veto: bool,
        codec: Option<Arc<C>>,
    ) -> Result<Self> {
        Self::with_id(UNASSIGNED_ID, value, creation_time, expiration_time, veto, codec)
    }

    /// Encodes `value` into a holder with explicit identity and expiration.
    ///
    /// # Arguments
    /// * `id` - Store-assigned identity
    /// * `value` - Value to encode, required
    /// * `creation_time` - Creation timestamp in milliseconds
    /// * `expiration_time` - Expiration timestamp in milliseconds or `NO_EXPIRE`
    /// * `veto` - Policy exclusion flag
    /// * `codec` - Codec used for this and every later read, required
    pub fn with_id(
        id: i64,
        value: Option<&V>,
        creation_time: u64,
        expiration_time: u64,
        veto: bool,
        codec: Option<Arc<C>>,
    ) -> Result<Self> {
        let value = value.ok_or_else(|| HolderError::InvalidArgument("null value".to_string()))?;
        let codec =
            codec.ok_or_else(|| HolderError::InvalidArgument("null codec".to_string()))?;
        let buffer = codec.encode(value)?;

        Ok(Self {
            meta: EntryMetadata::new(id, creation_time, expiration_time, veto),
            buffer,
            codec,
            _value: PhantomData,
        })
    }

    /// Re-encodes `value` into a holder that takes over `source`'s identity.
    ///
    /// Copies id, creation and expiration time, carries the hit count over,
    /// then records an access at `now` with `expiry`.
    pub fn from_holder<H>(
        source: &H,
        value: Option<&V>,
        veto: bool,
        codec: Option<Arc<C>>,
        now: u64,
        expiry: Option<Expiry>,
    ) -> Result<Self>
    where
        H: ValueHolder<V> + ?Sized,
    {
        let mut holder = Self::with_id(
            source.id(),
            value,
            source.creation_time(TimeUnit::Milliseconds),
            source.expiration_time(TimeUnit::Milliseconds),
            veto,
            codec,
        )?;
        holder.meta.set_hits(source.hits());
        holder.meta.accessed(now, expiry);

        debug!(
            "Promoted entry {} into serialized holder ({} bytes)",
            holder.meta.id(),
            holder.buffer.len()
        );
        Ok(holder)
    }

    /// Adopts an already-encoded buffer, e.g. bytes relayed from another tier.
    ///
    /// Same metadata handling as `from_holder`, without an encode step.
    pub fn from_binary<H>(
        source: &H,
        binary_value: Bytes,
        veto: bool,
        codec: Arc<C>,
        now: u64,
        expiry: Option<Expiry>,
    ) -> Self
    where
        H: ValueHolder<V> + ?Sized,
    {
        let mut meta = EntryMetadata::new(
            source.id(),
            source.creation_time(TimeUnit::Milliseconds),
            source.expiration_time(TimeUnit::Milliseconds),
            veto,
        );
        meta.set_hits(source.hits());
        meta.accessed(now, expiry);

        debug!(
            "Adopted {} encoded bytes for entry {}",
            binary_value.len(),
            meta.id()
        );
        Self {
            meta,
            buffer: binary_value,
            codec,
            _value: PhantomData,
        }
    }

    // == Equality ==
    /// Compares two holders.
    ///
    /// Holders are equal when their metadata match and the codec reports
    /// `other`'s decoded value equal to this holder's payload. Only `other`
    /// is decoded.
    ///
    /// # Errors
    /// `Serializer` if `other`'s payload cannot be decoded.
    pub fn try_eq(&self, other: &Self) -> Result<bool> {
        if std::ptr::eq(self, other) {
            return Ok(true);
        }
        if self.meta != other.meta {
            return Ok(false);
        }
        let other_value = other.value()?;
        self.codec.equals(&other_value, self.buffer.clone())
    }
}

impl<V, C> ValueHolder<V> for SerializedHolder<V, C>
where
    C: Codec<V> + ?Sized,
{
    // == Value ==
    /// Decodes a fresh view of the payload.
    fn value(&self) -> Result<V> {
        self.codec.decode(self.buffer.clone()).map_err(|err| {
            warn!("Failed to decode entry {}: {}", self.meta.id(), err);
            err
        })
    }

    fn metadata(&self) -> &EntryMetadata {
        &self.meta
    }

    fn metadata_mut(&mut self) -> &mut EntryMetadata {
        &mut self.meta
    }
}

impl<V, C: ?Sized> BinaryValueHolder for SerializedHolder<V, C> {
    fn binary_value(&self) -> Bytes {
        self.buffer.clone()
    }

    // The payload is always encoded
    fn is_binary_value_available(&self) -> bool {
        true
    }
}

// NOTE: the payload is left out on purpose, two holders with equal metadata
// but different payloads collide while `try_eq` tells them apart.
impl<V, C: ?Sized> Hash for SerializedHolder<V, C> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.meta.hash(state);
    }
}

impl<V, C: ?Sized> fmt::Debug for SerializedHolder<V, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SerializedHolder")
            .field("meta", &self.meta)
            .field("payload_len", &self.buffer.len())
            .finish()
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{SerdeCodec, Utf8Codec};
    use crate::holder::CopiedHolder;
    use bytes::Buf;
    use std::collections::hash_map::DefaultHasher;
    use std::time::Duration;

    type StringHolder = SerializedHolder<String, Utf8Codec>;

    fn codec() -> Arc<Utf8Codec> {
        Arc::new(Utf8Codec)
    }

    fn holder(value: &str, creation_time: u64) -> StringHolder {
        StringHolder::new(Some(&value.to_string()), creation_time, false, Some(codec())).unwrap()
    }

    fn hash_of(holder: &StringHolder) -> u64 {
        let mut hasher = DefaultHasher::new();
        holder.hash(&mut hasher);
        hasher.finish()
    }

    /// Codec whose payloads can never be decoded.
    struct UnknownSchemaCodec;

    impl Codec<String> for UnknownSchemaCodec {
        fn encode(&self, value: &String) -> Result<Bytes> {
            Ok(Bytes::copy_from_slice(value.as_bytes()))
        }

        fn decode(&self, _bytes: Bytes) -> Result<String> {
            Err(HolderError::Serializer("class not found".to_string()))
        }

        fn equals(&self, value: &String, bytes: Bytes) -> Result<bool> {
            Ok(value.as_bytes() == bytes.as_ref())
        }
    }

    /// Codec that refuses to encode anything.
    struct RejectingCodec;

    impl Codec<String> for RejectingCodec {
        fn encode(&self, _value: &String) -> Result<Bytes> {
            Err(HolderError::Serializer("unsupported type".to_string()))
        }

        fn decode(&self, bytes: Bytes) -> Result<String> {
            Utf8Codec.decode(bytes)
        }

        fn equals(&self, value: &String, bytes: Bytes) -> Result<bool> {
            Utf8Codec.equals(value, bytes)
        }
    }

    #[test]
    fn test_holder_minimal_construction() {
        let h1 = holder("x", 100);

        assert_eq!(h1.value().unwrap(), "x");
        assert_eq!(h1.binary_value(), Utf8Codec.encode(&"x".to_string()).unwrap());
        assert!(h1.is_binary_value_available());
        assert_eq!(h1.id(), UNASSIGNED_ID);
        assert_eq!(h1.creation_time(TimeUnit::Milliseconds), 100);
        assert_eq!(h1.expiration_time(TimeUnit::Milliseconds), NO_EXPIRE);
        assert_eq!(h1.hits(), 0);
        assert!(!h1.veto());
    }

    #[test]
    fn test_holder_full_construction() {
        let h = StringHolder::with_id(42, Some(&"v".to_string()), 100, 1_000, true, Some(codec()))
            .unwrap();

        assert_eq!(h.id(), 42);
        assert_eq!(h.expiration_time(TimeUnit::Milliseconds), 1_000);
        assert_eq!(h.expiration_time(TimeUnit::Seconds), 1);
        assert!(h.veto());
        assert!(!h.is_expired(999, TimeUnit::Milliseconds));
        assert!(h.is_expired(1_000, TimeUnit::Milliseconds));
    }

    #[test]
    fn test_holder_with_expiration_is_unassigned() {
        let h = StringHolder::with_expiration(Some(&"v".to_string()), 100, 500, false, Some(codec()))
            .unwrap();
        assert_eq!(h.id(), UNASSIGNED_ID);
        assert_eq!(h.expiration_time(TimeUnit::Milliseconds), 500);
    }

    #[test]
    fn test_null_value_rejected() {
        let result = StringHolder::new(None, 100, false, Some(codec()));
        assert_eq!(
            result.unwrap_err(),
            HolderError::InvalidArgument("null value".to_string())
        );
    }

    #[test]
    fn test_null_codec_rejected() {
        let result = StringHolder::with_id(1, Some(&"x".to_string()), 100, NO_EXPIRE, false, None);
        assert_eq!(
            result.unwrap_err(),
            HolderError::InvalidArgument("null codec".to_string())
        );
    }

    #[test]
    fn test_null_value_checked_before_codec() {
        let result = StringHolder::new(None, 100, false, None);
        assert_eq!(
            result.unwrap_err(),
            HolderError::InvalidArgument("null value".to_string())
        );
    }

    #[test]
    fn test_encode_failure_rejects_construction() {
        let codec = Arc::new(RejectingCodec);
        let value = "x".to_string();

        let result = SerializedHolder::<String, _>::new(Some(&value), 100, false, Some(codec.clone()));
        assert_eq!(
            result.unwrap_err(),
            HolderError::Serializer("unsupported type".to_string())
        );

        let source = holder("x", 100);
        let result = SerializedHolder::<String, _>::from_holder(
            &source,
            Some(&value),
            false,
            Some(codec),
            200,
            None,
        );
        assert!(matches!(result, Err(HolderError::Serializer(_))));
    }

    #[test]
    fn test_binary_value_views_are_independent() {
        let h = holder("payload", 100);

        let mut first = h.binary_value();
        first.advance(4);
        assert_eq!(first.remaining(), 3);

        let second = h.binary_value();
        assert_eq!(second.len(), 7);
        assert_eq!(&second[..], b"payload");
        assert_eq!(h.value().unwrap(), "payload");
    }

    #[test]
    fn test_value_redecodes_every_call() {
        let h = holder("again", 100);
        assert_eq!(h.value().unwrap(), h.value().unwrap());
    }

    #[test]
    fn test_value_decode_error_propagates() {
        let h = SerializedHolder::<String, _>::new(
            Some(&"x".to_string()),
            100,
            false,
            Some(Arc::new(UnknownSchemaCodec)),
        )
        .unwrap();

        assert!(matches!(h.value(), Err(HolderError::Serializer(_))));
        // raw bytes stay available
        assert_eq!(&h.binary_value()[..], b"x");
    }

    #[test]
    fn test_equality_same_metadata_and_value() {
        let a = holder("x", 100);
        let b = holder("x", 100);

        assert!(a.try_eq(&b).unwrap());
        assert!(b.try_eq(&a).unwrap());
        assert!(a.try_eq(&a).unwrap());
        assert_eq!(hash_of(&a), hash_of(&b));
    }

    #[test]
    fn test_equality_different_value() {
        let a = holder("x", 100);
        let b = holder("y", 100);

        assert!(!a.try_eq(&b).unwrap());
        // payload is not part of the hash
        assert_eq!(hash_of(&a), hash_of(&b));
    }

    #[test]
    fn test_equality_different_metadata() {
        let value = "x".to_string();
        let base = StringHolder::with_id(1, Some(&value), 100, 500, false, Some(codec())).unwrap();
        let variants = [
            StringHolder::with_id(2, Some(&value), 100, 500, false, Some(codec())).unwrap(),
            StringHolder::with_id(1, Some(&value), 101, 500, false, Some(codec())).unwrap(),
            StringHolder::with_id(1, Some(&value), 100, 501, false, Some(codec())).unwrap(),
            StringHolder::with_id(1, Some(&value), 100, 500, true, Some(codec())).unwrap(),
        ];

        for other in &variants {
            assert!(!base.try_eq(other).unwrap());
        }
    }

    #[test]
    fn test_equality_decode_error_propagates() {
        let codec = Arc::new(UnknownSchemaCodec);
        let a = SerializedHolder::<String, _>::new(Some(&"x".to_string()), 100, false, Some(codec.clone()))
            .unwrap();
        let b = SerializedHolder::<String, _>::new(Some(&"x".to_string()), 100, false, Some(codec))
            .unwrap();

        assert!(matches!(a.try_eq(&b), Err(HolderError::Serializer(_))));
    }

    #[test]
    fn test_clone_with_adopted_bytes() {
        let mut h1 = holder("x", 100);
        h1.metadata_mut().record_hit();
        h1.metadata_mut().record_hit();

        let h2 = StringHolder::from_binary(&h1, h1.binary_value(), false, codec(), 200, None);

        assert_eq!(h2.hits(), h1.hits());
        assert_eq!(h2.creation_time(TimeUnit::Milliseconds), 100);
        assert_eq!(h2.last_access_time(TimeUnit::Milliseconds), 200);
        assert_eq!(h2.expiration_time(TimeUnit::Milliseconds), NO_EXPIRE);
        assert_eq!(h2.value().unwrap(), "x");
        assert!(h1.try_eq(&h2).unwrap());
    }

    #[test]
    fn test_clone_with_reencode() {
        let mut source = StringHolder::with_id(9, Some(&"old".to_string()), 100, 900, false, Some(codec()))
            .unwrap();
        source.metadata_mut().set_hits(5);

        let cloned = StringHolder::from_holder(
            &source,
            Some(&"new".to_string()),
            true,
            Some(codec()),
            300,
            Some(Expiry::After(Duration::from_millis(50))),
        )
        .unwrap();

        assert_eq!(cloned.id(), 9);
        assert_eq!(cloned.creation_time(TimeUnit::Milliseconds), 100);
        assert_eq!(cloned.hits(), 5);
        assert_eq!(cloned.last_access_time(TimeUnit::Milliseconds), 300);
        assert_eq!(cloned.expiration_time(TimeUnit::Milliseconds), 350);
        assert!(cloned.veto());
        assert_eq!(cloned.value().unwrap(), "new");
    }

    #[test]
    fn test_clone_with_reencode_rejects_null_value() {
        let source = holder("x", 100);
        let result = StringHolder::from_holder(&source, None, false, Some(codec()), 200, None);
        assert!(matches!(result, Err(HolderError::InvalidArgument(_))));
    }

    #[test]
    fn test_promote_from_copied_holder() {
        let mut live = CopiedHolder::with_id(3, vec![1u32, 2, 3], 100, NO_EXPIRE, false);
        live.metadata_mut().record_hit();
        let codec = Arc::new(SerdeCodec::<Vec<u32>>::bincode());

        let value = live.value().unwrap();
        let promoted =
            SerializedHolder::from_holder(&live, Some(&value), false, Some(codec), 250, None)
                .unwrap();

        assert_eq!(promoted.id(), 3);
        assert_eq!(promoted.hits(), 1);
        assert_eq!(promoted.value().unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn test_dyn_codec() {
        let codec: Arc<dyn Codec<String>> = Arc::new(Utf8Codec);
        let h = SerializedHolder::new(Some(&"dyn".to_string()), 0, false, Some(codec)).unwrap();
        assert_eq!(h.value().unwrap(), "dyn");
    }

    #[test]
    fn test_debug_omits_payload() {
        let h = holder("secret", 100);
        let debug = format!("{:?}", h);
        assert!(debug.contains("payload_len: 6"));
        assert!(!debug.contains("secret"));
    }
}
