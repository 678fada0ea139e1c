//! # Binary Codec — CBOR Wire Format
//!
//! Encodes an [`ExtensibleValue`] as a single CBOR item:
//!
//! - plain string → a text string (major type 3), byte-exact UTF-8;
//! - registered value → a tag (major type 6) carrying the registered tag
//!   number, wrapping the representation's own payload item.
//!
//! Decoding dispatches on the shape of the item: a text string is a plain
//! string, a tag is resolved through the [`TypeRegistry`], anything else is
//! rejected with [`CodecError::UnexpectedWireShape`].
//!
//! Item-level functions ([`BinaryCodec::encode_item`],
//! [`BinaryCodec::decode_item`]) let structured encoders embed extensible
//! values inside larger CBOR maps; buffer-level functions add the size limit
//! and the single-item check.

use std::fmt;

use crate::config::{CodecConfig, DEFAULT_CONFIG};
use crate::error::CodecError;
use crate::registry::TypeRegistry;
use crate::value::{raw_kind, ExtensibleValue, Repr, ValueKind};
use crate::RawValue;

/// CBOR codec bound to a registry.
pub struct BinaryCodec<'r, K: ValueKind> {
    registry: &'r TypeRegistry<K>,
    config: &'r CodecConfig,
}

impl<K: ValueKind> Clone for BinaryCodec<'_, K> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<K: ValueKind> Copy for BinaryCodec<'_, K> {}

impl<K: ValueKind> fmt::Debug for BinaryCodec<'_, K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BinaryCodec")
            .field("registry", self.registry)
            .field("config", self.config)
            .finish()
    }
}

impl<'r, K: ValueKind> BinaryCodec<'r, K> {
    /// Create a codec resolving tags in `registry`, with default limits.
    pub fn new(registry: &'r TypeRegistry<K>) -> Self {
        Self {
            registry,
            config: &DEFAULT_CONFIG,
        }
    }

    /// Replace the decoder limits.
    pub fn with_config(mut self, config: &'r CodecConfig) -> Self {
        self.config = config;
        self
    }

    /// The registry tags are resolved in.
    pub fn registry(&self) -> &'r TypeRegistry<K> {
        self.registry
    }

    /// The active limits.
    pub fn config(&self) -> &'r CodecConfig {
        self.config
    }

    /// Encode a value to a CBOR buffer.
    pub fn encode(&self, value: &ExtensibleValue<K>) -> Result<Vec<u8>, CodecError> {
        to_vec(&Self::encode_item(value))
    }

    /// Decode a value from a buffer holding exactly one CBOR item.
    pub fn decode(&self, bytes: &[u8]) -> Result<ExtensibleValue<K>, CodecError> {
        let item = from_slice(bytes, self.config)?;
        self.decode_item(item)
    }

    /// The CBOR item for a value.
    pub fn encode_item(value: &ExtensibleValue<K>) -> RawValue {
        match value.repr() {
            Repr::Plain(text) => RawValue::Text(text.clone()),
            Repr::Registered { tag, value, .. } => {
                RawValue::Tag(*tag, Box::new(value.to_binary()))
            }
        }
    }

    /// Decode a value from an already-parsed CBOR item.
    pub fn decode_item(&self, item: RawValue) -> Result<ExtensibleValue<K>, CodecError> {
        match item {
            RawValue::Text(text) => Ok(ExtensibleValue::plain(text)),
            RawValue::Tag(tag, payload) => {
                let entry = self.registry.lookup_by_tag(tag).ok_or_else(|| {
                    tracing::debug!(kind = K::LABEL, tag, "unknown binary tag");
                    CodecError::UnknownBinaryTag { kind: K::LABEL, tag }
                })?;
                tracing::trace!(kind = K::LABEL, tag, name = entry.name(), "decoding tagged value");
                let value = entry
                    .construct(*payload)
                    .map_err(|source| CodecError::MalformedBinary { tag, source })?;
                Ok(ExtensibleValue::from_entry(&entry, value))
            }
            other => Err(CodecError::UnexpectedWireShape {
                kind: K::LABEL,
                found: raw_kind(&other),
            }),
        }
    }
}

/// Serialize one CBOR item.
pub fn to_vec(item: &RawValue) -> Result<Vec<u8>, CodecError> {
    let mut buf = Vec::new();
    ciborium::ser::into_writer(item, &mut buf).map_err(|e| CodecError::Cbor(e.to_string()))?;
    Ok(buf)
}

/// Parse a buffer holding exactly one CBOR item, after checking its length
/// against `config`.
pub fn from_slice(bytes: &[u8], config: &CodecConfig) -> Result<RawValue, CodecError> {
    config.check_input_len(bytes.len())?;
    let mut reader = bytes;
    let item: RawValue =
        ciborium::de::from_reader(&mut reader).map_err(|e| CodecError::Cbor(e.to_string()))?;
    if !reader.is_empty() {
        return Err(CodecError::TrailingBytes {
            count: reader.len(),
        });
    }
    Ok(item)
}
