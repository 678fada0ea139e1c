//! # Text Codec — JSON Wire Format
//!
//! Encodes an [`ExtensibleValue`] as JSON:
//!
//! - plain string → a bare string literal;
//! - registered value → `{"type": "<name>", "value": <payload>}`, where the
//!   payload is the representation's own JSON.
//!
//! Decoding accepts a string literal or a typed object. A typed object naming
//! the built-in `string` type is accepted and yields a plain string. The
//! `value` member is converted into the CBOR data model ([`json_to_raw`])
//! before it reaches the constructor, so one constructor serves both wires.

use std::fmt;

use serde_json::{Map, Value};

use crate::config::{CodecConfig, DEFAULT_CONFIG};
use crate::error::CodecError;
use crate::registry::TypeRegistry;
use crate::value::{ExtensibleValue, Repr, ValueKind, PLAIN_STRING_TYPE};
use crate::RawValue;

/// Member carrying the type name of a typed object.
pub const TYPE_MEMBER: &str = "type";

/// Member carrying the payload of a typed object.
pub const VALUE_MEMBER: &str = "value";

/// JSON codec bound to a registry.
pub struct TextCodec<'r, K: ValueKind> {
    registry: &'r TypeRegistry<K>,
    config: &'r CodecConfig,
}

impl<K: ValueKind> Clone for TextCodec<'_, K> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<K: ValueKind> Copy for TextCodec<'_, K> {}

impl<K: ValueKind> fmt::Debug for TextCodec<'_, K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TextCodec")
            .field("registry", self.registry)
            .field("config", self.config)
            .finish()
    }
}

impl<'r, K: ValueKind> TextCodec<'r, K> {
    /// Create a codec resolving names in `registry`, with default limits.
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

    /// The registry names are resolved in.
    pub fn registry(&self) -> &'r TypeRegistry<K> {
        self.registry
    }

    /// The active limits.
    pub fn config(&self) -> &'r CodecConfig {
        self.config
    }

    /// Encode a value to compact JSON bytes.
    pub fn encode(&self, value: &ExtensibleValue<K>) -> Result<Vec<u8>, CodecError> {
        Ok(serde_json::to_vec(&Self::encode_item(value))?)
    }

    /// Decode a value from a JSON buffer.
    pub fn decode(&self, bytes: &[u8]) -> Result<ExtensibleValue<K>, CodecError> {
        self.config.check_input_len(bytes.len())?;
        let item: Value = serde_json::from_slice(bytes)?;
        self.decode_item(item)
    }

    /// The JSON item for a value.
    pub fn encode_item(value: &ExtensibleValue<K>) -> Value {
        match value.repr() {
            Repr::Plain(text) => Value::String(text.clone()),
            Repr::Registered { name, value, .. } => {
                let mut members = Map::new();
                members.insert(TYPE_MEMBER.to_string(), Value::String(name.to_string()));
                members.insert(VALUE_MEMBER.to_string(), value.to_text());
                Value::Object(members)
            }
        }
    }

    /// Decode a value from an already-parsed JSON item.
    pub fn decode_item(&self, item: Value) -> Result<ExtensibleValue<K>, CodecError> {
        match item {
            Value::String(text) => Ok(ExtensibleValue::plain(text)),
            Value::Object(members) => self.decode_typed(members),
            other => Err(CodecError::UnexpectedTextShape {
                kind: K::LABEL,
                found: json_kind(&other),
            }),
        }
    }

    fn decode_typed(&self, mut members: Map<String, Value>) -> Result<ExtensibleValue<K>, CodecError> {
        let name = match members.remove(TYPE_MEMBER) {
            None => return Err(CodecError::MissingTypeMember { kind: K::LABEL }),
            Some(Value::String(name)) => name,
            Some(other) => {
                return Err(CodecError::UnexpectedTextShape {
                    kind: K::LABEL,
                    found: json_kind(&other),
                })
            }
        };

        let entry = if name == PLAIN_STRING_TYPE {
            None
        } else {
            let entry = self.registry.lookup_by_name(&name).ok_or_else(|| {
                tracing::debug!(kind = K::LABEL, name = %name, "unknown type name");
                CodecError::UnknownType {
                    kind: K::LABEL,
                    name: name.clone(),
                }
            })?;
            Some(entry)
        };

        let payload = members
            .remove(VALUE_MEMBER)
            .ok_or_else(|| CodecError::MissingValueMember {
                kind: K::LABEL,
                name: name.clone(),
            })?;
        if let Some(member) = members.keys().next() {
            return Err(CodecError::UnexpectedMember {
                kind: K::LABEL,
                member: member.clone(),
            });
        }

        let Some(entry) = entry else {
            return match payload {
                Value::String(text) => Ok(ExtensibleValue::plain(text)),
                other => Err(CodecError::UnexpectedType {
                    kind: K::LABEL,
                    found: json_kind(&other),
                }),
            };
        };

        tracing::trace!(kind = K::LABEL, name = %name, tag = entry.tag(), "decoding typed value");
        let value = entry
            .construct(json_to_raw(payload))
            .map_err(|source| CodecError::MalformedText { name, source })?;
        Ok(ExtensibleValue::from_entry(&entry, value))
    }
}

/// Convert JSON into the CBOR data model without loss.
///
/// Integers stay integers (unsigned first, then signed), other numbers
/// become floats, objects become maps with text keys in their JSON order.
pub fn json_to_raw(value: Value) -> RawValue {
    match value {
        Value::Null => RawValue::Null,
        Value::Bool(b) => RawValue::Bool(b),
        Value::Number(n) => {
            if let Some(u) = n.as_u64() {
                RawValue::from(u)
            } else if let Some(i) = n.as_i64() {
                RawValue::from(i)
            } else {
                RawValue::Float(n.as_f64().unwrap_or(f64::NAN))
            }
        }
        Value::String(s) => RawValue::Text(s),
        Value::Array(items) => RawValue::Array(items.into_iter().map(json_to_raw).collect()),
        Value::Object(members) => RawValue::Map(
            members
                .into_iter()
                .map(|(k, v)| (RawValue::Text(k), json_to_raw(v)))
                .collect(),
        ),
    }
}

/// JSON kind of a value, for error messages.
pub fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConstructError;
    use crate::value::ExtensionValue;
    use serde_json::json;

    struct NameKind;

    impl ValueKind for NameKind {
        const LABEL: &'static str = "entity name";
        const FIELD: &'static str = "entity-name";
    }

    #[derive(Debug, Clone)]
    struct Counter(u64);

    impl fmt::Display for Counter {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "{}", self.0)
        }
    }

    impl ExtensionValue for Counter {
        fn to_binary(&self) -> RawValue {
            RawValue::from(self.0)
        }

        fn to_text(&self) -> Value {
            json!(self.0)
        }

        fn clone_box(&self) -> Box<dyn ExtensionValue> {
            Box::new(self.clone())
        }
    }

    fn counter(raw: RawValue) -> Result<Box<dyn ExtensionValue>, ConstructError> {
        match raw {
            RawValue::Integer(i) => u64::try_from(i)
                .map(|n| Box::new(Counter(n)) as Box<dyn ExtensionValue>)
                .map_err(|_| ConstructError::new("must be uint64")),
            _ => Err(ConstructError::new("must be uint64")),
        }
    }

    fn registry() -> TypeRegistry<NameKind> {
        let registry = TypeRegistry::new();
        registry.register(99994, "test", counter).unwrap();
        registry
    }

    #[test]
    fn plain_string_is_bare_literal() {
        let registry = registry();
        let codec = TextCodec::new(&registry);
        let bytes = codec.encode(&ExtensibleValue::plain("test")).unwrap();
        assert_eq!(bytes, br#""test""#.to_vec());
        assert_eq!(codec.decode(&bytes).unwrap().to_string(), "test");
    }

    #[test]
    fn registered_value_is_typed_object() {
        let registry = registry();
        let codec = TextCodec::new(&registry);
        let value = ExtensibleValue::new_from_value(&registry, 7u64, Some("test")).unwrap();
        let bytes = codec.encode(&value).unwrap();
        assert_eq!(bytes, br#"{"type":"test","value":7}"#.to_vec());

        let out = codec.decode(&bytes).unwrap();
        assert_eq!(out.type_name(), "test");
        assert_eq!(out.tag(), Some(99994));
        assert_eq!(out.to_string(), "7");
    }

    #[test]
    fn typed_builtin_string_accepted() {
        let registry = registry();
        let codec = TextCodec::new(&registry);
        let out = codec
            .decode_item(json!({"type": "string", "value": "ACME Ltd."}))
            .unwrap();
        assert!(out.is_plain());
        assert_eq!(out.to_string(), "ACME Ltd.");

        let err = codec
            .decode_item(json!({"type": "string", "value": 7}))
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "unexpected type for string entity name: number"
        );
    }

    #[test]
    fn unknown_type_rejected_before_value_checked() {
        let registry = registry();
        let codec = TextCodec::new(&registry);
        let err = codec.decode_item(json!({"type": "uuid"})).unwrap_err();
        assert_eq!(
            err,
            CodecError::UnknownType {
                kind: "entity name",
                name: "uuid".to_string()
            }
        );
    }

    #[test]
    fn missing_members_rejected() {
        let registry = registry();
        let codec = TextCodec::new(&registry);
        assert_eq!(
            codec.decode_item(json!({"value": 7})).unwrap_err(),
            CodecError::MissingTypeMember { kind: "entity name" }
        );
        assert_eq!(
            codec.decode_item(json!({"type": "test"})).unwrap_err(),
            CodecError::MissingValueMember {
                kind: "entity name",
                name: "test".to_string()
            }
        );
        assert_eq!(
            codec.decode_item(json!({"type": "string"})).unwrap_err(),
            CodecError::MissingValueMember {
                kind: "entity name",
                name: "string".to_string()
            }
        );
    }

    #[test]
    fn extra_member_rejected() {
        let registry = registry();
        let codec = TextCodec::new(&registry);
        let err = codec
            .decode_item(json!({"type": "test", "value": 7, "tag": 99994}))
            .unwrap_err();
        assert_eq!(err.to_string(), r#"unexpected member "tag" in typed entity name"#);
    }

    #[test]
    fn constructor_rejection_is_malformed_text() {
        let registry = registry();
        let codec = TextCodec::new(&registry);
        let err = codec
            .decode_item(json!({"type": "test", "value": -1}))
            .unwrap_err();
        assert_eq!(
            err,
            CodecError::MalformedText {
                name: "test".to_string(),
                source: ConstructError::new("must be uint64")
            }
        );
    }

    #[test]
    fn other_shapes_rejected() {
        let registry = registry();
        let codec = TextCodec::new(&registry);
        for (item, found) in [
            (json!(7), "number"),
            (json!(null), "null"),
            (json!(["test"]), "array"),
            (json!(true), "bool"),
        ] {
            assert_eq!(
                codec.decode_item(item).unwrap_err(),
                CodecError::UnexpectedTextShape {
                    kind: "entity name",
                    found
                }
            );
        }
        assert!(matches!(
            codec.decode_item(json!({"type": 7, "value": 7})).unwrap_err(),
            CodecError::UnexpectedTextShape { found: "number", .. }
        ));
    }

    #[test]
    fn malformed_json_rejected() {
        let registry = registry();
        let codec = TextCodec::new(&registry);
        assert!(matches!(
            codec.decode(b"{\"type\":").unwrap_err(),
            CodecError::Json(_)
        ));
    }

    #[test]
    fn json_to_raw_preserves_integers() {
        assert_eq!(json_to_raw(json!(7)), RawValue::from(7u64));
        assert_eq!(json_to_raw(json!(-3)), RawValue::from(-3i64));
        assert_eq!(json_to_raw(json!(1.5)), RawValue::Float(1.5));
        assert_eq!(
            json_to_raw(json!({"a": [true, null]})),
            RawValue::Map(vec![(
                RawValue::Text("a".into()),
                RawValue::Array(vec![RawValue::Bool(true), RawValue::Null])
            )])
        );
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    struct NameKind;

    impl ValueKind for NameKind {
        const LABEL: &'static str = "entity name";
        const FIELD: &'static str = "entity-name";
    }

    proptest! {
        /// Any plain string survives a JSON round trip.
        #[test]
        fn plain_string_round_trip(text in "\\PC{0,64}") {
            let registry = TypeRegistry::<NameKind>::new();
            let codec = TextCodec::new(&registry);
            let value = ExtensibleValue::plain(text);
            let bytes = codec.encode(&value).unwrap();
            prop_assert_eq!(codec.decode(&bytes).unwrap(), value);
        }

        /// Encoding is deterministic.
        #[test]
        fn encode_deterministic(text in "[a-zA-Z0-9 ]{0,32}") {
            let registry = TypeRegistry::<NameKind>::new();
            let codec = TextCodec::new(&registry);
            let value = ExtensibleValue::plain(text);
            prop_assert_eq!(codec.encode(&value).unwrap(), codec.encode(&value).unwrap());
        }
    }
}
