//! # Extensible Values
//!
//! An [`ExtensibleValue`] holds exactly one representation of a manifest
//! field: either the built-in plain string, or a value produced by a
//! constructor registered in a [`TypeRegistry`] of the same [`ValueKind`].
//!
//! ## Kinds
//!
//! Every extensible field of the manifest format gets its own marker type
//! implementing [`ValueKind`]. The registry and the value are generic over the
//! marker, so an entity-name registry cannot be used to decode some other
//! field, and error messages name the field they concern.
//!
//! ## Ownership
//!
//! The wrapped representation is owned exclusively by its wrapper. Values are
//! immutable once constructed; replace the whole value to change it.

use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use crate::error::{CodecError, ValidationError};
use crate::registry::{RegistryEntry, TypeRegistry};
use crate::validate::Validate;
use crate::RawValue;

/// Name of the built-in plain-string representation. Never registrable.
pub const PLAIN_STRING_TYPE: &str = "string";

/// Marker trait describing one extensible field of the manifest format.
pub trait ValueKind: Send + Sync + 'static {
    /// Human label used in error messages (e.g. `entity name`).
    const LABEL: &'static str;

    /// Field name used in validation messages (e.g. `entity-name`).
    const FIELD: &'static str;

    /// Binary tags owned by the surrounding format. Extensions may not claim them.
    const RESERVED_TAGS: &'static [u64] = &[];
}

/// Capability set of a registered representation.
///
/// `Display` provides the display string. The type name and binary tag are
/// those the representation's constructor was registered under, and are
/// tracked by the wrapping [`ExtensibleValue`].
pub trait ExtensionValue: fmt::Debug + fmt::Display + Send + Sync {
    /// Semantic check of the representation. Defaults to always valid.
    fn validate(&self) -> Result<(), ValidationError> {
        Ok(())
    }

    /// The CBOR item that follows the tag on the binary wire.
    fn to_binary(&self) -> RawValue;

    /// The JSON carried in the `value` member on the text wire.
    fn to_text(&self) -> serde_json::Value;

    /// Clone into a fresh box.
    fn clone_box(&self) -> Box<dyn ExtensionValue>;
}

#[derive(Debug)]
pub(crate) enum Repr {
    Plain(String),
    Registered {
        tag: u64,
        name: Arc<str>,
        value: Box<dyn ExtensionValue>,
    },
}

impl Clone for Repr {
    fn clone(&self) -> Self {
        match self {
            Self::Plain(s) => Self::Plain(s.clone()),
            Self::Registered { tag, name, value } => Self::Registered {
                tag: *tag,
                name: Arc::clone(name),
                value: value.clone_box(),
            },
        }
    }
}

/// A field value drawn from the built-in plain string or a registered type.
pub struct ExtensibleValue<K: ValueKind> {
    repr: Repr,
    kind: PhantomData<fn() -> K>,
}

impl<K: ValueKind> ExtensibleValue<K> {
    fn from_repr(repr: Repr) -> Self {
        Self {
            repr,
            kind: PhantomData,
        }
    }

    /// Construct the built-in plain-string representation.
    ///
    /// Always succeeds, including for the empty string; emptiness is reported
    /// by [`Validate::valid`].
    pub fn plain(text: impl Into<String>) -> Self {
        Self::from_repr(Repr::Plain(text.into()))
    }

    /// Construct a plain string from a raw value.
    ///
    /// Accepts text, UTF-8 bytes, and null (yielding the empty string).
    ///
    /// # Errors
    ///
    /// [`CodecError::UnexpectedType`] naming the received kind for any other
    /// input, [`CodecError::NonUtf8`] for bytes that are not UTF-8.
    pub fn new_string(raw: impl Into<RawValue>) -> Result<Self, CodecError> {
        match raw.into() {
            RawValue::Null => Ok(Self::plain(String::new())),
            RawValue::Text(text) => Ok(Self::plain(text)),
            RawValue::Bytes(bytes) => String::from_utf8(bytes)
                .map(Self::plain)
                .map_err(|_| CodecError::NonUtf8 { kind: K::LABEL }),
            other => Err(CodecError::UnexpectedType {
                kind: K::LABEL,
                found: raw_kind(&other),
            }),
        }
    }

    /// Construct a value of the named type.
    ///
    /// `None` or [`PLAIN_STRING_TYPE`] selects the plain string. Any other
    /// name is resolved in `registry` and its constructor invoked on `raw`.
    ///
    /// # Errors
    ///
    /// [`CodecError::UnknownType`] if the name is not registered. Constructor
    /// failures are returned unchanged as [`CodecError::Construct`].
    pub fn new_from_value(
        registry: &TypeRegistry<K>,
        raw: impl Into<RawValue>,
        type_name: Option<&str>,
    ) -> Result<Self, CodecError> {
        let name = match type_name {
            None | Some(PLAIN_STRING_TYPE) => return Self::new_string(raw),
            Some(name) => name,
        };
        let entry = registry
            .lookup_by_name(name)
            .ok_or_else(|| CodecError::UnknownType {
                kind: K::LABEL,
                name: name.to_string(),
            })?;
        let value = entry.construct(raw.into())?;
        Ok(Self::from_entry(&entry, value))
    }

    /// Like [`new_from_value`](Self::new_from_value), for statically known
    /// inputs only.
    ///
    /// This is a programmer-error trap for internal defaults built from
    /// literals. Never pass caller-controlled input.
    ///
    /// # Panics
    ///
    /// Panics if construction fails.
    pub fn must_new_from_value(
        registry: &TypeRegistry<K>,
        raw: impl Into<RawValue>,
        type_name: Option<&str>,
    ) -> Self {
        match Self::new_from_value(registry, raw, type_name) {
            Ok(value) => value,
            Err(err) => panic!(
                "invalid literal {} of type {:?}: {err}",
                K::LABEL,
                type_name.unwrap_or(PLAIN_STRING_TYPE)
            ),
        }
    }

    pub(crate) fn from_entry(entry: &RegistryEntry, value: Box<dyn ExtensionValue>) -> Self {
        Self::from_repr(Repr::Registered {
            tag: entry.tag(),
            name: entry.shared_name(),
            value,
        })
    }

    pub(crate) fn repr(&self) -> &Repr {
        &self.repr
    }

    /// The type name: [`PLAIN_STRING_TYPE`] or the registered name.
    pub fn type_name(&self) -> &str {
        match &self.repr {
            Repr::Plain(_) => PLAIN_STRING_TYPE,
            Repr::Registered { name, .. } => name.as_ref(),
        }
    }

    /// The binary tag, `None` for the plain string.
    pub fn tag(&self) -> Option<u64> {
        match &self.repr {
            Repr::Plain(_) => None,
            Repr::Registered { tag, .. } => Some(*tag),
        }
    }

    /// The text of a plain string.
    pub fn as_plain(&self) -> Option<&str> {
        match &self.repr {
            Repr::Plain(s) => Some(s.as_str()),
            Repr::Registered { .. } => None,
        }
    }

    /// The wrapped registered representation.
    pub fn extension(&self) -> Option<&dyn ExtensionValue> {
        match &self.repr {
            Repr::Plain(_) => None,
            Repr::Registered { value, .. } => Some(value.as_ref()),
        }
    }

    /// Whether this is the built-in plain string.
    pub fn is_plain(&self) -> bool {
        matches!(self.repr, Repr::Plain(_))
    }
}

impl<K: ValueKind> Validate for ExtensibleValue<K> {
    fn valid(&self) -> Result<(), ValidationError> {
        match &self.repr {
            Repr::Plain(s) if s.is_empty() => Err(ValidationError::EmptyValue { field: K::FIELD }),
            Repr::Plain(_) => Ok(()),
            Repr::Registered { value, .. } => value.validate(),
        }
    }
}

impl<K: ValueKind> fmt::Display for ExtensibleValue<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.repr {
            Repr::Plain(s) => f.write_str(s),
            Repr::Registered { value, .. } => fmt::Display::fmt(value, f),
        }
    }
}

impl<K: ValueKind> fmt::Debug for ExtensibleValue<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExtensibleValue")
            .field("kind", &K::LABEL)
            .field("repr", &self.repr)
            .finish()
    }
}

impl<K: ValueKind> Clone for ExtensibleValue<K> {
    fn clone(&self) -> Self {
        Self::from_repr(self.repr.clone())
    }
}

/// Two values are equal when type name, tag and display string agree.
impl<K: ValueKind> PartialEq for ExtensibleValue<K> {
    fn eq(&self, other: &Self) -> bool {
        self.type_name() == other.type_name()
            && self.tag() == other.tag()
            && self.to_string() == other.to_string()
    }
}

impl<K: ValueKind> Eq for ExtensibleValue<K> {}

/// Data-model kind of a raw value, for error messages.
pub fn raw_kind(value: &RawValue) -> &'static str {
    match value {
        RawValue::Integer(_) => "integer",
        RawValue::Bytes(_) => "bytes",
        RawValue::Float(_) => "float",
        RawValue::Text(_) => "text",
        RawValue::Bool(_) => "bool",
        RawValue::Null => "null",
        RawValue::Tag(..) => "tag",
        RawValue::Array(_) => "array",
        RawValue::Map(_) => "map",
        _ => "unknown",
    }
}
