//! # Tagged URI
//!
//! A URI carried under CBOR tag 32 on the binary wire and as a bare string on
//! the text wire. Used for an entity's registration identifier.

use std::fmt;

use rim_core::text::json_kind;
use rim_core::{raw_kind, CodecError, RawValue, Validate, ValidationError};
use serde_json::Value;

/// CBOR tag for a URI (RFC 8949 §3.4.5.3).
pub const URI_TAG: u64 = 32;

/// A URI with its wire tag.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct TaggedUri(String);

impl TaggedUri {
    /// Wrap a URI string. No parsing is performed.
    pub fn new(uri: impl Into<String>) -> Self {
        Self(uri.into())
    }

    /// Access the URI string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the URI is zero-length.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Tag 32 wrapping a text string.
    pub fn to_binary(&self) -> RawValue {
        RawValue::Tag(URI_TAG, Box::new(RawValue::Text(self.0.clone())))
    }

    /// Parse tag 32 wrapping a text string.
    pub fn from_binary(item: RawValue) -> Result<Self, CodecError> {
        match item {
            RawValue::Tag(URI_TAG, inner) => match *inner {
                RawValue::Text(uri) => Ok(Self(uri)),
                other => Err(malformed(format!("expected text, found {}", raw_kind(&other)))),
            },
            RawValue::Tag(tag, _) => Err(malformed(format!("expected tag {URI_TAG}, found tag {tag}"))),
            other => Err(malformed(format!(
                "expected tag {URI_TAG}, found {}",
                raw_kind(&other)
            ))),
        }
    }

    /// A bare JSON string.
    pub fn to_text(&self) -> Value {
        Value::String(self.0.clone())
    }

    /// Parse a bare JSON string.
    pub fn from_text(item: Value) -> Result<Self, CodecError> {
        match item {
            Value::String(uri) => Ok(Self(uri)),
            other => Err(malformed(format!("expected string, found {}", json_kind(&other)))),
        }
    }
}

fn malformed(reason: String) -> CodecError {
    CodecError::MalformedStructure {
        what: "tagged URI",
        reason,
    }
}

impl From<&str> for TaggedUri {
    fn from(uri: &str) -> Self {
        Self::new(uri)
    }
}

impl From<String> for TaggedUri {
    fn from(uri: String) -> Self {
        Self(uri)
    }
}

impl fmt::Display for TaggedUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TaggedUri {
    /// Check the URI as the value of `field`, which names it in the error.
    pub fn valid_as(&self, field: &'static str) -> Result<(), ValidationError> {
        if self.is_empty() {
            return Err(ValidationError::EmptyUri { field });
        }
        Ok(())
    }
}

impl Validate for TaggedUri {
    fn valid(&self) -> Result<(), ValidationError> {
        self.valid_as("uri")
    }
}
