//! # Error Hierarchy
//!
//! Structured error types for the codec core, built with `thiserror`.
//! No `Box<dyn Error>`, no `.unwrap()` outside tests.
//!
//! Each concern has its own enum:
//!
//! - [`RegistryError`]: registration conflicts. The prior registration stays
//!   intact; nothing is retried.
//! - [`ConstructError`]: the opaque rejection produced by a caller-supplied
//!   constructor.
//! - [`CodecError`]: construction, encode and decode failures. Structured
//!   decoders wrap the first child failure with [`CodecError::Field`] or
//!   [`CodecError::AtIndex`] context; [`CodecError::root_cause`] recovers the
//!   underlying kind.
//! - [`ValidationError`]: semantic failures reported by the validation chain,
//!   first violation only, wrapped with positional context the same way.
//!
//! Display strings are stable: downstream tooling matches on them.

use thiserror::Error;

/// Top-level error type for the codec core.
#[derive(Error, Debug)]
pub enum RimError {
    /// Registration conflict.
    #[error("registry error: {0}")]
    Registry(#[from] RegistryError),

    /// Construction, encode or decode failure.
    #[error("codec error: {0}")]
    Codec(#[from] CodecError),

    /// Semantic validation failure.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Codec configuration could not be loaded.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Errors raised by [`TypeRegistry::register`](crate::TypeRegistry::register).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// The binary tag is already claimed by a registered type or reserved by
    /// the surrounding format.
    #[error("tag {tag} is already registered")]
    TagCollision {
        /// The colliding tag.
        tag: u64,
    },

    /// The text name is already registered, or is the built-in name.
    #[error("{kind} type with name \"{name}\" already exists")]
    NameCollision {
        /// Label of the value kind (e.g. `entity name`).
        kind: &'static str,
        /// The colliding name.
        name: String,
    },

    /// Type names must be non-empty.
    #[error("{kind} type name must not be empty")]
    EmptyName {
        /// Label of the value kind.
        kind: &'static str,
    },
}

/// Rejection produced by a registered constructor.
///
/// Constructors are supplied by external collaborators, so the error carries
/// only their message.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct ConstructError(String);

impl ConstructError {
    /// Create a constructor error with the given message.
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }

    /// Access the message.
    pub fn message(&self) -> &str {
        &self.0
    }
}

/// Errors during construction, encoding, or decoding of extensible values
/// and the structures that embed them.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CodecError {
    /// A registered constructor rejected its input during direct construction.
    #[error(transparent)]
    Construct(#[from] ConstructError),

    /// The text name does not resolve to a registered type.
    #[error("unknown {kind} type: \"{name}\"")]
    UnknownType {
        /// Label of the value kind.
        kind: &'static str,
        /// The unresolved name.
        name: String,
    },

    /// The binary tag does not resolve to a registered type.
    #[error("unknown {kind} binary tag: {tag}")]
    UnknownBinaryTag {
        /// Label of the value kind.
        kind: &'static str,
        /// The unresolved tag.
        tag: u64,
    },

    /// The plain-string constructor received something that is not text.
    #[error("unexpected type for string {kind}: {found}")]
    UnexpectedType {
        /// Label of the value kind.
        kind: &'static str,
        /// Data-model kind of the received value.
        found: &'static str,
    },

    /// The plain-string constructor received bytes that are not UTF-8.
    #[error("string {kind} is not valid UTF-8")]
    NonUtf8 {
        /// Label of the value kind.
        kind: &'static str,
    },

    /// A binary item was neither a text string nor a tag.
    #[error("unexpected binary item for {kind}: {found}")]
    UnexpectedWireShape {
        /// Label of the value kind.
        kind: &'static str,
        /// Data-model kind of the item found.
        found: &'static str,
    },

    /// A text item was neither a string literal nor a typed object.
    #[error("unexpected text item for {kind}: {found}")]
    UnexpectedTextShape {
        /// Label of the value kind.
        kind: &'static str,
        /// JSON kind of the item found.
        found: &'static str,
    },

    /// A typed object carried a member other than `type` and `value`.
    #[error("unexpected member \"{member}\" in typed {kind}")]
    UnexpectedMember {
        /// Label of the value kind.
        kind: &'static str,
        /// The unexpected member name.
        member: String,
    },

    /// The constructor rejected the payload following a binary tag.
    #[error("malformed binary payload for tag {tag}: {source}")]
    MalformedBinary {
        /// The resolved tag.
        tag: u64,
        /// The constructor's rejection.
        source: ConstructError,
    },

    /// The constructor rejected the `value` member of a typed object.
    #[error("malformed value for type \"{name}\": {source}")]
    MalformedText {
        /// The resolved type name.
        name: String,
        /// The constructor's rejection.
        source: ConstructError,
    },

    /// A typed object had no `type` member.
    #[error("typed {kind} is missing the \"type\" member")]
    MissingTypeMember {
        /// Label of the value kind.
        kind: &'static str,
    },

    /// A typed object had no `value` member.
    #[error("typed {kind} \"{name}\" is missing the \"value\" member")]
    MissingValueMember {
        /// Label of the value kind.
        kind: &'static str,
        /// The resolved type name.
        name: String,
    },

    /// A required field of a structured item is absent.
    #[error("missing required field {field}")]
    MissingField {
        /// The absent field.
        field: &'static str,
    },

    /// A structured item does not have the expected layout.
    #[error("malformed {what}: {reason}")]
    MalformedStructure {
        /// What was being decoded.
        what: &'static str,
        /// Why it was rejected.
        reason: String,
    },

    /// A failure inside a named field of a structured item.
    #[error("{field}: {source}")]
    Field {
        /// The field being decoded.
        field: &'static str,
        /// The underlying failure.
        source: Box<CodecError>,
    },

    /// A failure inside a member of a sequence.
    #[error("{item} at index {index}: {source}")]
    AtIndex {
        /// What the sequence holds (e.g. `entity`).
        item: &'static str,
        /// Zero-based position of the failing member.
        index: usize,
        /// The underlying failure.
        source: Box<CodecError>,
    },

    /// The input buffer exceeds the configured limit.
    #[error("input of {len} bytes exceeds the limit of {max} bytes")]
    InputTooLarge {
        /// Length of the rejected input.
        len: usize,
        /// Configured maximum.
        max: usize,
    },

    /// The binary buffer holds more than one item.
    #[error("{count} trailing bytes after binary item")]
    TrailingBytes {
        /// Number of unread bytes.
        count: usize,
    },

    /// The binary buffer is not well-formed CBOR, or CBOR encoding failed.
    #[error("CBOR error: {0}")]
    Cbor(String),

    /// The text buffer is not well-formed JSON, or JSON encoding failed.
    #[error("JSON error: {0}")]
    Json(String),
}

impl CodecError {
    /// Wrap this error with the name of the field it occurred in.
    pub fn in_field(self, field: &'static str) -> Self {
        Self::Field {
            field,
            source: Box::new(self),
        }
    }

    /// Wrap this error with the position of the sequence member it occurred in.
    pub fn at_index(self, item: &'static str, index: usize) -> Self {
        Self::AtIndex {
            item,
            index,
            source: Box::new(self),
        }
    }

    /// The innermost error, with all positional context removed.
    pub fn root_cause(&self) -> &CodecError {
        match self {
            Self::Field { source, .. } | Self::AtIndex { source, .. } => source.root_cause(),
            other => other,
        }
    }
}

impl From<serde_json::Error> for CodecError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

/// Semantic validation failures. Only the first violation is reported.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A mandatory value is absent or zero-length.
    #[error("empty {field}")]
    EmptyValue {
        /// The field name (e.g. `entity-name`).
        field: &'static str,
    },

    /// A URI is present but zero-length.
    #[error("empty {field}")]
    EmptyUri {
        /// The field name (e.g. `reg-id`).
        field: &'static str,
    },

    /// A role set has no members.
    #[error("empty roles")]
    EmptyRoles,

    /// A role lies outside the recognized set.
    #[error("unknown role {value} at index {index}")]
    UnknownRole {
        /// The unrecognized role code.
        value: i64,
        /// Zero-based position in the role list.
        index: usize,
    },

    /// Failure reported by a registered extension value.
    #[error("{0}")]
    Extension(String),

    /// An aggregate is invalid because one of its parts is.
    #[error("invalid {item}: {source}")]
    Invalid {
        /// What was being validated (e.g. `entity`).
        item: &'static str,
        /// The part's failure.
        source: Box<ValidationError>,
    },

    /// A sequence is invalid because one of its members is.
    #[error("{item} at index {index}: {source}")]
    AtIndex {
        /// What the sequence holds (e.g. `entity`).
        item: &'static str,
        /// Zero-based position of the first invalid member.
        index: usize,
        /// The member's own failure, verbatim.
        source: Box<ValidationError>,
    },
}

impl ValidationError {
    /// Wrap this error as the reason an aggregate `item` is invalid.
    pub fn within(self, item: &'static str) -> Self {
        Self::Invalid {
            item,
            source: Box::new(self),
        }
    }

    /// Wrap this error with the position of the sequence member it came from.
    pub fn at_index(self, item: &'static str, index: usize) -> Self {
        Self::AtIndex {
            item,
            index,
            source: Box::new(self),
        }
    }

    /// The innermost error, with all positional context removed.
    pub fn root_cause(&self) -> &ValidationError {
        match self {
            Self::Invalid { source, .. } | Self::AtIndex { source, .. } => source.root_cause(),
            other => other,
        }
    }
}

/// Errors loading a [`CodecConfig`](crate::CodecConfig).
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The YAML document could not be parsed.
    #[error("failed to parse codec configuration: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// A limit was configured as zero.
    #[error("{field} must be greater than zero")]
    ZeroLimit {
        /// The offending setting.
        field: &'static str,
    },
}
