//! # Entity Name
//!
//! The entity name is the first extensible field of the manifest format: a
//! plain string by default, or any representation registered in an
//! [`EntityNameRegistry`].
//!
//! Tags already owned by the manifest format (URI, UUID, OID) are reserved
//! and can never be claimed by an entity-name extension.

use rim_core::{BinaryCodec, ExtensibleValue, TextCodec, TypeRegistry, ValueKind};

use crate::uri::URI_TAG;

/// CBOR tag for a binary UUID (RFC 9562 via the IANA CBOR tag registry).
pub const UUID_TAG: u64 = 37;

/// CBOR tag for an object identifier (RFC 9090).
pub const OID_TAG: u64 = 111;

/// Marker for the entity-name field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntityNameKind;

impl ValueKind for EntityNameKind {
    const LABEL: &'static str = "entity name";
    const FIELD: &'static str = "entity-name";
    const RESERVED_TAGS: &'static [u64] = &[URI_TAG, UUID_TAG, OID_TAG];
}

/// An entity name: plain string or registered representation.
pub type EntityName = ExtensibleValue<EntityNameKind>;

/// Registry of entity-name representations.
pub type EntityNameRegistry = TypeRegistry<EntityNameKind>;

/// CBOR codec for entity names.
pub type EntityNameBinaryCodec<'r> = BinaryCodec<'r, EntityNameKind>;

/// JSON codec for entity names.
pub type EntityNameTextCodec<'r> = TextCodec<'r, EntityNameKind>;
