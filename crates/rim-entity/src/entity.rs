//! # Entities
//!
//! A named party of the manifest: an extensible [`EntityName`], an optional
//! registration URI, and a non-empty list of [`Role`]s.
//!
//! ## Validation order
//!
//! [`Entity::valid`] stops at the first violated rule, in this order:
//!
//! 1. missing or empty name (`invalid entity: empty entity-name`);
//! 2. present but empty registration URI (`invalid entity: empty reg-id`);
//! 3. empty role list (`invalid entity: empty roles`);
//! 4. first unrecognized role (`invalid entity: unknown role 666 at index 0`).
//!
//! [`Entities::valid`] reports the first invalid member only, nesting its
//! message verbatim: `entity at index 3: invalid entity: empty roles`.
//!
//! ## Wire format
//!
//! Binary: CBOR map `{0: name, ?1: tag32(uri), 2: [role codes]}`.
//! Text: `{"name": .., ?"regid": "<uri>", "roles": [..]}`.

use rim_core::binary::{from_slice, to_vec};
use rim_core::text::json_kind;
use rim_core::{
    raw_kind, validate_each, CodecError, RawValue, Validate, ValidationError, ValueKind,
};
use serde_json::{Map, Value};

use crate::name::{EntityName, EntityNameBinaryCodec, EntityNameKind, EntityNameTextCodec};
use crate::role::{Role, Roles};
use crate::uri::TaggedUri;

/// Map key of the entity name.
pub const ENTITY_NAME_KEY: i64 = 0;
/// Map key of the registration URI.
pub const REG_ID_KEY: i64 = 1;
/// Map key of the role list.
pub const ROLE_KEY: i64 = 2;

/// JSON member of the entity name.
pub const NAME_MEMBER: &str = "name";
/// JSON member of the registration URI.
pub const REG_ID_MEMBER: &str = "regid";
/// JSON member of the role list.
pub const ROLES_MEMBER: &str = "roles";

const NAME_FIELD: &str = EntityNameKind::FIELD;
const REG_ID_FIELD: &str = "reg-id";
const ROLE_FIELD: &str = "role";

/// A named party with an optional registration URI and a set of roles.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Entity {
    /// Required. `None` only for an entity under construction.
    pub name: Option<EntityName>,
    /// Optional registration identifier; must be non-empty when present.
    pub reg_id: Option<TaggedUri>,
    /// Required, non-empty.
    pub roles: Roles,
}

impl Entity {
    /// An empty entity, to be filled with the `with_*` builders.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the name.
    pub fn with_name(mut self, name: EntityName) -> Self {
        self.name = Some(name);
        self
    }

    /// Set a plain-string name.
    pub fn with_plain_name(self, name: impl Into<String>) -> Self {
        self.with_name(EntityName::plain(name))
    }

    /// Set the registration URI.
    pub fn with_reg_id(mut self, uri: impl Into<TaggedUri>) -> Self {
        self.reg_id = Some(uri.into());
        self
    }

    /// Replace the role list.
    pub fn with_roles(mut self, roles: impl IntoIterator<Item = Role>) -> Self {
        self.roles = roles.into_iter().collect();
        self
    }

    /// Append one role.
    pub fn add_role(mut self, role: Role) -> Self {
        self.roles.push(role);
        self
    }

    fn check(&self) -> Result<(), ValidationError> {
        let name = self
            .name
            .as_ref()
            .ok_or(ValidationError::EmptyValue { field: NAME_FIELD })?;
        name.valid()?;

        if let Some(reg_id) = &self.reg_id {
            reg_id.valid_as(REG_ID_FIELD)?;
        }

        self.roles.valid()
    }

    /// The CBOR map for this entity.
    ///
    /// # Errors
    ///
    /// [`CodecError::MissingField`] if the name is unset.
    pub fn to_binary(&self) -> Result<RawValue, CodecError> {
        let name = self
            .name
            .as_ref()
            .ok_or(CodecError::MissingField { field: NAME_FIELD })?;

        let mut map = Vec::with_capacity(3);
        map.push((
            RawValue::from(ENTITY_NAME_KEY),
            EntityNameBinaryCodec::encode_item(name),
        ));
        if let Some(reg_id) = &self.reg_id {
            map.push((RawValue::from(REG_ID_KEY), reg_id.to_binary()));
        }
        map.push((RawValue::from(ROLE_KEY), self.roles.to_binary()));
        Ok(RawValue::Map(map))
    }

    /// Parse a CBOR entity map. Failures inside a field are wrapped with the
    /// field name.
    pub fn from_binary(codec: &EntityNameBinaryCodec<'_>, item: RawValue) -> Result<Self, CodecError> {
        let entries = match item {
            RawValue::Map(entries) => entries,
            other => {
                return Err(malformed(format!("expected map, found {}", raw_kind(&other))));
            }
        };

        let mut name = None;
        let mut reg_id = None;
        let mut roles = None;
        for (key, value) in entries {
            let key = match key {
                RawValue::Integer(key) => i64::try_from(key)
                    .map_err(|_| malformed("map key out of range".to_string()))?,
                other => {
                    return Err(malformed(format!("expected integer key, found {}", raw_kind(&other))));
                }
            };
            match key {
                ENTITY_NAME_KEY if name.is_none() => {
                    name = Some(codec.decode_item(value).map_err(|e| e.in_field(NAME_FIELD))?);
                }
                REG_ID_KEY if reg_id.is_none() => {
                    reg_id = Some(TaggedUri::from_binary(value).map_err(|e| e.in_field(REG_ID_FIELD))?);
                }
                ROLE_KEY if roles.is_none() => {
                    roles = Some(Roles::from_binary(value).map_err(|e| e.in_field(ROLE_FIELD))?);
                }
                ENTITY_NAME_KEY | REG_ID_KEY | ROLE_KEY => {
                    return Err(malformed(format!("duplicate key {key}")));
                }
                other => return Err(malformed(format!("unexpected key {other}"))),
            }
        }

        Ok(Self {
            name: Some(name.ok_or(CodecError::MissingField { field: NAME_FIELD })?),
            reg_id,
            roles: roles.ok_or(CodecError::MissingField { field: ROLE_FIELD })?,
        })
    }

    /// The JSON object for this entity.
    ///
    /// # Errors
    ///
    /// [`CodecError::MissingField`] if the name is unset.
    pub fn to_text(&self) -> Result<Value, CodecError> {
        let name = self
            .name
            .as_ref()
            .ok_or(CodecError::MissingField { field: NAME_FIELD })?;

        let mut members = Map::new();
        members.insert(NAME_MEMBER.to_string(), EntityNameTextCodec::encode_item(name));
        if let Some(reg_id) = &self.reg_id {
            members.insert(REG_ID_MEMBER.to_string(), reg_id.to_text());
        }
        members.insert(ROLES_MEMBER.to_string(), self.roles.to_text());
        Ok(Value::Object(members))
    }

    /// Parse a JSON entity object.
    pub fn from_text(codec: &EntityNameTextCodec<'_>, item: Value) -> Result<Self, CodecError> {
        let mut members = match item {
            Value::Object(members) => members,
            other => {
                return Err(malformed(format!("expected object, found {}", json_kind(&other))));
            }
        };

        let name = members
            .remove(NAME_MEMBER)
            .ok_or(CodecError::MissingField { field: NAME_FIELD })?;
        let name = codec.decode_item(name).map_err(|e| e.in_field(NAME_FIELD))?;

        let reg_id = members
            .remove(REG_ID_MEMBER)
            .map(TaggedUri::from_text)
            .transpose()
            .map_err(|e| e.in_field(REG_ID_FIELD))?;

        let roles = members
            .remove(ROLES_MEMBER)
            .ok_or(CodecError::MissingField { field: ROLE_FIELD })?;
        let roles = Roles::from_text(roles).map_err(|e| e.in_field(ROLE_FIELD))?;

        if let Some(member) = members.keys().next() {
            return Err(malformed(format!("unexpected member \"{member}\"")));
        }

        Ok(Self {
            name: Some(name),
            reg_id,
            roles,
        })
    }

    /// Encode to a CBOR buffer.
    pub fn encode_cbor(&self) -> Result<Vec<u8>, CodecError> {
        to_vec(&self.to_binary()?)
    }

    /// Decode from a CBOR buffer.
    pub fn decode_cbor(codec: &EntityNameBinaryCodec<'_>, bytes: &[u8]) -> Result<Self, CodecError> {
        Self::from_binary(codec, from_slice(bytes, codec.config())?)
    }

    /// Encode to a JSON buffer.
    pub fn encode_json(&self) -> Result<Vec<u8>, CodecError> {
        Ok(serde_json::to_vec(&self.to_text()?)?)
    }

    /// Decode from a JSON buffer.
    pub fn decode_json(codec: &EntityNameTextCodec<'_>, bytes: &[u8]) -> Result<Self, CodecError> {
        let item = decode_json_item(codec, bytes)?;
        Self::from_text(codec, item)
    }
}

impl Validate for Entity {
    fn valid(&self) -> Result<(), ValidationError> {
        self.check().map_err(|e| e.within("entity"))
    }
}

/// Ordered list of entities.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Entities(Vec<Entity>);

impl Entities {
    /// An empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entity.
    pub fn add_entity(mut self, entity: Entity) -> Self {
        self.0.push(entity);
        self
    }

    /// Append an entity in place.
    pub fn push(&mut self, entity: Entity) {
        self.0.push(entity);
    }

    /// Number of entities.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the list is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate in order.
    pub fn iter(&self) -> std::slice::Iter<'_, Entity> {
        self.0.iter()
    }

    /// CBOR array of entity maps.
    pub fn to_binary(&self) -> Result<RawValue, CodecError> {
        self.0
            .iter()
            .enumerate()
            .map(|(index, entity)| entity.to_binary().map_err(|e| e.at_index("entity", index)))
            .collect::<Result<Vec<_>, _>>()
            .map(RawValue::Array)
    }

    /// Parse a CBOR array of entity maps.
    pub fn from_binary(codec: &EntityNameBinaryCodec<'_>, item: RawValue) -> Result<Self, CodecError> {
        let items = match item {
            RawValue::Array(items) => items,
            other => {
                return Err(malformed(format!("expected array, found {}", raw_kind(&other))));
            }
        };
        tracing::trace!(count = items.len(), "decoding entities");
        items
            .into_iter()
            .enumerate()
            .map(|(index, item)| {
                Entity::from_binary(codec, item).map_err(|e| e.at_index("entity", index))
            })
            .collect()
    }

    /// JSON array of entity objects.
    pub fn to_text(&self) -> Result<Value, CodecError> {
        self.0
            .iter()
            .enumerate()
            .map(|(index, entity)| entity.to_text().map_err(|e| e.at_index("entity", index)))
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Array)
    }

    /// Parse a JSON array of entity objects.
    pub fn from_text(codec: &EntityNameTextCodec<'_>, item: Value) -> Result<Self, CodecError> {
        let items = match item {
            Value::Array(items) => items,
            other => {
                return Err(malformed(format!("expected array, found {}", json_kind(&other))));
            }
        };
        tracing::trace!(count = items.len(), "decoding entities");
        items
            .into_iter()
            .enumerate()
            .map(|(index, item)| {
                Entity::from_text(codec, item).map_err(|e| e.at_index("entity", index))
            })
            .collect()
    }

    /// Encode to a CBOR buffer.
    pub fn encode_cbor(&self) -> Result<Vec<u8>, CodecError> {
        to_vec(&self.to_binary()?)
    }

    /// Decode from a CBOR buffer.
    pub fn decode_cbor(codec: &EntityNameBinaryCodec<'_>, bytes: &[u8]) -> Result<Self, CodecError> {
        Self::from_binary(codec, from_slice(bytes, codec.config())?)
    }

    /// Encode to a JSON buffer.
    pub fn encode_json(&self) -> Result<Vec<u8>, CodecError> {
        Ok(serde_json::to_vec(&self.to_text()?)?)
    }

    /// Decode from a JSON buffer.
    pub fn decode_json(codec: &EntityNameTextCodec<'_>, bytes: &[u8]) -> Result<Self, CodecError> {
        let item = decode_json_item(codec, bytes)?;
        Self::from_text(codec, item)
    }
}

impl From<Vec<Entity>> for Entities {
    fn from(entities: Vec<Entity>) -> Self {
        Self(entities)
    }
}

impl FromIterator<Entity> for Entities {
    fn from_iter<I: IntoIterator<Item = Entity>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Entities {
    type Item = &'a Entity;
    type IntoIter = std::slice::Iter<'a, Entity>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl Validate for Entities {
    fn valid(&self) -> Result<(), ValidationError> {
        validate_each("entity", &self.0)
    }
}

fn decode_json_item(codec: &EntityNameTextCodec<'_>, bytes: &[u8]) -> Result<Value, CodecError> {
    codec.config().check_input_len(bytes.len())?;
    Ok(serde_json::from_slice(bytes)?)
}

fn malformed(reason: String) -> CodecError {
    CodecError::MalformedStructure {
        what: "entity",
        reason,
    }
}
