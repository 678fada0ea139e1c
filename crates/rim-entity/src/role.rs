//! # Roles
//!
//! The relationship of an entity to the manifest. The recognized set is
//! closed, but the wire carries bare integers, so [`Role`] is a newtype over
//! the code: an unrecognized code decodes successfully and is reported by
//! validation, together with its position in the list.

use std::fmt;

use rim_core::text::json_kind;
use rim_core::{raw_kind, CodecError, RawValue, Validate, ValidationError};
use serde_json::Value;

/// A role code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Role(i64);

impl Role {
    /// The entity created the manifest.
    pub const MANIFEST_CREATOR: Role = Role(1);

    /// The entity signed the manifest.
    pub const MANIFEST_SIGNER: Role = Role(2);

    const KNOWN: [(Role, &'static str); 2] = [
        (Role::MANIFEST_CREATOR, "manifestCreator"),
        (Role::MANIFEST_SIGNER, "manifestSigner"),
    ];

    /// Wrap a raw code, recognized or not.
    pub const fn new(code: i64) -> Self {
        Self(code)
    }

    /// The wire code.
    pub fn code(self) -> i64 {
        self.0
    }

    /// The text name of a recognized role.
    pub fn name(self) -> Option<&'static str> {
        Self::KNOWN
            .iter()
            .find(|(role, _)| *role == self)
            .map(|(_, name)| *name)
    }

    /// Resolve a text name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::KNOWN
            .iter()
            .find(|(_, known)| *known == name)
            .map(|(role, _)| *role)
    }

    /// Whether the code is in the recognized set.
    pub fn is_known(self) -> bool {
        self.name().is_some()
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => f.write_str(name),
            None => write!(f, "{}", self.0),
        }
    }
}

/// Ordered list of roles.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Roles(Vec<Role>);

impl Roles {
    /// An empty list (invalid until a role is added).
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a role.
    pub fn add(mut self, role: Role) -> Self {
        self.0.push(role);
        self
    }

    /// Append a role in place.
    pub fn push(&mut self, role: Role) {
        self.0.push(role);
    }

    /// Number of roles.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the list is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate in order.
    pub fn iter(&self) -> std::slice::Iter<'_, Role> {
        self.0.iter()
    }

    /// The roles as a slice.
    pub fn as_slice(&self) -> &[Role] {
        &self.0
    }

    /// CBOR array of integer codes.
    pub fn to_binary(&self) -> RawValue {
        RawValue::Array(self.0.iter().map(|role| RawValue::from(role.0)).collect())
    }

    /// Parse a CBOR array of integer codes. Unrecognized codes are kept.
    pub fn from_binary(item: RawValue) -> Result<Self, CodecError> {
        let items = match item {
            RawValue::Array(items) => items,
            other => return Err(malformed(format!("expected array, found {}", raw_kind(&other)))),
        };
        items
            .into_iter()
            .enumerate()
            .map(|(index, item)| match item {
                RawValue::Integer(code) => i64::try_from(code)
                    .map(Role)
                    .map_err(|_| malformed("role code out of range".to_string()).at_index("role", index)),
                other => Err(
                    malformed(format!("expected integer, found {}", raw_kind(&other))).at_index("role", index),
                ),
            })
            .collect()
    }

    /// JSON array: recognized roles by name, others by code.
    pub fn to_text(&self) -> Value {
        Value::Array(
            self.0
                .iter()
                .map(|role| match role.name() {
                    Some(name) => Value::String(name.to_string()),
                    None => Value::from(role.0),
                })
                .collect(),
        )
    }

    /// Parse a JSON array of role names or integer codes.
    pub fn from_text(item: Value) -> Result<Self, CodecError> {
        let items = match item {
            Value::Array(items) => items,
            other => return Err(malformed(format!("expected array, found {}", json_kind(&other)))),
        };
        items
            .into_iter()
            .enumerate()
            .map(|(index, item)| {
                let role = match &item {
                    Value::String(name) => Role::from_name(name)
                        .ok_or_else(|| malformed(format!("unknown role name \"{name}\""))),
                    Value::Number(n) => n
                        .as_i64()
                        .map(Role)
                        .ok_or_else(|| malformed("role code out of range".to_string())),
                    other => Err(malformed(format!(
                        "expected string or integer, found {}",
                        json_kind(other)
                    ))),
                };
                role.map_err(|e| e.at_index("role", index))
            })
            .collect()
    }
}

fn malformed(reason: String) -> CodecError {
    CodecError::MalformedStructure {
        what: "roles",
        reason,
    }
}

impl From<Vec<Role>> for Roles {
    fn from(roles: Vec<Role>) -> Self {
        Self(roles)
    }
}

impl FromIterator<Role> for Roles {
    fn from_iter<I: IntoIterator<Item = Role>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Roles {
    type Item = &'a Role;
    type IntoIter = std::slice::Iter<'a, Role>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl Validate for Roles {
    fn valid(&self) -> Result<(), ValidationError> {
        if self.0.is_empty() {
            return Err(ValidationError::EmptyRoles);
        }
        match self.0.iter().position(|role| !role.is_known()) {
            Some(index) => Err(ValidationError::UnknownRole {
                value: self.0[index].0,
                index,
            }),
            None => Ok(()),
        }
    }
}
