//! # Type Registry
//!
//! Maps a binary discriminator (CBOR tag) and a text discriminator (type
//! name) to the constructor of a registered representation.
//!
//! ## Concurrency
//!
//! One `parking_lot::Mutex` guards both lookup tables. Registration checks
//! both collisions and inserts both rows under the same guard, so a rejected
//! registration leaves no trace and racing registrations of the same tag or
//! name resolve to exactly one winner. Lookups clone the entry's `Arc` and
//! release the lock before any constructor runs.
//!
//! ## Lifecycle
//!
//! Registries are explicit objects, built at process start and shared by
//! reference (or `Arc`) with every codec. There is no global instance and no
//! way to unregister.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::error::{ConstructError, RegistryError};
use crate::value::{ExtensionValue, ValueKind, PLAIN_STRING_TYPE};
use crate::RawValue;

/// Constructor of a registered representation.
///
/// Invoked with the raw value supplied to
/// [`ExtensibleValue::new_from_value`](crate::ExtensibleValue::new_from_value),
/// the CBOR item following the tag, or the `value` member of a typed JSON
/// object.
pub type Constructor =
    Arc<dyn Fn(RawValue) -> Result<Box<dyn ExtensionValue>, ConstructError> + Send + Sync>;

/// CBOR bignum tags (RFC 8949 §3.4.3). The CBOR data model folds them into
/// integers on decode, so a representation registered under one could never
/// be read back.
pub const BIGNUM_TAGS: &[u64] = &[2, 3];

/// One registered representation.
#[derive(Clone)]
pub struct RegistryEntry {
    tag: u64,
    name: Arc<str>,
    constructor: Constructor,
}

impl RegistryEntry {
    /// The binary tag.
    pub fn tag(&self) -> u64 {
        self.tag
    }

    /// The text name.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn shared_name(&self) -> Arc<str> {
        Arc::clone(&self.name)
    }

    /// Invoke the constructor.
    pub fn construct(&self, raw: RawValue) -> Result<Box<dyn ExtensionValue>, ConstructError> {
        (self.constructor)(raw)
    }
}

impl fmt::Debug for RegistryEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegistryEntry")
            .field("tag", &self.tag)
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

#[derive(Default)]
struct Tables {
    by_tag: BTreeMap<u64, Arc<RegistryEntry>>,
    by_name: HashMap<Arc<str>, Arc<RegistryEntry>>,
}

/// Append-only table of registered representations for one [`ValueKind`].
pub struct TypeRegistry<K: ValueKind> {
    tables: Mutex<Tables>,
    kind: PhantomData<fn() -> K>,
}

impl<K: ValueKind> TypeRegistry<K> {
    /// Create a registry holding no extensions. The built-in plain string and
    /// the kind's reserved tags are always unavailable for registration.
    pub fn new() -> Self {
        Self {
            tables: Mutex::new(Tables::default()),
            kind: PhantomData,
        }
    }

    /// Register a representation under `tag` and `name`.
    ///
    /// # Errors
    ///
    /// - [`RegistryError::EmptyName`] if `name` is empty.
    /// - [`RegistryError::TagCollision`] if `tag` is registered, reserved by
    ///   the kind, or one of the [`BIGNUM_TAGS`].
    /// - [`RegistryError::NameCollision`] if `name` is registered or is the
    ///   built-in name.
    ///
    /// All checks complete before the tables are touched.
    pub fn register<F>(&self, tag: u64, name: &str, constructor: F) -> Result<(), RegistryError>
    where
        F: Fn(RawValue) -> Result<Box<dyn ExtensionValue>, ConstructError> + Send + Sync + 'static,
    {
        if name.is_empty() {
            return Err(RegistryError::EmptyName { kind: K::LABEL });
        }

        let mut tables = self.tables.lock();

        if BIGNUM_TAGS.contains(&tag)
            || K::RESERVED_TAGS.contains(&tag)
            || tables.by_tag.contains_key(&tag)
        {
            tracing::warn!(kind = K::LABEL, tag, name, "rejected registration: tag collision");
            return Err(RegistryError::TagCollision { tag });
        }
        if name == PLAIN_STRING_TYPE || tables.by_name.contains_key(name) {
            tracing::warn!(kind = K::LABEL, tag, name, "rejected registration: name collision");
            return Err(RegistryError::NameCollision {
                kind: K::LABEL,
                name: name.to_string(),
            });
        }

        let name: Arc<str> = Arc::from(name);
        let entry = Arc::new(RegistryEntry {
            tag,
            name: Arc::clone(&name),
            constructor: Arc::new(constructor),
        });
        tables.by_tag.insert(tag, Arc::clone(&entry));
        tables.by_name.insert(name, entry);

        tracing::debug!(kind = K::LABEL, tag, "registered extension type");
        Ok(())
    }

    /// Resolve a binary tag.
    pub fn lookup_by_tag(&self, tag: u64) -> Option<Arc<RegistryEntry>> {
        self.tables.lock().by_tag.get(&tag).cloned()
    }

    /// Resolve a text name.
    pub fn lookup_by_name(&self, name: &str) -> Option<Arc<RegistryEntry>> {
        self.tables.lock().by_name.get(name).cloned()
    }

    /// Registered tags, ascending.
    pub fn tags(&self) -> Vec<u64> {
        self.tables.lock().by_tag.keys().copied().collect()
    }

    /// Number of registered representations.
    pub fn len(&self) -> usize {
        self.tables.lock().by_tag.len()
    }

    /// Whether nothing has been registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<K: ValueKind> Default for TypeRegistry<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: ValueKind> fmt::Debug for TypeRegistry<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeRegistry")
            .field("kind", &K::LABEL)
            .field("tags", &self.tags())
            .finish()
    }
}
