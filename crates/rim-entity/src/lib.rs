//! # rim-entity — Manifest Entities
//!
//! The entity record of a reference integrity manifest, built on the
//! extensible-type core in `rim-core`:
//!
//! - **Entity name** (`name.rs`): [`EntityName`], an extensible value whose
//!   registry reserves the format's own tags (32, 37, 111).
//!
//! - **Tagged URI** (`uri.rs`): [`TaggedUri`], the registration identifier.
//!
//! - **Roles** (`role.rs`): [`Role`] codes and the [`Roles`] list.
//!
//! - **Entity** (`entity.rs`): [`Entity`] and [`Entities`], with validation
//!   and both wire forms.
//!
//! ## Crate Policy
//!
//! - Depends only on `rim-core` among workspace crates.
//! - No `unsafe` code.
//! - No `.unwrap()` outside tests.
//! - Registries are passed in through the codecs; nothing here is global.

pub mod entity;
pub mod name;
pub mod role;
pub mod uri;

pub use entity::{Entities, Entity};
pub use name::{
    EntityName, EntityNameBinaryCodec, EntityNameKind, EntityNameRegistry, EntityNameTextCodec,
    OID_TAG, UUID_TAG,
};
pub use role::{Role, Roles};
pub use uri::{TaggedUri, URI_TAG};
