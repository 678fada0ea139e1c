//! # rim-core — Extensible-Type Codec Core
//!
//! Fields of a reference integrity manifest are not closed enumerations. An
//! entity name, for example, is either a plain string or any representation
//! an integrator registers at process start: an integer, a structured record,
//! an opaque blob. This crate provides the machinery shared by every such
//! field:
//!
//! - **Registry** (`registry.rs`): [`TypeRegistry`] maps a CBOR tag and a type
//!   name to a constructor. Append-only, collision-checked, lock-protected.
//!
//! - **Value** (`value.rs`): [`ExtensibleValue`] wraps exactly one
//!   representation, either the built-in plain string or a registered one.
//!
//! - **Binary codec** (`binary.rs`): [`BinaryCodec`], bare text string or
//!   tag + payload on the CBOR wire.
//!
//! - **Text codec** (`text.rs`): [`TextCodec`], bare literal or
//!   `{"type": .., "value": ..}` on the JSON wire.
//!
//! - **Validation** (`validate.rs`): the [`Validate`] contract, first
//!   violation only, with path-qualified messages.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `rim-*` crates (this is the leaf of the DAG).
//! - No `unsafe` code.
//! - No `.unwrap()` outside tests. The only panicking API is
//!   [`ExtensibleValue::must_new_from_value`], a trap for literal inputs.
//! - No global state: every registry is an explicit object, so tests build
//!   their own.
//! - No I/O. Callers hand in byte buffers and get byte buffers back.

pub mod binary;
pub mod config;
pub mod error;
pub mod registry;
pub mod text;
pub mod validate;
pub mod value;

/// The CBOR data model, used as the raw input of every constructor.
pub use ciborium::value::Value as RawValue;

// Re-export primary types for ergonomic imports.
pub use binary::BinaryCodec;
pub use config::CodecConfig;
pub use error::{CodecError, ConfigError, ConstructError, RegistryError, RimError, ValidationError};
pub use registry::{Constructor, RegistryEntry, TypeRegistry, BIGNUM_TAGS};
pub use text::TextCodec;
pub use validate::{validate_each, Validate};
pub use value::{raw_kind, ExtensibleValue, ExtensionValue, ValueKind, PLAIN_STRING_TYPE};
