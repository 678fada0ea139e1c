//! Wire behavior of entity names across both codecs.
//!
//! Pins the exact CBOR and JSON encodings of the plain and registered
//! representations, and the rejection of unresolvable discriminators.

mod common;

use common::{hex, init_tracing, registry_with_test_name, TestName, TEST_NAME, TEST_TAG};
use proptest::prelude::*;
use rim_core::{CodecError, Validate};
use rim_entity::{EntityName, EntityNameBinaryCodec, EntityNameRegistry, EntityNameTextCodec};

// ---------------------------------------------------------------------------
// Binary wire
// ---------------------------------------------------------------------------

#[test]
fn plain_name_binary_vector() {
    let registry = EntityNameRegistry::new();
    let codec = EntityNameBinaryCodec::new(&registry);
    let bytes = codec.encode(&EntityName::plain("test")).unwrap();
    assert_eq!(hex(&bytes), "6474657374");
    assert_eq!(codec.decode(&bytes).unwrap(), EntityName::plain("test"));
}

#[test]
fn registered_name_binary_vector() {
    init_tracing();
    let registry = registry_with_test_name();
    let codec = EntityNameBinaryCodec::new(&registry);
    let name = EntityName::new_from_value(&registry, 7u64, Some(TEST_NAME)).unwrap();

    let bytes = codec.encode(&name).unwrap();
    assert_eq!(hex(&bytes), "da0001869a07");

    let decoded = codec.decode(&bytes).unwrap();
    assert_eq!(decoded, name);
    assert_eq!(decoded.tag(), Some(TEST_TAG));
    assert_eq!(decoded.type_name(), TEST_NAME);
}

#[test]
fn unregistered_tag_rejected() {
    let registry = EntityNameRegistry::new();
    let codec = EntityNameBinaryCodec::new(&registry);
    let err = codec.decode(&[0xda, 0x00, 0x01, 0x86, 0x9a, 0x07]).unwrap_err();
    assert_eq!(
        err,
        CodecError::UnknownBinaryTag {
            kind: "entity name",
            tag: TEST_TAG
        }
    );
}

#[test]
fn constructor_rejection_surfaces_tag() {
    let registry = registry_with_test_name();
    let codec = EntityNameBinaryCodec::new(&registry);
    // tag 99994 wrapping text "x"
    let err = codec.decode(&[0xda, 0x00, 0x01, 0x86, 0x9a, 0x61, 0x78]).unwrap_err();
    assert_eq!(
        err.to_string(),
        "malformed binary payload for tag 99994: must be uint64"
    );
}

// ---------------------------------------------------------------------------
// Text wire
// ---------------------------------------------------------------------------

#[test]
fn plain_name_text_vector() {
    let registry = EntityNameRegistry::new();
    let codec = EntityNameTextCodec::new(&registry);
    let bytes = codec.encode(&EntityName::plain("test")).unwrap();
    assert_eq!(bytes, br#""test""#);
    assert_eq!(codec.decode(&bytes).unwrap(), EntityName::plain("test"));
}

#[test]
fn registered_name_text_vector() {
    let registry = registry_with_test_name();
    let codec = EntityNameTextCodec::new(&registry);
    let name = EntityName::new_from_value(&registry, 7u64, Some(TEST_NAME)).unwrap();

    let bytes = codec.encode(&name).unwrap();
    assert_eq!(bytes, br#"{"type":"test","value":7}"#);
    assert_eq!(codec.decode(&bytes).unwrap(), name);
}

#[test]
fn unregistered_type_name_rejected() {
    let registry = EntityNameRegistry::new();
    let codec = EntityNameTextCodec::new(&registry);
    let err = codec.decode(br#"{"type":"test","value":7}"#).unwrap_err();
    assert_eq!(err.to_string(), r#"unknown entity name type: "test""#);
}

#[test]
fn typed_plain_string_accepted() {
    let registry = EntityNameRegistry::new();
    let codec = EntityNameTextCodec::new(&registry);
    let name = codec.decode(br#"{"type":"string","value":"ACME"}"#).unwrap();
    assert_eq!(name, EntityName::plain("ACME"));
}

#[test]
fn same_value_over_both_wires() {
    let registry = registry_with_test_name();
    let binary = EntityNameBinaryCodec::new(&registry);
    let text = EntityNameTextCodec::new(&registry);
    let name = EntityName::new_from_value(&registry, 42u64, Some(TEST_NAME)).unwrap();

    let via_binary = binary.decode(&binary.encode(&name).unwrap()).unwrap();
    let via_text = text.decode(&text.encode(&name).unwrap()).unwrap();
    assert_eq!(via_binary, via_text);
    assert_eq!(via_binary.to_string(), "42");
}

// ---------------------------------------------------------------------------
// Construction
// ---------------------------------------------------------------------------

#[test]
fn null_constructs_zero_and_fails_extension_validation() {
    let registry = registry_with_test_name();
    let name = EntityName::new_from_value(&registry, rim_core::RawValue::Null, Some(TEST_NAME))
        .unwrap();
    assert_eq!(name.to_string(), "0");
    assert_eq!(
        name.valid().unwrap_err().to_string(),
        "test name must be non-zero"
    );
}

#[test]
fn constructor_error_returned_unchanged() {
    let registry = registry_with_test_name();
    let err = EntityName::new_from_value(&registry, "seven", Some(TEST_NAME)).unwrap_err();
    assert_eq!(err.to_string(), "must be uint64");
}

#[test]
#[should_panic(expected = "invalid literal entity name")]
fn must_new_panics_on_bad_literal() {
    let registry = registry_with_test_name();
    let _ = EntityName::must_new_from_value(&registry, -1i64, Some(TEST_NAME));
}

#[test]
fn must_new_builds_good_literal() {
    let registry = registry_with_test_name();
    let name = EntityName::must_new_from_value(&registry, 3u64, Some(TEST_NAME));
    let ext = name.extension().unwrap();
    assert_eq!(ext.to_string(), TestName(3).to_string());
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn plain_names_survive_both_wires(text in ".*") {
        let registry = EntityNameRegistry::new();
        let name = EntityName::plain(text);
        let binary = EntityNameBinaryCodec::new(&registry);
        let json = EntityNameTextCodec::new(&registry);
        prop_assert_eq!(binary.decode(&binary.encode(&name).unwrap()).unwrap(), name.clone());
        prop_assert_eq!(json.decode(&json.encode(&name).unwrap()).unwrap(), name);
    }

    #[test]
    fn registered_names_survive_both_wires(n in any::<u64>()) {
        let registry = registry_with_test_name();
        let name = EntityName::new_from_value(&registry, n, Some(TEST_NAME)).unwrap();
        let binary = EntityNameBinaryCodec::new(&registry);
        let json = EntityNameTextCodec::new(&registry);
        prop_assert_eq!(binary.decode(&binary.encode(&name).unwrap()).unwrap(), name.clone());
        prop_assert_eq!(json.decode(&json.encode(&name).unwrap()).unwrap(), name);
    }
}
