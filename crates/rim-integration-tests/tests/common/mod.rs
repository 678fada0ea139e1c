//! Shared fixtures: a registered entity-name extension and tracing setup.

#![allow(dead_code)]

use std::fmt;

use rim_core::{ConstructError, ExtensionValue, RawValue, ValidationError};
use rim_entity::EntityNameRegistry;

/// Tag the fixture extension is registered under.
pub const TEST_TAG: u64 = 99994;

/// Type name the fixture extension is registered under.
pub const TEST_NAME: &str = "test";

/// Entity name carried as an unsigned counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TestName(pub u64);

impl fmt::Display for TestName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl ExtensionValue for TestName {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.0 == 0 {
            return Err(ValidationError::Extension("test name must be non-zero".to_string()));
        }
        Ok(())
    }

    fn to_binary(&self) -> RawValue {
        RawValue::from(self.0)
    }

    fn to_text(&self) -> serde_json::Value {
        serde_json::Value::from(self.0)
    }

    fn clone_box(&self) -> Box<dyn ExtensionValue> {
        Box::new(*self)
    }
}

/// Constructor for [`TestName`]: null becomes zero, integers must fit `u64`.
pub fn new_test_name(raw: RawValue) -> Result<Box<dyn ExtensionValue>, ConstructError> {
    let value = match raw {
        RawValue::Null => 0,
        RawValue::Integer(i) => {
            u64::try_from(i).map_err(|_| ConstructError::new("must be uint64"))?
        }
        _ => return Err(ConstructError::new("must be uint64")),
    };
    Ok(Box::new(TestName(value)))
}

/// A fresh registry with the fixture extension registered.
pub fn registry_with_test_name() -> EntityNameRegistry {
    let registry = EntityNameRegistry::new();
    registry
        .register(TEST_TAG, TEST_NAME, new_test_name)
        .expect("fixture registration");
    registry
}

/// Route `tracing` output to the test harness. Safe to call repeatedly.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Lowercase hex, for comparing wire vectors.
pub fn hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}
