//! # Codec Configuration
//!
//! Limits applied by [`BinaryCodec`](crate::BinaryCodec) and
//! [`TextCodec`](crate::TextCodec) before any parsing takes place.
//! Loadable from YAML so that services embedding the codecs can keep the
//! limits next to the rest of their configuration.

use serde::{Deserialize, Serialize};

use crate::error::{CodecError, ConfigError};

/// Default upper bound on a single encoded buffer (1 MiB).
pub const DEFAULT_MAX_INPUT_BYTES: usize = 1024 * 1024;

pub(crate) static DEFAULT_CONFIG: CodecConfig = CodecConfig {
    max_input_bytes: DEFAULT_MAX_INPUT_BYTES,
};

/// Decoder limits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CodecConfig {
    /// Buffers longer than this are rejected with
    /// [`CodecError::InputTooLarge`] before parsing.
    pub max_input_bytes: usize,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            max_input_bytes: DEFAULT_MAX_INPUT_BYTES,
        }
    }
}

impl CodecConfig {
    /// Parse a configuration from a YAML document. Absent keys take their
    /// default values.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] for malformed YAML or unknown keys, and
    /// [`ConfigError::ZeroLimit`] if a limit is zero.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that every limit is usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_input_bytes == 0 {
            return Err(ConfigError::ZeroLimit {
                field: "max_input_bytes",
            });
        }
        Ok(())
    }

    /// Reject inputs longer than `max_input_bytes`.
    pub fn check_input_len(&self, len: usize) -> Result<(), CodecError> {
        if len > self.max_input_bytes {
            tracing::debug!(len, max = self.max_input_bytes, "rejecting oversized input");
            return Err(CodecError::InputTooLarge {
                len,
                max: self.max_input_bytes,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_limit() {
        assert_eq!(CodecConfig::default().max_input_bytes, 1024 * 1024);
    }

    #[test]
    fn yaml_overrides_limit() {
        let config = CodecConfig::from_yaml_str("max_input_bytes: 64\n").unwrap();
        assert_eq!(config.max_input_bytes, 64);
    }

    #[test]
    fn yaml_empty_mapping_uses_defaults() {
        let config = CodecConfig::from_yaml_str("{}").unwrap();
        assert_eq!(config, CodecConfig::default());
    }

    #[test]
    fn yaml_rejects_zero_limit() {
        let err = CodecConfig::from_yaml_str("max_input_bytes: 0").unwrap_err();
        assert_eq!(err.to_string(), "max_input_bytes must be greater than zero");
    }

    #[test]
    fn yaml_rejects_unknown_key() {
        assert!(CodecConfig::from_yaml_str("max_depth: 3").is_err());
    }

    #[test]
    fn check_input_len_boundary() {
        let config = CodecConfig { max_input_bytes: 4 };
        assert!(config.check_input_len(4).is_ok());
        assert_eq!(
            config.check_input_len(5),
            Err(CodecError::InputTooLarge { len: 5, max: 4 })
        );
    }
}
