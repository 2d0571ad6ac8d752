//! Configuration types for image intake

use crate::error::{IntakeError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Default upload size limit: 10 MiB
pub const DEFAULT_MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;

/// Media type prefix every accepted upload must carry
pub const DEFAULT_ACCEPTED_TYPE_PREFIX: &str = "image/";

/// Prefix prepended to the stem of a downloaded result
pub const DEFAULT_DOWNLOAD_PREFIX: &str = "bg-removed-";

/// Extension of a downloaded result (the remover always yields PNG)
pub const DEFAULT_DOWNLOAD_EXTENSION: &str = "png";

/// Configuration for the intake controller
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntakeConfig {
    /// Largest accepted upload in bytes (inclusive)
    pub max_file_size: u64,
    /// Required prefix of the declared media type
    pub accepted_type_prefix: String,
    /// Prefix of the download filename
    pub download_prefix: String,
    /// Extension of the download filename, without the dot
    pub download_extension: String,
    /// Upper bound for the external removal call in seconds (None = unbounded)
    pub processing_timeout_secs: Option<u64>,
}

impl Default for IntakeConfig {
    fn default() -> Self {
        Self {
            max_file_size: DEFAULT_MAX_FILE_SIZE,
            accepted_type_prefix: DEFAULT_ACCEPTED_TYPE_PREFIX.to_string(),
            download_prefix: DEFAULT_DOWNLOAD_PREFIX.to_string(),
            download_extension: DEFAULT_DOWNLOAD_EXTENSION.to_string(),
            processing_timeout_secs: None,
        }
    }
}

impl IntakeConfig {
    /// Create a new configuration builder
    #[must_use]
    pub fn builder() -> IntakeConfigBuilder {
        IntakeConfigBuilder::new()
    }

    /// Timeout applied to the external removal call, if any
    #[must_use]
    pub fn processing_timeout(&self) -> Option<Duration> {
        self.processing_timeout_secs.map(Duration::from_secs)
    }

    /// Validate the configuration
    ///
    /// # Errors
    /// - Zero size limit
    /// - Empty media type prefix
    /// - Empty or dotted download extension
    /// - Zero timeout
    pub fn validate(&self) -> Result<()> {
        if self.max_file_size == 0 {
            return Err(IntakeError::config_value_error(
                "max_file_size",
                self.max_file_size,
                "1 or more bytes",
            ));
        }

        if self.accepted_type_prefix.trim().is_empty() {
            return Err(IntakeError::invalid_config(
                "accepted_type_prefix must not be empty",
            ));
        }

        if self.download_extension.is_empty() || self.download_extension.contains('.') {
            return Err(IntakeError::invalid_config(format!(
                "download_extension must be a bare extension, got '{}'",
                self.download_extension
            )));
        }

        if self.download_prefix.contains(&['/', '\\'][..]) {
            return Err(IntakeError::invalid_config(format!(
                "download_prefix must not contain path separators, got '{}'",
                self.download_prefix
            )));
        }

        if self.processing_timeout_secs == Some(0) {
            return Err(IntakeError::config_value_error(
                "processing_timeout_secs",
                0,
                "1 or more seconds, or unset",
            ));
        }

        Ok(())
    }

    /// Parse and validate a configuration from JSON
    ///
    /// Missing fields fall back to their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| IntakeError::invalid_config(format!("Malformed JSON config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a configuration from a JSON file
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path_ref = path.as_ref();
        let contents = std::fs::read_to_string(path_ref)
            .map_err(|e| IntakeError::file_io_error("read config file", path_ref, &e))?;
        Self::from_json_str(&contents)
    }
}

/// Builder for [`IntakeConfig`]
#[derive(Debug, Default)]
pub struct IntakeConfigBuilder {
    config: IntakeConfig,
}

impl IntakeConfigBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn max_file_size(mut self, bytes: u64) -> Self {
        self.config.max_file_size = bytes;
        self
    }

    #[must_use]
    pub fn accepted_type_prefix<S: Into<String>>(mut self, prefix: S) -> Self {
        self.config.accepted_type_prefix = prefix.into();
        self
    }

    #[must_use]
    pub fn download_prefix<S: Into<String>>(mut self, prefix: S) -> Self {
        self.config.download_prefix = prefix.into();
        self
    }

    #[must_use]
    pub fn download_extension<S: Into<String>>(mut self, extension: S) -> Self {
        self.config.download_extension = extension.into();
        self
    }

    #[must_use]
    pub fn processing_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.config.processing_timeout_secs = timeout.map(|t| t.as_secs().max(1));
        self
    }

    /// Build and validate the configuration
    pub fn build(self) -> Result<IntakeConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = IntakeConfig::default();
        assert_eq!(config.max_file_size, 10_485_760);
        assert_eq!(config.accepted_type_prefix, "image/");
        assert_eq!(config.download_prefix, "bg-removed-");
        assert_eq!(config.download_extension, "png");
        assert!(config.processing_timeout().is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_validation() {
        assert!(IntakeConfig::builder().max_file_size(0).build().is_err());
        assert!(IntakeConfig::builder()
            .download_extension(".png")
            .build()
            .is_err());
        assert!(IntakeConfig::builder()
            .download_prefix("../evil-")
            .build()
            .is_err());
        assert!(IntakeConfig::builder()
            .accepted_type_prefix("  ")
            .build()
            .is_err());

        let config = IntakeConfig::builder()
            .processing_timeout(Some(Duration::from_secs(30)))
            .build()
            .unwrap();
        assert_eq!(config.processing_timeout(), Some(Duration::from_secs(30)));
    }

    #[test]
    fn test_sub_second_timeout_rounds_up() {
        let config = IntakeConfig::builder()
            .processing_timeout(Some(Duration::from_millis(10)))
            .build()
            .unwrap();
        assert_eq!(config.processing_timeout_secs, Some(1));
    }

    #[test]
    fn test_json_partial_config() {
        let config = IntakeConfig::from_json_str(r#"{ "processing_timeout_secs": 45 }"#).unwrap();
        assert_eq!(config.processing_timeout(), Some(Duration::from_secs(45)));
        assert_eq!(config.max_file_size, DEFAULT_MAX_FILE_SIZE);

        let err = IntakeConfig::from_json_str(r#"{ "max_file_size": 0 }"#).unwrap_err();
        assert!(err.to_string().contains("max_file_size"));

        assert!(IntakeConfig::from_json_str("not json").is_err());
    }

    #[test]
    fn test_json_file_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("intake.json");
        let config = IntakeConfig::builder().max_file_size(2048).build().unwrap();
        std::fs::write(&path, serde_json::to_string_pretty(&config).unwrap()).unwrap();

        let loaded = IntakeConfig::from_json_file(&path).unwrap();
        assert_eq!(loaded, config);

        let missing = IntakeConfig::from_json_file(dir.path().join("missing.json"));
        assert!(matches!(missing, Err(IntakeError::Io(_))));
    }
}
